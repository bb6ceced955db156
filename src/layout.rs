use yew::prelude::*;

use crate::icons::{icon_arrows, icon_layout_grid, icon_log_out, icon_sparkles, icon_target};
use crate::session::{use_session, SessionHandle};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Dashboard,
    Transactions,
    Goals,
    Tips,
}

struct NavItem {
    label: &'static str,
    page: Page,
    icon: fn() -> Html,
}

const NAV_ITEMS: [NavItem; 4] = [
    NavItem {
        label: "Dashboard",
        page: Page::Dashboard,
        icon: icon_layout_grid,
    },
    NavItem {
        label: "Transactions",
        page: Page::Transactions,
        icon: icon_arrows,
    },
    NavItem {
        label: "Goals",
        page: Page::Goals,
        icon: icon_target,
    },
    NavItem {
        label: "AI Tips",
        page: Page::Tips,
        icon: icon_sparkles,
    },
];

/// First letter of the user's name, shown in the avatar.
fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub session: SessionHandle,
    pub active_page: Page,
    pub on_select: Callback<Page>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar
                    session={props.session.clone()}
                    active_page={props.active_page}
                    on_select={props.on_select.clone()}
                />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <main class="flex-1 overflow-y-auto pb-20 md:pb-0">
                    { for props.children.iter() }
                </main>
            </div>

            <BottomNav active_page={props.active_page} on_select={props.on_select.clone()} />
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    session: SessionHandle,
    active_page: Page,
    on_select: Callback<Page>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let session = use_session(&props.session);

    let on_logout = {
        let handle = props.session.clone();
        Callback::from(move |_| handle.logout())
    };

    let (name, email) = session
        .user
        .as_ref()
        .map(|user| (user.name.clone(), user.email.clone()))
        .unwrap_or_default();

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <div class="w-10 h-10 bg-[#173E63] rounded-full flex items-center justify-center text-white">
                    { icon_arrows() }
                </div>
                <span class="text-[#173E63] text-xl font-black tracking-tight">{"FinTrack"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for NAV_ITEMS.iter().map(|item| {
                        let class_name = if item.page == props.active_page {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_select = props.on_select.clone();
                        let page = item.page;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(page))}>
                                <span class="shrink-0">{ (item.icon)() }</span>
                                <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                            </button>
                        }
                    }) }
                </nav>

                <div class="mt-auto pt-4 space-y-3">
                    <div class="flex items-center gap-3 px-3">
                        <div class="w-9 h-9 shrink-0 rounded-full bg-[#B2CBDE] text-[#173E63] flex items-center justify-center font-bold">
                            { initial(&name) }
                        </div>
                        <div class="min-w-0">
                            <p class="text-[13px] font-semibold text-white truncate">{ name }</p>
                            <p class="text-[11px] text-slate-300 truncate">{ email }</p>
                        </div>
                    </div>
                    <button type="button" onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                        { icon_log_out() }
                        <span>{"Log Out"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct BottomNavProps {
    active_page: Page,
    on_select: Callback<Page>,
}

#[function_component(BottomNav)]
fn bottom_nav(props: &BottomNavProps) -> Html {
    html! {
        <nav class="md:hidden fixed bottom-0 inset-x-0 z-40 bg-[#173E63] flex justify-around py-2">
            { for NAV_ITEMS.iter().map(|item| {
                let class_name = if item.page == props.active_page {
                    "flex flex-col items-center gap-1 px-3 py-1 rounded-lg text-[11px] font-medium text-[#B2CBDE]"
                } else {
                    "flex flex-col items-center gap-1 px-3 py-1 rounded-lg text-[11px] font-medium text-slate-300"
                };
                let on_select = props.on_select.clone();
                let page = item.page;

                html! {
                    <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(page))}>
                        { (item.icon)() }
                        <span>{ item.label }</span>
                    </button>
                }
            }) }
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::{initial, Page, NAV_ITEMS};

    #[test]
    fn every_page_has_one_nav_entry() {
        for page in [Page::Dashboard, Page::Transactions, Page::Goals, Page::Tips] {
            assert_eq!(NAV_ITEMS.iter().filter(|item| item.page == page).count(), 1);
        }
    }

    #[test]
    fn avatar_uses_the_first_letter() {
        assert_eq!(initial("ana souza"), "A");
        assert_eq!(initial(""), "?");
    }
}
