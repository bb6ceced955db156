use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::ApiClient;
use crate::layout::{Layout, Page};
use crate::notify::{Notifier, Toaster, Toasts};
use crate::pages::dashboard::DashboardPage;
use crate::pages::goals::GoalsPage;
use crate::pages::login::LoginPage;
use crate::pages::spinner;
use crate::pages::tips::TipsPage;
use crate::pages::transactions::TransactionsPage;
use crate::session::{use_session, SessionHandle, SessionStatus, SessionStore};
use crate::storage::LocalStorage;

#[function_component(App)]
pub fn app() -> Html {
    let handle = use_state(|| SessionHandle::new(SessionStore::new(ApiClient::default(), LocalStorage)));
    let session = use_session(&handle);
    let toasts = use_reducer(Toasts::default);
    let notifier = {
        let dispatcher = toasts.dispatcher();
        use_state(move || Notifier::new(dispatcher))
    };
    let active_page = use_state(Page::default);

    {
        let handle = (*handle).clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move { handle.initialize().await });
                || ()
            },
            (),
        );
    }

    let on_select = {
        let active_page = active_page.clone();
        Callback::from(move |page: Page| active_page.set(page))
    };

    let content = match session.status() {
        SessionStatus::Loading => html! {
            <div class="min-h-screen flex items-center justify-center bg-background">
                { spinner() }
            </div>
        },
        SessionStatus::Anonymous => html! {
            <LoginPage
                session={(*handle).clone()}
                notifier={(*notifier).clone()}
                on_navigate={on_select.clone()}
            />
        },
        SessionStatus::Authenticated => {
            let page = match *active_page {
                Page::Dashboard => html! {
                    <DashboardPage session={(*handle).clone()} notifier={(*notifier).clone()} on_navigate={on_select.clone()} />
                },
                Page::Transactions => html! {
                    <TransactionsPage session={(*handle).clone()} notifier={(*notifier).clone()} />
                },
                Page::Goals => html! {
                    <GoalsPage session={(*handle).clone()} notifier={(*notifier).clone()} />
                },
                Page::Tips => html! {
                    <TipsPage session={(*handle).clone()} notifier={(*notifier).clone()} />
                },
            };

            html! {
                <Layout session={(*handle).clone()} active_page={*active_page} on_select={on_select}>
                    { page }
                </Layout>
            }
        }
    };

    html! {
        <>
            { content }
            <Toaster {toasts} />
        </>
    }
}
