use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{page_shell, report_error, spinner, PageProps};
use crate::format::{format_currency, format_percent, format_short_date};
use crate::hooks::use_mounted;
use crate::icons::{
    icon_arrow_right, icon_sparkles, icon_target, icon_trending_down, icon_trending_up,
    icon_wallet,
};
use crate::layout::Page;
use crate::models::{CategoryExpense, DashboardStats, MonthlyTotals, TransactionKind};
use crate::session::use_session;

const FALLBACK_COLOR: &str = "#94a3b8";

/// Each category's share of the total expense, in percent.
pub fn category_shares(categories: &[CategoryExpense]) -> Vec<(&CategoryExpense, f64)> {
    let total: f64 = categories.iter().map(|category| category.value).sum();
    categories
        .iter()
        .map(|category| {
            let share = if total > 0.0 {
                category.value * 100.0 / total
            } else {
                0.0
            };
            (category, share)
        })
        .collect()
}

/// Largest single income or expense figure, used to scale the bars.
pub fn monthly_peak(months: &[MonthlyTotals]) -> f64 {
    months
        .iter()
        .flat_map(|month| [month.income, month.expense])
        .fold(0.0, f64::max)
}

/// Bar height in percent of the chart area.
pub fn bar_height(value: f64, peak: f64) -> f64 {
    if peak <= 0.0 {
        return 0.0;
    }
    (value * 100.0 / peak).clamp(0.0, 100.0)
}

pub fn greeting(first_name: &str) -> String {
    if first_name.is_empty() {
        "Hello!".to_string()
    } else {
        format!("Hello, {first_name}!")
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page(props: &PageProps) -> Html {
    let session = use_session(&props.session);
    let mounted = use_mounted();
    let stats = use_state(|| None::<DashboardStats>);
    let loading = use_state(|| true);

    {
        let props = props.clone();
        let stats = stats.clone();
        let loading = loading.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    let result = match props.session.require_token() {
                        Ok(token) => props.session.api().dashboard_stats(&token).await,
                        Err(error) => Err(error),
                    };
                    if !mounted.get() {
                        return;
                    }

                    match result {
                        Ok(loaded) => {
                            log::info!("dashboard loaded");
                            stats.set(Some(loaded));
                        }
                        Err(error) => report_error(&props, &error, "Could not load dashboard"),
                    }
                    loading.set(false);
                });
                || ()
            },
            (),
        );
    }

    if *loading {
        return spinner();
    }

    let first_name = session
        .user
        .as_ref()
        .map(|user| user.first_name().to_string())
        .unwrap_or_default();

    let go = |page: Page| {
        let on_navigate = props.on_navigate.clone();
        Callback::from(move |_: MouseEvent| on_navigate.emit(page))
    };

    let actions = html! {
        <button type="button" class="flex items-center gap-2 px-4 py-2 rounded-full bg-[#173E63] text-white text-sm font-semibold hover:opacity-90" onclick={go(Page::Transactions)}>
            <span>{"New Transaction"}</span>
            { icon_arrow_right() }
        </button>
    };

    let body = match (*stats).as_ref() {
        None => html! {
            <div class="bg-white rounded-[10px] shadow-sm border border-border text-center py-12 text-muted-foreground">
                {"No data available yet"}
            </div>
        },
        Some(stats) => html! {
            <>
                <div class="grid grid-cols-1 sm:grid-cols-2 xl:grid-cols-4 gap-4">
                    { stat_card("Balance", format_currency(stats.total_balance), icon_wallet(),
                        if stats.total_balance >= 0.0 { "text-[#1D617A]" } else { "text-red-600" }) }
                    { stat_card("Income", format_currency(stats.total_income), icon_trending_up(), "text-emerald-600") }
                    { stat_card("Expenses", format_currency(stats.total_expenses), icon_trending_down(), "text-red-600") }
                    { stat_card("Goals", stats.goals_count.to_string(), icon_target(), "text-[#173E63]") }
                </div>

                <div class="grid grid-cols-1 lg:grid-cols-2 gap-4">
                    { monthly_chart(&stats.monthly_data) }
                    { category_breakdown(&stats.categories_by_expense) }
                </div>

                <div class="grid grid-cols-1 lg:grid-cols-3 gap-4">
                    <div class="lg:col-span-2 bg-white p-5 rounded-[10px] shadow-sm border border-border">
                        <div class="flex items-center justify-between mb-4">
                            <h3 class="font-semibold text-[#173E63]">{"Recent Transactions"}</h3>
                            <button type="button" class="text-sm text-[#173E63] font-semibold hover:underline" onclick={go(Page::Transactions)}>
                                {"See all"}
                            </button>
                        </div>
                        if stats.recent_transactions.is_empty() {
                            <p class="text-sm text-muted-foreground">{"No transactions yet"}</p>
                        } else {
                            <div class="divide-y divide-border">
                                { for stats.recent_transactions.iter().map(|transaction| {
                                    let (sign, class_name) = match transaction.kind {
                                        TransactionKind::Income => ("+", "font-mono text-sm font-semibold text-emerald-600"),
                                        TransactionKind::Expense => ("-", "font-mono text-sm font-semibold text-red-600"),
                                    };
                                    html! {
                                        <div key={transaction.id.clone()} class="flex items-center justify-between py-3">
                                            <div>
                                                <p class="text-sm font-medium">{ transaction.description.clone() }</p>
                                                <p class="text-xs text-muted-foreground">
                                                    { format!("{} • {}",
                                                        transaction.category_name.as_deref().unwrap_or("Other"),
                                                        format_short_date(&transaction.date)) }
                                                </p>
                                            </div>
                                            <span class={class_name}>{ format!("{}{}", sign, format_currency(transaction.amount)) }</span>
                                        </div>
                                    }
                                }) }
                            </div>
                        }
                    </div>

                    <div class="bg-[#173E63] text-white p-5 rounded-[10px] shadow-sm flex flex-col justify-between gap-4">
                        <div class="space-y-2">
                            { icon_sparkles() }
                            <h3 class="font-semibold">{"Need a financial tip?"}</h3>
                            <p class="text-sm opacity-80">{"Ask the assistant about your spending and savings."}</p>
                        </div>
                        <button type="button" class="flex items-center justify-center gap-2 px-4 py-2 rounded-full bg-white text-[#173E63] text-sm font-semibold hover:opacity-90" onclick={go(Page::Tips)}>
                            <span>{"Get tips"}</span>
                            { icon_arrow_right() }
                        </button>
                    </div>
                </div>
            </>
        },
    };

    html! {
        <>
            <div class="px-6 pt-6">
                <p class="text-lg font-semibold text-[#1D617A]">{ greeting(&first_name) }</p>
            </div>
            { page_shell("Dashboard", "Overview of your finances", actions, body) }
        </>
    }
}

fn stat_card(label: &'static str, value: String, icon: Html, tone: &'static str) -> Html {
    html! {
        <div class="bg-white p-5 rounded-[10px] shadow-sm border border-border flex items-center justify-between">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{ label }</p>
                <p class={classes!("text-2xl", "font-bold", "font-mono", tone)}>{ value }</p>
            </div>
            <span class={tone}>{ icon }</span>
        </div>
    }
}

fn monthly_chart(months: &[MonthlyTotals]) -> Html {
    let peak = monthly_peak(months);

    html! {
        <div class="bg-white p-5 rounded-[10px] shadow-sm border border-border">
            <h3 class="font-semibold text-[#173E63] mb-4">{"Income vs Expenses"}</h3>
            if months.is_empty() {
                <p class="text-sm text-muted-foreground">{"No monthly data yet"}</p>
            } else {
                <div class="flex items-end justify-between gap-3 h-48">
                    { for months.iter().map(|month| html! {
                        <div key={month.month.clone()} class="flex-1 flex flex-col items-center gap-2 h-full">
                            <div class="flex-1 w-full flex items-end justify-center gap-1">
                                <div class="w-3 rounded-t bg-emerald-500"
                                    title={format_currency(month.income)}
                                    style={format!("height: {}%", bar_height(month.income, peak))}></div>
                                <div class="w-3 rounded-t bg-red-500"
                                    title={format_currency(month.expense)}
                                    style={format!("height: {}%", bar_height(month.expense, peak))}></div>
                            </div>
                            <span class="text-xs text-muted-foreground">{ month.month.clone() }</span>
                        </div>
                    }) }
                </div>
                <div class="flex gap-4 mt-4 text-xs text-muted-foreground">
                    <span class="flex items-center gap-1"><span class="w-2 h-2 rounded-full bg-emerald-500"></span>{"Income"}</span>
                    <span class="flex items-center gap-1"><span class="w-2 h-2 rounded-full bg-red-500"></span>{"Expenses"}</span>
                </div>
            }
        </div>
    }
}

fn category_breakdown(categories: &[CategoryExpense]) -> Html {
    html! {
        <div class="bg-white p-5 rounded-[10px] shadow-sm border border-border">
            <h3 class="font-semibold text-[#173E63] mb-4">{"Expenses by Category"}</h3>
            if categories.is_empty() {
                <p class="text-sm text-muted-foreground">{"No expenses yet"}</p>
            } else {
                <div class="space-y-3">
                    { for category_shares(categories).into_iter().map(|(category, share)| {
                        let color = if category.color.is_empty() { FALLBACK_COLOR } else { category.color.as_str() };
                        html! {
                            <div key={category.name.clone()} class="space-y-1">
                                <div class="flex justify-between text-sm">
                                    <span class="flex items-center gap-2">
                                        <span class="w-2 h-2 rounded-full" style={format!("background-color: {color}")}></span>
                                        { category.name.clone() }
                                    </span>
                                    <span class="font-mono">
                                        { format!("{} ({})", format_currency(category.value), format_percent(share)) }
                                    </span>
                                </div>
                                <div class="h-2 w-full bg-slate-100 rounded-full overflow-hidden">
                                    <div class="h-full rounded-full" style={format!("width: {share}%; background-color: {color}")}></div>
                                </div>
                            </div>
                        }
                    }) }
                </div>
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(name: &str, value: f64) -> CategoryExpense {
        CategoryExpense {
            name: name.into(),
            value,
            color: String::new(),
        }
    }

    #[test]
    fn shares_add_up_to_the_whole() {
        let categories = [expense("Food", 300.0), expense("Rent", 600.0), expense("Fun", 100.0)];

        let shares: Vec<f64> = category_shares(&categories).into_iter().map(|(_, share)| share).collect();

        assert_eq!(shares, [30.0, 60.0, 10.0]);
    }

    #[test]
    fn shares_of_zero_spending_are_zero() {
        let categories = [expense("Food", 0.0)];

        assert_eq!(category_shares(&categories)[0].1, 0.0);
        assert!(category_shares(&[]).is_empty());
    }

    #[test]
    fn bars_scale_to_the_largest_month() {
        let months = [
            MonthlyTotals { month: "Jan".into(), income: 4000.0, expense: 1000.0 },
            MonthlyTotals { month: "Feb".into(), income: 2000.0, expense: 5000.0 },
        ];

        let peak = monthly_peak(&months);

        assert_eq!(peak, 5000.0);
        assert_eq!(bar_height(2500.0, peak), 50.0);
        assert_eq!(bar_height(1.0, 0.0), 0.0);
    }

    #[test]
    fn greets_by_first_name() {
        assert_eq!(greeting("Ana"), "Hello, Ana!");
        assert_eq!(greeting(""), "Hello!");
    }
}
