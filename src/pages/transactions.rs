use futures_util::future::try_join;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{
    input_value, page_shell, parse_positive_amount, report_error, require, select_value, spinner,
    Dialog, PageProps,
};
use crate::error::AppError;
use crate::format::{date_input_to_iso, date_input_value, format_currency, format_date};
use crate::hooks::{confirm, use_in_flight, use_mounted};
use crate::icons::{icon_edit, icon_plus, icon_search, icon_trash, icon_trending_down, icon_trending_up, icon_wallet};
use crate::models::{Category, Transaction, TransactionKind, TransactionPayload};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionKind),
}

impl TypeFilter {
    fn matches(self, kind: TransactionKind) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => wanted == kind,
        }
    }
}

/// Transactions matching both the type filter and the search text, in the
/// order they were fetched.
///
/// Search is case-insensitive over the description and the category name.
pub fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    filter: TypeFilter,
    search: &str,
) -> Vec<&'a Transaction> {
    let needle = search.trim().to_lowercase();
    transactions
        .iter()
        .filter(|transaction| filter.matches(transaction.kind))
        .filter(|transaction| {
            needle.is_empty()
                || transaction.description.to_lowercase().contains(&needle)
                || transaction
                    .category_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
}

impl Totals {
    pub fn of(transactions: &[Transaction]) -> Self {
        transactions
            .iter()
            .fold(Self::default(), |mut totals, transaction| {
                match transaction.kind {
                    TransactionKind::Income => totals.income += transaction.amount,
                    TransactionKind::Expense => totals.expense += transaction.amount,
                }
                totals
            })
    }

    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// Categories offered for a transaction of `kind`.
pub fn categories_for(categories: &[Category], kind: TransactionKind) -> Vec<&Category> {
    categories
        .iter()
        .filter(|category| category.kind == kind)
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransactionForm {
    pub description: String,
    pub amount: String,
    pub kind: TransactionKind,
    pub category_id: String,
    /// `YYYY-MM-DD`; empty lets the backend use the current time.
    pub date: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            description: String::new(),
            amount: String::new(),
            kind: TransactionKind::Expense,
            category_id: String::new(),
            date: String::new(),
        }
    }
}

impl TransactionForm {
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            amount: transaction.amount.to_string(),
            kind: transaction.kind,
            category_id: transaction.category_id.clone(),
            date: date_input_value(&transaction.date),
        }
    }

    /// Switching between income and expense invalidates the category.
    pub fn with_kind(&self, kind: TransactionKind) -> Self {
        let mut next = self.clone();
        if next.kind != kind {
            next.kind = kind;
            next.category_id.clear();
        }
        next
    }

    pub fn validate(&self) -> Result<TransactionPayload, AppError> {
        let description = require("Description", &self.description)?;
        let amount = parse_positive_amount("Amount", &self.amount)?;
        let category_id = require("Category", &self.category_id)
            .map_err(|_| AppError::Validation("Choose a category".to_string()))?;
        let date = if self.date.trim().is_empty() {
            None
        } else {
            Some(
                date_input_to_iso(&self.date)
                    .ok_or_else(|| AppError::Validation("Date is not valid".to_string()))?,
            )
        };

        Ok(TransactionPayload {
            description,
            amount,
            kind: self.kind,
            category_id,
            date,
        })
    }
}

#[derive(Clone)]
struct TransactionsData {
    props: PageProps,
    mounted: std::rc::Rc<std::cell::Cell<bool>>,
    transactions: UseStateHandle<Vec<Transaction>>,
    categories: UseStateHandle<Vec<Category>>,
    loading: UseStateHandle<bool>,
}

impl TransactionsData {
    fn load(&self) {
        let this = self.clone();
        spawn_local(async move {
            let result = match this.props.session.require_token() {
                Ok(token) => {
                    let api = this.props.session.api();
                    try_join(api.list_transactions(&token), api.list_categories(&token)).await
                }
                Err(error) => Err(error),
            };
            if !this.mounted.get() {
                return;
            }

            match result {
                Ok((transactions, categories)) => {
                    log::info!("loaded {} transactions", transactions.len());
                    this.transactions.set(transactions);
                    this.categories.set(categories);
                }
                Err(error) => report_error(&this.props, &error, "Could not load transactions"),
            }
            this.loading.set(false);
        });
    }
}

#[function_component(TransactionsPage)]
pub fn transactions_page(props: &PageProps) -> Html {
    let mounted = use_mounted();
    let transactions = use_state(Vec::<Transaction>::new);
    let categories = use_state(Vec::<Category>::new);
    let loading = use_state(|| true);
    let dialog_open = use_state(|| false);
    let editing = use_state(|| None::<String>);
    let form = use_state(TransactionForm::default);
    let saving = use_state(|| false);
    let in_flight = use_in_flight();
    let type_filter = use_state(TypeFilter::default);
    let search = use_state(String::new);

    let data = TransactionsData {
        props: props.clone(),
        mounted: mounted.clone(),
        transactions: transactions.clone(),
        categories: categories.clone(),
        loading: loading.clone(),
    };

    {
        let data = data.clone();
        use_effect_with_deps(
            move |_| {
                data.load();
                || ()
            },
            (),
        );
    }

    let close_dialog = {
        let dialog_open = dialog_open.clone();
        let editing = editing.clone();
        let form = form.clone();
        Callback::from(move |_: ()| {
            dialog_open.set(false);
            editing.set(None);
            form.set(TransactionForm::default());
        })
    };

    let on_new = {
        let dialog_open = dialog_open.clone();
        let editing = editing.clone();
        let form = form.clone();
        Callback::from(move |_: MouseEvent| {
            editing.set(None);
            form.set(TransactionForm::default());
            dialog_open.set(true);
        })
    };

    let on_submit = {
        let data = data.clone();
        let form = form.clone();
        let editing = editing.clone();
        let saving = saving.clone();
        let in_flight = in_flight.clone();
        let close_dialog = close_dialog.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let payload = match form.validate() {
                Ok(payload) => payload,
                Err(error) => {
                    log::warn!("transaction form rejected: {error}");
                    data.props.notifier.error(&error);
                    return;
                }
            };

            if !in_flight.try_start() {
                return;
            }
            saving.set(true);
            let data = data.clone();
            let editing_id = (*editing).clone();
            let saving = saving.clone();
            let in_flight = in_flight.clone();
            let close_dialog = close_dialog.clone();
            spawn_local(async move {
                let result = match data.props.session.require_token() {
                    Ok(token) => {
                        let api = data.props.session.api();
                        match &editing_id {
                            Some(id) => api.update_transaction(&token, id, &payload).await,
                            None => api.create_transaction(&token, &payload).await,
                        }
                    }
                    Err(error) => Err(error),
                };
                in_flight.finish();
                if !data.mounted.get() {
                    return;
                }

                saving.set(false);
                match result {
                    Ok(_) => {
                        data.props.notifier.success(if editing_id.is_some() {
                            "Transaction updated"
                        } else {
                            "Transaction added"
                        });
                        close_dialog.emit(());
                        data.load();
                    }
                    Err(error) => report_error(&data.props, &error, "Could not save transaction"),
                }
            });
        })
    };

    let on_edit = {
        let dialog_open = dialog_open.clone();
        let editing = editing.clone();
        let form = form.clone();
        Callback::from(move |transaction: Transaction| {
            form.set(TransactionForm::from_transaction(&transaction));
            editing.set(Some(transaction.id));
            dialog_open.set(true);
        })
    };

    let on_delete = {
        let data = data.clone();
        Callback::from(move |id: String| {
            if !confirm("Delete this transaction?") {
                return;
            }

            let data = data.clone();
            spawn_local(async move {
                let result = match data.props.session.require_token() {
                    Ok(token) => data.props.session.api().delete_transaction(&token, &id).await,
                    Err(error) => Err(error),
                };
                if !data.mounted.get() {
                    return;
                }

                match result {
                    Ok(()) => {
                        data.props.notifier.success("Transaction deleted");
                        data.load();
                    }
                    Err(error) => report_error(&data.props, &error, "Could not delete transaction"),
                }
            });
        })
    };

    if *loading {
        return spinner();
    }

    let totals = Totals::of(&transactions);
    let visible = filter_transactions(&transactions, *type_filter, &search);

    let actions = html! {
        <button type="button" class="flex items-center gap-2 px-4 py-2 rounded-full bg-[#173E63] text-white text-sm font-semibold hover:opacity-90" onclick={on_new.clone()}>
            { icon_plus() }
            <span>{"New Transaction"}</span>
        </button>
    };

    let balance_class = if totals.balance() >= 0.0 {
        "text-2xl font-bold font-mono text-[#1D617A]"
    } else {
        "text-2xl font-bold font-mono text-red-600"
    };

    let filter_button = |label: &'static str, value: TypeFilter| {
        let type_filter = type_filter.clone();
        let class_name = if *type_filter == value {
            "px-4 py-1.5 rounded-full text-sm font-semibold bg-[#173E63] text-white"
        } else {
            "px-4 py-1.5 rounded-full text-sm font-semibold text-slate-500 hover:bg-slate-100"
        };
        html! {
            <button type="button" class={class_name} onclick={Callback::from(move |_| type_filter.set(value))}>
                { label }
            </button>
        }
    };

    html! {
        { page_shell(
            "Transactions",
            "Manage your income and expenses",
            actions,
            html! {
                <>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        <div class="bg-white p-5 rounded-[10px] shadow-sm border border-border flex items-center justify-between">
                            <div>
                                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{"Available Balance"}</p>
                                <p class={balance_class}>{ format_currency(totals.balance()) }</p>
                            </div>
                            { icon_wallet() }
                        </div>
                        <div class="bg-white p-5 rounded-[10px] shadow-sm border border-border flex items-center justify-between">
                            <div>
                                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{"Total Income"}</p>
                                <p class="text-2xl font-bold font-mono text-emerald-600">{ format_currency(totals.income) }</p>
                            </div>
                            <span class="text-emerald-600">{ icon_trending_up() }</span>
                        </div>
                        <div class="bg-white p-5 rounded-[10px] shadow-sm border border-border flex items-center justify-between">
                            <div>
                                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{"Total Expenses"}</p>
                                <p class="text-2xl font-bold font-mono text-red-600">{ format_currency(totals.expense) }</p>
                            </div>
                            <span class="text-red-600">{ icon_trending_down() }</span>
                        </div>
                    </div>

                    <div class="flex flex-col md:flex-row gap-4">
                        <div class="relative flex-1">
                            <span class="absolute left-3 top-1/2 -translate-y-1/2 text-slate-400">{ icon_search() }</span>
                            <input
                                type="text"
                                class="w-full pl-10 pr-4 py-2 bg-white border border-border rounded-lg focus:outline-none focus:ring-2 focus:ring-[#173E63]"
                                placeholder="Search transactions..."
                                value={(*search).clone()}
                                oninput={{
                                    let search = search.clone();
                                    Callback::from(move |e: InputEvent| search.set(input_value(e)))
                                }}
                            />
                        </div>
                        <div class="flex gap-1 bg-white border border-border rounded-full p-1">
                            { filter_button("All", TypeFilter::All) }
                            { filter_button("Income", TypeFilter::Only(TransactionKind::Income)) }
                            { filter_button("Expenses", TypeFilter::Only(TransactionKind::Expense)) }
                        </div>
                    </div>

                    <div class="bg-white rounded-[10px] shadow-sm border border-border">
                        if visible.is_empty() {
                            <div class="text-center py-12 text-muted-foreground">
                                <p>{"No transactions found"}</p>
                                <button type="button" class="mt-2 text-[#173E63] font-semibold underline" onclick={on_new}>
                                    {"Add your first transaction"}
                                </button>
                            </div>
                        } else {
                            <div class="divide-y divide-border">
                                { for visible.into_iter().map(|transaction| transaction_row(transaction, &on_edit, &on_delete)) }
                            </div>
                        }
                    </div>

                    if *dialog_open {
                        <Dialog
                            title={if editing.is_some() { "Edit Transaction" } else { "New Transaction" }.to_string()}
                            on_close={close_dialog}
                        >
                            { transaction_form(&form, &categories, *saving, editing.is_some(), on_submit) }
                        </Dialog>
                    }
                </>
            }
        ) }
    }
}

fn transaction_row(
    transaction: &Transaction,
    on_edit: &Callback<Transaction>,
    on_delete: &Callback<String>,
) -> Html {
    let (sign, amount_class, icon) = match transaction.kind {
        TransactionKind::Income => ("+", "font-mono font-semibold text-emerald-600", icon_trending_up()),
        TransactionKind::Expense => ("-", "font-mono font-semibold text-red-600", icon_trending_down()),
    };
    let category = transaction
        .category_name
        .clone()
        .unwrap_or_else(|| "Other".to_string());
    let badge_style = transaction
        .category_color
        .as_deref()
        .map(|color| format!("background-color: {color}20; color: {color}"))
        .unwrap_or_default();

    let edit = {
        let on_edit = on_edit.clone();
        let transaction = transaction.clone();
        Callback::from(move |_| on_edit.emit(transaction.clone()))
    };
    let delete = {
        let on_delete = on_delete.clone();
        let id = transaction.id.clone();
        Callback::from(move |_| on_delete.emit(id.clone()))
    };

    html! {
        <div key={transaction.id.clone()} class="flex items-center justify-between p-4 hover:bg-slate-50">
            <div class="flex items-center gap-4">
                <div class="w-10 h-10 rounded-full flex items-center justify-center" style={badge_style}>
                    { icon }
                </div>
                <div>
                    <p class="font-medium">{ transaction.description.clone() }</p>
                    <p class="text-sm text-muted-foreground">
                        { format!("{} • {}", category, format_date(&transaction.date)) }
                    </p>
                </div>
            </div>
            <div class="flex items-center gap-4">
                <span class={amount_class}>{ format!("{}{}", sign, format_currency(transaction.amount)) }</span>
                <div class="flex gap-1">
                    <button type="button" class="p-2 rounded-full hover:bg-slate-100" aria-label="Edit" onclick={edit}>{ icon_edit() }</button>
                    <button type="button" class="p-2 rounded-full hover:bg-red-50 text-red-600" aria-label="Delete" onclick={delete}>{ icon_trash() }</button>
                </div>
            </div>
        </div>
    }
}

fn transaction_form(
    form: &UseStateHandle<TransactionForm>,
    categories: &[Category],
    saving: bool,
    is_edit: bool,
    on_submit: Callback<SubmitEvent>,
) -> Html {
    let kind_tab = |kind: TransactionKind| {
        let form = form.clone();
        let class_name = if form.kind == kind {
            "flex-1 py-2 rounded-lg text-sm font-semibold bg-white shadow-sm text-[#173E63]"
        } else {
            "flex-1 py-2 rounded-lg text-sm font-semibold text-slate-500"
        };
        html! {
            <button type="button" class={class_name} onclick={Callback::from(move |_| form.set(form.with_kind(kind)))}>
                { kind.label() }
            </button>
        }
    };

    let update = |apply: fn(&mut TransactionForm, String)| {
        let form = form.clone();
        Callback::from(move |value: String| {
            let mut next = (*form).clone();
            apply(&mut next, value);
            form.set(next);
        })
    };
    let on_description = update(|form, value| form.description = value);
    let on_amount = update(|form, value| form.amount = value);
    let on_category = update(|form, value| form.category_id = value);
    let on_date = update(|form, value| form.date = value);

    let input_class = "w-full px-4 py-2 bg-white border border-border rounded-lg focus:outline-none focus:ring-2 focus:ring-[#173E63]";

    html! {
        <form class="space-y-4" onsubmit={on_submit}>
            <div class="flex gap-1 bg-slate-100 rounded-xl p-1">
                { kind_tab(TransactionKind::Expense) }
                { kind_tab(TransactionKind::Income) }
            </div>

            <div class="space-y-1">
                <label class="text-sm font-medium">{"Description"}</label>
                <input type="text" class={input_class} placeholder="e.g. Lunch, Salary..."
                    value={form.description.clone()}
                    oninput={on_description.reform(input_value)} />
            </div>

            <div class="space-y-1">
                <label class="text-sm font-medium">{"Amount (R$)"}</label>
                <input type="number" step="0.01" min="0.01" class={input_class} placeholder="0,00"
                    value={form.amount.clone()}
                    oninput={on_amount.reform(input_value)} />
            </div>

            <div class="space-y-1">
                <label class="text-sm font-medium">{"Category"}</label>
                <select class={input_class} onchange={on_category.reform(select_value)}>
                    <option value="" selected={form.category_id.is_empty()}>{"Select a category"}</option>
                    { for categories_for(categories, form.kind).into_iter().map(|category| html! {
                        <option key={category.id.clone()} value={category.id.clone()} selected={category.id == form.category_id}>
                            { category.name.clone() }
                        </option>
                    }) }
                </select>
            </div>

            <div class="space-y-1">
                <label class="text-sm font-medium">{"Date"}</label>
                <input type="date" class={input_class}
                    value={form.date.clone()}
                    oninput={on_date.reform(input_value)} />
            </div>

            <button type="submit" class="w-full py-2 rounded-full bg-[#173E63] text-white font-semibold hover:opacity-90" disabled={saving}>
                {
                    if saving {
                        "Saving..."
                    } else if is_edit {
                        "Save Changes"
                    } else {
                        "Add Transaction"
                    }
                }
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(id: &str, description: &str, amount: f64, kind: TransactionKind, category: Option<&str>) -> Transaction {
        Transaction {
            id: id.into(),
            description: description.into(),
            amount,
            kind,
            category_id: "c".into(),
            category_name: category.map(Into::into),
            category_icon: None,
            category_color: None,
            date: "2025-01-05T00:00:00+00:00".into(),
            user_id: "u1".into(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            transaction("1", "Salary January", 5000.0, TransactionKind::Income, Some("Salary")),
            transaction("2", "Lunch", 35.5, TransactionKind::Expense, Some("Food")),
            transaction("3", "Freelance site", 1200.0, TransactionKind::Income, Some("Freelance")),
            transaction("4", "Uber", 22.0, TransactionKind::Expense, Some("Transport")),
            transaction("5", "Groceries", 310.25, TransactionKind::Expense, None),
        ]
    }

    fn ids(transactions: &[&Transaction]) -> Vec<String> {
        transactions.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn no_filter_keeps_everything_in_order() {
        let transactions = sample();

        let got = filter_transactions(&transactions, TypeFilter::All, "");

        assert_eq!(ids(&got), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn type_filter_keeps_fetch_order() {
        let transactions = sample();

        let got = filter_transactions(&transactions, TypeFilter::Only(TransactionKind::Expense), "");

        assert_eq!(ids(&got), ["2", "4", "5"]);
    }

    #[test]
    fn search_matches_description_or_category_ignoring_case() {
        let transactions = sample();

        assert_eq!(ids(&filter_transactions(&transactions, TypeFilter::All, "FOOD")), ["2"]);
        assert_eq!(ids(&filter_transactions(&transactions, TypeFilter::All, "sal")), ["1"]);
    }

    #[test]
    fn search_and_type_must_both_match() {
        let transactions = sample();

        let got = filter_transactions(&transactions, TypeFilter::Only(TransactionKind::Expense), "l");

        assert_eq!(ids(&got), ["2"]);
    }

    #[test]
    fn filtering_does_not_touch_the_list() {
        let transactions = sample();
        let before = transactions.clone();

        let _ = filter_transactions(&transactions, TypeFilter::Only(TransactionKind::Income), "x");

        assert_eq!(transactions, before);
    }

    #[test]
    fn totals_sum_by_type_and_balance_is_the_difference() {
        let totals = Totals::of(&sample());

        assert_eq!(totals.income, 6200.0);
        assert_eq!(totals.expense, 367.75);
        assert_eq!(totals.balance(), 6200.0 - 367.75);
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        assert_eq!(Totals::of(&[]), Totals::default());
        assert_eq!(Totals::default().balance(), 0.0);
    }

    #[test]
    fn switching_kind_clears_category() {
        let form = TransactionForm {
            category_id: "food".into(),
            ..TransactionForm::default()
        };

        assert_eq!(form.with_kind(TransactionKind::Expense).category_id, "food");
        assert_eq!(form.with_kind(TransactionKind::Income).category_id, "");
    }

    #[test]
    fn valid_form_produces_payload() {
        let form = TransactionForm {
            description: " Lunch ".into(),
            amount: "35,50".into(),
            kind: TransactionKind::Expense,
            category_id: "food".into(),
            date: "2025-01-05".into(),
        };

        let payload = form.validate().unwrap();

        assert_eq!(
            payload,
            TransactionPayload {
                description: "Lunch".into(),
                amount: 35.5,
                kind: TransactionKind::Expense,
                category_id: "food".into(),
                date: Some("2025-01-05T00:00:00+00:00".into()),
            }
        );
    }

    #[test]
    fn form_requires_every_field_but_date() {
        let complete = TransactionForm {
            description: "Lunch".into(),
            amount: "10".into(),
            kind: TransactionKind::Expense,
            category_id: "food".into(),
            date: String::new(),
        };
        assert_eq!(complete.validate().unwrap().date, None);

        let missing_description = TransactionForm { description: " ".into(), ..complete.clone() };
        let negative_amount = TransactionForm { amount: "-1".into(), ..complete.clone() };
        let missing_category = TransactionForm { category_id: String::new(), ..complete.clone() };
        let bad_date = TransactionForm { date: "05/01/2025".into(), ..complete };

        for form in [missing_description, negative_amount, missing_category, bad_date] {
            assert!(matches!(form.validate(), Err(AppError::Validation(_))), "{form:?}");
        }
    }

    #[test]
    fn editing_prefills_from_transaction() {
        let form = TransactionForm::from_transaction(&transaction("9", "Rent", 1500.0, TransactionKind::Expense, Some("Home")));

        assert_eq!(form.description, "Rent");
        assert_eq!(form.amount, "1500");
        assert_eq!(form.date, "2025-01-05");
    }

    #[test]
    fn categories_are_offered_by_kind() {
        let category = |id: &str, kind| Category {
            id: id.into(),
            name: id.into(),
            kind,
            icon: "circle".into(),
            color: "#000".into(),
            user_id: "u1".into(),
        };
        let categories = vec![
            category("salary", TransactionKind::Income),
            category("food", TransactionKind::Expense),
            category("bonus", TransactionKind::Income),
        ];

        let offered: Vec<&str> = categories_for(&categories, TransactionKind::Income)
            .into_iter()
            .map(|c| c.id.as_str())
            .collect();

        assert_eq!(offered, ["salary", "bonus"]);
    }
}
