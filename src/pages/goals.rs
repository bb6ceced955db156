use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{
    input_value, page_shell, parse_amount, parse_positive_amount, report_error, require, spinner,
    Dialog, PageProps,
};
use crate::error::AppError;
use crate::format::{
    date_input_to_iso, date_input_value, format_currency, format_numeric_date, format_percent,
};
use crate::hooks::{confirm, use_in_flight, use_mounted};
use crate::icons::{icon_edit, icon_piggy_bank, icon_plus, icon_target, icon_trash, icon_trophy};
use crate::models::{Goal, GoalAmountUpdate, GoalPayload};

/// Share of `target` already saved, between 0 and 100.
pub fn progress_percent(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (current / target * 100.0).clamp(0.0, 100.0)
}

pub fn is_completed(goal: &Goal) -> bool {
    goal.current_amount >= goal.target_amount
        || progress_percent(goal.current_amount, goal.target_amount) >= 100.0
}

pub fn remaining(goal: &Goal) -> f64 {
    (goal.target_amount - goal.current_amount).max(0.0)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GoalSummary {
    pub total: usize,
    pub completed: usize,
    pub total_saved: f64,
    pub total_target: f64,
}

impl GoalSummary {
    pub fn of(goals: &[Goal]) -> Self {
        goals.iter().fold(Self::default(), |mut summary, goal| {
            summary.total += 1;
            if is_completed(goal) {
                summary.completed += 1;
            }
            summary.total_saved += goal.current_amount;
            summary.total_target += goal.target_amount;
            summary
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GoalForm {
    pub name: String,
    pub target_amount: String,
    pub current_amount: String,
    /// `YYYY-MM-DD` or empty.
    pub deadline: String,
}

impl Default for GoalForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            target_amount: String::new(),
            current_amount: "0".to_string(),
            deadline: String::new(),
        }
    }
}

impl GoalForm {
    pub fn from_goal(goal: &Goal) -> Self {
        Self {
            name: goal.name.clone(),
            target_amount: goal.target_amount.to_string(),
            current_amount: goal.current_amount.to_string(),
            deadline: goal
                .deadline
                .as_deref()
                .map(date_input_value)
                .unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<GoalPayload, AppError> {
        let name = require("Name", &self.name)?;
        let target_amount = parse_positive_amount("Target amount", &self.target_amount)?;
        let current_amount = if self.current_amount.trim().is_empty() {
            0.0
        } else {
            parse_amount("Current amount", &self.current_amount)?
        };
        if current_amount < 0.0 {
            return Err(AppError::Validation(
                "Current amount cannot be negative".to_string(),
            ));
        }
        let deadline = if self.deadline.trim().is_empty() {
            None
        } else {
            Some(
                date_input_to_iso(&self.deadline)
                    .ok_or_else(|| AppError::Validation("Deadline is not valid".to_string()))?,
            )
        };

        Ok(GoalPayload {
            name,
            target_amount,
            current_amount,
            deadline,
        })
    }
}

/// The new saved amount after depositing `raw` into `goal`.
pub fn deposit(goal: &Goal, raw: &str) -> Result<GoalAmountUpdate, AppError> {
    let amount = parse_positive_amount("Amount", raw)?;
    Ok(GoalAmountUpdate {
        current_amount: goal.current_amount + amount,
    })
}

/// Amounts typed into each goal's "add amount" box, keyed by goal id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DepositInputs {
    pending: HashMap<String, String>,
}

pub enum DepositAction {
    Edit { id: String, value: String },
    Clear(String),
}

impl DepositInputs {
    pub fn get(&self, id: &str) -> &str {
        self.pending.get(id).map(String::as_str).unwrap_or_default()
    }

    fn apply(&mut self, action: DepositAction) {
        match action {
            DepositAction::Edit { id, value } => {
                self.pending.insert(id, value);
            }
            DepositAction::Clear(id) => {
                self.pending.remove(&id);
            }
        }
    }
}

impl Reducible for DepositInputs {
    type Action = DepositAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        next.into()
    }
}

#[derive(Clone)]
struct GoalsData {
    props: PageProps,
    mounted: Rc<Cell<bool>>,
    goals: UseStateHandle<Vec<Goal>>,
    loading: UseStateHandle<bool>,
}

impl GoalsData {
    fn load(&self) {
        let this = self.clone();
        spawn_local(async move {
            let result = match this.props.session.require_token() {
                Ok(token) => this.props.session.api().list_goals(&token).await,
                Err(error) => Err(error),
            };
            if !this.mounted.get() {
                return;
            }

            match result {
                Ok(goals) => {
                    log::info!("loaded {} goals", goals.len());
                    this.goals.set(goals);
                }
                Err(error) => report_error(&this.props, &error, "Could not load goals"),
            }
            this.loading.set(false);
        });
    }
}

#[function_component(GoalsPage)]
pub fn goals_page(props: &PageProps) -> Html {
    let mounted = use_mounted();
    let goals = use_state(Vec::<Goal>::new);
    let loading = use_state(|| true);
    let dialog_open = use_state(|| false);
    let editing = use_state(|| None::<String>);
    let form = use_state(GoalForm::default);
    let saving = use_state(|| false);
    let in_flight = use_in_flight();
    let deposits = use_reducer(DepositInputs::default);

    let data = GoalsData {
        props: props.clone(),
        mounted,
        goals: goals.clone(),
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
            form.set(GoalForm::default());
        })
    };

    let on_new = {
        let dialog_open = dialog_open.clone();
        let editing = editing.clone();
        let form = form.clone();
        Callback::from(move |_: MouseEvent| {
            editing.set(None);
            form.set(GoalForm::default());
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
                    log::warn!("goal form rejected: {error}");
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
                            Some(id) => api.update_goal(&token, id, &payload).await,
                            None => api.create_goal(&token, &payload).await,
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
                    Ok(goal) => {
                        log::info!("saved goal {}", goal.id);
                        data.props.notifier.success(if editing_id.is_some() {
                            "Goal updated"
                        } else {
                            "Goal created"
                        });
                        close_dialog.emit(());
                        data.load();
                    }
                    Err(error) => report_error(&data.props, &error, "Could not save goal"),
                }
            });
        })
    };

    let on_edit = {
        let dialog_open = dialog_open.clone();
        let editing = editing.clone();
        let form = form.clone();
        Callback::from(move |goal: Goal| {
            form.set(GoalForm::from_goal(&goal));
            editing.set(Some(goal.id));
            dialog_open.set(true);
        })
    };

    let on_delete = {
        let data = data.clone();
        Callback::from(move |id: String| {
            if !confirm("Delete this goal?") {
                return;
            }

            let data = data.clone();
            spawn_local(async move {
                let result = match data.props.session.require_token() {
                    Ok(token) => data.props.session.api().delete_goal(&token, &id).await,
                    Err(error) => Err(error),
                };
                if !data.mounted.get() {
                    return;
                }

                match result {
                    Ok(()) => {
                        data.props.notifier.success("Goal deleted");
                        data.load();
                    }
                    Err(error) => report_error(&data.props, &error, "Could not delete goal"),
                }
            });
        })
    };

    let on_deposit_input = {
        let deposits = deposits.dispatcher();
        Callback::from(move |(id, value): (String, String)| {
            deposits.dispatch(DepositAction::Edit { id, value })
        })
    };

    let on_deposit = {
        let data = data.clone();
        let deposits = deposits.clone();
        Callback::from(move |goal: Goal| {
            let raw = deposits.get(&goal.id).to_string();
            let update = match deposit(&goal, &raw) {
                Ok(update) => update,
                Err(error) => {
                    log::warn!("deposit rejected: {error}");
                    data.props.notifier.error(&error);
                    return;
                }
            };

            let data = data.clone();
            let deposits = deposits.dispatcher();
            spawn_local(async move {
                let result = match data.props.session.require_token() {
                    Ok(token) => {
                        data.props
                            .session
                            .api()
                            .set_goal_amount(&token, &goal.id, &update)
                            .await
                    }
                    Err(error) => Err(error),
                };
                if !data.mounted.get() {
                    return;
                }

                match result {
                    Ok(_) => {
                        deposits.dispatch(DepositAction::Clear(goal.id.clone()));
                        data.props.notifier.success("Amount added");
                        data.load();
                    }
                    Err(error) => report_error(&data.props, &error, "Could not add amount"),
                }
            });
        })
    };

    if *loading {
        return spinner();
    }

    let summary = GoalSummary::of(&goals);

    let actions = html! {
        <button type="button" class="flex items-center gap-2 px-4 py-2 rounded-full bg-[#173E63] text-white text-sm font-semibold hover:opacity-90" onclick={on_new.clone()}>
            { icon_plus() }
            <span>{"New Goal"}</span>
        </button>
    };

    page_shell(
        "Goals",
        "Track your savings goals",
        actions,
        html! {
            <>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    { summary_card("Active Goals", summary.total.to_string(), None, icon_target()) }
                    { summary_card("Completed", summary.completed.to_string(), None, icon_trophy()) }
                    { summary_card(
                        "Total Saved",
                        format_currency(summary.total_saved),
                        Some(format!("of {}", format_currency(summary.total_target))),
                        icon_piggy_bank(),
                    ) }
                </div>

                if goals.is_empty() {
                    <div class="bg-white rounded-[10px] shadow-sm border border-border text-center py-12 text-muted-foreground">
                        <p>{"No goals yet"}</p>
                        <button type="button" class="mt-2 text-[#173E63] font-semibold underline" onclick={on_new}>
                            {"Create your first goal"}
                        </button>
                    </div>
                } else {
                    <div class="grid grid-cols-1 md:grid-cols-2 xl:grid-cols-3 gap-4">
                        { for goals.iter().map(|goal| {
                            let pending = deposits.get(&goal.id).to_string();
                            goal_card(goal, pending, &on_edit, &on_delete, &on_deposit_input, &on_deposit)
                        }) }
                    </div>
                }

                if *dialog_open {
                    <Dialog
                        title={if editing.is_some() { "Edit Goal" } else { "New Goal" }.to_string()}
                        on_close={close_dialog}
                    >
                        { goal_form(&form, *saving, editing.is_some(), on_submit) }
                    </Dialog>
                }
            </>
        },
    )
}

fn summary_card(label: &'static str, value: String, caption: Option<String>, icon: Html) -> Html {
    html! {
        <div class="bg-white p-5 rounded-[10px] shadow-sm border border-border flex items-center justify-between">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest uppercase">{ label }</p>
                <p class="text-2xl font-bold font-mono text-[#173E63]">{ value }</p>
                if let Some(caption) = caption {
                    <p class="text-xs text-muted-foreground">{ caption }</p>
                }
            </div>
            <span class="text-[#1D617A]">{ icon }</span>
        </div>
    }
}

fn goal_card(
    goal: &Goal,
    pending: String,
    on_edit: &Callback<Goal>,
    on_delete: &Callback<String>,
    on_deposit_input: &Callback<(String, String)>,
    on_deposit: &Callback<Goal>,
) -> Html {
    let progress = progress_percent(goal.current_amount, goal.target_amount);
    let completed = is_completed(goal);
    let bar_class = if completed {
        "h-full rounded-full bg-emerald-500"
    } else {
        "h-full rounded-full bg-[#173E63]"
    };

    let edit = {
        let on_edit = on_edit.clone();
        let goal = goal.clone();
        Callback::from(move |_| on_edit.emit(goal.clone()))
    };
    let delete = {
        let on_delete = on_delete.clone();
        let id = goal.id.clone();
        Callback::from(move |_| on_delete.emit(id.clone()))
    };
    let deposit_input = {
        let on_deposit_input = on_deposit_input.clone();
        let id = goal.id.clone();
        Callback::from(move |e: InputEvent| on_deposit_input.emit((id.clone(), input_value(e))))
    };
    let deposit = {
        let on_deposit = on_deposit.clone();
        let goal = goal.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_deposit.emit(goal.clone());
        })
    };

    html! {
        <div key={goal.id.clone()} class="bg-white p-5 rounded-[10px] shadow-sm border border-border space-y-4">
            <div class="flex items-start justify-between">
                <div>
                    <h3 class="font-semibold text-lg">{ goal.name.clone() }</h3>
                    if let Some(deadline) = goal.deadline.as_deref() {
                        <p class="text-xs text-muted-foreground">{ format!("Deadline: {}", format_numeric_date(deadline)) }</p>
                    }
                </div>
                <div class="flex gap-1">
                    if completed {
                        <span class="px-2 py-0.5 rounded-full bg-emerald-50 text-emerald-700 text-xs font-semibold">{"Completed"}</span>
                    }
                    <button type="button" class="p-2 rounded-full hover:bg-slate-100" aria-label="Edit" onclick={edit}>{ icon_edit() }</button>
                    <button type="button" class="p-2 rounded-full hover:bg-red-50 text-red-600" aria-label="Delete" onclick={delete}>{ icon_trash() }</button>
                </div>
            </div>

            <div class="space-y-1">
                <div class="flex justify-between text-sm">
                    <span class="font-mono">{ format_currency(goal.current_amount) }</span>
                    <span class="font-semibold">{ format_percent(progress) }</span>
                </div>
                <div class="h-2 w-full bg-slate-100 rounded-full overflow-hidden">
                    <div class={bar_class} style={format!("width: {progress}%")}></div>
                </div>
                <div class="flex justify-between text-xs text-muted-foreground">
                    <span>{ format!("Target: {}", format_currency(goal.target_amount)) }</span>
                    <span>{ format!("Remaining: {}", format_currency(remaining(goal))) }</span>
                </div>
            </div>

            if !completed {
                <form class="flex gap-2" onsubmit={deposit}>
                    <input
                        type="number"
                        step="0.01"
                        min="0.01"
                        class="flex-1 px-3 py-1.5 bg-white border border-border rounded-lg text-sm focus:outline-none focus:ring-2 focus:ring-[#173E63]"
                        placeholder="Add amount"
                        value={pending}
                        oninput={deposit_input}
                    />
                    <button type="submit" class="px-3 py-1.5 rounded-lg bg-[#173E63] text-white text-sm font-semibold">
                        { icon_plus() }
                    </button>
                </form>
            }
        </div>
    }
}

fn goal_form(
    form: &UseStateHandle<GoalForm>,
    saving: bool,
    is_edit: bool,
    on_submit: Callback<SubmitEvent>,
) -> Html {
    let update = |apply: fn(&mut GoalForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            let mut next = (*form).clone();
            apply(&mut next, input_value(e));
            form.set(next);
        })
    };

    let input_class = "w-full px-4 py-2 bg-white border border-border rounded-lg focus:outline-none focus:ring-2 focus:ring-[#173E63]";

    html! {
        <form class="space-y-4" onsubmit={on_submit}>
            <div class="space-y-1">
                <label class="text-sm font-medium">{"Name"}</label>
                <input type="text" class={input_class} placeholder="e.g. Trip, Emergency fund..."
                    value={form.name.clone()}
                    oninput={update(|form, value| form.name = value)} />
            </div>
            <div class="grid grid-cols-2 gap-3">
                <div class="space-y-1">
                    <label class="text-sm font-medium">{"Target (R$)"}</label>
                    <input type="number" step="0.01" min="0.01" class={input_class}
                        value={form.target_amount.clone()}
                        oninput={update(|form, value| form.target_amount = value)} />
                </div>
                <div class="space-y-1">
                    <label class="text-sm font-medium">{"Saved so far (R$)"}</label>
                    <input type="number" step="0.01" min="0" class={input_class}
                        value={form.current_amount.clone()}
                        oninput={update(|form, value| form.current_amount = value)} />
                </div>
            </div>
            <div class="space-y-1">
                <label class="text-sm font-medium">{"Deadline (optional)"}</label>
                <input type="date" class={input_class}
                    value={form.deadline.clone()}
                    oninput={update(|form, value| form.deadline = value)} />
            </div>
            <button type="submit" class="w-full py-2 rounded-full bg-[#173E63] text-white font-semibold hover:opacity-90" disabled={saving}>
                {
                    if saving {
                        "Saving..."
                    } else if is_edit {
                        "Save Changes"
                    } else {
                        "Create Goal"
                    }
                }
            </button>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(id: &str, current: f64, target: f64) -> Goal {
        Goal {
            id: id.into(),
            name: format!("goal {id}"),
            target_amount: target,
            current_amount: current,
            deadline: None,
            user_id: "u1".into(),
            progress: progress_percent(current, target),
        }
    }

    #[test]
    fn half_way_renders_fifty_percent() {
        assert_eq!(format_percent(progress_percent(5000.0, 10000.0)), "50%");
    }

    #[test]
    fn progress_is_capped_and_safe_for_zero_targets() {
        assert_eq!(progress_percent(1500.0, 1000.0), 100.0);
        assert_eq!(progress_percent(10.0, 0.0), 0.0);
        assert_eq!(progress_percent(10.0, -5.0), 0.0);
        assert_eq!(progress_percent(0.0, 1000.0), 0.0);
    }

    #[test]
    fn reaching_the_target_completes_the_goal() {
        assert!(is_completed(&goal("a", 1000.0, 1000.0)));
        assert!(is_completed(&goal("b", 1200.0, 1000.0)));
        assert!(!is_completed(&goal("c", 999.99, 1000.0)));
    }

    #[test]
    fn remaining_never_goes_negative() {
        assert_eq!(remaining(&goal("a", 250.0, 1000.0)), 750.0);
        assert_eq!(remaining(&goal("b", 1200.0, 1000.0)), 0.0);
    }

    #[test]
    fn summary_counts_every_goal_and_the_completed_ones() {
        let goals = [
            goal("a", 5000.0, 10000.0),
            goal("b", 1000.0, 1000.0),
            goal("c", 0.0, 300.0),
        ];

        let summary = GoalSummary::of(&goals);

        assert_eq!(
            summary,
            GoalSummary {
                total: 3,
                completed: 1,
                total_saved: 6000.0,
                total_target: 11300.0,
            }
        );
    }

    #[test]
    fn new_trip_goal_starts_at_zero() {
        let form = GoalForm {
            name: "Trip".into(),
            target_amount: "1000".into(),
            ..GoalForm::default()
        };

        let payload = form.validate().unwrap();

        assert_eq!(
            payload,
            GoalPayload {
                name: "Trip".into(),
                target_amount: 1000.0,
                current_amount: 0.0,
                deadline: None,
            }
        );
        assert_eq!(progress_percent(payload.current_amount, payload.target_amount), 0.0);
    }

    #[test]
    fn goal_form_rejects_bad_input() {
        let valid = GoalForm {
            name: "Car".into(),
            target_amount: "20000".into(),
            current_amount: "500".into(),
            deadline: "2026-12-31".into(),
        };
        assert_eq!(
            valid.validate().unwrap().deadline.as_deref(),
            Some("2026-12-31T00:00:00+00:00")
        );

        let no_name = GoalForm { name: "".into(), ..valid.clone() };
        let zero_target = GoalForm { target_amount: "0".into(), ..valid.clone() };
        let negative_saved = GoalForm { current_amount: "-1".into(), ..valid.clone() };
        let bad_deadline = GoalForm { deadline: "31/12/2026".into(), ..valid };

        for form in [no_name, zero_target, negative_saved, bad_deadline] {
            assert!(matches!(form.validate(), Err(AppError::Validation(_))), "{form:?}");
        }
    }

    #[test]
    fn clearing_one_deposit_keeps_the_others() {
        let mut inputs = DepositInputs::default();
        inputs.apply(DepositAction::Edit { id: "trip".into(), value: "100".into() });
        inputs.apply(DepositAction::Edit { id: "car".into(), value: "50".into() });

        inputs.apply(DepositAction::Clear("trip".into()));

        assert_eq!(inputs.get("trip"), "");
        assert_eq!(inputs.get("car"), "50");
    }

    #[test]
    fn deposit_adds_to_the_saved_amount() {
        let trip = goal("trip", 250.0, 1000.0);

        assert_eq!(deposit(&trip, "100,50").unwrap().current_amount, 350.5);
        assert!(deposit(&trip, "0").is_err());
        assert!(deposit(&trip, "").is_err());
    }

    #[test]
    fn editing_prefills_deadline_for_the_date_input() {
        let mut car = goal("car", 500.0, 20000.0);
        car.deadline = Some("2026-12-31T00:00:00".into());

        let form = GoalForm::from_goal(&car);

        assert_eq!(form.deadline, "2026-12-31");
        assert_eq!(form.target_amount, "20000");
        assert_eq!(form.current_amount, "500");
    }
}
