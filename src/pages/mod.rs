pub mod dashboard;
pub mod goals;
pub mod login;
pub mod tips;
pub mod transactions;

use web_sys::{HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::error::AppError;
use crate::layout::Page;
use crate::notify::Notifier;
use crate::session::SessionHandle;

/// Properties shared by every authenticated page.
#[derive(Properties, PartialEq, Clone)]
pub struct PageProps {
    pub session: SessionHandle,
    pub notifier: Notifier,
    #[prop_or_default]
    pub on_navigate: Callback<Page>,
}

/// Shows the failure and, for a rejected token, ends the session.
pub fn report_error(props: &PageProps, error: &AppError, fallback: &str) {
    log::error!("{fallback}: {error}");
    props.notifier.failure(error, fallback);
    props.session.handle_error(error);
}

/// Parses a money field. Accepts `,` as decimal separator.
pub fn parse_amount(field: &str, raw: &str) -> Result<f64, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }

    raw.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .ok_or_else(|| AppError::Validation(format!("{field} must be a number")))
}

/// Like [parse_amount] but rejects zero and negative amounts.
pub fn parse_positive_amount(field: &str, raw: &str) -> Result<f64, AppError> {
    let amount = parse_amount(field, raw)?;
    if amount <= 0.0 {
        return Err(AppError::Validation(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(amount)
}

pub fn require(field: &str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::Validation(format!("{field} is required")))
    } else {
        Ok(value.to_string())
    }
}

pub fn input_value(e: InputEvent) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

pub fn textarea_value(e: InputEvent) -> String {
    let input: HtmlTextAreaElement = e.target_unchecked_into();
    input.value()
}

pub fn select_value(e: Event) -> String {
    let select: HtmlSelectElement = e.target_unchecked_into();
    select.value()
}

pub fn spinner() -> Html {
    html! {
        <div class="flex items-center justify-center h-64">
            <div class="animate-spin w-8 h-8 border-2 border-[#173E63] border-t-transparent rounded-full"></div>
        </div>
    }
}

pub fn page_shell(title: &'static str, subtitle: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 space-y-6">
            <div class="flex flex-col md:flex-row md:items-center md:justify-between gap-4">
                <div>
                    <h2 class="text-3xl font-bold tracking-tight text-[#173E63]">{ title }</h2>
                    <p class="text-sm text-muted-foreground mt-1">{ subtitle }</p>
                </div>
                { actions }
            </div>
            { children }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct DialogProps {
    pub title: String,
    pub on_close: Callback<()>,
    pub children: Children,
}

#[function_component(Dialog)]
pub fn dialog(props: &DialogProps) -> Html {
    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    html! {
        <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/40 p-4">
            <div class="w-full max-w-md bg-white rounded-2xl shadow-xl p-6">
                <div class="flex items-center justify-between mb-4">
                    <h3 class="text-lg font-bold text-[#173E63]">{ props.title.clone() }</h3>
                    <button type="button" class="p-1 rounded-full hover:bg-slate-100" aria-label="Close" onclick={on_close}>
                        { crate::icons::icon_x() }
                    </button>
                </div>
                { for props.children.iter() }
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_amount, parse_positive_amount, require};
    use crate::error::AppError;

    #[test]
    fn parses_comma_decimals() {
        assert_eq!(parse_amount("Amount", " 12,50 "), Ok(12.5));
    }

    #[test]
    fn rejects_non_numbers() {
        assert_eq!(
            parse_amount("Amount", "ten"),
            Err(AppError::Validation("Amount must be a number".into()))
        );
        assert!(parse_amount("Amount", "NaN").is_err());
    }

    #[test]
    fn rejects_empty_amounts() {
        assert_eq!(
            parse_positive_amount("Target", ""),
            Err(AppError::Validation("Target is required".into()))
        );
    }

    #[test]
    fn positive_amount_rejects_zero_and_negatives() {
        assert!(parse_positive_amount("Amount", "0").is_err());
        assert!(parse_positive_amount("Amount", "-3").is_err());
        assert_eq!(parse_positive_amount("Amount", "0.01"), Ok(0.01));
    }

    #[test]
    fn require_trims() {
        assert_eq!(require("Name", "  Trip "), Ok("Trip".to_string()));
        assert!(require("Name", "   ").is_err());
    }
}
