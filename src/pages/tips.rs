use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{page_shell, report_error, textarea_value, PageProps};
use crate::hooks::{use_in_flight, use_mounted};
use crate::icons::{icon_lightbulb, icon_send, icon_sparkles};
use crate::models::{TipRequest, TipResponse};

pub const SUGGESTED_QUESTIONS: [&str; 4] = [
    "How can I save more?",
    "Where am I overspending?",
    "Tips to reach my goals",
    "Overall analysis of my finances",
];

pub const PERSONALIZED_TIP: &str = "Personalized tip";

/// The question to send; blank input asks for a general tip.
pub fn question_for(raw: &str) -> Option<String> {
    let question = raw.trim();
    if question.is_empty() {
        None
    } else {
        Some(question.to_string())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TipEntry {
    pub id: u32,
    pub question: String,
    pub tip: String,
    pub context: String,
}

/// Answers received while the page is open, newest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TipHistory {
    entries: Vec<TipEntry>,
    next_id: u32,
}

impl TipHistory {
    pub fn entries(&self) -> &[TipEntry] {
        &self.entries
    }

    pub fn record(&mut self, question: Option<String>, response: TipResponse) {
        let entry = TipEntry {
            id: self.next_id,
            question: question.unwrap_or_else(|| PERSONALIZED_TIP.to_string()),
            tip: response.tip,
            context: response.context,
        };
        self.next_id += 1;
        self.entries.insert(0, entry);
    }
}

#[function_component(TipsPage)]
pub fn tips_page(props: &PageProps) -> Html {
    let mounted = use_mounted();
    let question = use_state(String::new);
    let history = use_state(TipHistory::default);
    let asking = use_state(|| false);
    let in_flight = use_in_flight();

    let ask = {
        let props = props.clone();
        let question = question.clone();
        let history = history.clone();
        let asking = asking.clone();
        Callback::from(move |raw: String| {
            if !in_flight.try_start() {
                return;
            }

            let props = props.clone();
            let mounted = mounted.clone();
            let question = question.clone();
            let history = history.clone();
            let asking = asking.clone();
            let in_flight = in_flight.clone();
            let request = TipRequest {
                question: question_for(&raw),
            };
            asking.set(true);
            spawn_local(async move {
                let result = match props.session.require_token() {
                    Ok(token) => props.session.api().ai_tip(&token, &request).await,
                    Err(error) => Err(error),
                };
                in_flight.finish();
                if !mounted.get() {
                    return;
                }

                asking.set(false);
                match result {
                    Ok(response) => {
                        log::info!("received tip");
                        let mut next = (*history).clone();
                        next.record(request.question, response);
                        history.set(next);
                        question.set(String::new());
                    }
                    Err(error) => report_error(&props, &error, "Could not get a tip"),
                }
            });
        })
    };

    let on_submit = {
        let ask = ask.clone();
        let question = question.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            ask.emit((*question).clone());
        })
    };

    let on_input = {
        let question = question.clone();
        Callback::from(move |e: InputEvent| question.set(textarea_value(e)))
    };

    page_shell(
        "AI Tips",
        "Personalized insights based on your finances",
        html! {},
        html! {
            <>
                <div class="bg-white p-5 rounded-[10px] shadow-sm border border-border space-y-4">
                    <div class="flex items-center gap-2 text-[#173E63]">
                        { icon_sparkles() }
                        <h3 class="font-semibold">{"Ask the assistant"}</h3>
                    </div>

                    <div class="flex flex-wrap gap-2">
                        { for SUGGESTED_QUESTIONS.into_iter().map(|suggestion| {
                            let ask = ask.clone();
                            let question = question.clone();
                            let onclick = Callback::from(move |_: MouseEvent| {
                                question.set(suggestion.to_string());
                                ask.emit(suggestion.to_string());
                            });
                            html! {
                                <button type="button" class="px-3 py-1.5 rounded-full border border-border text-sm hover:bg-slate-50" disabled={*asking} {onclick}>
                                    { suggestion }
                                </button>
                            }
                        }) }
                    </div>

                    <form class="space-y-3" onsubmit={on_submit}>
                        <textarea
                            class="w-full min-h-[96px] px-4 py-2 bg-white border border-border rounded-lg focus:outline-none focus:ring-2 focus:ring-[#173E63]"
                            placeholder="Ask something about your finances, or leave blank for a general tip"
                            value={(*question).clone()}
                            oninput={on_input}
                        />
                        <button type="submit" class="flex items-center justify-center gap-2 w-full py-2 rounded-full bg-[#173E63] text-white font-semibold hover:opacity-90" disabled={*asking}>
                            { icon_send() }
                            <span>{ if *asking { "Thinking..." } else { "Get Personalized Tip" } }</span>
                        </button>
                    </form>
                </div>

                if history.entries().is_empty() {
                    <div class="bg-white rounded-[10px] shadow-sm border border-border text-center py-12 text-muted-foreground">
                        {"Click \"Get Personalized Tip\" to get started"}
                    </div>
                } else {
                    <div class="space-y-4">
                        { for history.entries().iter().map(|entry| html! {
                            <div key={entry.id} class="bg-white p-5 rounded-[10px] shadow-sm border border-border space-y-3">
                                <div class="flex items-center gap-2 text-[#1D617A]">
                                    { icon_lightbulb() }
                                    <p class="font-semibold">{ entry.question.clone() }</p>
                                </div>
                                <p class="text-sm whitespace-pre-line">{ entry.tip.clone() }</p>
                                <p class="text-xs text-muted-foreground">{ entry.context.clone() }</p>
                            </div>
                        }) }
                    </div>
                }
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(tip: &str) -> TipResponse {
        TipResponse {
            tip: tip.into(),
            context: "Balance: R$ 100,00".into(),
        }
    }

    #[test]
    fn blank_question_is_sent_as_none() {
        assert_eq!(question_for("   "), None);
        assert_eq!(question_for(" How can I save? "), Some("How can I save?".into()));
    }

    #[test]
    fn suggestions_are_sent_as_written() {
        for suggestion in SUGGESTED_QUESTIONS {
            assert_eq!(question_for(suggestion).as_deref(), Some(suggestion));
        }
    }

    #[test]
    fn history_is_newest_first() {
        let mut history = TipHistory::default();

        history.record(Some("first".into()), response("a"));
        history.record(Some("second".into()), response("b"));

        let questions: Vec<&str> = history.entries().iter().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, ["second", "first"]);
        assert_ne!(history.entries()[0].id, history.entries()[1].id);
    }

    #[test]
    fn tip_without_question_is_labelled() {
        let mut history = TipHistory::default();

        history.record(question_for(""), response("Spend less on food"));

        assert_eq!(history.entries()[0].question, PERSONALIZED_TIP);
        assert_eq!(history.entries()[0].tip, "Spend less on food");
    }
}
