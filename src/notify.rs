//! Transient toast notifications.

use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use yew::prelude::*;

use crate::error::AppError;
use crate::icons::icon_x;

const DISMISS_AFTER_MS: u32 = 4_000;
const MAX_VISIBLE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

pub enum ToastAction {
    Push(Toast),
    Dismiss(u32),
}

/// The visible toasts, oldest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Toasts {
    pub items: Vec<Toast>,
}

impl Toasts {
    fn apply(&mut self, action: ToastAction) {
        match action {
            ToastAction::Push(toast) => {
                self.items.push(toast);
                if self.items.len() > MAX_VISIBLE {
                    let overflow = self.items.len() - MAX_VISIBLE;
                    self.items.drain(..overflow);
                }
            }
            ToastAction::Dismiss(id) => self.items.retain(|toast| toast.id != id),
        }
    }
}

impl Reducible for Toasts {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.apply(action);
        next.into()
    }
}

/// Handle pages use to raise notifications.
#[derive(Clone)]
pub struct Notifier {
    dispatcher: UseReducerDispatcher<Toasts>,
    next_id: Rc<Cell<u32>>,
}

impl PartialEq for Notifier {
    fn eq(&self, other: &Self) -> bool {
        self.dispatcher == other.dispatcher
    }
}

impl Notifier {
    pub fn new(dispatcher: UseReducerDispatcher<Toasts>) -> Self {
        Self {
            dispatcher,
            next_id: Rc::new(Cell::new(0)),
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&self, error: &AppError) {
        self.push(ToastKind::Error, error.message().to_string());
    }

    /// Error toast that prefers the backend's explanation for validation and
    /// auth failures, and uses `fallback` when the request itself failed.
    pub fn failure(&self, error: &AppError, fallback: &str) {
        match error {
            AppError::Network(_) => self.push(ToastKind::Error, fallback.to_string()),
            _ => self.error(error),
        }
    }

    fn push(&self, kind: ToastKind, message: String) {
        let id = self.next_id.get();
        self.next_id.set(id.wrapping_add(1));
        self.dispatcher
            .dispatch(ToastAction::Push(Toast { id, kind, message }));

        let dispatcher = self.dispatcher.clone();
        Timeout::new(DISMISS_AFTER_MS, move || {
            dispatcher.dispatch(ToastAction::Dismiss(id))
        })
        .forget();
    }
}

#[derive(Properties, PartialEq)]
pub struct ToasterProps {
    pub toasts: UseReducerHandle<Toasts>,
}

#[function_component(Toaster)]
pub fn toaster(props: &ToasterProps) -> Html {
    html! {
        <div class="fixed top-4 right-4 z-[60] flex flex-col gap-2 w-80">
            { for props.toasts.items.iter().map(|toast| {
                let class_name = match toast.kind {
                    ToastKind::Success => "flex items-start justify-between gap-3 px-4 py-3 rounded-xl shadow-lg border text-sm bg-emerald-50 border-emerald-200 text-emerald-800",
                    ToastKind::Error => "flex items-start justify-between gap-3 px-4 py-3 rounded-xl shadow-lg border text-sm bg-red-50 border-red-200 text-red-700",
                };
                let on_close = {
                    let toasts = props.toasts.clone();
                    let id = toast.id;
                    Callback::from(move |_| toasts.dispatch(ToastAction::Dismiss(id)))
                };

                html! {
                    <div key={toast.id} class={class_name} role="status">
                        <span>{ toast.message.clone() }</span>
                        <button type="button" class="shrink-0 opacity-60 hover:opacity-100" aria-label="Dismiss" onclick={on_close}>
                            { icon_x() }
                        </button>
                    </div>
                }
            }) }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::{Toast, ToastAction, ToastKind, Toasts, MAX_VISIBLE};

    fn toast(id: u32) -> Toast {
        Toast {
            id,
            kind: ToastKind::Success,
            message: format!("toast {id}"),
        }
    }

    #[test]
    fn dismiss_removes_only_that_toast() {
        let mut toasts = Toasts::default();
        toasts.apply(ToastAction::Push(toast(1)));
        toasts.apply(ToastAction::Push(toast(2)));

        toasts.apply(ToastAction::Dismiss(1));

        assert_eq!(toasts.items, vec![toast(2)]);
    }

    #[test]
    fn keeps_only_the_newest_toasts() {
        let mut toasts = Toasts::default();

        for id in 0..(MAX_VISIBLE as u32 + 2) {
            toasts.apply(ToastAction::Push(toast(id)));
        }

        assert_eq!(toasts.items.len(), MAX_VISIBLE);
        assert_eq!(toasts.items.first().map(|toast| toast.id), Some(2));
    }

    #[test]
    fn dismissing_unknown_toast_is_harmless() {
        let mut toasts = Toasts::default();
        toasts.apply(ToastAction::Push(toast(1)));

        toasts.apply(ToastAction::Dismiss(99));

        assert_eq!(toasts.items.len(), 1);
    }
}
