use std::cell::Cell;
use std::rc::Rc;

use yew::prelude::*;

/// `true` while the calling component is mounted.
///
/// Async handlers check it after every `.await` so a response that arrives
/// after navigation does not touch state of a component that is gone.
#[hook]
pub fn use_mounted() -> Rc<Cell<bool>> {
    let mounted = use_memo(|_| Cell::new(true), ());

    {
        let mounted = mounted.clone();
        use_effect_with_deps(
            move |_| {
                mounted.set(true);
                move || mounted.set(false)
            },
            (),
        );
    }

    mounted
}

/// Asks the user to confirm a destructive action.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .map(|window| {
            window.confirm_with_message(message).unwrap_or_else(|error| {
                log::warn!("confirm dialog failed: {error:?}");
                false
            })
        })
        .unwrap_or(false)
}

/// Shared "request in flight" flag for submit handlers.
///
/// Unlike a `use_state` value it is read live, so a second click that lands
/// before the next render is still rejected.
#[derive(Clone, Debug, Default)]
pub struct InFlight(Rc<Cell<bool>>);

impl InFlight {
    /// Marks a request as started. `false` when one is already running.
    pub fn try_start(&self) -> bool {
        !self.0.replace(true)
    }

    pub fn finish(&self) {
        self.0.set(false);
    }
}

#[hook]
pub fn use_in_flight() -> InFlight {
    (*use_memo(|_| InFlight::default(), ())).clone()
}

#[cfg(test)]
mod tests {
    use super::InFlight;

    #[test]
    fn second_start_is_rejected_until_finished() {
        let flag = InFlight::default();
        let same_flag = flag.clone();

        assert!(flag.try_start());
        assert!(!same_flag.try_start());

        flag.finish();
        assert!(same_flag.try_start());
    }
}
