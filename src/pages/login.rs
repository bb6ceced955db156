use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{input_value, require, PageProps};
use crate::error::AppError;
use crate::hooks::{use_in_flight, use_mounted};
use crate::icons::{icon_sparkles, icon_target, icon_wallet};
use crate::layout::Page;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

/// Fields of both tabs. `name` is ignored when signing in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Credentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn validate(&self, mode: AuthMode) -> Result<(), AppError> {
        if mode == AuthMode::SignUp {
            require("Name", &self.name)?;
        }
        require("Email", &self.email)?;
        if self.password.is_empty() {
            return Err(AppError::Validation("Password is required".to_string()));
        }
        if mode == AuthMode::SignUp && self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

#[function_component(LoginPage)]
pub fn login_page(props: &PageProps) -> Html {
    let mounted = use_mounted();
    let mode = use_state(|| AuthMode::SignIn);
    let credentials = use_state(Credentials::default);
    let loading = use_state(|| false);
    let in_flight = use_in_flight();

    let on_submit = {
        let props = props.clone();
        let mode = mode.clone();
        let credentials = credentials.clone();
        let loading = loading.clone();
        let in_flight = in_flight.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let mode = *mode;
            let fields = (*credentials).clone();
            if let Err(error) = fields.validate(mode) {
                log::warn!("auth form rejected: {error}");
                props.notifier.error(&error);
                return;
            }

            if !in_flight.try_start() {
                return;
            }
            loading.set(true);
            let props = props.clone();
            let mounted = mounted.clone();
            let loading = loading.clone();
            let in_flight = in_flight.clone();
            spawn_local(async move {
                let result = match mode {
                    AuthMode::SignIn => props.session.login(&fields.email, &fields.password).await,
                    AuthMode::SignUp => {
                        props
                            .session
                            .register(&fields.name, &fields.email, &fields.password)
                            .await
                    }
                };
                in_flight.finish();

                // A successful sign-in replaces this screen.
                match result {
                    Ok(user) => {
                        props
                            .notifier
                            .success(format!("Welcome, {}!", user.first_name()));
                        props.on_navigate.emit(Page::Dashboard);
                    }
                    Err(error) => {
                        let fallback = match mode {
                            AuthMode::SignIn => "Login failed",
                            AuthMode::SignUp => "Registration failed",
                        };
                        props.notifier.failure(&error, fallback);
                    }
                }
                if mounted.get() {
                    loading.set(false);
                }
            });
        })
    };

    let switch_to = |target: AuthMode| {
        let mode = mode.clone();
        Callback::from(move |_: MouseEvent| mode.set(target))
    };

    let update = |apply: fn(&mut Credentials, String)| {
        let credentials = credentials.clone();
        Callback::from(move |e: InputEvent| {
            let mut next = (*credentials).clone();
            apply(&mut next, input_value(e));
            credentials.set(next);
        })
    };

    let tab_class = |target: AuthMode| {
        if *mode == target {
            "flex-1 py-2 rounded-lg text-sm font-semibold bg-white shadow-sm text-[#173E63]"
        } else {
            "flex-1 py-2 rounded-lg text-sm font-semibold text-slate-500"
        }
    };

    let input_class = "w-full px-4 py-2 bg-white border border-border rounded-lg focus:outline-none focus:ring-2 focus:ring-[#173E63]";
    let signing_up = *mode == AuthMode::SignUp;

    html! {
        <div class="min-h-screen grid lg:grid-cols-2 bg-background">
            <div class="hidden lg:flex flex-col justify-center gap-8 bg-[#173E63] text-white p-12">
                <h1 class="text-4xl font-black tracking-tight">{"Finance Tracker"}</h1>
                <p class="text-lg opacity-80">{"Manage income, expenses and goals with AI-powered insights."}</p>
                <div class="space-y-4">
                    <div class="flex items-center gap-3">{ icon_wallet() }<span>{"Track every transaction"}</span></div>
                    <div class="flex items-center gap-3">{ icon_target() }<span>{"Reach your savings goals"}</span></div>
                    <div class="flex items-center gap-3">{ icon_sparkles() }<span>{"Get personalized tips"}</span></div>
                </div>
            </div>

            <div class="flex items-center justify-center p-6">
                <div class="w-full max-w-md bg-white border border-border rounded-2xl shadow-lg p-8">
                    <div class="text-center mb-6">
                        <h2 class="text-2xl font-bold text-[#173E63]">{ if signing_up { "Create account" } else { "Welcome back" } }</h2>
                        <p class="text-sm text-muted-foreground mt-2">
                            { if signing_up { "Start managing your finances." } else { "Sign in to continue." } }
                        </p>
                    </div>

                    <div class="flex gap-1 bg-slate-100 rounded-xl p-1 mb-6">
                        <button type="button" class={tab_class(AuthMode::SignIn)} onclick={switch_to(AuthMode::SignIn)}>{"Sign in"}</button>
                        <button type="button" class={tab_class(AuthMode::SignUp)} onclick={switch_to(AuthMode::SignUp)}>{"Sign up"}</button>
                    </div>

                    <form class="space-y-4" onsubmit={on_submit}>
                        if signing_up {
                            <div class="space-y-1">
                                <label class="text-sm font-medium">{"Name"}</label>
                                <input type="text" class={input_class} placeholder="Your name"
                                    value={credentials.name.clone()}
                                    oninput={update(|fields, value| fields.name = value)} />
                            </div>
                        }
                        <div class="space-y-1">
                            <label class="text-sm font-medium">{"Email"}</label>
                            <input type="email" class={input_class} placeholder="you@example.com"
                                value={credentials.email.clone()}
                                oninput={update(|fields, value| fields.email = value)} />
                        </div>
                        <div class="space-y-1">
                            <label class="text-sm font-medium">{"Password"}</label>
                            <input type="password" class={input_class}
                                minlength={signing_up.then(|| MIN_PASSWORD_LEN.to_string())}
                                value={credentials.password.clone()}
                                oninput={update(|fields, value| fields.password = value)} />
                        </div>

                        <button type="submit" class="w-full bg-[#173E63] text-white py-2 rounded-full font-semibold hover:opacity-90 transition-opacity" disabled={*loading}>
                            { if *loading { "Please wait..." } else if signing_up { "Create account" } else { "Sign in" } }
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
