//! Sign-in page: username + password against `/api/auth/signin`.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::AppHandle;
use crate::net::api::auth;
use crate::net::types::LoginRequest;
use crate::router::routes::{LANDING_PATH, REGISTER_PATH};
use crate::state::notice::Notice;

fn validate_login_input(username: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err("Enter both username and password.");
    }
    Ok(LoginRequest { username: username.to_owned(), password: password.to_owned() })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let app = expect_context::<AppHandle>();
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match validate_login_input(&username.get(), &password.get()) {
            Ok(request) => request,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        let api = app.get_value().api;
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match auth::signin(&api, &request).await {
                Ok(response) => {
                    let (token, user) = response.into_session_parts();
                    let greeting = format!("Welcome back, {}", user.username);
                    api.auth().login(&token, user);
                    api.notifier().notify(Notice::info(greeting));
                    navigate(LANDING_PATH, NavigateOptions::default());
                }
                Err(e) => {
                    let _ = info.try_set(format!("Sign-in failed: {e}"));
                }
            }
            let _ = busy.try_set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"PetCare"</h1>
                <p class="login-card__subtitle">"Sign in to the dashboard"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <a class="login-link" href=REGISTER_PATH>
                    "Create an account"
                </a>
            </div>
        </div>
    }
}
