//! Account registration page posting to `/api/auth/signup`.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::app::AppHandle;
use crate::net::api::auth;
use crate::net::types::SignupRequest;
use crate::router::routes::LOGIN_PATH;
use crate::state::notice::Notice;

/// Raw form values as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct SignupForm {
    username: String,
    email: String,
    password: String,
    confirm: String,
    phone: String,
    real_name: String,
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Mirrors the backend's signup constraints so obvious mistakes never leave the page.
fn validate_signup_form(form: &SignupForm) -> Result<SignupRequest, &'static str> {
    let username = form.username.trim();
    let email = form.email.trim();
    if !(3..=20).contains(&username.chars().count()) {
        return Err("Username must be 3 to 20 characters.");
    }
    if email.is_empty() || email.len() > 50 || !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    if !(6..=40).contains(&form.password.chars().count()) {
        return Err("Password must be 6 to 40 characters.");
    }
    if form.password != form.confirm {
        return Err("Passwords do not match.");
    }
    Ok(SignupRequest {
        username: username.to_owned(),
        email: email.to_owned(),
        password: form.password.clone(),
        phone: optional(&form.phone),
        real_name: optional(&form.real_name),
    })
}

fn form_input(
    form: RwSignal<SignupForm>,
    placeholder: &'static str,
    kind: &'static str,
    pick: fn(&mut SignupForm) -> &mut String,
) -> impl IntoView {
    view! {
        <input
            class="login-input"
            type=kind
            placeholder=placeholder
            on:input=move |ev| {
                let value = event_target_value(&ev);
                form.update(|f| *pick(f) = value);
            }
        />
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let form = RwSignal::new(SignupForm::default());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let app = expect_context::<AppHandle>();
    let navigate = use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let request = match validate_signup_form(&form.get()) {
            Ok(request) => request,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Creating account...".to_owned());

        let api = app.get_value().api;
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match auth::signup(&api, &request).await {
                Ok(response) => {
                    api.notifier().notify(Notice::info(response.message));
                    navigate(LOGIN_PATH, NavigateOptions::default());
                }
                Err(e) => {
                    let _ = info.try_set(format!("Registration failed: {e}"));
                }
            }
            let _ = busy.try_set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"PetCare"</h1>
                <p class="login-card__subtitle">"Create an account"</p>
                <form class="login-form" on:submit=on_submit>
                    {form_input(form, "Username", "text", |f| &mut f.username)}
                    {form_input(form, "Email", "email", |f| &mut f.email)}
                    {form_input(form, "Password", "password", |f| &mut f.password)}
                    {form_input(form, "Confirm password", "password", |f| &mut f.confirm)}
                    {form_input(form, "Phone (optional)", "tel", |f| &mut f.phone)}
                    {form_input(form, "Real name (optional)", "text", |f| &mut f.real_name)}
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <a class="login-link" href=LOGIN_PATH>
                    "Back to sign in"
                </a>
            </div>
        </div>
    }
}
