//! Login page: email + password form that opens a session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted behind `RequireGuest`. A successful sign-in updates the session
//! store and drops any navigation left over from an expired session; the
//! guard then redirects to `/` on its own.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::net::api::{ApiError, AuthClient, Transport};
use crate::net::types::{ApiRequest, LoginRequest, LoginResponse};

pub const LOGIN_ENDPOINT: &str = "/auth/login";

fn validate_credentials(email: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter both email and password.");
    }
    Ok(LoginRequest { email: email.to_owned(), password: password.to_owned() })
}

fn sign_in_failed_message(err: &ApiError) -> String {
    match err.status() {
        Some(401) => "Invalid email or password.".to_owned(),
        _ => format!("Sign-in failed: {err}"),
    }
}

/// Post credentials and adopt the returned session. A forced navigation
/// still pending from an expired session is cancelled on success.
///
/// # Errors
///
/// Returns a user-facing message when the request, the response body or
/// persisting the session fails.
pub async fn sign_in<T: Transport>(client: &AuthClient<T>, credentials: LoginRequest) -> Result<(), String> {
    let request = ApiRequest::post(LOGIN_ENDPOINT)
        .json(&credentials)
        .map_err(|e| e.to_string())?
        .without_session_expiry();
    let resp = client.send(request).await.map_err(|e| sign_in_failed_message(&e))?;
    let body: LoginResponse = resp.json().map_err(|e| sign_in_failed_message(&e))?;
    client
        .session()
        .login(body.user, body.token)
        .map_err(|e| format!("Could not save session: {e}"))?;
    client.cancel_pending_redirect();
    Ok(())
}

#[component]
pub fn LoginPage(client: AuthClient) -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let credentials = match validate_credentials(&email.get(), &password.get()) {
            Ok(credentials) => credentials,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let client = client.clone();
            leptos::task::spawn_local(async move {
                match sign_in(&client, credentials).await {
                    Ok(()) => info.set(String::new()),
                    Err(msg) => info.set(msg),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&client, credentials);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Sign in"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
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
            </div>
        </div>
    }
}
