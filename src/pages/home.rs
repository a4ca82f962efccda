//! Home page for signed-in users.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted behind `RequireAuth`. Loads `/auth/me` through the authenticated
//! client, so an expired token surfaces here as the session-expired flow.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;

use crate::net::api::{AuthClient, Transport};
use crate::state::session::UserRecord;

pub const PROFILE_ENDPOINT: &str = "/auth/me";

fn greeting(user: Option<&UserRecord>) -> String {
    match user.and_then(UserRecord::display_name) {
        Some(name) => format!("Signed in as {name}"),
        None => "Signed in".to_owned(),
    }
}

/// Fetch the server's view of the current user.
///
/// # Errors
///
/// Returns a display message for any client error, including an expired
/// session (which the client has already handled).
pub async fn load_profile<T: Transport>(client: &AuthClient<T>) -> Result<UserRecord, String> {
    client
        .get_json::<UserRecord>(PROFILE_ENDPOINT)
        .await
        .map_err(|e| format!("Could not load profile: {e}"))
}

#[component]
pub fn HomePage(client: AuthClient) -> impl IntoView {
    let session = client.session().clone();
    let profile = RwSignal::new(None::<Result<UserRecord, String>>);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let result = load_profile(&client).await;
        profile.set(Some(result));
    });

    let greeting_session = session.clone();
    let on_logout = move |_| session.logout();

    view! {
        <div class="home-page">
            <header class="home-header">
                <h1>{move || greeting(greeting_session.user().as_ref())}</h1>
                <button class="logout-button" on:click=on_logout>"Log out"</button>
            </header>
            <section class="home-profile">
                {move || match profile.get() {
                    None => view! { <p>"Loading profile..."</p> }.into_any(),
                    Some(Ok(user)) => view! {
                        <pre class="home-profile__record">{user.0.to_string()}</pre>
                    }
                    .into_any(),
                    Some(Err(msg)) => view! { <p class="home-profile__error">{msg}</p> }.into_any(),
                }}
            </section>
        </div>
    }
}
