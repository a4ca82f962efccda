//! Root application component with routing and explicit session wiring.
//!
//! DESIGN
//! ======
//! The session store, notice queue, redirect scheduler and HTTP client are
//! built once here and passed down as props instead of through ambient
//! context, so every consumer of the session is visible in its signature.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::guard::{RequireAuth, RequireGuest};
use crate::components::toast::ToastHost;
use crate::config::ClientConfig;
use crate::net::api::{AuthClient, GlooTransport};
use crate::pages::{home::HomePage, login::LoginPage};
use crate::state::auth::SessionStore;
use crate::state::notice::NoticeState;
use crate::util::auth::install_storage_sync;
use crate::util::redirect::RedirectScheduler;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ClientConfig::from_build_env();
    let session = SessionStore::from_config(&config);
    let notices = RwSignal::new(NoticeState::default());
    let redirect = RedirectScheduler::default();
    let client = AuthClient::new(config.clone(), session.clone(), notices, redirect.clone(), GlooTransport);

    install_storage_sync(&session);
    on_cleanup(move || {
        redirect.cancel();
    });

    let login_view = {
        let session = session.clone();
        let client = client.clone();
        move || {
            let client = client.clone();
            view! {
                <RequireGuest session=session.clone()>
                    <LoginPage client=client.clone()/>
                </RequireGuest>
            }
        }
    };

    let home_view = move || {
        let client = client.clone();
        view! {
            <RequireAuth session=session.clone()>
                <HomePage client=client.clone()/>
            </RequireAuth>
        }
    };

    view! {
        <Stylesheet id="leptos" href="/pkg/session-client.css"/>
        <Title text="Session Client"/>
        <ToastHost notices=notices ttl=config.notice_ttl/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=login_view/>
                <Route path=StaticSegment("") view=home_view/>
            </Routes>
        </Router>
    }
}
