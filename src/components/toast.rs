//! Toast stack for transient notices such as "session expired".

use std::time::Duration;

use leptos::prelude::*;

use crate::state::notice::{Notice, NoticeState};

/// Renders queued notices; each dismisses itself after `ttl` in the browser
/// or when its close button is pressed.
#[component]
pub fn ToastHost(notices: RwSignal<NoticeState>, ttl: Duration) -> impl IntoView {
    view! {
        <div class="toast-stack" role="status" aria-live="polite">
            <For
                each=move || notices.get().notices
                key=|notice| notice.id
                children=move |notice: Notice| view! { <ToastItem notices=notices notice=notice ttl=ttl/> }
            />
        </div>
    }
}

#[component]
fn ToastItem(notices: RwSignal<NoticeState>, notice: Notice, ttl: Duration) -> impl IntoView {
    let id = notice.id;

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::sleep(ttl).await;
        notices.update(|n| n.dismiss(id));
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = ttl;

    view! {
        <div class=notice.kind.css_class()>
            <span class="toast__message">{notice.message}</span>
            <button
                class="toast__close"
                aria-label="Dismiss"
                on:click=move |_| notices.update(|n| n.dismiss(id))
            >
                "×"
            </button>
        </div>
    }
}
