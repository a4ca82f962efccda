use super::*;

#[test]
fn scheduler_default_has_nothing_pending() {
    assert_eq!(RedirectScheduler::default().pending(), None);
}

#[test]
fn schedule_arms_pending_redirect() {
    let scheduler = RedirectScheduler::default();
    assert!(scheduler.schedule("/login", Duration::from_secs(3)));
    assert_eq!(
        scheduler.pending(),
        Some(PendingRedirect { path: "/login".to_owned(), delay: Duration::from_secs(3) })
    );
}

#[test]
fn second_schedule_is_ignored_while_armed() {
    let scheduler = RedirectScheduler::default();
    assert!(scheduler.schedule("/login", Duration::from_secs(3)));
    assert!(!scheduler.schedule("/elsewhere", Duration::from_secs(1)));
    assert_eq!(scheduler.pending().map(|p| p.path), Some("/login".to_owned()));
}

#[test]
fn cancel_disarms_and_allows_rescheduling() {
    let scheduler = RedirectScheduler::default();
    scheduler.schedule("/login", Duration::from_secs(3));
    assert!(scheduler.cancel());
    assert_eq!(scheduler.pending(), None);
    assert!(!scheduler.cancel());
    assert!(scheduler.schedule("/login", Duration::from_secs(3)));
}

#[test]
fn clones_share_the_slot() {
    let scheduler = RedirectScheduler::default();
    let other = scheduler.clone();
    scheduler.schedule("/login", Duration::ZERO);
    assert!(other.pending().is_some());
    other.cancel();
    assert!(scheduler.pending().is_none());
}
