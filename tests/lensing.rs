//! Integration tests for lensed views: consistency with the parent store,
//! change gating, lifecycle, and projection failure isolation.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use refold::{Changeable, Observable, Store};

#[derive(Clone, Debug, PartialEq)]
struct User {
    username: String,
}

#[derive(Clone, Debug, PartialEq)]
struct AppState {
    counter: i64,
    flag: bool,
    user: User,
}

impl Changeable for AppState {}

impl Default for AppState {
    fn default() -> Self {
        Self {
            counter: 0,
            flag: false,
            user: User {
                username: "Alice".to_string(),
            },
        }
    }
}

#[derive(Clone, Debug)]
enum AppAction {
    Increase,
    Toggle,
    Rename(String),
}

fn app_reducer(action: &AppAction, state: AppState) -> AppState {
    match action {
        AppAction::Increase => state.changed(|s| &mut s.counter, state.counter + 1),
        AppAction::Toggle => state.changed(|s| &mut s.flag, !state.flag),
        AppAction::Rename(username) => state.changed(|s| &mut s.user.username, username.clone()),
    }
}

fn app_store() -> Store<AppAction, AppState> {
    Store::new(
        AppState::default(),
        vec![Arc::new(app_reducer)],
        Vec::new(),
    )
}

fn notification_counter<O: Observable>(observable: &O) -> (Arc<AtomicUsize>, refold::Subscription) {
    let notifications = Arc::new(AtomicUsize::new(0));
    let observed = Arc::clone(&notifications);
    let subscription = observable.subscribe(move |_| {
        observed.fetch_add(1, Ordering::SeqCst);
    });
    (notifications, subscription)
}

#[test]
fn lens_exposes_the_initial_projection() {
    let store = app_store();

    let counter = store.lense(|state: &AppState| state.counter);
    let flag = store.lense(|state: &AppState| state.flag);
    let username = store.lense(|state: &AppState| state.user.username.clone());

    assert_eq!(counter.state(), 0);
    assert!(!flag.state());
    assert_eq!(username.state(), "Alice");
}

#[test]
fn lenses_track_the_store_through_dispatches() {
    let store = app_store();
    let counter = store.lense(|state: &AppState| state.counter);
    let flag = store.lense(|state: &AppState| state.flag);
    let username = store.lense(|state: &AppState| state.user.username.clone());

    store.dispatch(AppAction::Increase);
    store.dispatch(AppAction::Toggle);
    store.dispatch(AppAction::Rename("Bob".to_string()));

    assert_eq!(counter.state(), 1);
    assert!(flag.state());
    assert_eq!(username.state(), "Bob");

    // Each cached projection matches the parent's current state.
    assert_eq!(counter.state(), store.select(|s| s.counter));
    assert_eq!(flag.state(), store.select(|s| s.flag));
    assert_eq!(username.state(), store.select(|s| s.user.username.clone()));
}

#[test]
fn lenses_notify_only_for_their_own_slice() {
    let store = app_store();
    let counter = store.lense(|state: &AppState| state.counter);
    let flag = store.lense(|state: &AppState| state.flag);
    let username = store.lense(|state: &AppState| state.user.username.clone());

    let (counter_hits, _a) = notification_counter(&counter);
    let (flag_hits, _b) = notification_counter(&flag);
    let (username_hits, _c) = notification_counter(&username);

    store.dispatch(AppAction::Increase);
    store.dispatch(AppAction::Toggle);

    assert_eq!(counter_hits.load(Ordering::SeqCst), 1);
    assert_eq!(flag_hits.load(Ordering::SeqCst), 1);
    assert_eq!(username_hits.load(Ordering::SeqCst), 0);
}

#[test]
fn lens_notifications_are_gated_by_equality() {
    let store = app_store();
    let counter = store.lense(|state: &AppState| state.counter);
    let username = store.lense(|state: &AppState| state.user.username.clone());

    let (counter_hits, _a) = notification_counter(&counter);
    let (username_hits, _b) = notification_counter(&username);

    store.dispatch(AppAction::Increase);
    store.dispatch(AppAction::Toggle);
    store.dispatch(AppAction::Increase);

    assert_eq!(counter_hits.load(Ordering::SeqCst), 2);
    assert_eq!(username_hits.load(Ordering::SeqCst), 0);

    store.dispatch(AppAction::Rename("Bob".to_string()));
    assert_eq!(username_hits.load(Ordering::SeqCst), 1);

    // Renaming to the same value again changes nothing.
    store.dispatch(AppAction::Rename("Bob".to_string()));
    assert_eq!(username_hits.load(Ordering::SeqCst), 1);
}

#[test]
fn unrelated_commit_leaves_the_lens_silent() {
    let store = app_store();
    let counter = store.lense(|state: &AppState| state.counter);
    let (hits, _subscription) = notification_counter(&counter);

    store.dispatch(AppAction::Toggle);

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(counter.state(), 0);
}

#[test]
fn lens_subscribers_receive_the_changed_value() {
    let store = app_store();
    let counter = store.lense(|state: &AppState| state.counter);

    let seen = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&seen);
    let _subscription = counter.subscribe(move |value: &i64| {
        sink.store(*value as usize, Ordering::SeqCst);
    });

    store.dispatch(AppAction::Increase);
    store.dispatch(AppAction::Increase);

    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn lens_dispatch_forwards_to_the_parent() {
    let store = app_store();
    let counter = store.lense(|state: &AppState| state.counter);
    let flag = store.lense(|state: &AppState| state.flag);

    flag.dispatch(AppAction::Increase);

    assert_eq!(store.state().counter, 1);
    assert_eq!(counter.state(), 1);
    assert!(!flag.state());
}

#[test]
fn lens_select_projects_the_cached_value() {
    let store = app_store();
    let username = store.lense(|state: &AppState| state.user.username.clone());

    store.dispatch(AppAction::Rename("Bob".to_string()));

    assert_eq!(username.select(|name| name.len()), 3);
}

#[test]
fn dropping_a_lens_releases_its_parent_subscription() {
    let store = app_store();
    let counter = store.lense(|state: &AppState| state.counter);
    let (hits, _subscription) = notification_counter(&counter);

    store.dispatch(AppAction::Increase);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    drop(counter);
    store.dispatch(AppAction::Increase);

    // The projection callback is gone; nothing fires and nothing panics.
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(store.state().counter, 2);
}

#[test]
fn failing_projection_does_not_block_sibling_lenses() {
    let store = app_store();
    let _poisoned = store.lense(|state: &AppState| {
        if state.counter > 0 {
            panic!("projection failed");
        }
        state.counter
    });
    let healthy = store.lense(|state: &AppState| state.counter);

    let result = catch_unwind(AssertUnwindSafe(|| store.dispatch(AppAction::Increase)));

    // The failure surfaced to the dispatch caller, after the sibling was
    // brought up to date and the commit itself stood.
    assert!(result.is_err());
    assert_eq!(healthy.state(), 1);
    assert_eq!(store.state().counter, 1);
}

#[test]
fn observable_accepts_store_and_lens_uniformly() {
    fn snapshot<O: Observable>(observable: &O) -> O::State {
        observable.state()
    }
    fn drive<O: Observable>(observable: &O, action: O::Action) {
        observable.dispatch(action);
    }

    let store = app_store();
    let counter = store.lense(|state: &AppState| state.counter);

    drive(&store, AppAction::Increase);
    drive(&counter, AppAction::Increase);

    assert_eq!(snapshot(&store).counter, 2);
    assert_eq!(snapshot(&counter), 2);
}
