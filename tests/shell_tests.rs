// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session gate and navigation stack.

use health_tracker::controllers::ActionStatus;
use health_tracker::db::health_data::CacheKey;
use health_tracker::services::IdentityProvider;
use health_tracker::{App, Route, Screen};
use std::sync::atomic::Ordering;
use std::sync::Arc;

mod common;
use common::{fixed_clock, session_for, FakeIdentity, TestBackend};

fn backend_with_account() -> TestBackend {
    TestBackend {
        identity: Arc::new(FakeIdentity::with_account("sam@example.com", "hunter22")),
        ..TestBackend::default()
    }
}

async fn signed_in_app() -> App<TestBackend> {
    let mut app = App::new(backend_with_account(), fixed_clock());
    let login = app.login().unwrap();
    login.set_email("sam@example.com");
    login.set_password("hunter22");
    assert!(app.submit_login().await.unwrap());
    app
}

#[tokio::test]
async fn test_login_gate() {
    let mut app = App::new(backend_with_account(), fixed_clock());
    assert!(!app.start().await.unwrap());
    assert!(!app.is_signed_in());
    assert_eq!(app.current_route(), None);
    assert!(app.navigate(Route::Calories).is_none(), "no screens before sign-in");

    let login = app.login().unwrap();
    login.set_email("sam@example.com");
    login.set_password("nope");
    assert!(!app.submit_login().await.unwrap());
    assert!(!app.is_signed_in());

    login.set_password("hunter22");
    assert!(app.submit_login().await.unwrap());
    assert_eq!(app.session().unwrap().uid, "sam");
    assert_eq!(app.current_route(), Some(Route::Profile));
    assert!(app.login().is_none());
}

#[tokio::test]
async fn test_start_resumes_existing_session() {
    let backend = backend_with_account();
    backend.identity.set_current(Some(session_for("sam")));

    let mut app = App::new(backend, fixed_clock());
    assert!(app.start().await.unwrap());
    assert_eq!(app.routes(), vec![Route::Profile]);
}

#[tokio::test]
async fn test_navigation_stack() {
    let mut app = signed_in_app().await;

    assert!(!app.go_back(), "initial screen stays");

    let Some(Screen::Calories(calories)) = app.navigate(Route::Calories) else {
        panic!("expected the calorie screen");
    };
    app.navigate(Route::ScanReport);
    assert_eq!(
        app.routes(),
        vec![Route::Profile, Route::Calories, Route::ScanReport]
    );
    assert_eq!(Route::ScanReport.title(), "Scan Report");

    assert!(app.go_back());
    assert!(app.go_back());
    assert_eq!(app.current_route(), Some(Route::Profile));

    // The popped screen's scope is closed.
    assert_eq!(calories.load_today().await, None);
}

#[tokio::test]
async fn test_saving_vitals_returns_to_profile() {
    let mut app = signed_in_app().await;

    let Some(Screen::Vitals(vitals)) = app.navigate(Route::EnterVitals) else {
        panic!("expected the vitals screen");
    };
    vitals.set_weight("70");
    vitals.set_height("175");
    vitals.set_blood_pressure("120/80");

    assert_eq!(app.save_vitals().await, Some(ActionStatus::Ready));
    assert_eq!(app.current_route(), Some(Route::Profile));

    let Some(Screen::Profile(profile)) = app.screen() else {
        panic!("expected the profile screen");
    };
    profile.load().await;
    assert_eq!(profile.state().streak, 1);
}

#[tokio::test]
async fn test_sign_out_closes_screens_and_drops_cache() {
    let mut app = signed_in_app().await;

    let data = app.data().unwrap();
    data.vitals().await.unwrap();
    assert!(data.is_cached(&CacheKey::Vitals));

    let Some(Screen::Profile(profile)) = app.screen() else {
        panic!("expected the profile screen");
    };

    app.sign_out();
    assert!(!app.is_signed_in());
    assert!(app.login().is_some());
    assert_eq!(app.routes(), Vec::<Route>::new());
    assert!(!data.is_cached(&CacheKey::Vitals));
    assert_eq!(profile.load().await, None, "closed screens ignore actions");
}

#[tokio::test]
async fn test_refresh_session_remounts_stack() {
    let backend = backend_with_account();
    let identity = backend.identity.clone();

    let mut app = App::new(backend, fixed_clock());
    let login = app.login().unwrap();
    login.set_email("sam@example.com");
    login.set_password("hunter22");
    app.submit_login().await.unwrap();

    let Some(Screen::Calories(old_calories)) = app.navigate(Route::Calories) else {
        panic!("expected the calorie screen");
    };

    app.refresh_session().await.unwrap();
    assert_eq!(identity.refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(app.routes(), vec![Route::Profile, Route::Calories]);
    assert_eq!(identity.current_session().unwrap().uid, "sam");
    assert_eq!(old_calories.load_today().await, None);

    let Some(Screen::Calories(calories)) = app.screen() else {
        panic!("expected the calorie screen");
    };
    assert_eq!(calories.load_today().await, Some(ActionStatus::Ready));
}
