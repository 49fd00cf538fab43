//! Session store and inactivity behavior through the assembled client.

use std::time::Duration;

use plaza_auth::session::monitor::InteractionKind;
use plaza_core::events::auth::AuthEvent;
use plaza_core::traits::auth::AuthSession;

use crate::helpers::{build, observe, settle};

#[tokio::test]
async fn test_late_subscriber_immediately_sees_current_session() {
    let ctx = build();
    ctx.client.account().login("a@x.com", "p").await.unwrap();

    let log = {
        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let sink = log.clone();
        std::mem::forget(ctx.client.session().subscribe(std::sync::Arc::new(
            move |update: &plaza::SessionUpdate| {
                sink.lock().unwrap().push(update.clone());
            },
        )));
        log
    };

    // Replay-on-subscribe: the late subscriber got the session synchronously.
    let seen = log.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].session.is_authenticated());
    assert_eq!(seen[0].session.email.as_deref(), Some("a@x.com"));
}

#[tokio::test(start_paused = true)]
async fn test_inactivity_timeout_forces_flagged_logout() {
    let ctx = build();
    ctx.client.initialize().await;
    ctx.client.account().login("a@x.com", "p").await.unwrap();
    let log = observe(ctx.client.session());

    tokio::time::sleep(Duration::from_secs(30 * 60 + 1)).await;
    settle().await;

    assert!(!ctx.client.session().current().is_authenticated());
    assert!(!ctx.client.monitor().is_armed());
    assert_eq!(ctx.auth.sign_outs(), 1);

    let seen = log.lock().unwrap();
    assert_eq!(seen.len(), 1, "exactly one forced-logout fan-out");
    assert!(seen[0].inactivity_logout);
}

#[tokio::test(start_paused = true)]
async fn test_interaction_resets_the_countdown() {
    let ctx = build();
    ctx.client.initialize().await;
    ctx.client.account().login("a@x.com", "p").await.unwrap();

    tokio::time::sleep(Duration::from_secs(29 * 60)).await;
    ctx.client.record_activity(InteractionKind::Click);

    // The original deadline passes; still signed in.
    tokio::time::sleep(Duration::from_secs(2 * 60)).await;
    settle().await;
    assert!(ctx.client.session().current().is_authenticated());
    assert_eq!(ctx.auth.sign_outs(), 0);

    // The reset deadline fires.
    tokio::time::sleep(Duration::from_secs(29 * 60)).await;
    settle().await;
    assert!(!ctx.client.session().current().is_authenticated());
    assert_eq!(ctx.auth.sign_outs(), 1);
}

#[tokio::test]
async fn test_provider_events_reconcile_into_the_store() {
    let ctx = build();
    ctx.client.initialize().await;
    let log = observe(ctx.client.session());

    let session = AuthSession {
        identity_id: uuid::Uuid::new_v4(),
        email: "push@x.com".into(),
        email_confirmed_at: Some(chrono::Utc::now()),
    };
    ctx.auth.emit(AuthEvent::signed_in(session.clone()));
    assert_eq!(
        ctx.client.session().current().identity_id,
        Some(session.identity_id)
    );
    assert!(ctx.client.monitor().is_armed());

    // A failed refresh degrades silently to signed-out.
    ctx.auth.emit(AuthEvent::token_refreshed(None));
    assert!(!ctx.client.session().current().is_authenticated());
    assert!(!ctx.client.monitor().is_armed());

    let seen = log.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|u| !u.inactivity_logout));
}

#[tokio::test(start_paused = true)]
async fn test_restored_session_arms_the_monitor() {
    let ctx = build();
    *ctx.auth.persisted.lock().unwrap() = Some(AuthSession {
        identity_id: uuid::Uuid::new_v4(),
        email: "restored@x.com".into(),
        email_confirmed_at: Some(chrono::Utc::now()),
    });

    assert!(ctx.client.initialize().await);
    assert!(ctx.client.session().current().is_authenticated());
    assert!(ctx.client.monitor().is_armed());

    tokio::time::sleep(Duration::from_secs(30 * 60 + 1)).await;
    settle().await;
    assert!(!ctx.client.session().current().is_authenticated());
}
