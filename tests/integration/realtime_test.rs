//! Realtime bridge tests over the assembled client.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};

use serde_json::json;
use uuid::Uuid;

use plaza_core::events::change::{ChangeOp, RawChange};
use plaza_entity::comment::Comment;
use plaza_entity::post::Post;
use plaza_realtime::{FeedCallbacks, FeedRecord};

use crate::helpers::{build, settle};

fn seeded_comment(ctx: &crate::helpers::TestCtx, post_id: Uuid) -> Uuid {
    let comment_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    ctx.tables.seed(
        "comments",
        json!({
            "comment_id": comment_id.to_string(),
            "post_id": post_id.to_string(),
            "profile_id": author_id.to_string(),
            "body": "nice post",
            "created_at": "2026-01-05T12:00:00Z",
            // One-element collection on purpose: the bridge must deliver a
            // single normalized object.
            "author": [{
                "profile_id": author_id.to_string(),
                "email": "ana@x.com",
                "username": "ana"
            }],
        }),
    );
    comment_id
}

fn comment_insert(comment_id: Uuid, post_id: Uuid) -> RawChange {
    RawChange {
        table: "comments".into(),
        op: ChangeOp::Insert,
        new_row: Some(json!({
            "comment_id": comment_id.to_string(),
            "post_id": post_id.to_string(),
            "profile_id": Uuid::new_v4().to_string(),
            "body": "nice post",
            "created_at": "2026-01-05T12:00:00Z",
        })),
        old_row: None,
    }
}

#[tokio::test]
async fn test_comment_insert_is_enriched_with_normalized_author() {
    let ctx = build();
    let post_id = Uuid::new_v4();
    let comment_id = seeded_comment(&ctx, post_id);

    let seen: Arc<Mutex<Vec<FeedRecord<Comment>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _sub = ctx
        .client
        .realtime()
        .subscribe_comments(
            post_id,
            FeedCallbacks::new().on_insert(move |record| sink.lock().unwrap().push(record)),
        )
        .await
        .unwrap();

    ctx.feed.emit(comment_insert(comment_id, post_id));
    settle().await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let comment = seen[0].enriched().expect("enriched delivery");
    assert_eq!(comment.comment_id, comment_id);
    assert_eq!(comment.author.as_ref().unwrap().username, "ana");
}

#[tokio::test]
async fn test_failed_enrichment_degrades_to_raw_payload() {
    let ctx = build();
    ctx.tables.fail_selects.store(true, Ordering::SeqCst);

    let seen: Arc<Mutex<Vec<FeedRecord<Post>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _sub = ctx
        .client
        .realtime()
        .subscribe_posts(
            FeedCallbacks::new().on_insert(move |record| sink.lock().unwrap().push(record)),
        )
        .await
        .unwrap();

    let post_id = Uuid::new_v4();
    ctx.feed.emit(RawChange {
        table: "posts".into(),
        op: ChangeOp::Insert,
        new_row: Some(json!({
            "post_id": post_id.to_string(),
            "profile_id": Uuid::new_v4().to_string(),
            "title": "hello",
            "created_at": "2026-01-05T12:00:00Z",
        })),
        old_row: None,
    });
    settle().await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1, "the event must not be dropped");
    assert!(seen[0].is_degraded());
}

#[tokio::test]
async fn test_post_delete_delivers_only_the_id() {
    let ctx = build();

    let deleted: Arc<Mutex<Vec<Uuid>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = deleted.clone();
    let _sub = ctx
        .client
        .realtime()
        .subscribe_posts(
            FeedCallbacks::<Post>::new().on_delete(move |id| sink.lock().unwrap().push(id)),
        )
        .await
        .unwrap();

    let post_id = Uuid::new_v4();
    ctx.feed.emit(RawChange {
        table: "posts".into(),
        op: ChangeOp::Delete,
        new_row: None,
        old_row: Some(json!({ "post_id": post_id.to_string() })),
    });
    settle().await;

    assert_eq!(*deleted.lock().unwrap(), vec![post_id]);
}

#[tokio::test]
async fn test_unsubscribe_releases_channel_and_silences_callbacks() {
    let ctx = build();
    let post_id = Uuid::new_v4();
    let comment_id = seeded_comment(&ctx, post_id);

    let seen: Arc<Mutex<Vec<FeedRecord<Comment>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let sub = ctx
        .client
        .realtime()
        .subscribe_comments(
            post_id,
            FeedCallbacks::new().on_insert(move |record| sink.lock().unwrap().push(record)),
        )
        .await
        .unwrap();

    sub.unsubscribe();
    sub.unsubscribe();
    assert!(ctx.feed.released.load(Ordering::SeqCst));

    ctx.feed.emit(comment_insert(comment_id, post_id));
    settle().await;

    assert!(seen.lock().unwrap().is_empty());
}
