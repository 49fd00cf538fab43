//! Domain service tests over the assembled client.

use serde_json::json;
use uuid::Uuid;

use plaza_core::error::ErrorKind;
use plaza_core::traits::table::TableClient;
use plaza_core::types::query::Filter;

use crate::helpers::build;

#[tokio::test]
async fn test_blank_comment_is_rejected_without_a_write() {
    let ctx = build();
    let err = ctx
        .client
        .comments()
        .create(Uuid::new_v4(), Uuid::new_v4(), "   \n\t ")
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert!(ctx.tables.rows_in("comments").is_empty());
}

#[tokio::test]
async fn test_comment_body_is_trimmed_on_create() {
    let ctx = build();
    let comment = ctx
        .client
        .comments()
        .create(Uuid::new_v4(), Uuid::new_v4(), "  nice post  ")
        .await
        .unwrap();

    assert_eq!(comment.body, "nice post");
}

#[tokio::test]
async fn test_duplicate_like_is_tolerated() {
    let ctx = build();
    let post_id = Uuid::new_v4();
    let profile_id = Uuid::new_v4();

    let first = ctx.client.likes().like(post_id, profile_id).await.unwrap();
    assert!(first.is_some());

    // The second like hits the unique constraint; not an error.
    let second = ctx.client.likes().like(post_id, profile_id).await.unwrap();
    assert!(second.is_none());
    assert_eq!(ctx.tables.rows_in("likes").len(), 1);

    assert!(ctx.client.likes().has_liked(post_id, profile_id).await.unwrap());
    ctx.client.likes().unlike(post_id, profile_id).await.unwrap();
    assert!(!ctx.client.likes().has_liked(post_id, profile_id).await.unwrap());
}

#[tokio::test]
async fn test_posts_fetch_newest_first_with_aggregates() {
    let ctx = build();
    let author = Uuid::new_v4();

    for (title, created_at, likes) in [
        ("first", "2026-01-01T00:00:00Z", 2),
        ("second", "2026-01-02T00:00:00Z", 0),
    ] {
        let like_rows: Vec<_> = (0..likes)
            .map(|_| {
                json!({
                    "like_id": Uuid::new_v4().to_string(),
                    "profile_id": Uuid::new_v4().to_string(),
                })
            })
            .collect();
        ctx.tables.seed(
            "posts",
            json!({
                "post_id": Uuid::new_v4().to_string(),
                "profile_id": author.to_string(),
                "title": title,
                "body": "",
                "created_at": created_at,
                "author": [{
                    "profile_id": author.to_string(),
                    "email": "ana@x.com",
                    "username": "ana"
                }],
                "likes": like_rows,
            }),
        );
    }

    let posts = ctx.client.posts().fetch_all().await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title, "second");
    assert_eq!(posts[1].title, "first");
    assert_eq!(posts[1].like_count(), 2);
    // The one-element author collection arrives as a single object.
    assert_eq!(posts[0].author.as_ref().unwrap().username, "ana");
}

#[tokio::test]
async fn test_interest_join_rows_normalize_both_shapes() {
    let ctx = build();
    let profile_id = Uuid::new_v4();

    // Object-shaped embed.
    ctx.tables.seed(
        "profile_interests",
        json!({
            "profile_id": profile_id.to_string(),
            "interest_id": Uuid::new_v4().to_string(),
            "interest": { "interest_id": Uuid::new_v4().to_string(), "name": "cycling" },
        }),
    );
    // Collection-shaped embed of the same join.
    ctx.tables.seed(
        "profile_interests",
        json!({
            "profile_id": profile_id.to_string(),
            "interest_id": Uuid::new_v4().to_string(),
            "interest": [{ "interest_id": Uuid::new_v4().to_string(), "name": "chess" }],
        }),
    );
    // Empty embed normalizes away entirely.
    ctx.tables.seed(
        "profile_interests",
        json!({
            "profile_id": profile_id.to_string(),
            "interest_id": Uuid::new_v4().to_string(),
            "interest": [],
        }),
    );

    let interests = ctx
        .client
        .interests()
        .fetch_for_profile(profile_id)
        .await
        .unwrap();
    let names: Vec<&str> = interests.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["cycling", "chess"]);
}

#[tokio::test]
async fn test_image_upload_returns_public_url() {
    let ctx = build();
    let profile_id = Uuid::new_v4();

    let url = ctx
        .client
        .images()
        .upload(
            "posts",
            profile_id,
            "photo.png",
            bytes::Bytes::from_static(b"png-bytes"),
            "image/png",
        )
        .await
        .unwrap();

    assert!(url.starts_with("https://project.example.co/storage/v1/object/public/images/posts/"));
    assert!(url.ends_with(".png"));
}

#[tokio::test]
async fn test_mention_resolution_hits_cache_after_first_lookup() {
    let ctx = build();
    let profile_id = Uuid::new_v4();
    ctx.tables.seed(
        "profiles",
        json!({
            "profile_id": profile_id.to_string(),
            "email": "ana@x.com",
            "first_name": "Ana",
            "last_name": "",
            "username": "ana",
            "is_admin": false,
        }),
    );

    assert_eq!(ctx.client.mentions().resolve("ana").await, Some(profile_id));

    // Cached: resolution survives the row disappearing.
    ctx.tables
        .delete("profiles", &[Filter::eq("profile_id", profile_id)])
        .await
        .unwrap();
    assert_eq!(ctx.client.mentions().resolve("ana").await, Some(profile_id));

    assert_eq!(ctx.client.mentions().resolve("nobody").await, None);
}
