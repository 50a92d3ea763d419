//! Integration Tests: Feed Engine
//!
//! Runs the feed engine against a real PostgreSQL with the service
//! migrations applied.
//!
//! Coverage:
//! - Visibility: own posts plus posts by users the requester has an edge to
//! - Search and tag filters, alone and combined
//! - Pagination windows and total count invariance
//! - Comment payloads containing delimiter characters
//! - No duplicate rows when several friend edges match the same owner
//! - Empty feed for a user with no friends and no posts
//!
//! Architecture:
//! - Uses testcontainers for PostgreSQL database
//! - Exercises `FeedService` over `PgFeedStore`

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{add_edge, at, create_comment, create_post, create_user, seed_social_graph, setup_test_db};
use feed_service::db::PgFeedStore;
use feed_service::models::{FeedFilter, FeedResult};
use feed_service::{FeedService, FeedSettings};
use sqlx::PgPool;

fn engine(pool: &PgPool) -> FeedService {
    FeedService::new(
        Arc::new(PgFeedStore::new(pool.clone())),
        FeedSettings {
            default_page_size: 5,
            query_timeout: Duration::from_secs(10),
        },
    )
}

fn ids(feed: &FeedResult) -> Vec<&str> {
    feed.posts.iter().map(|p| p.post.id.as_str()).collect()
}

#[tokio::test]
#[ignore = "Requires Docker for PostgreSQL testcontainer"]
async fn test_visibility_follows_directed_edges() {
    let (_container, pool) = setup_test_db().await;
    seed_social_graph(&pool).await;
    let feed = engine(&pool);

    let alice = feed.get_feed("alice", &FeedFilter::default()).await.unwrap();
    assert_eq!(ids(&alice), vec!["b2", "b1", "a1"]);
    assert_eq!(alice.total, 3);

    // bob has no edge towards alice, so only sees his own posts
    let bob = feed.get_feed("bob", &FeedFilter::default()).await.unwrap();
    assert_eq!(ids(&bob), vec!["b2", "b1"]);

    let carol = feed.get_feed("carol", &FeedFilter::default()).await.unwrap();
    assert_eq!(ids(&carol), vec!["c1", "a1"]);

    // a stranger's posts never leak, whatever the filters
    let filtered = FeedFilter {
        search: Some("dave".into()),
        tags: vec!["rust".into()],
        ..FeedFilter::default()
    };
    let alice_filtered = feed.get_feed("alice", &filtered).await.unwrap();
    assert!(alice_filtered.posts.is_empty());
    assert_eq!(alice_filtered.total, 0);
}

#[tokio::test]
#[ignore = "Requires Docker for PostgreSQL testcontainer"]
async fn test_search_and_tag_filters() {
    let (_container, pool) = setup_test_db().await;
    seed_social_graph(&pool).await;
    create_post(&pool, "a2", "alice", "<p>100% done_now</p>", &["meta"], 6).await;
    let feed = engine(&pool);

    let search = |text: &str| FeedFilter {
        search: Some(text.to_string()),
        ..FeedFilter::default()
    };

    let rust = feed.get_feed("alice", &search("rust")).await.unwrap();
    assert_eq!(ids(&rust), vec!["b2", "a1"]);
    assert_eq!(rust.total, 2);

    // pattern characters are matched literally
    let percent = feed.get_feed("alice", &search("100%")).await.unwrap();
    assert_eq!(ids(&percent), vec!["a2"]);
    let underscore = feed.get_feed("alice", &search("e_n")).await.unwrap();
    assert_eq!(ids(&underscore), vec!["a2"]);

    // search is case-sensitive
    let upper = feed.get_feed("alice", &search("RUST")).await.unwrap();
    assert!(upper.posts.is_empty());

    let all = feed.get_feed("alice", &search("")).await.unwrap();
    assert_eq!(all.total, 4);

    let tags = |tags: &[&str]| FeedFilter {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..FeedFilter::default()
    };

    let go = feed.get_feed("alice", &tags(&["go"])).await.unwrap();
    assert_eq!(ids(&go), vec!["b2", "b1"]);

    let either = feed.get_feed("alice", &tags(&["meta", "go"])).await.unwrap();
    assert_eq!(ids(&either), vec!["a2", "b2", "b1"]);

    let disjoint = feed.get_feed("alice", &tags(&["python"])).await.unwrap();
    assert!(disjoint.posts.is_empty());
    assert_eq!(disjoint.total, 0);

    let combined = FeedFilter {
        search: Some("bob".into()),
        tags: vec!["rust".into()],
        ..FeedFilter::default()
    };
    let both = feed.get_feed("alice", &combined).await.unwrap();
    assert_eq!(ids(&both), vec!["b2"]);
    assert_eq!(both.total, 1);
}

#[tokio::test]
#[ignore = "Requires Docker for PostgreSQL testcontainer"]
async fn test_pagination_windows_and_total_invariance() {
    let (_container, pool) = setup_test_db().await;
    create_user(&pool, "alice", "Alice").await;
    for i in 0..12u32 {
        create_post(&pool, &format!("p{:02}", i), "alice", "<p>post</p>", &["t"], i).await;
    }
    let feed = engine(&pool);

    let page = |index: u32| FeedFilter {
        page_index: index,
        ..FeedFilter::default()
    };

    let first = feed.get_feed("alice", &page(0)).await.unwrap();
    assert_eq!(first.page.limit, 5);
    assert_eq!(first.page.offset, 0);
    assert_eq!(ids(&first), vec!["p11", "p10", "p09", "p08", "p07"]);

    let third = feed.get_feed("alice", &page(2)).await.unwrap();
    assert_eq!(third.page.offset, 10);
    assert_eq!(ids(&third), vec!["p01", "p00"]);

    let past_end = feed.get_feed("alice", &page(7)).await.unwrap();
    assert!(past_end.posts.is_empty());

    for result in [&first, &third, &past_end] {
        assert_eq!(result.total, 12);
    }
}

#[tokio::test]
#[ignore = "Requires Docker for PostgreSQL testcontainer"]
async fn test_comments_survive_delimiters_and_keep_order() {
    let (_container, pool) = setup_test_db().await;
    seed_social_graph(&pool).await;
    sqlx::query("UPDATE users SET image_url = 'https://img/bob.png', friend_count = 3 WHERE id = 'bob'")
        .execute(&pool)
        .await
        .unwrap();

    let tricky = r#"hi, "alice" ; {x} [y] \n 1,2,3"#;
    create_comment(&pool, "a1", "bob", tricky, 20).await;
    create_comment(&pool, "a1", "alice", "first!", 10).await;
    create_comment(&pool, "b1", "alice", "other post", 15).await;

    let feed = engine(&pool)
        .get_feed("alice", &FeedFilter::default())
        .await
        .unwrap();
    let a1 = feed.posts.iter().find(|p| p.post.id == "a1").unwrap();

    assert_eq!(a1.comments.len(), 2);
    assert_eq!(a1.comments[0].text, "first!");
    assert_eq!(a1.comments[0].creator.id, "alice");
    assert_eq!(a1.comments[0].created_at, at(10));

    let second = &a1.comments[1];
    assert_eq!(second.text, tricky);
    assert_eq!(second.created_at, at(20));
    assert_eq!(second.creator.id, "bob");
    assert_eq!(second.creator.name, "Bob");
    assert_eq!(second.creator.image_url.as_deref(), Some("https://img/bob.png"));
    assert_eq!(second.creator.friend_count, 3);
    assert_eq!(second.creator.created_at, at(0));

    let b1 = feed.posts.iter().find(|p| p.post.id == "b1").unwrap();
    assert_eq!(b1.comments.len(), 1);
    assert_eq!(b1.comments[0].text, "other post");

    let b2 = feed.posts.iter().find(|p| p.post.id == "b2").unwrap();
    assert!(b2.comments.is_empty());
}

#[tokio::test]
#[ignore = "Requires Docker for PostgreSQL testcontainer"]
async fn test_duplicate_edges_do_not_duplicate_posts() {
    let (_container, pool) = setup_test_db().await;
    seed_social_graph(&pool).await;

    // allow a second alice -> bob edge row
    sqlx::query("ALTER TABLE friends DROP CONSTRAINT friends_pkey")
        .execute(&pool)
        .await
        .unwrap();
    add_edge(&pool, "alice", "bob").await;

    create_comment(&pool, "b1", "alice", "one", 10).await;
    create_comment(&pool, "b1", "bob", "two", 11).await;
    create_comment(&pool, "b1", "carol", "three", 12).await;

    let feed = engine(&pool)
        .get_feed("alice", &FeedFilter::default())
        .await
        .unwrap();

    assert_eq!(ids(&feed), vec!["b2", "b1", "a1"]);
    assert_eq!(feed.total, 3);

    let b1 = feed.posts.iter().find(|p| p.post.id == "b1").unwrap();
    let texts: Vec<&str> = b1.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[tokio::test]
#[ignore = "Requires Docker for PostgreSQL testcontainer"]
async fn test_lonely_user_gets_empty_feed() {
    let (_container, pool) = setup_test_db().await;
    seed_social_graph(&pool).await;
    create_user(&pool, "erin", "Erin").await;

    let feed = engine(&pool)
        .get_feed("erin", &FeedFilter::default())
        .await
        .unwrap();

    assert!(feed.posts.is_empty());
    assert_eq!(feed.total, 0);
}

#[tokio::test]
#[ignore = "Requires Docker for PostgreSQL testcontainer"]
async fn test_store_outage_is_transient() {
    let (_container, pool) = setup_test_db().await;
    seed_social_graph(&pool).await;
    let feed = engine(&pool);
    pool.close().await;

    let err = feed
        .get_feed("alice", &FeedFilter::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "transient");
}
