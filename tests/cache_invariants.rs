//! Cross-cutting cache invariants, exercised through the public cache API
//! rather than through one module's private internals.

use adaptive_core::cache::GenericCache;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn ttl_boundary_behavior() {
    let cache: GenericCache<&'static str> = GenericCache::new("ttl", Duration::from_millis(200));
    cache.set("k", "v").await;

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(cache.get("k").await, Some("v"), "not yet expired");

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(cache.get("k").await, None, "expired");
}

#[tokio::test]
async fn concurrent_access_with_100_writers_and_readers_is_bounded() {
    let cache = Arc::new(GenericCache::<u32>::new(
        "concurrent",
        Duration::from_secs(60),
    ));

    let mut handles = Vec::new();
    for i in 0..100u32 {
        let writer_cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            writer_cache.set(format!("key-{i}"), i).await;
        }));
        let reader_cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            let _ = reader_cache.get(&format!("key-{i}")).await;
        }));
    }

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.size().await, 100);
}

/// Guards the open question in DESIGN.md: every internally built prefix is
/// terminated with the grammar's own `:` separator, so a course ID being a
/// literal prefix of another (without the separator) cannot over-invalidate.
#[tokio::test]
async fn delete_by_prefix_does_not_leak_across_ids_sharing_a_string_prefix() {
    use adaptive_core::cache::{CacheTtls, MultiLayerCache};
    use adaptive_core::domain::{CourseState, ToolSelection};

    let cache = MultiLayerCache::new(CacheTtls::default());
    let course_a = CourseState::new("course-1", "u1");
    let course_a_extended = CourseState::new("course-10", "u1");

    let selection = ToolSelection {
        tool: "lesson".to_string(),
        topic: "T".to_string(),
        reason: "r".to_string(),
    };

    cache.set_selection(&course_a, selection.clone()).await;
    cache
        .set_selection(&course_a_extended, selection.clone())
        .await;

    cache.invalidate_selection("course-1").await;

    assert_eq!(cache.get_selection(&course_a).await, None);
    assert_eq!(
        cache.get_selection(&course_a_extended).await,
        Some(selection),
        "course-10 must survive invalidating course-1"
    );
}
