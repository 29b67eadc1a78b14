//! Benchmarks for the multi-layer cache's hot path.
//!
//! Measures selection get/set latency and content invalidation cost at a
//! few key-space sizes.

use adaptive_core::cache::{CacheTtls, MultiLayerCache};
use adaptive_core::domain::{CourseState, ToolSelection};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;
use tokio::runtime::Runtime;

fn setup() -> (std::sync::Arc<MultiLayerCache>, Runtime) {
    let rt = Runtime::new().unwrap_or_else(|_| panic!("failed to create runtime"));
    let cache = MultiLayerCache::new(CacheTtls::default());
    (cache, rt)
}

fn selection() -> ToolSelection {
    ToolSelection {
        tool: "lesson".to_string(),
        topic: "Variables".to_string(),
        reason: "next".to_string(),
    }
}

fn bench_selection_set(c: &mut Criterion) {
    let (cache, rt) = setup();
    let mut group = c.benchmark_group("selection_set");
    group.measurement_time(Duration::from_secs(5));

    for course_count in &[10, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::new("courses", course_count),
            course_count,
            |b, &course_count| {
                b.iter(|| {
                    rt.block_on(async {
                        let course_id = format!("course-{}", rand::random::<u32>() % course_count);
                        let state = CourseState::new(course_id, "u1");
                        cache.set_selection(&state, black_box(selection())).await;
                    });
                });
            },
        );
    }
    group.finish();
}

fn bench_selection_get_hit(c: &mut Criterion) {
    let (cache, rt) = setup();
    let state = CourseState::new("course-1", "u1");
    rt.block_on(cache.set_selection(&state, selection()));

    c.bench_function("selection_get_hit", |b| {
        b.iter(|| {
            rt.block_on(async { black_box(cache.get_selection(&state).await) });
        });
    });
}

fn bench_invalidate_content_for_course(c: &mut Criterion) {
    let (cache, rt) = setup();
    rt.block_on(async {
        for i in 0..1000 {
            cache
                .set_content(
                    "course-1",
                    "lesson",
                    &format!("topic-{i}"),
                    serde_json::json!("body"),
                )
                .await;
        }
    });

    c.bench_function("invalidate_content_for_course_1000_entries", |b| {
        b.iter(|| {
            rt.block_on(async {
                black_box(cache.invalidate_content_for_course("course-1").await);
            });
        });
    });
}

criterion_group!(
    benches,
    bench_selection_set,
    bench_selection_get_hit,
    bench_invalidate_content_for_course
);
criterion_main!(benches);
