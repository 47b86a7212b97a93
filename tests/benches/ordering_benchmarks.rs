//! # Lecture Ordering Benchmarks
//!
//! | Operation | Store writes | Expectation |
//! |-----------|--------------|-------------|
//! | move within section | 2 | flat in section size apart from the shifted range |
//! | random drag (list + move) | 2 | dominated by the list read |
//! | move across sections | 3 | same as within, two sections locked |
//! | append | 1 | constant |
//! | reconcile (damaged) | up to N | linear in section size |
//!
//! All runs use the in-memory store so the numbers isolate engine overhead
//! (locking, journaling, planning).

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::hint::black_box;
use std::time::Duration;
use tokio::runtime::Runtime;

use cm_01_lecture_ordering::test_utils::{
    lecture_data, memory_service, seed_section, MemoryOrderingService,
};
use cm_01_lecture_ordering::{
    CrossSectionMove, LectureOrderingApi, OrderingConfig, Position, WithinSectionMove,
};
use shared_types::{CourseId, LectureId, SectionId};

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

/// Move `lecture_id` to whichever end of its section it is not at.
async fn flip(
    service: &MemoryOrderingService,
    section_id: SectionId,
    lecture_id: LectureId,
    last: u32,
) {
    let current = service.get_lecture(lecture_id).await.unwrap();
    let to = if current.order == 0 { last } else { 0 };
    let mv = WithinSectionMove::new(
        section_id,
        lecture_id,
        Position::new(current.order),
        Position::new(to),
    )
    .unwrap();
    black_box(service.move_within_section(mv).await.unwrap());
}

fn bench_move_within_section(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("cm-01-move-within-section");
    group.measurement_time(Duration::from_secs(5));

    for size in [10usize, 100, 500] {
        let service = memory_service(OrderingConfig::default());
        let (section, lectures) = rt
            .block_on(seed_section(&service, CourseId::new(), "Bench", size))
            .unwrap();
        let pinned = lectures[0].id;

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("end_to_end_flip", size), &size, |b, _| {
            b.to_async(&rt)
                .iter(|| flip(&service, section.id, pinned, size as u32 - 1))
        });
    }
    group.finish();
}

/// Client-style drag: read the section, pick two random slots, move.
fn bench_random_moves(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("cm-01-random-moves");

    for size in [10usize, 100] {
        let service = memory_service(OrderingConfig::default());
        let (section, _) = rt
            .block_on(seed_section(&service, CourseId::new(), "Random", size))
            .unwrap();

        group.bench_with_input(BenchmarkId::new("list_then_move", size), &size, |b, &size| {
            b.to_async(&rt).iter(|| async {
                let (from, to) = {
                    let mut rng = rand::thread_rng();
                    let from = rng.gen_range(0..size);
                    let to = (from + rng.gen_range(1..size)) % size;
                    (from, to)
                };
                let listed = service.list_ordered(section.id).await.unwrap();
                let mv = WithinSectionMove::new(
                    section.id,
                    listed[from].id,
                    Position::new(from as u32),
                    Position::new(to as u32),
                )
                .unwrap();
                black_box(service.move_within_section(mv).await.unwrap())
            })
        });
    }
    group.finish();
}

fn bench_move_across_sections(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("cm-01-move-across-sections");

    for size in [10usize, 100] {
        let service = memory_service(OrderingConfig::default());
        let course_id = CourseId::new();
        let (left, lectures) = rt
            .block_on(seed_section(&service, course_id, "Left", size))
            .unwrap();
        let (right, _) = rt
            .block_on(seed_section(&service, course_id, "Right", size))
            .unwrap();
        let pinned = lectures[0].id;

        group.bench_with_input(BenchmarkId::new("front_to_front", size), &size, |b, _| {
            b.to_async(&rt).iter(|| async {
                let current = service.get_lecture(pinned).await.unwrap();
                let target = if current.section_id == left.id {
                    right.id
                } else {
                    left.id
                };
                let mv = CrossSectionMove::new(
                    pinned,
                    current.section_id,
                    target,
                    Position::new(current.order),
                    Position::new(0),
                )
                .unwrap();
                black_box(service.move_across_sections(mv).await.unwrap())
            })
        });
    }
    group.finish();
}

fn bench_append(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("cm-01-append");

    // Raised cap so long runs never hit the section limit.
    let config = OrderingConfig {
        max_lectures_per_section: u32::MAX,
        ..OrderingConfig::default()
    };
    let service = memory_service(config);
    let (section, _) = rt
        .block_on(seed_section(&service, CourseId::new(), "Append", 0))
        .unwrap();

    group.bench_function("append_tail", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(
                service
                    .append_lecture(section.id, lecture_data("Bench lecture"))
                    .await
                    .unwrap(),
            )
        })
    });
    group.finish();
}

fn bench_reconcile(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("cm-01-reconcile");

    for size in [100usize, 1000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("clean_section", size), &size, |b, &size| {
            let service = memory_service(OrderingConfig::default());
            let (section, _) = rt
                .block_on(seed_section(&service, CourseId::new(), "Clean", size))
                .unwrap();
            b.to_async(&rt)
                .iter(|| async { black_box(service.reconcile_section(section.id).await.unwrap()) })
        });

        group.bench_with_input(BenchmarkId::new("gap_at_front", size), &size, |b, &size| {
            b.iter_batched(
                || {
                    // Everything after the first lecture sits one too high.
                    let service = memory_service(OrderingConfig::default());
                    let (section, lectures) = rt
                        .block_on(seed_section(&service, CourseId::new(), "Gap", size))
                        .unwrap();
                    for lecture in &lectures[1..] {
                        service.store().force_order(lecture.id, lecture.order + 1);
                    }
                    (service, section.id)
                },
                |(service, section_id)| {
                    black_box(rt.block_on(service.reconcile_section(section_id)).unwrap())
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_move_within_section,
    bench_random_moves,
    bench_move_across_sections,
    bench_append,
    bench_reconcile
);
criterion_main!(benches);
