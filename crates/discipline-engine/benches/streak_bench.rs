//! discipline-engine 성능 벤치마크
//!
//! 실행: cargo bench -p discipline-engine
//!
//! 벤치마크 대상:
//! - 스트릭 재계산 (이력 길이별)
//! - 조합 보너스 계산 (조합 수별)

use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use discipline_core::models::combination::Combination;
use discipline_core::models::stat::StatVector;
use discipline_engine::combination::resolve_bonus;
use discipline_engine::streak::recalculate;
use std::collections::HashSet;
use std::hint::black_box;

/// 4일 중 3일 성공하는 이력 (역순)
fn history(days: usize) -> Vec<NaiveDate> {
    let base = NaiveDate::from_ymd_opt(2020, 1, 1).expect("유효한 날짜");
    (0..days)
        .rev()
        .filter(|offset| offset % 4 != 3)
        .map(|offset| base + Duration::days(offset as i64))
        .collect()
}

fn combinations(count: usize) -> Vec<Combination> {
    (0..count)
        .map(|n| Combination {
            id: n as i64 + 1,
            name: None,
            habit_a: (n % 50) as i64 + 1,
            habit_b: (n % 50) as i64 + 2 + (n / 50) as i64,
            bonus: StatVector {
                i: 1.0,
                ..Default::default()
            },
            is_active: n % 7 != 0,
            created_at: String::new(),
            name_a: None,
            name_b: None,
        })
        .collect()
}

/// 스트릭 재계산 벤치마크
fn bench_recalculate(c: &mut Criterion) {
    let mut group = c.benchmark_group("streak_recalculate");

    for days in [30, 365, 3650] {
        let dates = history(days);
        group.throughput(Throughput::Elements(dates.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &dates, |b, dates| {
            b.iter(|| black_box(recalculate(1, dates)));
        });
    }

    group.finish();
}

/// 조합 보너스 벤치마크
fn bench_resolve_bonus(c: &mut Criterion) {
    let mut group = c.benchmark_group("combination_bonus");
    let completed: HashSet<i64> = (1..=40).collect();

    for count in [10, 100, 1000] {
        let combos = combinations(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &combos, |b, combos| {
            b.iter(|| black_box(resolve_bonus(&completed, combos)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_recalculate, bench_resolve_bonus);
criterion_main!(benches);
