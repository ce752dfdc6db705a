//! Performance benchmarks for writingcoach-config

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use writingcoach_config::{
    get_exam_scoring_config, initialize, resolve_active_profile, validate_environment,
    RawEnvironment,
};

fn production_env() -> RawEnvironment {
    RawEnvironment::new()
        .with("NODE_ENV", "production")
        .with("NEXT_PUBLIC_APP_URL", "https://writingcoach.test")
        .with("DATABASE_URL", "postgres://user:pass@db/writingcoach")
        .with("NEXTAUTH_URL", "https://writingcoach.test")
        .with("NEXTAUTH_SECRET", "a".repeat(64))
        .with("OPENAI_API_KEY", "sk-bench")
        .with("STRIPE_SECRET_KEY", "sk_live_bench")
        .with("STRIPE_PUBLISHABLE_KEY", "pk_live_bench")
        .with("SENTRY_DSN", "https://key@sentry.test/1")
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    group.bench_function("validate_valid", |b| {
        let raw = production_env();
        b.iter(|| validate_environment(black_box(&raw)))
    });

    group.bench_function("validate_invalid", |b| {
        let raw = RawEnvironment::new().with("NODE_ENV", "staging");
        b.iter(|| validate_environment(black_box(&raw)))
    });

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    group.bench_function("initialize", |b| {
        let raw = production_env();
        b.iter(|| initialize(black_box(&raw)))
    });

    group.bench_function("resolve_active_profile", |b| {
        b.iter(|| resolve_active_profile(black_box("production")))
    });

    group.bench_function("exam_scoring_lookup", |b| {
        b.iter(|| get_exam_scoring_config(black_box("telc_c1_hochschule")))
    });

    group.finish();
}

criterion_group!(benches, bench_validation, bench_resolution);
criterion_main!(benches);
