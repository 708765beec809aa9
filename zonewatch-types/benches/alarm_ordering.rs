use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use zonewatch_types::{Alarm, AlarmLevel, Bounds, Zone};

fn zone_with(n: usize) -> Zone {
    let alarms = (0..n).map(|i| {
        let level = if i % 3 == 0 { AlarmLevel::Critical } else { AlarmLevel::Warning };
        Alarm::new(format!("Device {} is missing on bus 'slcan0'", n - i), level).with_active(i % 4 == 0)
    });
    Zone::builder("helms-deep", "box")
        .temperature(21.0, Bounds::new(15.0, 25.0))
        .humidity(60.0, Bounds::new(40.0, 75.0))
        .alarms(alarms)
        .build()
}

/// Benchmark display sorting for growing alarm sets
fn bench_sorted_alarms(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorted_alarms");
    for n in [8usize, 64, 512].iter() {
        let zone = zone_with(*n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &zone, |b, zone| {
            b.iter(|| black_box(zone.sorted_alarms()));
        });
    }
    group.finish();
}

/// Benchmark the aggregate alarm status scan
fn bench_alarm_status(c: &mut Criterion) {
    let zone = zone_with(64);
    c.bench_function("alarm_status", |b| {
        b.iter(|| black_box(zone.alarm_status()));
    });
}

criterion_group!(benches, bench_sorted_alarms, bench_alarm_status);
criterion_main!(benches);
