use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use slot_engine::{available_slots, Appointment, ClockTime, SlotMode, SlotParams};

fn busy_day() -> Vec<Appointment> {
    let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
    // A booking every 45 minutes from 08:00, some 20 minutes long, some 40.
    (0..20)
        .map(|i| {
            let start = 8 * 60 + i * 45;
            let len = if i % 2 == 0 { 20 } else { 40 };
            Appointment::new(
                i64::from(i),
                date,
                ClockTime::from_minutes(start).unwrap(),
                ClockTime::from_minutes(start + len).unwrap(),
            )
            .unwrap()
        })
        .collect()
}

fn bench_slots(c: &mut Criterion) {
    let appointments = busy_day();
    let start = ClockTime::from_hour(8).unwrap();
    let end = ClockTime::from_hour(20).unwrap();

    for (name, mode) in [("discretized", SlotMode::Discretized), ("exact", SlotMode::Exact)] {
        let params = SlotParams {
            mode,
            ..SlotParams::with_duration(30)
        };
        c.bench_function(&format!("slots_{name}_busy_day"), |b| {
            b.iter(|| available_slots(black_box(&appointments), start, end, &params))
        });
    }
}

criterion_group!(benches, bench_slots);
criterion_main!(benches);
