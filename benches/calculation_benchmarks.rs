//! Performance benchmarks for the net-hours engine.
//!
//! This benchmark suite tracks the calculation cost at payroll scale:
//! - Single employee, one day: < 50μs mean
//! - Single employee, one month: < 1ms mean
//! - Batch of 100 employees over a month: < 100ms mean
//! - Batch of 1000 employees over a month: < 1s mean
//! - HTTP round trip for one employee over a week
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use net_hours_engine::api::{AppState, create_router};
use net_hours_engine::calculation::{BatchOptions, calculate_net_hours, run_batch};
use net_hours_engine::config::{ConfigLoader, RuleSet};
use net_hours_engine::models::{
    AttendanceEvent, EmployeeInputs, EventKind, LeaveRecord, LeaveStatus, PayPeriod, WfhRecord,
};
use net_hours_engine::store::InMemoryStore;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn load_rules() -> RuleSet {
    ConfigLoader::load("./config/default")
        .expect("Failed to load config")
        .into_rules()
}

fn make_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

fn at(date: NaiveDate, time_str: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time_str), "%Y-%m-%d %H:%M")
        .unwrap()
}

/// January 2026.
fn month_period() -> PayPeriod {
    PayPeriod::new(make_date("2026-01-01"), make_date("2026-01-31"))
}

/// Varies the arrival time so every lateness tier is exercised.
fn arrival_for(index: usize) -> &'static str {
    const ARRIVALS: [&str; 5] = ["09:00", "09:25", "09:45", "10:15", "11:10"];
    ARRIVALS[index % ARRIVALS.len()]
}

fn punches(employee_id: &str, date: NaiveDate, arrival: &str) -> [AttendanceEvent; 2] {
    [
        AttendanceEvent {
            employee_id: employee_id.to_string(),
            timestamp: at(date, arrival),
            kind: EventKind::SignIn,
        },
        AttendanceEvent {
            employee_id: employee_id.to_string(),
            timestamp: at(date, "17:30"),
            kind: EventKind::SignOut,
        },
    ]
}

fn weekdays(period: &PayPeriod) -> impl Iterator<Item = NaiveDate> + '_ {
    period
        .dates()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
}

/// Builds a month of weekday attendance with one leave day and Friday remote work.
fn create_month_inputs(employee_id: &str) -> EmployeeInputs {
    let period = month_period();
    let mut inputs = EmployeeInputs::new(employee_id, period.clone());

    for (i, date) in weekdays(&period).enumerate() {
        if date.weekday() == Weekday::Fri {
            inputs.wfh_dates.insert(date);
            continue;
        }
        inputs.events.extend(punches(employee_id, date, arrival_for(i)));
    }
    inputs.leaves.push(LeaveRecord {
        employee_id: employee_id.to_string(),
        start_date: make_date("2026-01-14"),
        end_date: make_date("2026-01-14"),
        status: LeaveStatus::Approved,
        policy: "annual".to_string(),
    });
    inputs.permission_override_minutes = 15;
    inputs
}

/// Fills a store with a month of records for `count` employees.
fn create_store(count: usize) -> (InMemoryStore, Vec<String>) {
    let period = month_period();
    let mut store = InMemoryStore::new();
    let mut ids = Vec::with_capacity(count);

    for n in 0..count {
        let employee_id = format!("emp_batch_{:04}", n);
        for (i, date) in weekdays(&period).enumerate() {
            if n % 4 == 0 && date.weekday() == Weekday::Fri {
                store.add_wfh(WfhRecord {
                    employee_id: employee_id.clone(),
                    date,
                });
                continue;
            }
            for event in punches(&employee_id, date, arrival_for(i + n)) {
                store.record_event(event);
            }
        }
        if n % 5 == 0 {
            store.add_leave(LeaveRecord {
                employee_id: employee_id.clone(),
                start_date: make_date("2026-01-19"),
                end_date: make_date("2026-01-21"),
                status: LeaveStatus::Approved,
                policy: "annual".to_string(),
            });
        }
        ids.push(employee_id);
    }
    (store, ids)
}

/// Benchmark: Single employee over a single day.
///
/// Target: < 50μs mean
fn bench_single_day(c: &mut Criterion) {
    let rules = load_rules();
    let date = make_date("2026-01-15");
    let mut inputs = EmployeeInputs::new("emp_bench_001", PayPeriod::new(date, date));
    inputs.events.extend(punches("emp_bench_001", date, "09:45"));

    c.bench_function("single_day", |b| {
        b.iter(|| black_box(calculate_net_hours(black_box(&inputs), &rules)))
    });
}

/// Benchmark: Single employee over a calendar month.
///
/// Target: < 1ms mean
fn bench_single_month(c: &mut Criterion) {
    let rules = load_rules();
    let inputs = create_month_inputs("emp_bench_001");

    c.bench_function("single_month", |b| {
        b.iter(|| black_box(calculate_net_hours(black_box(&inputs), &rules)))
    });
}

/// Benchmark: Batch runs over a month at payroll scale.
///
/// Target: < 100ms mean for 100 employees, < 1s mean for 1000
fn bench_batch(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let rules = Arc::new(load_rules());

    let mut group = c.benchmark_group("batch_processing");
    // Reduce sample size for large batches to keep benchmark time reasonable
    group.sample_size(10);

    for count in [100usize, 1000] {
        let (store, ids) = create_store(count);
        let store = Arc::new(store);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("employees", count), &count, |b, _| {
            b.to_async(&rt).iter(|| async {
                let report = run_batch(
                    Arc::clone(&store),
                    Arc::clone(&rules),
                    ids.clone(),
                    month_period(),
                    BatchOptions::default(),
                )
                .await;
                black_box(report)
            })
        });
    }

    group.finish();
}

/// Benchmark: Period length scaling for one employee.
fn bench_scaling(c: &mut Criterion) {
    let rules = load_rules();
    let mut group = c.benchmark_group("scaling");

    for days in [1i64, 7, 14, 31].iter() {
        let start = make_date("2026-01-01");
        let end = start + chrono::Duration::days(days - 1);
        let period = PayPeriod::new(start, end);
        let mut inputs = EmployeeInputs::new("emp_bench_001", period.clone());
        for (i, date) in period.dates().enumerate() {
            inputs.events.extend(punches("emp_bench_001", date, arrival_for(i)));
        }

        group.throughput(Throughput::Elements(*days as u64));
        group.bench_with_input(BenchmarkId::new("days", days), days, |b, _| {
            b.iter(|| black_box(calculate_net_hours(&inputs, &rules)))
        });
    }

    group.finish();
}

/// Benchmark: HTTP round trip for one employee over a week.
fn bench_http_request(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(AppState::new(load_rules()));

    let events: Vec<serde_json::Value> = (12..=16)
        .flat_map(|day| {
            let date = format!("2026-01-{}", day);
            [
                serde_json::json!({ "timestamp": format!("{}T09:40:00", date), "kind": "sign_in" }),
                serde_json::json!({ "timestamp": format!("{}T17:30:00", date), "kind": "sign_out" }),
            ]
        })
        .collect();
    let body = serde_json::json!({
        "employee": { "id": "emp_bench_001", "events": events },
        "pay_period": { "start_date": "2026-01-12", "end_date": "2026-01-16" }
    })
    .to_string();

    c.bench_function("http_week", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/net-hours")
                        .header("Content-Type", "application/json")
                        .body(Body::from(body.clone()))
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_single_day,
    bench_single_month,
    bench_batch,
    bench_scaling,
    bench_http_request,
);
criterion_main!(benches);
