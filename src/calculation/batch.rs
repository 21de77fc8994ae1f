//! Payroll batch runner.
//!
//! Fans the single-employee calculation out across a bounded pool of
//! blocking tasks. Every employee's calculation is independent, so a failure
//! or timeout for one is reported in its slot of the [`BatchReport`] and the
//! others carry on.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::RuleSet;
use crate::error::{EngineError, EngineResult};
use crate::models::{NetHoursCalculation, PayPeriod};
use crate::store::EmployeeDataSource;

use super::net_hours::calculate_for_employee;

/// Default number of calculations run at once.
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

/// Default per-employee time limit.
pub const DEFAULT_EMPLOYEE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tuning for [`run_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Upper bound on concurrently running calculations; 0 is treated as 1.
    pub max_concurrency: usize,
    /// Time limit for one employee's read and calculation.
    pub per_employee_timeout: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_BATCH_CONCURRENCY,
            per_employee_timeout: Some(DEFAULT_EMPLOYEE_TIMEOUT),
        }
    }
}

/// The outcome for one employee of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmployeeOutcome {
    /// The calculation finished.
    Completed {
        /// The calculation result.
        calculation: NetHoursCalculation,
    },
    /// The read or calculation failed, panicked or timed out.
    Failed {
        /// The employee whose calculation failed.
        employee_id: String,
        /// What went wrong.
        error: String,
    },
}

impl EmployeeOutcome {
    fn failed(employee_id: impl Into<String>, error: impl std::fmt::Display) -> Self {
        EmployeeOutcome::Failed {
            employee_id: employee_id.into(),
            error: error.to_string(),
        }
    }

    /// The employee this outcome belongs to.
    pub fn employee_id(&self) -> &str {
        match self {
            EmployeeOutcome::Completed { calculation } => &calculation.employee_id,
            EmployeeOutcome::Failed { employee_id, .. } => employee_id,
        }
    }

    /// Whether the calculation finished.
    pub fn is_completed(&self) -> bool {
        matches!(self, EmployeeOutcome::Completed { .. })
    }
}

/// The merged results of a batch, in the order employees were submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// The evaluated period.
    pub period: PayPeriod,
    /// One outcome per submitted employee.
    pub results: Vec<EmployeeOutcome>,
    /// Number of completed calculations.
    pub succeeded: usize,
    /// Number of failed calculations.
    pub failed: usize,
}

impl BatchReport {
    fn from_outcomes(period: PayPeriod, results: Vec<EmployeeOutcome>) -> Self {
        let succeeded = results.iter().filter(|r| r.is_completed()).count();
        Self {
            period,
            failed: results.len() - succeeded,
            succeeded,
            results,
        }
    }
}

/// Reads one employee's inputs and calculates net hours on the blocking pool.
///
/// A `permit` moves into the blocking task and is released only when the
/// work itself ends, so work abandoned by the time limit still counts
/// against the caller's concurrency bound. A timeout or a panic in the
/// calculation is reported as [`EngineError::CalculationError`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use net_hours_engine::calculation::calculate_blocking;
/// use net_hours_engine::config::RuleSet;
/// use net_hours_engine::models::PayPeriod;
/// use net_hours_engine::store::InMemoryStore;
/// use chrono::NaiveDate;
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let calculation = runtime
///     .block_on(calculate_blocking(
///         Arc::new(InMemoryStore::new()),
///         Arc::new(RuleSet::default()),
///         "emp_001".to_string(),
///         Arc::new(PayPeriod::new(date, date)),
///         Some(Duration::from_secs(1)),
///         None,
///     ))
///     .unwrap();
/// assert!(calculation.days[0].day_hours.is_zero());
/// ```
pub async fn calculate_blocking<S>(
    source: Arc<S>,
    rules: Arc<RuleSet>,
    employee_id: String,
    period: Arc<PayPeriod>,
    time_limit: Option<Duration>,
    permit: Option<OwnedSemaphorePermit>,
) -> EngineResult<NetHoursCalculation>
where
    S: EmployeeDataSource + Send + Sync + 'static + ?Sized,
{
    let task = tokio::task::spawn_blocking({
        let employee_id = employee_id.clone();
        move || {
            let _permit = permit;
            calculate_for_employee(source.as_ref(), &rules, &employee_id, &period)
        }
    });

    let joined = match time_limit {
        Some(limit) => match tokio::time::timeout(limit, task).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(employee_id = %employee_id, limit_ms = limit.as_millis() as u64, "Calculation timed out");
                return Err(EngineError::CalculationError {
                    message: format!("timed out after {} ms", limit.as_millis()),
                });
            }
        },
        None => task.await,
    };

    joined.unwrap_or_else(|e| {
        warn!(employee_id = %employee_id, error = %e, "Calculation task panicked");
        Err(EngineError::CalculationError {
            message: format!("calculation task panicked: {}", e),
        })
    })
}

async fn evaluate_employee<S>(
    source: Arc<S>,
    rules: Arc<RuleSet>,
    period: Arc<PayPeriod>,
    employee_id: String,
    time_limit: Option<Duration>,
    permit: OwnedSemaphorePermit,
) -> EmployeeOutcome
where
    S: EmployeeDataSource + Send + Sync + 'static + ?Sized,
{
    let result = calculate_blocking(
        source,
        rules,
        employee_id.clone(),
        period,
        time_limit,
        Some(permit),
    )
    .await;

    match result {
        Ok(calculation) => EmployeeOutcome::Completed { calculation },
        Err(e) => {
            warn!(employee_id = %employee_id, error = %e, "Calculation failed");
            EmployeeOutcome::failed(employee_id, e)
        }
    }
}

/// Calculates net hours for every employee over the same period.
///
/// At most `options.max_concurrency` calculations run at once, counting
/// calculations that outlived their time limit until they finish. Results are
/// returned in submission order whatever order they finish in, and a failure
/// for one employee never affects another.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use net_hours_engine::calculation::{BatchOptions, run_batch};
/// use net_hours_engine::config::RuleSet;
/// use net_hours_engine::models::PayPeriod;
/// use net_hours_engine::store::InMemoryStore;
/// use chrono::NaiveDate;
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let report = runtime.block_on(run_batch(
///     Arc::new(InMemoryStore::new()),
///     Arc::new(RuleSet::default()),
///     vec!["emp_001".to_string(), "emp_002".to_string()],
///     PayPeriod::new(date, date),
///     BatchOptions::default(),
/// ));
/// assert_eq!(report.succeeded, 2);
/// ```
pub async fn run_batch<S>(
    source: Arc<S>,
    rules: Arc<RuleSet>,
    employee_ids: Vec<String>,
    period: PayPeriod,
    options: BatchOptions,
) -> BatchReport
where
    S: EmployeeDataSource + Send + Sync + 'static + ?Sized,
{
    let permits = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
    let shared_period = Arc::new(period.clone());
    let mut tasks = JoinSet::new();

    info!(
        employees = employee_ids.len(),
        max_concurrency = options.max_concurrency.max(1),
        start_date = %period.start_date,
        end_date = %period.end_date,
        "Starting batch"
    );

    for (index, employee_id) in employee_ids.iter().cloned().enumerate() {
        let source = Arc::clone(&source);
        let rules = Arc::clone(&rules);
        let period = Arc::clone(&shared_period);
        let permits = Arc::clone(&permits);
        let time_limit = options.per_employee_timeout;

        tasks.spawn(async move {
            let outcome = match permits.acquire_owned().await {
                Ok(permit) => {
                    evaluate_employee(source, rules, period, employee_id, time_limit, permit)
                        .await
                }
                Err(e) => EmployeeOutcome::failed(employee_id, e),
            };
            (index, outcome)
        });
    }

    let mut slots: Vec<Option<EmployeeOutcome>> = vec![None; employee_ids.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => slots[index] = Some(outcome),
            Err(e) => warn!(error = %e, "Batch task aborted"),
        }
    }

    let results: Vec<EmployeeOutcome> = slots
        .into_iter()
        .zip(employee_ids)
        .map(|(slot, employee_id)| {
            slot.unwrap_or_else(|| EmployeeOutcome::failed(employee_id, "batch task aborted"))
        })
        .collect();

    let report = BatchReport::from_outcomes(period, results);
    info!(
        succeeded = report.succeeded,
        failed = report.failed,
        "Batch finished"
    );
    report
}
