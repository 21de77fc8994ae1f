//! Net-hours attendance reconciliation engine.
//!
//! This crate reconciles an employee's attendance punches for a payroll period
//! against the active workplace rules (a flexible start window, tiered
//! lateness penalties, a monthly permission allowance, approved leave and
//! remote-work contribution) and produces an auditable net-hours figure.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
