//! Greedy slot assignment, conflict checks, materialization and summaries.
//!
//! # Algorithm
//!
//! `SlotScheduler` walks participants in input order and books the first
//! of their ranked choices that is free in every week it recurs in. It is
//! not optimal; it is predictable: earlier participants win contested slots.
//!
//! # Materialization
//!
//! `materialize` turns an accepted assignment into a single-occurrence
//! booking for one week; `materialize_series` does so for every week the
//! slot recurs in.
//!
//! # Summary
//!
//! `ReportSummary` counts placements per rank, rejections, and participants
//! needing attention.

pub mod conflict;
mod engine;
mod materialize;
mod summary;

pub use engine::{AssignmentRequest, SlotScheduler};
pub use materialize::{materialize, materialize_series, occurrence_in_week, MaterializedEntry};
pub use summary::ReportSummary;
