/// Engine module
///
/// The three consistency engines at the core of the portal. Each operation
/// is invoked per request with an explicit store handle, runs to completion
/// with no shared in-process mutable state, and leans on the repo layer's
/// atomic primitives for correctness under concurrency:
///
/// - `progression`: the one-way module/lesson unlock state machine
/// - `ledger`: streak continuity and XP accounting, once per calendar day
/// - `eligibility`: the CourseGroup materialized view and its sync triggers

pub mod eligibility;
pub mod ledger;
pub mod progression;
