//! Scoring engine for bullseye pistol matches.
//!
//! Pure functions over already-loaded matches and score records:
//! stage layout lookup, entry totals, subtotals, best-N aggregates and
//! historical averages.

pub mod aggregate;
pub mod average;
pub mod catalog;
pub mod classify;
pub mod normalize;
pub mod subtotal;

pub use aggregate::{AggregateResult, aggregates, aggregates_by_shooter, qualifying_base_scores};
pub use average::{AverageBucket, ShooterAverages, Tally, averages, round2};
pub use catalog::{
    AggregateField, AggregateRule, MatchConfig, SubtotalGroup, aggregate_rule, blank_stages,
    resolve,
};
pub use classify::{StageFamily, classify_stage, is_nmc_instance};
pub use normalize::{Totals, normalize, renormalize};
pub use subtotal::{StageSum, subtotals};
