//! Visitor data aggregation and trend smoothing.
//!
//! This module groups parsed visitor records into time buckets, splits
//! monthly totals by visitor type, computes trailing moving averages, and
//! assembles everything into a single [`types::Dashboard`].

pub mod aggregate;
pub mod analyzer;
pub mod bucket;
pub mod predict;
pub mod types;
pub mod utility;
