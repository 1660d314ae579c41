//! Aggregation of filtered record sets into dashboard tables.
//!
//! This module groups, resamples and correlates the rows of a filtered
//! view, bins temperatures into bands, and bundles the results for the
//! presentation layer.

pub mod aggregate;
pub mod analyzer;
pub mod temperature;
pub mod types;
pub mod utility;
