//! Single test binary entry point.
//!
//! Structure:
//! - integration: gestures and commands driven through `PlanController`
//! - unit: properties of the geometry helpers checked with proptest

#![allow(clippy::unwrap_used)]

mod helpers;
mod integration;
mod unit;
