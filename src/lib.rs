#![allow(clippy::cognitive_complexity, clippy::cast_precision_loss)]
#![deny(clippy::unwrap_in_result, clippy::unwrap_used, clippy::expect_used)]
#![warn(
    rust_2018_idioms,
    rust_2021_compatibility,
    arithmetic_overflow,
    nonstandard_style,
    clippy::disallowed_types,
    clippy::nursery,
    // clippy::pedantic
)]
//! Weighted air route network with shortest path routing.
//!
//! [`WeightedGraph`] stores airports (or any other [`Vertex`]) and the
//! weighted links between them and answers minimum total weight route
//! queries. [`Router`] wraps a graph that is shared between callers.

pub mod common;
pub mod data_loader;
pub mod event;
pub mod graph;
pub mod route;

pub use common::{AirnavError, AirnavResult, Airport, Vertex, Weight};
pub use graph::WeightedGraph;
pub use route::{Route, Router};
