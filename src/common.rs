//! # Common utlility types
use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    fmt::Display,
    hash::Hash,
    str::FromStr,
};

use color_eyre::eyre;
use num_format::ToFormattedString;
use parse_display::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;
#[cfg(feature = "bin")]
use {
    human_repr::HumanDuration,
    std::time::Instant,
    tracing_subscriber::fmt::{format::Writer, time::FormatTime},
};

/// Edge weight and accumulated route length
pub type Weight = i64;

/// Identity of a node in the network.
///
/// Only equality and a stable hash are used for lookups, `Display` is used
/// when a vertex ends up in an error message.
pub trait Vertex: Clone + Eq + Hash + Display {}

impl<T: Clone + Eq + Hash + Display> Vertex for T {}

pub trait FormatNum {
    fn format_num(&self) -> String;
}

impl<N: ToFormattedString> FormatNum for N {
    fn format_num(&self) -> String {
        use num_format::{Locale, SystemLocale};
        let locale = SystemLocale::default()
            .and_then(|l| l.name().parse())
            .unwrap_or(Locale::en);
        self.to_formatted_string(&locale)
    }
}

#[cfg(feature = "bin")]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RelativeTime {
    epoch: Instant,
}

#[cfg(feature = "bin")]
impl Default for RelativeTime {
    fn default() -> Self {
        Self { epoch: Instant::now() }
    }
}

#[cfg(feature = "bin")]
impl FormatTime for RelativeTime {
    fn format_time(&self, w: &mut Writer<'_>) -> core::fmt::Result {
        let duration = format!("{}", self.epoch.elapsed().human_duration());
        write!(w, "{}", duration)
    }
}

struct HeapEntry<K, T> {
    key: K,
    item: T,
}

impl<K: Ord, T> PartialEq for HeapEntry<K, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Ord, T> Eq for HeapEntry<K, T> {}

impl<K: Ord, T> PartialOrd for HeapEntry<K, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, T> Ord for HeapEntry<K, T> {
    // reversed, `BinaryHeap` is a max-heap
    fn cmp(&self, other: &Self) -> Ordering {
        other.key.cmp(&self.key)
    }
}

/// Min-heap priority queue, only the priority takes part in the ordering so
/// items don't need to implement `Ord`
pub struct MinHeap<K: Ord, T>(BinaryHeap<HeapEntry<K, T>>);

impl<K: Ord, T> MinHeap<K, T> {
    /// Create new, empty priority queue
    pub const fn new() -> Self {
        Self(BinaryHeap::new())
    }

    /// push value `item` with priority `key` into queue
    pub fn push(&mut self, key: K, item: T) {
        self.0.push(HeapEntry { key, item });
    }

    /// Remove and return smallest item and priority
    pub fn pop(&mut self) -> Option<(K, T)> {
        self.0.pop().map(|HeapEntry { key, item }| (key, item))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Ord, T> Default for MinHeap<K, T> {
    fn default() -> Self {
        Self(BinaryHeap::new())
    }
}

impl<K: Ord, T> Extend<(K, T)> for MinHeap<K, T> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        self.0.extend(
            iter.into_iter().map(|(key, item)| HeapEntry { key, item }),
        )
    }
}

/// airnav error type
#[derive(Error, Debug)]
pub enum AirnavError {
    #[error("vertex {0} not found")]
    VertexNotFound(String),

    #[error("no edge from {from} to {to}")]
    EdgeNotFound { from: String, to: String },

    #[error("invalid edge weight {0}, weights must not be negative")]
    InvalidWeight(Weight),

    #[error(
        "only {from} -> {to} exists, can't reweight both directions without {to} -> {from}"
    )]
    AsymmetricEdge { from: String, to: String },

    #[error("no path from {from} to {to}")]
    NoPathFound { from: String, to: String },

    #[error("route computation interrupted")]
    Interrupted,

    #[error("invalid airport code {0:?}")]
    InvalidAirport(String),

    #[error("{0}")]
    RuntimeError(String),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    #[error("{0:#}")]
    Other(#[from] eyre::Report),
}

impl AirnavError {
    pub(crate) fn vertex_not_found(v: &impl Vertex) -> Self {
        Self::VertexNotFound(v.to_string())
    }

    pub(crate) fn edge_not_found(from: &impl Vertex, to: &impl Vertex) -> Self {
        Self::EdgeNotFound { from: from.to_string(), to: to.to_string() }
    }
}

impl std::convert::From<String> for AirnavError {
    fn from(s: String) -> Self {
        Self::RuntimeError(s)
    }
}

pub type AirnavResult<T> = Result<T, AirnavError>;

/// Airport identified by its (IATA or ICAO) code
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    Serialize,
    Deserialize,
)]
#[display("{0}")]
#[serde(try_from = "String", into = "String")]
pub struct Airport(String);

impl Airport {
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl FromStr for Airport {
    type Err = AirnavError;

    fn from_str(code: &str) -> AirnavResult<Self> {
        let trimmed = code.trim();
        if trimmed.is_empty()
            || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(AirnavError::InvalidAirport(code.to_owned()));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Airport {
    type Error = AirnavError;

    fn try_from(code: String) -> AirnavResult<Self> {
        code.parse()
    }
}

impl From<Airport> for String {
    fn from(airport: Airport) -> Self {
        airport.0
    }
}
