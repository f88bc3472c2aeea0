//! Route computation and the [`Router`] guarding a shared network
use std::{
    fmt::Display,
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

use human_repr::HumanDuration;
use itertools::Itertools;
use parking_lot::{RwLock, RwLockReadGuard};
use serde::{Deserialize, Serialize};
use tracing::*;

use crate::{
    common::{AirnavError, AirnavResult, Vertex, Weight},
    event::{Callback, Event, RouteState},
    graph::WeightedGraph,
};

mod algorithms;

/// Computed route, `hops` starts at the source and ends at the destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route<V> {
    pub hops: Vec<V>,
    pub distance: Weight,
}

impl<V> Route<V> {
    /// Number of vertices on the route (including both endpoints)
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn source(&self) -> Option<&V> {
        self.hops.first()
    }

    pub fn destination(&self) -> Option<&V> {
        self.hops.last()
    }
}

impl<V: Display> Display for Route<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.hops.iter().join(" -> "), self.distance)
    }
}

/// Owner of a network shared between callers.
///
/// Mutations take the write lock, route queries share the read lock, so
/// queries run in parallel but never while the network is being changed.
///
/// Callbacks run while the query holds the read lock. `parking_lot` read
/// locks are not recursive, so a callback must not call
/// [`Router::graph`] or any of the mutating methods: both block as soon as a
/// writer is waiting and the query never finishes. [`Router::interrupt`] is
/// lock free and safe to call from anywhere.
pub struct Router<V> {
    graph: RwLock<WeightedGraph<V>>,
    /// Number of [`Router::interrupt`] calls so far
    interrupts: AtomicUsize,
    pub callback: Option<Callback<V>>,
    pub status_interval: Duration,
}

impl<V: Vertex> std::fmt::Debug for Router<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let graph = self.graph.read();
        let graph = format!(
            "<Network with {} vertices and {} edges>",
            graph.vertex_count(),
            graph.edge_count()
        );
        let callback = &self.callback.as_ref().map(|_| "<Callback>");
        f.debug_struct("Router")
            .field("graph", &graph)
            .field("interrupts", &self.interrupts)
            .field("callback", callback)
            .field("status_interval", &self.status_interval)
            .finish()
    }
}

impl<V: Vertex> Default for Router<V> {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

impl<V: Vertex> Router<V> {
    pub fn new(status_interval: Duration) -> Self {
        Self::from_graph(WeightedGraph::new(), status_interval)
    }

    pub fn from_graph(
        graph: WeightedGraph<V>,
        status_interval: Duration,
    ) -> Self {
        Self {
            graph: RwLock::new(graph),
            interrupts: AtomicUsize::new(0),
            callback: None,
            status_interval,
        }
    }

    pub fn set_callback(&mut self, callback: Callback<V>) {
        self.callback = Some(callback);
    }

    /// Read access to the network, blocks while a mutation is in progress
    pub fn graph(&self) -> RwLockReadGuard<'_, WeightedGraph<V>> {
        self.graph.read()
    }

    pub fn into_inner(self) -> WeightedGraph<V> {
        self.graph.into_inner()
    }

    pub fn add_vertex(&self, vertex: V) -> bool {
        self.graph.write().add_vertex(vertex)
    }

    pub fn remove_vertex(&self, vertex: &V) -> bool {
        self.graph.write().remove_vertex(vertex)
    }

    pub fn add_edge(
        &self,
        from: V,
        to: V,
        weight: Weight,
        directional: bool,
    ) -> AirnavResult<()> {
        self.graph.write().add_edge(from, to, weight, directional)
    }

    pub fn remove_edge(
        &self,
        from: &V,
        to: &V,
        directional: bool,
    ) -> AirnavResult<()> {
        self.graph.write().remove_edge(from, to, directional)
    }

    pub fn alter_weight(
        &self,
        a: &V,
        b: &V,
        weight: Weight,
    ) -> AirnavResult<()> {
        self.graph.write().alter_weight(a, b, weight)
    }

    /// Stop every [`Router::compute_route`] that is running right now at its
    /// next step. Queries started afterwards are not affected.
    pub fn interrupt(&self) {
        self.interrupts.fetch_add(1, Ordering::SeqCst);
    }

    fn interrupted_since(&self, epoch: usize) -> bool {
        self.interrupts.load(Ordering::SeqCst) != epoch
    }

    pub(crate) fn emit(&self, event: &Event) -> AirnavResult<()> {
        if let Some(cb) = &self.callback {
            cb(self, event)?;
        }
        Ok(())
    }

    /// Compute the cheapest route from `src` to `dst`, returns the time
    /// taken together with the route.
    ///
    /// Progress is reported to the callback at most once per
    /// `status_interval` and a summary message is sent once the route is
    /// found. Interrupts are checked for every vertex the search finalizes.
    pub fn compute_route(
        &self,
        src: &V,
        dst: &V,
    ) -> AirnavResult<(Duration, Route<V>)> {
        let epoch = self.interrupts.load(Ordering::SeqCst);
        let graph = self.graph.read();
        let total = graph.vertex_count() as f32;
        let (from, to) = (src.to_string(), dst.to_string());
        let t_start = Instant::now();
        let mut t_last = Instant::now();
        let res = graph.route_dijkstra(src, dst, |progress| {
            if self.interrupted_since(epoch) {
                return Err(AirnavError::Interrupted);
            }
            if t_last.elapsed() < self.status_interval {
                return Ok(());
            }
            t_last = Instant::now();
            let state = RouteState {
                from: from.clone(),
                to: to.clone(),
                vertex: progress.vertex.to_string(),
                distance: progress.distance,
                queue_size: progress.queue_size,
                n_finalized: progress.n_finalized,
                n_seen: progress.n_seen,
                prc_finalized: (progress.n_finalized as f32 * 100.0) / total,
                rate: (progress.n_finalized as f64)
                    / t_start.elapsed().as_secs_f64(),
            };
            self.emit(&Event::SearchState(state))?;
            if self.interrupted_since(epoch) {
                return Err(AirnavError::Interrupted);
            }
            Ok(())
        });
        let dt = t_start.elapsed();
        match &res {
            Ok(route) => debug!(
                "Route {from} -> {to} computed in {}: {route}",
                dt.human_duration()
            ),
            Err(AirnavError::Interrupted) => warn!(
                "Route {from} -> {to} interrupted after {}",
                dt.human_duration()
            ),
            Err(e) => debug!("Route {from} -> {to} failed: {e}"),
        }
        let route = res?;
        self.emit(&Event::Message(format!(
            "Found route {from} -> {to} with {} hops and total weight {} in {}",
            route.len().saturating_sub(1),
            route.distance,
            dt.human_duration()
        )))?;
        Ok((dt, route))
    }
}
