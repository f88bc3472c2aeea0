use std::collections::hash_map::Entry;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::*;

use super::SearchProgress;
use crate::{
    common::{AirnavError, AirnavResult, MinHeap, Vertex, Weight},
    graph::WeightedGraph,
    route::Route,
};

/// Best known way to reach a vertex, the source has no predecessor
#[derive(Debug)]
struct SearchRecord<'g, V> {
    distance: Weight,
    predecessor: Option<&'g V>,
}

impl<V: Vertex> WeightedGraph<V> {
    /// Minimum total weight route from `src` to `dst`.
    ///
    /// Which of several equally short routes is returned is unspecified.
    pub fn route(&self, src: &V, dst: &V) -> AirnavResult<Route<V>> {
        self.route_dijkstra(src, dst, |_| Ok(()))
    }

    /// Dijkstra search with lazy deletion: every improvement pushes a new
    /// queue entry and entries of already finalized vertices are skipped.
    ///
    /// `on_extract` runs once for every vertex taken from the queue, an error
    /// returned from it aborts the search.
    pub(crate) fn route_dijkstra<F>(
        &self,
        src: &V,
        dst: &V,
        mut on_extract: F,
    ) -> AirnavResult<Route<V>>
    where
        F: FnMut(&SearchProgress<'_, V>) -> AirnavResult<()>,
    {
        let start = self.resolve(src)?;
        let goal = self.resolve(dst)?;
        if start == goal {
            return Ok(Route { hops: vec![start.clone()], distance: 0 });
        }
        let mut records: FxHashMap<&V, SearchRecord<'_, V>> =
            FxHashMap::default();
        let mut finalized: FxHashSet<&V> = FxHashSet::default();
        let mut queue: MinHeap<Weight, &V> = MinHeap::new();
        records.insert(start, SearchRecord { distance: 0, predecessor: None });
        queue.push(0, start);
        let mut goal_distance = None;
        while let Some((distance, node)) = queue.pop() {
            if !finalized.insert(node) {
                continue;
            }
            on_extract(&SearchProgress {
                vertex: node,
                distance,
                queue_size: queue.len(),
                n_finalized: finalized.len(),
                n_seen: records.len(),
            })?;
            if node == goal {
                goal_distance = Some(distance);
                break;
            }
            for (nb, &weight) in self.edges(node)? {
                if finalized.contains(nb) {
                    continue;
                }
                let candidate = distance.saturating_add(weight);
                let record =
                    SearchRecord { distance: candidate, predecessor: Some(node) };
                match records.entry(nb) {
                    Entry::Vacant(entry) => {
                        entry.insert(record);
                    }
                    Entry::Occupied(mut entry) => {
                        if candidate >= entry.get().distance {
                            continue;
                        }
                        entry.insert(record);
                    }
                }
                queue.push(candidate, nb);
            }
        }
        let Some(distance) = goal_distance else {
            debug!(
                "Search space exhausted after {} vertices",
                finalized.len()
            );
            return Err(AirnavError::NoPathFound {
                from: src.to_string(),
                to: dst.to_string(),
            });
        };
        let mut hops = vec![goal.clone()];
        let mut current = goal;
        while let Some(prev) =
            records.get(current).and_then(|record| record.predecessor)
        {
            hops.push(prev.clone());
            current = prev;
        }
        hops.reverse();
        debug!(
            "Found route {src} -> {dst} with {} hops (weight {distance}), {} vertices finalized",
            hops.len(),
            finalized.len()
        );
        Ok(Route { hops, distance })
    }
}
