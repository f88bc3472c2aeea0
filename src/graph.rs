//! Adjacency map graph of weighted, optionally one-directional links
use rustc_hash::FxHashMap;
use tracing::*;

use crate::common::{AirnavError, AirnavResult, Vertex, Weight};

/// Weighted graph stored as `vertex -> (neighbour -> weight)`.
///
/// Every vertex referenced by an edge is a key of the outer map, vertices
/// without outgoing edges map to an empty inner map. Bidirectional edges are
/// stored as two mirrored entries and can't be told apart from two
/// one-directional edges with the same weight.
#[derive(Debug, Clone)]
pub struct WeightedGraph<V> {
    adj: FxHashMap<V, FxHashMap<V, Weight>>,
}

impl<V> Default for WeightedGraph<V> {
    fn default() -> Self {
        Self { adj: FxHashMap::default() }
    }
}

impl<V: Vertex> WeightedGraph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `vertex` without any edges, returns `false` if it already existed
    /// (existing edges are kept)
    pub fn add_vertex(&mut self, vertex: V) -> bool {
        if self.adj.contains_key(&vertex) {
            return false;
        }
        trace!("Adding vertex {vertex}");
        self.adj.insert(vertex, FxHashMap::default());
        true
    }

    /// Remove `vertex` and every edge leading to it, returns `false` if it
    /// wasn't part of the graph
    pub fn remove_vertex(&mut self, vertex: &V) -> bool {
        let Some(outgoing) = self.adj.remove(vertex) else {
            return false;
        };
        let incoming = self
            .adj
            .values_mut()
            .filter_map(|edges| edges.remove(vertex))
            .count();
        debug!(
            "Removed vertex {vertex} ({} outgoing, {incoming} incoming edges)",
            outgoing.len()
        );
        true
    }

    /// Set the weight of `from -> to` (and `to -> from` unless `directional`),
    /// adding both vertices if needed. Existing edges are overwritten.
    pub fn add_edge(
        &mut self,
        from: V,
        to: V,
        weight: Weight,
        directional: bool,
    ) -> AirnavResult<()> {
        if weight < 0 {
            return Err(AirnavError::InvalidWeight(weight));
        }
        trace!(
            "Adding edge {from} {arrow} {to} ({weight})",
            arrow = if directional { "->" } else { "<->" }
        );
        self.adj.entry(from.clone()).or_default().insert(to.clone(), weight);
        let reverse = self.adj.entry(to).or_default();
        if !directional {
            reverse.insert(from, weight);
        }
        Ok(())
    }

    /// Remove `from -> to` (and `to -> from` unless `directional`).
    ///
    /// Fails with [`AirnavError::VertexNotFound`] without touching the graph
    /// if a vertex is unknown or one of the edges to be removed doesn't exist.
    pub fn remove_edge(
        &mut self,
        from: &V,
        to: &V,
        directional: bool,
    ) -> AirnavResult<()> {
        self.check_neighbor(from, to)?;
        if !directional {
            self.check_neighbor(to, from)?;
            self.edges_mut(to)?.remove(from);
        }
        self.edges_mut(from)?.remove(to);
        trace!(
            "Removed edge {from} {arrow} {to}",
            arrow = if directional { "->" } else { "<->" }
        );
        Ok(())
    }

    /// Change the weight of the edges between `a` and `b` in both directions.
    ///
    /// Both directions have to exist already, a pair only connected one way
    /// is rejected with [`AirnavError::AsymmetricEdge`].
    pub fn alter_weight(
        &mut self,
        a: &V,
        b: &V,
        weight: Weight,
    ) -> AirnavResult<()> {
        if weight < 0 {
            return Err(AirnavError::InvalidWeight(weight));
        }
        let forward = self.edges(a)?.contains_key(b);
        let backward = self.edges(b)?.contains_key(a);
        match (forward, backward) {
            (true, true) => {}
            (false, false) => return Err(AirnavError::edge_not_found(a, b)),
            (true, false) => {
                return Err(AirnavError::AsymmetricEdge {
                    from: a.to_string(),
                    to: b.to_string(),
                })
            }
            (false, true) => {
                return Err(AirnavError::AsymmetricEdge {
                    from: b.to_string(),
                    to: a.to_string(),
                })
            }
        }
        self.edges_mut(a)?.insert(b.clone(), weight);
        self.edges_mut(b)?.insert(a.clone(), weight);
        debug!("Changed weight of {a} <-> {b} to {weight}");
        Ok(())
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.adj.contains_key(vertex)
    }

    /// Weight of the edge `from -> to`, if there is one
    pub fn weight(&self, from: &V, to: &V) -> Option<Weight> {
        self.adj.get(from).and_then(|edges| edges.get(to)).copied()
    }

    /// Outgoing edges of `vertex`, `None` if the vertex is unknown
    pub fn neighbors<'a>(
        &'a self,
        vertex: &V,
    ) -> Option<impl Iterator<Item = (&'a V, Weight)> + 'a> {
        self.adj
            .get(vertex)
            .map(|edges| edges.iter().map(|(nb, &w)| (nb, w)))
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.adj.keys()
    }

    pub fn vertex_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of directed edge entries, a bidirectional edge counts twice
    pub fn edge_count(&self) -> usize {
        self.adj.values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// The stored copy of `vertex`
    pub(crate) fn resolve(&self, vertex: &V) -> AirnavResult<&V> {
        self.adj
            .get_key_value(vertex)
            .map(|(v, _)| v)
            .ok_or_else(|| AirnavError::vertex_not_found(vertex))
    }

    pub(crate) fn edges(
        &self,
        vertex: &V,
    ) -> AirnavResult<&FxHashMap<V, Weight>> {
        self.adj
            .get(vertex)
            .ok_or_else(|| AirnavError::vertex_not_found(vertex))
    }

    fn edges_mut(
        &mut self,
        vertex: &V,
    ) -> AirnavResult<&mut FxHashMap<V, Weight>> {
        self.adj
            .get_mut(vertex)
            .ok_or_else(|| AirnavError::vertex_not_found(vertex))
    }

    /// `to` is not found among the neighbors of `from` unless the edge exists
    fn check_neighbor(&self, from: &V, to: &V) -> AirnavResult<()> {
        if self.contains_vertex(to) && self.edges(from)?.contains_key(to) {
            Ok(())
        } else {
            Err(AirnavError::vertex_not_found(to))
        }
    }
}

impl<V: Vertex> Extend<(V, V, Weight, bool)> for WeightedGraph<V> {
    /// Edges with a negative weight are skipped with a warning, use
    /// [`WeightedGraph::add_edge`] to handle the error instead.
    fn extend<I: IntoIterator<Item = (V, V, Weight, bool)>>(
        &mut self,
        iter: I,
    ) {
        for (from, to, weight, directional) in iter {
            if let Err(e) = self.add_edge(from, to, weight, directional) {
                warn!("Skipping edge: {e}");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    type Edge = (&'static str, &'static str, Weight, bool);

    fn graph(edges: &[Edge]) -> WeightedGraph<&'static str> {
        let mut g = WeightedGraph::new();
        g.extend(edges.iter().copied());
        g
    }

    #[test]
    fn add_vertex_is_idempotent() -> AirnavResult<()> {
        let mut g = WeightedGraph::new();
        assert!(g.add_vertex("A"));
        g.add_edge("A", "B", 3, true)?;
        assert!(!g.add_vertex("A"));
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.weight(&"A", &"B"), Some(3));
        assert_eq!(g.edge_count(), 1);
        Ok(())
    }

    #[test]
    fn add_edge_mirrors_unless_directional() -> AirnavResult<()> {
        let mut g = WeightedGraph::new();
        g.add_edge("A", "B", 5, false)?;
        assert_eq!(g.weight(&"A", &"B"), Some(5));
        assert_eq!(g.weight(&"B", &"A"), Some(5));

        let mut g = WeightedGraph::new();
        g.add_edge("A", "B", 5, true)?;
        assert_eq!(g.weight(&"A", &"B"), Some(5));
        assert_eq!(g.weight(&"B", &"A"), None);
        assert!(g.contains_vertex(&"B"));
        assert_eq!(g.neighbors(&"B").map(Iterator::count), Some(0));
        Ok(())
    }

    #[test]
    fn add_edge_overwrites_weight() -> AirnavResult<()> {
        let mut g = graph(&[("A", "B", 5, false)]);
        g.add_edge("A", "B", 7, true)?;
        assert_eq!(g.weight(&"A", &"B"), Some(7));
        assert_eq!(g.weight(&"B", &"A"), Some(5));
        Ok(())
    }

    #[test]
    fn negative_weight_leaves_graph_untouched() {
        let mut g = WeightedGraph::new();
        assert!(matches!(
            g.add_edge("A", "B", -1, true),
            Err(AirnavError::InvalidWeight(-1))
        ));
        assert!(g.is_empty());
        assert_eq!(g.weight(&"A", &"B"), None);
    }

    #[test]
    fn remove_vertex_drops_incident_edges() {
        let mut g = graph(&[
            ("A", "B", 1, false),
            ("C", "B", 2, true),
            ("A", "C", 4, false),
        ]);
        assert!(g.remove_vertex(&"B"));
        assert!(!g.contains_vertex(&"B"));
        for v in g.vertices() {
            assert_eq!(g.weight(v, &"B"), None);
        }
        assert_eq!(g.weight(&"A", &"C"), Some(4));
        assert_eq!(g.edge_count(), 2);
        assert!(!g.remove_vertex(&"B"));
    }

    #[test]
    fn remove_edge() -> AirnavResult<()> {
        let mut g = graph(&[("A", "B", 1, false), ("B", "C", 1, false)]);
        g.remove_edge(&"A", &"B", true)?;
        assert_eq!(g.weight(&"A", &"B"), None);
        assert_eq!(g.weight(&"B", &"A"), Some(1));
        g.remove_edge(&"B", &"C", false)?;
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.vertex_count(), 3);
        Ok(())
    }

    #[test]
    fn remove_edge_failures_are_atomic() {
        let mut g = graph(&[("A", "B", 1, true)]);
        assert!(matches!(
            g.remove_edge(&"A", &"X", true),
            Err(AirnavError::VertexNotFound(ref v)) if v == "X"
        ));
        assert!(matches!(
            g.remove_edge(&"X", &"A", true),
            Err(AirnavError::VertexNotFound(ref v)) if v == "X"
        ));
        assert!(matches!(
            g.remove_edge(&"B", &"A", true),
            Err(AirnavError::VertexNotFound(ref v)) if v == "A"
        ));
        // reverse direction is missing, forward edge has to survive
        assert!(matches!(
            g.remove_edge(&"A", &"B", false),
            Err(AirnavError::VertexNotFound(ref v)) if v == "A"
        ));
        assert_eq!(g.weight(&"A", &"B"), Some(1));
    }

    #[test]
    fn remove_missing_edge_between_known_vertices() {
        let mut g = WeightedGraph::new();
        g.add_vertex("A");
        g.add_vertex("B");
        assert!(matches!(
            g.remove_edge(&"A", &"B", true),
            Err(AirnavError::VertexNotFound(ref v)) if v == "B"
        ));
        assert!(matches!(
            g.remove_edge(&"A", &"B", false),
            Err(AirnavError::VertexNotFound(_))
        ));
        assert_eq!(g.vertex_count(), 2);
        assert!(matches!(
            g.alter_weight(&"A", &"B", 1),
            Err(AirnavError::EdgeNotFound { .. })
        ));
    }

    #[test]
    fn alter_weight_updates_both_directions() -> AirnavResult<()> {
        let mut g = graph(&[("A", "B", 1, false)]);
        g.alter_weight(&"B", &"A", 100)?;
        assert_eq!(g.weight(&"A", &"B"), Some(100));
        assert_eq!(g.weight(&"B", &"A"), Some(100));
        Ok(())
    }

    #[test]
    fn alter_weight_never_creates_edges() {
        let mut g = graph(&[("A", "B", 1, true)]);
        g.add_vertex("D");
        assert!(matches!(
            g.alter_weight(&"A", &"B", 2),
            Err(AirnavError::AsymmetricEdge { ref from, ref to }) if from == "A" && to == "B"
        ));
        assert!(matches!(
            g.alter_weight(&"B", &"A", 2),
            Err(AirnavError::AsymmetricEdge { ref from, ref to }) if from == "A" && to == "B"
        ));
        assert!(matches!(
            g.alter_weight(&"A", &"D", 2),
            Err(AirnavError::EdgeNotFound { .. })
        ));
        assert!(matches!(
            g.alter_weight(&"A", &"Z", 2),
            Err(AirnavError::VertexNotFound(_))
        ));
        assert!(matches!(
            g.alter_weight(&"A", &"B", -5),
            Err(AirnavError::InvalidWeight(-5))
        ));
        assert_eq!(g.weight(&"A", &"B"), Some(1));
        assert_eq!(g.weight(&"B", &"A"), None);
        assert_eq!(g.weight(&"A", &"D"), None);
    }

    #[test]
    fn extend_skips_negative_weights() {
        let g = graph(&[("A", "B", -3, false), ("B", "C", 2, true)]);
        assert!(!g.contains_vertex(&"A"));
        assert_eq!(g.weight(&"B", &"C"), Some(2));
    }
}
