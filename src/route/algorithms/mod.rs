use crate::common::Weight;

mod dijkstra;

/// State of a running search at the moment a vertex is taken from the queue
#[derive(Debug)]
pub(crate) struct SearchProgress<'g, V> {
    pub vertex: &'g V,
    pub distance: Weight,
    pub queue_size: usize,
    pub n_finalized: usize,
    pub n_seen: usize,
}
