use std::fmt::Display;

use color_eyre::eyre::Result;
use human_repr::{HumanCount, HumanThroughput};
use serde::{Deserialize, Serialize};

use crate::common::Weight;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteState {
    pub from: String,
    pub to: String,
    pub vertex: String,
    pub distance: Weight,
    pub queue_size: usize,
    pub n_finalized: usize,
    pub n_seen: usize,
    pub prc_finalized: f32,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum Event {
    SearchState(RouteState),
    Message(String),
}

impl Display for RouteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            from,
            to,
            vertex,
            distance,
            queue_size,
            n_finalized,
            n_seen,
            prc_finalized,
            rate,
        } = self;
        let queued = queue_size.human_count_bare();
        let finalized = n_finalized.human_count_bare();
        let seen = n_seen.human_count_bare();
        let rate = rate.human_throughput("vertices");
        write!(
            f,
            "[{prc_finalized:.02}% | Dijkstra | {from} -> {to}] At: {vertex} | Distance: {distance} | Queue: {queued} | Finalized: {finalized} | Seen: {seen} | Rate: {rate}"
        )
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SearchState(state) => {
                write!(f, "{state}")?;
            }
            Self::Message(msg) => {
                write!(f, "{msg}")?;
            }
        }
        Ok(())
    }
}

/// Progress listener of a [`crate::route::Router`], runs while the query
/// holds the router's read lock (see the `Router` docs for what it may call)
pub type Callback<V> =
    Box<dyn Fn(&crate::route::Router<V>, &Event) -> Result<()> + Send + Sync>;

#[cfg(test)]
mod test {
    use super::*;

    fn state() -> RouteState {
        RouteState {
            from: "ZRH".to_owned(),
            to: "JFK".to_owned(),
            vertex: "LHR".to_owned(),
            distance: 790,
            queue_size: 12,
            n_finalized: 3,
            n_seen: 15,
            prc_finalized: 25.0,
            rate: 1500.0,
        }
    }

    #[test]
    fn search_state_display() {
        let line = Event::SearchState(state()).to_string();
        assert!(line.starts_with("[25.00% | Dijkstra | ZRH -> JFK] At: LHR"));
        assert!(line.contains("Distance: 790"));
        assert!(line.contains("| Rate: "));
        assert_eq!(Event::Message("loaded".to_owned()).to_string(), "loaded");
    }

    #[test]
    fn events_are_tagged() -> color_eyre::Result<()> {
        let json = serde_json::to_value(Event::SearchState(state()))?;
        assert_eq!(json["event"], "search_state");
        assert_eq!(json["vertex"], "LHR");
        assert_eq!(json["distance"], 790);
        Ok(())
    }
}
