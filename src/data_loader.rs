//! Loading airport networks from TOML or JSON description files
use std::{path::Path, time::Instant};

use human_repr::HumanDuration;
use serde::{Deserialize, Serialize};
use tracing::*;

use crate::{
    common::{AirnavError, AirnavResult, Airport, Weight},
    graph::WeightedGraph,
};

/// A single link between two airports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Link {
    pub from: Airport,
    pub to: Airport,
    pub weight: Weight,
    /// Only usable from `from` to `to`
    #[serde(default)]
    pub directional: bool,
}

/// Network description as stored on disk.
///
/// ```toml
/// airports = ["ZRH", "GVA"]
///
/// [[links]]
/// from = "ZRH"
/// to = "GVA"
/// weight = 55
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkFile {
    /// Airports that exist even without any links
    #[serde(default)]
    pub airports: Vec<Airport>,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl NetworkFile {
    pub fn from_toml_str(data: &str) -> AirnavResult<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn from_json_str(data: &str) -> AirnavResult<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Build the graph, airports first and then links in file order. The
    /// first invalid link aborts the build.
    pub fn build(self) -> AirnavResult<WeightedGraph<Airport>> {
        let mut graph = WeightedGraph::new();
        for airport in self.airports {
            if !graph.add_vertex(airport.clone()) {
                warn!("Duplicate airport {airport}");
            }
        }
        for Link { from, to, weight, directional } in self.links {
            graph.add_edge(from, to, weight, directional)?;
        }
        Ok(graph)
    }
}

/// Load a network from `path`, the format is picked by file extension
pub fn load(path: &Path) -> AirnavResult<WeightedGraph<Airport>> {
    let t_start = Instant::now();
    let data = fs_err::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let network = match ext.as_deref() {
        Some("toml") => NetworkFile::from_toml_str(&data)?,
        Some("json") => NetworkFile::from_json_str(&data)?,
        _ => {
            return Err(AirnavError::RuntimeError(format!(
                "Unsupported network file {}, expected .toml or .json",
                path.display()
            )));
        }
    };
    let graph = network.build()?;
    info!(
        "Loaded {} airports and {} links from {} in {}",
        graph.vertex_count(),
        graph.edge_count(),
        path.display(),
        t_start.elapsed().human_duration()
    );
    Ok(graph)
}
