//! Construction of the route network from the raw tables.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    dataset::{Airport, Dataset, Route},
    edge::Edge,
    graph::Graph,
};

/// The directed route graph of one country, with the attributes of its airports kept next to
/// the topology.
#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    /// One vertex per airport id, one edge per distinct (source, destination) pair.
    pub graph: Graph<u32>,
    pub airports: BTreeMap<u32, Airport>,
    /// Number of raw routes collapsed into each edge.
    pub route_multiplicity: BTreeMap<Edge<u32>, usize>,
}

/// Counts reported by [`Network::summary`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub airports: usize,
    pub edges: usize,
    pub routes: usize,
}

impl Network {
    pub fn airport(&self, id: u32) -> Option<&Airport> {
        self.airports.get(&id)
    }

    /// Maps a path of airport ids to their records, skipping ids without one.
    pub fn resolve_path(&self, path: &[u32]) -> Vec<&Airport> {
        path.iter().filter_map(|id| self.airport(*id)).collect()
    }

    /// Looks an airport up by IATA or ICAO code, case-insensitively.
    pub fn find_by_code(&self, code: &str) -> Option<&Airport> {
        self.airports.values().find(|airport| {
            [&airport.iata, &airport.icao]
                .into_iter()
                .flatten()
                .any(|known| known.eq_ignore_ascii_case(code))
        })
    }

    /// Raw routes behind an edge, `0` if the edge doesn't exist.
    pub fn multiplicity(&self, edge: &Edge<u32>) -> usize {
        self.route_multiplicity.get(edge).copied().unwrap_or(0)
    }

    pub fn summary(&self) -> Summary {
        Summary {
            airports: self.graph.node_count(),
            edges: self.graph.edge_count(),
            routes: self.route_multiplicity.values().sum(),
        }
    }
}

/// Builds the directed route network of the airports located in `country`.
///
/// Airports are matched on the exact country name. Routes are kept only if both endpoint ids
/// coerced and both airports belong to the country; everything else is dropped silently and
/// only counted in the logs. Parallel routes collapse into a single edge.
///
/// # Examples
///
/// ```
/// use airnet::builder::build_graph;
/// use airnet::dataset::Dataset;
///
/// let airports = "\
/// 1,\"A\",\"A\",\"Brazil\",\"AAA\",\\N,0,0,0,-3,\"S\",\\N,\"airport\",\"OurAirports\"
/// 2,\"B\",\"B\",\"Brazil\",\"BBB\",\\N,0,1,0,-3,\"S\",\\N,\"airport\",\"OurAirports\"
/// 3,\"C\",\"C\",\"Chile\",\"CCC\",\\N,0,2,0,-4,\"S\",\\N,\"airport\",\"OurAirports\"
/// ";
/// let routes = "\
/// XX,1,AAA,1,BBB,2,,0,320
/// YY,2,AAA,1,BBB,2,,0,738
/// XX,1,BBB,2,CCC,3,,0,320
/// XX,1,BBB,2,ZZZ,\\N,,0,320
/// ";
///
/// let dataset = Dataset::from_readers(airports.as_bytes(), routes.as_bytes()).unwrap();
/// let network = build_graph(&dataset.airports, &dataset.routes, "Brazil");
///
/// assert_eq!(network.graph.node_count(), 2);
/// assert_eq!(network.graph.edge_count(), 1);
/// assert_eq!(network.summary().routes, 2);
/// ```
pub fn build_graph(airports: &[Airport], routes: &[Route], country: &str) -> Network {
    let airports: BTreeMap<u32, Airport> = airports
        .iter()
        .filter(|airport| airport.country == country)
        .map(|airport| (airport.id, airport.clone()))
        .collect();
    let ids: HashSet<u32> = airports.keys().copied().collect();

    let mut graph = Graph::new();
    for id in &ids {
        graph.add_node(*id);
    }

    let mut route_multiplicity: BTreeMap<Edge<u32>, usize> = BTreeMap::new();
    let (mut invalid, mut foreign) = (0, 0);

    for route in routes {
        let Some((source, target)) = route.endpoints() else {
            invalid += 1;
            continue;
        };

        if !ids.contains(&source) || !ids.contains(&target) {
            foreign += 1;
            continue;
        }

        let edge = Edge::new(source, target);
        graph.insert(edge);
        *route_multiplicity.entry(edge).or_default() += 1;
    }

    debug!(invalid, foreign, "dropped routes");
    info!(
        country,
        airports = graph.node_count(),
        edges = graph.edge_count(),
        "built route network"
    );

    Network {
        graph,
        airports,
        route_multiplicity,
    }
}

impl Dataset {
    /// Shorthand for [`build_graph`] over the whole dataset.
    pub fn network(&self, country: &str) -> Network {
        build_graph(&self.airports, &self.routes, country)
    }
}
