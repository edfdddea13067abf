use std::path::PathBuf;

use airnet::{
    builder::Network,
    communities,
    config::Config,
    dataset::Airport,
    degree_histogram,
    degree_table,
    path::all_shortest_paths,
    robustness::{RemovalStrategy, RemovedSet, Simulator},
    session::Session,
    shortest_path,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "airnet", version, about = "Analyse a national air-route network")]
struct Cli {
    /// OpenFlights airports table.
    #[arg(long, default_value = "airports.dat")]
    airports: PathBuf,

    /// OpenFlights routes table.
    #[arg(long, default_value = "routes.dat")]
    routes: PathBuf,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured country.
    #[arg(long)]
    country: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Airport, edge and route counts.
    Summary,
    /// In, out and total degree per airport.
    Degrees,
    /// Degree distribution.
    Histogram {
        #[arg(long)]
        bins: Option<usize>,
    },
    /// Degree, betweenness, closeness and eigenvector centrality per airport.
    Centrality {
        /// Betweenness pivot sample size.
        #[arg(long, conflicts_with = "exact")]
        sample_size: Option<usize>,
        /// Computes betweenness over every source airport.
        #[arg(long)]
        exact: bool,
    },
    /// Adjacency matrix ordered by airport id.
    Matrix,
    /// Shortest route between two airports, given by id or IATA/ICAO code.
    Path {
        source: String,
        destination: String,
        /// Lists every shortest route instead of one.
        #[arg(long)]
        all: bool,
    },
    /// Louvain communities.
    Communities {
        #[arg(long)]
        seed: Option<u64>,
        /// Only airports with at least this degree take part.
        #[arg(long)]
        min_degree: Option<usize>,
    },
    /// Removes airports and compares the residual network to the original.
    Robustness {
        /// Airports to remove, by id or code.
        #[arg(long = "remove", value_delimiter = ',')]
        manual: Vec<String>,
        /// Removes this many of the most connected airports.
        #[arg(long)]
        degree: Option<usize>,
        /// Removes this many random airports.
        #[arg(long)]
        random: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Serialize)]
struct Matrix {
    airports: Vec<u32>,
    rows: Vec<Vec<f64>>,
}

#[derive(Serialize)]
struct ResolvedPath<'a> {
    #[serde(flatten)]
    outcome: airnet::path::PathOutcome<u32>,
    airports: Vec<&'a Airport>,
}

#[derive(Serialize)]
struct Robustness<'a> {
    #[serde(flatten)]
    report: airnet::robustness::RobustnessReport<u32>,
    removed_airports: Vec<&'a Airport>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("airnet=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(country) = cli.country {
        config = config.with_country(country);
    }

    let session = Session::new(cli.airports, cli.routes, config.country.clone());
    let network = session.network().context("failed to load the route network")?;

    match cli.command {
        Command::Summary => print(&network.summary()),
        Command::Degrees => print(&degree_table(&network.graph)),
        Command::Histogram { bins } => {
            let bins = bins.unwrap_or(config.histogram_bins);
            print(&degree_histogram(&network.graph, bins))
        }
        Command::Centrality { sample_size, exact } => {
            let mut centrality = config.centrality;
            if exact {
                centrality = centrality.with_sample_size(None);
            } else if sample_size.is_some() {
                centrality = centrality.with_sample_size(sample_size);
            }
            print(&airnet::centrality_table(&network.graph, &centrality))
        }
        Command::Matrix => {
            let matrix = network.graph.adjacency_matrix();
            print(&Matrix {
                airports: network.graph.nodes().collect(),
                rows: matrix
                    .row_iter()
                    .map(|row| row.iter().copied().collect())
                    .collect(),
            })
        }
        Command::Path {
            source,
            destination,
            all,
        } => {
            let source = lookup(network, &source)?;
            let destination = lookup(network, &destination)?;

            if all {
                print(&all_shortest_paths(&network.graph, source, destination)?)
            } else {
                let outcome = shortest_path(&network.graph, source, destination)?;
                let airports = network.resolve_path(outcome.path().unwrap_or_default());
                print(&ResolvedPath { outcome, airports })
            }
        }
        Command::Communities { seed, min_degree } => {
            let mut louvain = config.communities;
            if let Some(seed) = seed {
                louvain = louvain.with_seed(seed);
            }
            if let Some(min_degree) = min_degree {
                louvain = louvain.with_min_degree(min_degree);
            }
            print(&communities(&network.graph, &louvain))
        }
        Command::Robustness {
            manual,
            degree,
            random,
            seed,
        } => {
            let simulator = Simulator::new(&network.graph);
            let mut removed = RemovedSet::new();

            for airport in &manual {
                let id = lookup(network, airport)?;
                simulator.remove(&mut removed, RemovalStrategy::Manual(id))?;
            }
            if let Some(count) = degree {
                simulator.remove(&mut removed, RemovalStrategy::DegreeRanked { count })?;
            }
            if let Some(count) = random {
                let seed = seed.unwrap_or(config.robustness.seed);
                simulator.remove(&mut removed, RemovalStrategy::Random { count, seed })?;
            }

            let report = simulator.report(&removed);
            let removed_airports = network.resolve_path(&report.removed);
            print(&Robustness {
                report,
                removed_airports,
            })
        }
    }
}

/// Resolves an airport given by numeric id or by IATA/ICAO code.
fn lookup(network: &Network, airport: &str) -> Result<u32> {
    if let Ok(id) = airport.parse::<u32>() {
        return Ok(id);
    }

    network
        .find_by_code(airport)
        .map(|airport| airport.id)
        .ok_or_else(|| anyhow!("no airport with code {airport:?}"))
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
