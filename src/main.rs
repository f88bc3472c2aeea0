#![allow(clippy::cognitive_complexity, clippy::cast_precision_loss)]
#![warn(clippy::unwrap_in_result, clippy::unwrap_used)]
#![warn(
    rust_2018_idioms,
    rust_2021_compatibility,
    arithmetic_overflow,
    nonstandard_style,
    clippy::disallowed_types,
    clippy::nursery,
    // clippy::pedantic
)]
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use airnav::{
    common::{FormatNum, RelativeTime},
    data_loader,
    event::Event,
    Airport, Route, Router, WeightedGraph,
};
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use crossbeam_channel::bounded;
use directories::ProjectDirs;
use human_repr::HumanDuration;
use itertools::Itertools;
use shadow_rs::shadow;
use tracing::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

shadow!(build);

fn data_dir() -> PathBuf {
    ProjectDirs::from("", "", env!("CARGO_PKG_NAME")).map_or_else(
        || PathBuf::from("."),
        |path| path.data_local_dir().to_owned(),
    )
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Compute the cheapest route between two airports
    Route {
        /// Network description to load (.toml or .json)
        #[arg(long, short, default_value = data_dir().join("network.toml").into_os_string())]
        network: PathBuf,
        /// Print the route as JSON
        #[arg(long, short)]
        json: bool,
        /// Don't print computed route when done (mostly useful for benchmarks
        /// and testing)
        #[arg(long, short)]
        quiet: bool,
        /// Airport of departure
        from: Airport,
        /// Airport of arrival
        to: Airport,
    },
    /// Show airports and links of a network
    Info {
        /// Network description to load (.toml or .json)
        #[arg(long, short, default_value = data_dir().join("network.toml").into_os_string())]
        network: PathBuf,
    },
}

fn long_version() -> String {
    use std::fmt::Write;
    let mut ret = version();
    ret.push('\n');
    if !build::TAG.is_empty() {
        writeln!(&mut ret, "tag: {}", build::TAG)
            .unwrap_or_else(|_| unreachable!());
    }
    writeln!(&mut ret, "rustc {},{}", build::RUST_VERSION, build::RUST_CHANNEL)
        .unwrap_or_else(|_| unreachable!());
    ret
}

fn version() -> String {
    format!(
        "v{} ({} {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BUILD_TIME
    )
}

/// Seconds as a non-negative, finite number
fn parse_interval(arg: &str) -> Result<Duration, String> {
    let secs: f64 = arg.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(secs).map_err(|e| format!("{e}"))
}

#[derive(Parser, Debug)]
#[command(author, about, long_about = None, version = version(), long_version = long_version())]
struct Cli {
    /// Minimum time between printing progress updates, in seconds
    #[arg(short, long, default_value = "0.5", value_parser = parse_interval)]
    progress_interval: Duration,
    /// Command to run
    #[command(subcommand)]
    cmd: Command,
}

fn print_route(
    dt: Duration,
    route: &Route<Airport>,
    graph: &WeightedGraph<Airport>,
    quiet: bool,
) {
    use yansi::Paint;
    info!(
        "Route computed in {}: {} hops, total weight {}",
        dt.human_duration(),
        route.len().saturating_sub(1).format_num(),
        route.distance.format_num()
    );
    if quiet {
        return;
    }
    let last = route.len().saturating_sub(1);
    for (n, hop) in route.hops.iter().enumerate() {
        let code = if n == 0 || n == last {
            hop.code().bold().green()
        } else {
            hop.code().primary()
        };
        match route.hops.get(n + 1).and_then(|next| graph.weight(hop, next)) {
            Some(leg) => println!(" {n}  {code} (+{leg})"),
            None => println!(" {n}  {code}"),
        }
    }
}

fn print_network(graph: &WeightedGraph<Airport>) {
    use yansi::Paint;
    info!(
        "{} airports, {} links",
        graph.vertex_count().format_num(),
        graph.edge_count().format_num()
    );
    for airport in graph.vertices().sorted() {
        let links = graph
            .neighbors(airport)
            .into_iter()
            .flatten()
            .sorted()
            .map(|(to, weight)| format!("{to} ({weight})"))
            .join(", ");
        println!("{}: {links}", airport.code().bold());
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .event_format(fmt::format().with_ansi(yansi::is_enabled()))
                .with_timer(RelativeTime::default())
                .compact(),
        )
        .with(
            EnvFilter::try_from_env("AIRNAV_LOG")
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn load_router(
    network: &Path,
    status_interval: Duration,
) -> Result<Router<Airport>> {
    let graph = data_loader::load(network)?;
    Ok(Router::from_graph(graph, status_interval))
}

fn main() -> Result<()> {
    use yansi::Condition;
    color_eyre::install()?;
    yansi::whenever(Condition::DEFAULT);
    run()
}

fn run() -> Result<()> {
    let args = Cli::parse_from(argfile::expand_args(
        argfile::parse_fromfile,
        argfile::PREFIX,
    )?);
    init_tracing();
    let status_interval = args.progress_interval;
    match args.cmd {
        Command::Route { network, json, quiet, from, to } => {
            let mut router = load_router(&network, status_interval)?;
            let (ctrl_c_tx, ctrl_c_rx) = bounded(1);
            ctrlc::set_handler(move || {
                if let Err(e) = ctrl_c_tx.try_send(()) {
                    error!("Failed to send Ctrl-C: {e}");
                };
            })?;
            router.set_callback(Box::new(move |router, event| {
                if ctrl_c_rx.try_recv().is_ok() {
                    router.interrupt();
                }
                match event {
                    Event::SearchState(state) => info!("{state}"),
                    Event::Message(msg) => debug!("{msg}"),
                }
                Ok(())
            }));
            let (dt, route) = router.compute_route(&from, &to)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&route)?);
            } else {
                print_route(dt, &route, &router.graph(), quiet);
            }
        }
        Command::Info { network } => {
            let router = load_router(&network, status_interval)?;
            print_network(&router.graph());
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn progress_interval_is_validated() {
        assert_eq!(parse_interval("0.25"), Ok(Duration::from_millis(250)));
        assert!(parse_interval("-1").is_err());
        assert!(parse_interval("NaN").is_err());
        assert!(parse_interval("soon").is_err());
        assert!(
            Cli::try_parse_from(["airnav", "--progress-interval=-2", "info"])
                .is_err()
        );
        let args = Cli::try_parse_from(["airnav", "info"])
            .map(|cli| cli.progress_interval);
        assert_eq!(args.ok(), Some(Duration::from_millis(500)));
    }
}
