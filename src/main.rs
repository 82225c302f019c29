use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mariner_routes::import;
use mariner_routes::plan;
use mariner_routes::ports::PortResolver;
use mariner_routes::routing::{SeaRouter, SearouteClient};
use mariner_routes::server;

/// Mariner Routes — maritime route service.
///
/// Resolves port names and UN/LOCODEs to coordinates and computes timed
/// sea-route waypoints via an external routing engine.
///
/// Examples:
///   mariner serve --port 5000
///   mariner resolve Rotterdam
///   mariner resolve GBPME --offline
///   mariner distance --start-lat 51.9244 --start-lng 4.4777 --end-lat 50.8198 --end-lng -1.088
///   mariner import-csv --input ports.csv --output ports_import.sql
#[derive(Parser)]
#[command(name = "mariner", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP route service.
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, default_value_t = 5000)]
        port: u16,
    },
    /// Resolve a port name or UN/LOCODE to coordinates.
    Resolve {
        /// Destination name or UN/LOCODE.
        query: String,
        /// Skip the remote dataset; use only the built-in table.
        #[arg(long)]
        offline: bool,
    },
    /// Maritime distance between two coordinate pairs.
    Distance {
        #[arg(long, allow_hyphen_values = true)]
        start_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        start_lng: f64,
        #[arg(long, allow_hyphen_values = true)]
        end_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        end_lng: f64,
    },
    /// Convert a ports CSV into SQL statements for the remote dataset.
    ImportCsv {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = "ports_import.sql")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { host, port } => {
            server::start(&host, port).await;
        }

        Command::Resolve { query, offline } => {
            let resolver = if offline {
                PortResolver::offline()
            } else {
                PortResolver::new()
            };
            let port = resolver.resolve(&query).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            println!("{}", serde_json::to_string_pretty(&port).unwrap());
        }

        Command::Distance {
            start_lat,
            start_lng,
            end_lat,
            end_lng,
        } => {
            let client = SearouteClient::from_env();
            let route = client
                .route((start_lat, start_lng), (end_lat, end_lng))
                .unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                });
            let body = serde_json::json!({
                "distance_km": plan::round2(route.length_km),
                "distance_nm": plan::round2(route.length_km * plan::NM_PER_KM),
            });
            println!("{}", serde_json::to_string_pretty(&body).unwrap());
        }

        Command::ImportCsv { input, output } => {
            let summary = import::convert(&input, &output).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            });
            eprintln!(
                "  Converted {} ports to SQL ({} rows skipped)",
                summary.written, summary.skipped,
            );
            eprintln!("  SQL file written to: {}", output.display());
        }
    }
}
