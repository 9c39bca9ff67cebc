use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::{fs, path::PathBuf};
use tracing::{info, warn};

use satgeo_lib::{
    config::Config,
    congestion,
    graph::{self, GraphFilter},
    propagator,
    store::{MemoryAlertCache, MemoryMetadataStore, MemorySnapshotSink},
    visibility,
};
use satgeo_types::prelude::{ObjectRecord, ObserverLocation};

#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Scenario configuration toml file.
    ///
    /// The built-in band table, category table and scan profile are
    /// used when not provided.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Derivation instant, RFC 3339 (e.g. 2024-03-01T12:00:00Z).
    ///
    /// Defaults to the current time.
    #[arg(long)]
    at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive positions for an element set file and report per-band
    /// congestion
    Congestion {
        /// Element set file (name line plus two element lines per record)
        #[arg(long = "tle")]
        tle_path: PathBuf,

        /// Keep only objects whose name classifies into this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Assemble the filtered relationship graph with derived positions
    Graph {
        /// Object metadata JSON file (array of records)
        #[arg(long)]
        metadata: PathBuf,

        /// Keep only objects from this manufacturer ("All" for any)
        #[arg(long)]
        manufacturer: Option<String>,

        /// Keep only objects in this orbit class ("All" for any)
        #[arg(long)]
        orbit_class: Option<String>,

        /// Keep only members of this constellation ("All" for any)
        #[arg(long)]
        constellation: Option<String>,

        /// Keep only objects from this country ("All" for any)
        #[arg(long)]
        country: Option<String>,
    },

    /// Find the next visibility event for a ground observer
    Pass {
        /// Element set file (name line plus two element lines per record)
        #[arg(long = "tle")]
        tle_path: PathBuf,

        /// Observer latitude, [deg]
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Observer longitude, [deg]
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Observer height above the ellipsoid, [m]
        #[arg(long, default_value_t = 0.0)]
        elevation: f64,

        /// Also cache a reminder alert for this user id
        #[arg(long)]
        user: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let config = match opts.scenario.as_ref() {
        Some(path) => {
            info!(config = %path.display(), "Loading scenario from config file");
            Config::load(path)
        }
        None => Config::default(),
    };
    let at = opts.at.unwrap_or_else(Utc::now);

    match opts.command {
        Command::Congestion { tle_path, category } => {
            let mut raws = tleset::parse_element_sets(&fs::read_to_string(&tle_path)?)?;
            if let Some(category) = category.as_deref() {
                let table = config.category_table();
                raws.retain(|raw| table.classify(&raw.name) == category);
                info!(category, records = raws.len(), "catalog filtered by category");
            }
            let sink = MemorySnapshotSink::default();
            let (snapshot, skipped) =
                congestion::run_congestion(&raws, &config.regime_bands(), at, &sink);
            for skip in &skipped {
                warn!(name = %skip.name, error = %skip.error, "record skipped");
            }
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Command::Graph {
            metadata,
            manufacturer,
            orbit_class,
            constellation,
            country,
        } => {
            let records: Vec<ObjectRecord> =
                serde_json::from_str(&fs::read_to_string(&metadata)?)?;
            let store = MemoryMetadataStore::new(records);
            let filter = GraphFilter {
                manufacturer: GraphFilter::normalize_token(manufacturer),
                orbit_class: GraphFilter::normalize_token(orbit_class),
                constellation: GraphFilter::normalize_token(constellation),
                country: GraphFilter::normalize_token(country),
            };
            let assembly = graph::assemble(&store, &filter, at)?;
            for skip in &assembly.skipped {
                warn!(name = %skip.name, error = %skip.error, "node kept without position");
            }
            println!("{}", serde_json::to_string_pretty(&assembly.view)?);
        }

        Command::Pass {
            tle_path,
            lat,
            lon,
            elevation,
            user,
        } => {
            let raws = tleset::parse_element_sets(&fs::read_to_string(&tle_path)?)?;
            let parsed = propagator::parse_batch(&raws);
            for skip in &parsed.skipped {
                warn!(name = %skip.name, error = %skip.error, "record skipped");
            }

            let observer = ObserverLocation {
                latitude_deg: lat,
                longitude_deg: lon,
                elevation_m: elevation,
            };
            let scan = config.pass_scan(None);
            match visibility::find_next_pass(&parsed.successes, &observer, &scan, at) {
                Some(event) => {
                    if let Some(user_id) = user.as_deref() {
                        let cache = MemoryAlertCache::default();
                        match visibility::schedule_alert(&cache, user_id, &event, at) {
                            Some(ttl) => info!(
                                user_id,
                                ttl_seconds = ttl.num_seconds(),
                                "alert scheduled"
                            ),
                            None => info!(user_id, "event not in the future, no alert"),
                        }
                    }
                    println!("{}", serde_json::to_string_pretty(&event)?);
                }
                None => println!("No visibility event within the scan horizon"),
            }
        }
    }

    Ok(())
}
