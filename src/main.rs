mod celestrak;
mod ephemeris;
mod geo;
mod web;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

use crate::celestrak::CelestrakClient;
use crate::ephemeris::{
    compute_ephemeris, EphemerisRow, Observer, SatelliteSelection, TimeWindow, TIMESTAMP_FORMAT,
};
use crate::geo::{parse_time_of_day, LocalWindow, ObserverZone};
use crate::web::{AppState, Config};

#[derive(Parser)]
#[command(name = "sat-ephemeris")]
#[command(about = "Satellite visibility ephemeris calculator")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the web form and JSON API
    Serve,
    /// Print when satellites are above an observer's horizon
    Compute(ComputeArgs),
    /// Fetch the current TLE of one satellite by name or NORAD ID
    Lookup { query: String },
}

#[derive(Args)]
struct ComputeArgs {
    /// Configured constellation name
    #[arg(long, required_unless_present = "satellite", conflicts_with = "satellite")]
    constellation: Option<String>,
    /// Satellite name or NORAD ID
    #[arg(long)]
    satellite: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,
    /// Observer height above the ellipsoid, metres
    #[arg(long, default_value_t = 0.0)]
    altitude: f64,
    /// Date, YYYY-MM-DD
    #[arg(long)]
    date: NaiveDate,
    /// Start time, HH:MM
    #[arg(long)]
    start: String,
    /// End time on the same date, HH:MM
    #[arg(long)]
    end: String,
    /// IANA timezone of date/start/end (UTC when omitted)
    #[arg(long)]
    tz: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Commands::Serve => serve(config).await,
        Commands::Compute(args) => compute(config, args).await,
        Commands::Lookup { query } => lookup(config, &query).await,
    }
}

async fn serve(config: Config) -> ExitCode {
    let state = match AppState::new(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error initializing server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match web::run_server(state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn compute(config: Config, args: ComputeArgs) -> ExitCode {
    let client = match celestrak_client(&config) {
        Some(c) => c,
        None => return ExitCode::FAILURE,
    };

    let observer = match Observer::with_altitude(args.lat, args.lon, args.altitude) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let zone = match args.tz.as_deref().map(ObserverZone::parse) {
        Some(Ok(zone)) => zone,
        Some(Err(e)) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
        None => ObserverZone::Named(chrono_tz::Tz::UTC),
    };

    let local = match (parse_time_of_day(&args.start), parse_time_of_day(&args.end)) {
        (Ok(start), Ok(end)) => LocalWindow {
            date: args.date,
            start,
            end,
        },
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let window = match local.to_utc(&zone) {
        Ok((start, end)) => TimeWindow::between(start, end),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let selection = if let Some(query) = &args.satellite {
        match client.lookup_satellite(query).await {
            Ok(record) => {
                println!(
                    "Name: {}\nTLE Line 1: {}\nTLE Line 2: {}\n",
                    record.name, record.line1, record.line2
                );
                SatelliteSelection::custom(record)
            }
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        let name = args.constellation.as_deref().unwrap_or_default();
        match config.find_constellation(name) {
            Some(c) => SatelliteSelection::feed(c.url.clone()),
            None => {
                eprintln!("Unknown constellation '{}'", name);
                return ExitCode::FAILURE;
            }
        }
    };

    println!(
        "Window (UTC): {} to {}",
        window.start_utc().format(TIMESTAMP_FORMAT),
        window.end_utc().format(TIMESTAMP_FORMAT)
    );

    let table = compute_ephemeris(&client, &selection, observer, window).await;
    for message in &table.diagnostics {
        eprintln!("{}", message);
    }

    if table.is_empty() {
        println!("No visible satellites found for the specified time and location.");
    } else {
        print_rows(&table.rows());
    }
    ExitCode::SUCCESS
}

async fn lookup(config: Config, query: &str) -> ExitCode {
    let client = match celestrak_client(&config) {
        Some(c) => c,
        None => return ExitCode::FAILURE,
    };

    match client.lookup_satellite(query).await {
        Ok(record) => {
            println!("{}\n{}\n{}", record.name, record.line1, record.line2);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn celestrak_client(config: &Config) -> Option<CelestrakClient> {
    match CelestrakClient::new(&config.celestrak.gp_url, config.celestrak.timeout) {
        Ok(c) => Some(c),
        Err(e) => {
            eprintln!("Error creating HTTP client: {}", e);
            None
        }
    }
}

fn print_rows(rows: &[EphemerisRow]) {
    let header = ["Date (UTC)", "Satellite", "R.A.", "Dec", "Altitude", "Azimuth"];
    let cells: Vec<[&str; 6]> = rows
        .iter()
        .map(|r| {
            [
                r.date_utc.as_str(),
                r.satellite.as_str(),
                r.right_ascension.as_str(),
                r.declination.as_str(),
                r.altitude.as_str(),
                r.azimuth.as_str(),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cols: &[&str; 6]| {
        cols.iter()
            .zip(widths)
            .map(|(c, w)| format!("{:<w$}", c, w = w))
            .collect::<Vec<_>>()
            .join("  ")
    };
    println!("{}", line(&header));
    for row in &cells {
        println!("{}", line(row));
    }
}
