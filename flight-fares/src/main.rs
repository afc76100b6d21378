use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use flight_fares::domain::parse_date;
use flight_fares::flights::{
    FlightsConfig, HttpTransport, MockTransport, Transport, TransportError,
};
use flight_fares::planner::{FareSearch, SearchConfig, SearchError, SearchRequest};

/// Search the cheapest round-trip fares over a date span.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Origin IATA code or place name
    #[arg(default_value = "MCZ")]
    origin: String,

    /// Destination IATA code or place name
    #[arg(default_value = "Santiago")]
    destination: String,

    /// Trip length in days
    #[arg(default_value_t = 7)]
    duration: u32,

    #[arg(default_value_t = 2)]
    passengers: u32,

    /// First outbound date (YYYY-MM-DD)
    #[arg(default_value = "2025-08-01", value_parser = parse_date)]
    from: NaiveDate,

    /// Last outbound date (YYYY-MM-DD)
    #[arg(default_value = "2025-09-30", value_parser = parse_date)]
    to: NaiveDate,

    /// Number of fares to print; 0 prints all
    #[arg(default_value_t = 1)]
    limit: usize,

    /// Plan relative to this date instead of the local date
    #[arg(long, env = "FLIGHTS_TODAY", value_parser = parse_date)]
    today: Option<NaiveDate>,

    /// Replay recorded responses from this directory instead of the network
    #[arg(long, env = "FLIGHTS_FIXTURES")]
    fixtures: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long, env = "FLIGHTS_BASE_URL")]
    base_url: Option<String>,
}

impl Args {
    fn request(&self) -> SearchRequest {
        SearchRequest::new(&self.origin, &self.destination, self.from, self.to)
            .with_duration(self.duration)
            .with_passengers(self.passengers)
            .with_limit(self.limit)
    }

    fn search_config(&self) -> SearchConfig {
        match self.today {
            Some(today) => SearchConfig::default().with_today(today),
            None => SearchConfig::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Search(#[from] SearchError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %error_chain(&e), "search failed");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout only carries results.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flight_fares=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// An error and its causes, joined with `: `.
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

async fn run(args: Args) -> Result<(), AppError> {
    let request = args.request();
    let config = args.search_config();

    if let Some(dir) = &args.fixtures {
        info!(dir = %dir.display(), "replaying recorded responses");
        let transport = MockTransport::from_dir(dir)?;
        return report(&transport, &config, &request).await;
    }

    let mut flights = FlightsConfig::new();
    if let Some(url) = &args.base_url {
        flights = flights.with_base_url(url);
    }
    let transport = HttpTransport::new(flights)?;
    report(&transport, &config, &request).await
}

async fn report<T: Transport>(
    transport: &T,
    config: &SearchConfig,
    request: &SearchRequest,
) -> Result<(), AppError> {
    let search = FareSearch::new(transport, config);
    let outcome = search.search(request).await?;

    println!("{}", outcome.route);
    if outcome.is_degraded() {
        println!(
            "({} of the date windows failed; results may be incomplete)",
            outcome.failures.len()
        );
    }
    if outcome.fares.is_empty() {
        println!("No fares found.");
    }

    for fare in &outcome.fares {
        println!("{fare}");

        let departures = search
            .get_departures(&outcome.route, fare.date_from, fare.date_to, fare.passengers)
            .await;
        match departures {
            Ok(departures) => {
                for departure in &departures {
                    println!("  {departure}");
                    for stop in &departure.stops {
                        println!("    {stop}");
                    }
                }
            }
            Err(e) => warn!(
                error = %error_chain(&e),
                date_from = %fare.date_from,
                "could not fetch departures"
            ),
        }
    }

    Ok(())
}
