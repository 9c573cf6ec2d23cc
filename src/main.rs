//! CLI entry point for the ZIP income rater.
//!
//! Provides subcommands for walking a ZIP code's income history, ranking
//! several ZIP codes concurrently, batch-ranking everything the source knows
//! about, classifying raw values, and listing ZIP boundaries.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use zip_income_rater::{
    cache::{CrimeGrade, SessionCache},
    classify,
    config::RaterConfig,
    fetch::{BasicClient, HttpTransport},
    infra::geo::GeoBoundaryClient,
    ranking,
    report::{ZipReport, print_json, print_pretty},
    series::HistoricalSeriesFetcher,
    services::boundary_api::BoundaryApi,
};

type SharedTransport = Arc<HttpTransport<BasicClient>>;

#[derive(Parser)]
#[command(name = "zip_income_rater")]
#[command(about = "Rank ZIP codes by median income and crime grade", long_about = None)]
struct Cli {
    /// Base URL of the data source (overrides ZIP_RATER_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk back through a ZIP code's yearly median income and rank it
    Series {
        #[arg(value_name = "ZIP")]
        zip: String,

        /// First year to request (defaults to the current year)
        #[arg(long)]
        current_year: Option<i32>,

        /// Stop after this many years with data
        #[arg(short = 'n', long)]
        max_samples: Option<usize>,

        /// How many years before the first year the walk may reach
        #[arg(short = 'y', long)]
        years_back: Option<i32>,

        /// Crime grade to fold into the rank (e.g. "B+")
        #[arg(short, long)]
        grade: Option<String>,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Rank several ZIP codes concurrently
    Rank {
        #[arg(value_name = "ZIP", required = true)]
        zips: Vec<String>,

        /// Maximum number of walks in flight
        #[arg(short, long, default_value_t = 4)]
        concurrency: usize,

        /// JSON file mapping ZIP codes to crime grades
        #[arg(long)]
        grades_file: Option<String>,
    },
    /// Load every ZIP's latest income (and crime grades) in one read and rank them
    Batch {
        /// JSON file mapping ZIP codes to crime grades, instead of the remote endpoint
        #[arg(long)]
        grades_file: Option<String>,
    },
    /// Classify a raw income and optional grade
    Classify {
        #[arg(long)]
        income: Option<f64>,

        #[arg(short, long)]
        grade: Option<String>,
    },
    /// List ZIP boundaries for a state
    Boundaries {
        #[arg(value_name = "STATE", default_value = "TX")]
        state: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/zip_income_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("zip_income_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let mut config = RaterConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    match cli.command {
        Commands::Series {
            zip,
            current_year,
            max_samples,
            years_back,
            grade,
            json,
        } => {
            if current_year.is_some() {
                config.current_year = current_year;
            }
            if let Some(n) = max_samples {
                config.max_samples = n;
            }
            if let Some(y) = years_back {
                config.years_back = y;
            }

            let fetcher = HistoricalSeriesFetcher::new(build_transport(&config)?);
            let series = fetcher.fetch(&zip, &config.window()?).await?;
            if series.is_empty() {
                warn!(zip = %zip, "No median income data available");
            }

            let report = ZipReport::build(&zip, &series, grade.map(CrimeGrade::new));
            if json {
                print_json(&report)?;
            } else {
                print_pretty(&report);
            }
        }
        Commands::Rank {
            zips,
            concurrency,
            grades_file,
        } => {
            rank_zips(&config, zips, concurrency, grades_file).await?;
        }
        Commands::Batch { grades_file } => {
            let transport = build_transport(&config)?;
            let cache = SessionCache::new();

            cache.load_latest_incomes(&transport).await?;
            match grades_file {
                Some(path) => {
                    cache.load_grades_file(&path).await?;
                }
                None => {
                    if let Err(e) = cache.load_crime_grades(&transport).await {
                        warn!(error = %e, "Crime grades unavailable, ranking by income only");
                    }
                }
            }

            let ranked = cache.ranked().await;
            for (zip, rank) in &ranked {
                info!(zip = %zip, rank = %rank, color = %classify::color(*rank), "Ranked ZIP");
            }
            info!(total = ranked.len(), "Batch ranking complete");
        }
        Commands::Classify { income, grade } => {
            let rank = classify::rank_with_letter(income, grade.as_deref());
            let grade_color = grade.as_deref().map(classify::grade_color);
            info!(
                ?income,
                grade = ?grade,
                rank = %rank,
                color = %classify::color(rank),
                grade_color = ?grade_color.map(|c| c.as_str()),
                "Classified"
            );
        }
        Commands::Boundaries { state } => {
            let api = GeoBoundaryClient::new(build_transport(&config)?);
            let boundaries = api.zip_boundaries(&state).await?;
            for boundary in &boundaries {
                info!(zip = %boundary.zip, "Boundary");
            }
            info!(state = %state, total = boundaries.len(), "Boundary list fetched");
        }
    }

    Ok(())
}

fn build_transport(config: &RaterConfig) -> Result<SharedTransport> {
    let client = BasicClient::with_timeouts(config.timeout, config.connect_timeout)?;
    Ok(Arc::new(HttpTransport::new(
        client,
        config.base_url.clone(),
        config.timeout,
    )))
}

/// Ranks each ZIP through a session cache and logs one report per ZIP.
async fn rank_zips(
    config: &RaterConfig,
    zips: Vec<String>,
    concurrency: usize,
    grades_file: Option<String>,
) -> Result<()> {
    let window = config.window()?;
    let fetcher = Arc::new(HistoricalSeriesFetcher::new(build_transport(config)?));
    let cache = Arc::new(SessionCache::new());
    if let Some(path) = grades_file {
        cache.load_grades_file(&path).await?;
    }

    let reports = ranking::rank_zips(fetcher, cache, zips, window, concurrency).await?;
    for report in &reports {
        print_pretty(report);
    }
    Ok(())
}
