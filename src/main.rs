//! CLI entry point for the Opiniauto client.
//!
//! Provides subcommands for browsing the car catalog, rendering a car's review
//! metrics, aggregating review dumps offline, and a few signed-in actions.

use anyhow::Result;
use clap::{Parser, Subcommand};
use opiniauto::config::Config;
use opiniauto::fetch::{BasicClient, HttpClient, fetch_bytes};
use opiniauto::infra::opiniauto::OpiniautoClient;
use opiniauto::metrics::car_metrics;
use opiniauto::models::ReviewDocument;
use opiniauto::normalize::normalize_reviews;
use opiniauto::models::Category;
use opiniauto::output::{MetricsRecord, append_record, print_json, print_pretty, print_summary};
use opiniauto::services::{
    AccountApi, delete_review, list_active_cars, list_all_cars, load_car_details, register,
    reviews_from_document, save_car, search_cars, sign_in, submit_review, toggle_car_active,
};
use opiniauto::session::Session;
use opiniauto::submission::{CarDraft, Registration, ReviewSubmission};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "opiniauto")]
#[command(about = "Browse cars and their review metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List cars in the catalog
    ListCars {
        /// Only show cars whose brand or model contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Include inactive cars
        #[arg(short, long, default_value_t = false)]
        all: bool,
    },
    /// Show a car with its reviews and metrics
    Show {
        #[arg(value_name = "CAR_ID")]
        car_id: String,

        /// CSV file to append the metrics to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Aggregate a JSON review dump from a file or URL
    Metrics {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
    /// Create an account with the configured email and password
    Register {
        /// Display name, at least 3 characters
        #[arg(long)]
        name: String,
    },
    /// Review a car; every rating is 1 to 5 stars
    Review {
        #[arg(value_name = "CAR_ID")]
        car_id: String,

        #[arg(long)]
        performance: u8,

        #[arg(long)]
        comfort: u8,

        #[arg(long)]
        consumption: u8,

        #[arg(long)]
        design: u8,

        #[arg(long)]
        cost_benefit: u8,

        /// At least 10 characters
        #[arg(short, long)]
        comment: String,
    },
    /// Delete one of your own reviews
    DeleteReview {
        #[arg(value_name = "CAR_ID")]
        car_id: String,

        #[arg(value_name = "REVIEW_ID")]
        review_id: String,
    },
    /// Activate or deactivate a car (admin only)
    ToggleCar {
        #[arg(value_name = "CAR_ID")]
        car_id: String,
    },
    /// Edit a car's brand, model or year (admin only)
    EditCar {
        #[arg(value_name = "CAR_ID")]
        car_id: String,

        #[arg(long)]
        brand: Option<String>,

        #[arg(long)]
        model: Option<String>,

        #[arg(long)]
        year: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = Config::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("opiniauto.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let http = BasicClient::with_timeout(config.timeout)?;

    match cli.command {
        Commands::ListCars { search, all } => {
            let api = OpiniautoClient::new(&config.api_url, http)?;
            let cars = if all {
                list_all_cars(&api).await?
            } else {
                list_active_cars(&api).await?
            };

            let shown = search_cars(&cars, search.as_deref().unwrap_or(""));
            for car in &shown {
                info!(
                    car_id = %car.id,
                    car = %car.display_name(),
                    category = car.category.as_deref().unwrap_or("-"),
                    active = car.active,
                    "Car"
                );
            }
            info!(total = cars.len(), shown = shown.len(), "Car list summary");
        }
        Commands::Show { car_id, output } => {
            let api = OpiniautoClient::new(&config.api_url, http)?;
            let details = load_car_details(&api, &car_id).await?;

            print_summary(&details.car.display_name(), &details.metrics);
            for review in &details.reviews {
                info!(
                    review_id = %review.id,
                    author = review.author_name(),
                    comment = %review.comment,
                    "Review"
                );
            }
            print_pretty(&details.metrics);

            if let Some(path) = output {
                append_record(&path, &MetricsRecord::from_details(&details))?;
                info!(path, "Metrics appended");
            }
        }
        Commands::Metrics { source } => {
            let bytes = fetcher(&http, &source).await?;
            let document: ReviewDocument = serde_json::from_slice(&bytes)?;
            let reviews = normalize_reviews(reviews_from_document(document));
            let metrics = car_metrics(&reviews);

            print_summary(&source, &metrics);
            print_json(&metrics)?;
        }
        Commands::Register { name } => {
            let api = OpiniautoClient::new(&config.api_url, http)?;
            let credentials = config.credentials()?;
            let registration = Registration {
                name,
                email: credentials.email,
                confirm_password: credentials.password.clone(),
                password: credentials.password,
            };

            register(&api, &registration).await?;
        }
        Commands::Review {
            car_id,
            performance,
            comfort,
            consumption,
            design,
            cost_benefit,
            comment,
        } => {
            let mut submission = ReviewSubmission {
                comment,
                ..Default::default()
            };
            for (category, stars) in Category::ALL
                .into_iter()
                .zip([performance, comfort, consumption, design, cost_benefit])
            {
                submission.set_rating(category, stars);
            }

            let api = OpiniautoClient::new(&config.api_url, http)?;
            let session = login(&api, &config).await?;
            let result = submit_review(&api, &session, &car_id, &submission).await;
            session.logout();
            result?;

            let details = load_car_details(&api, &car_id).await?;
            print_summary(&details.car.display_name(), &details.metrics);
        }
        Commands::DeleteReview { car_id, review_id } => {
            let api = OpiniautoClient::new(&config.api_url, http)?;
            let session = login(&api, &config).await?;

            let mut details = load_car_details(&api, &car_id).await?;
            let result = delete_review(&api, &session, &mut details, &review_id).await;
            session.logout();
            result?;

            print_summary(&details.car.display_name(), &details.metrics);
        }
        Commands::ToggleCar { car_id } => {
            let api = OpiniautoClient::new(&config.api_url, http)?;
            let session = login(&api, &config).await?;

            let details = load_car_details(&api, &car_id).await?;
            let result = toggle_car_active(&api, &session, &details.car).await;
            session.logout();

            let active = result?;
            info!(car_id, active, "Car status updated");
        }
        Commands::EditCar {
            car_id,
            brand,
            model,
            year,
        } => {
            let api = OpiniautoClient::new(&config.api_url, http)?;
            let session = login(&api, &config).await?;

            let details = load_car_details(&api, &car_id).await?;
            let mut draft = CarDraft::from_car(&details.car);
            draft.brand = brand.unwrap_or(draft.brand);
            draft.model = model.unwrap_or(draft.model);
            draft.year = year.unwrap_or(draft.year);

            let result = save_car(&api, &session, Some(&car_id), &draft).await;
            session.logout();
            result?;

            info!(car_id, brand = %draft.brand, model = %draft.model, "Car updated");
        }
    }

    Ok(())
}

/// Loads review data from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(client))]
async fn fetcher<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        fetch_bytes(client, source).await?
    } else {
        std::fs::read(source)?
    };
    Ok(bytes)
}

/// Logs in with the configured credentials.
async fn login<A: AccountApi>(api: &A, config: &Config) -> Result<Session> {
    sign_in(api, &config.credentials()?).await
}
