use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use hotspot_api::RestApi;
use hotspot_inference::{CrimeQuery, InferenceContext};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Crime hotspot prediction
#[derive(Parser, Debug)]
#[command(name = "hotspot")]
#[command(about = "Predict a reporting district from date, time and location", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Common {
    /// Path to the model artifact (feature manifest, scaler, classifier)
    #[arg(short, long, default_value = "./artifacts/la_crime.json")]
    artifact: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API
    Serve {
        #[command(flatten)]
        common: Common,

        /// HTTP API port
        #[arg(long, default_value_t = 8080)]
        http_port: u16,
    },
    /// Predict a single reporting district
    Predict {
        #[command(flatten)]
        common: Common,

        /// Date reported (YYYY-MM-DD)
        #[arg(long)]
        date_rptd: NaiveDate,

        /// Date occurred (YYYY-MM-DD)
        #[arg(long)]
        date_occ: NaiveDate,

        /// Time occurred (HHMM, 0-2359)
        #[arg(long)]
        time_occ: u32,

        /// Area name, e.g. Hollywood
        #[arg(long)]
        area_name: String,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
    /// Print the feature names the model expects
    Schema {
        #[command(flatten)]
        common: Common,
    },
}

impl Command {
    fn common(&self) -> &Common {
        match self {
            Command::Serve { common, .. }
            | Command::Predict { common, .. }
            | Command::Schema { common } => common,
        }
    }
}

fn init_logging(log_level: &str) -> anyhow::Result<()> {
    let log_level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_context(common: &Common) -> anyhow::Result<InferenceContext> {
    InferenceContext::load(&common.artifact)
        .with_context(|| format!("loading model artifact {:?}", common.artifact))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.command.common().log_level)?;

    let context = load_context(cli.command.common())?;

    match cli.command {
        Command::Serve { http_port, .. } => serve(context, http_port).await,
        Command::Predict {
            date_rptd,
            date_occ,
            time_occ,
            area_name,
            lat,
            lon,
            ..
        } => {
            let query = CrimeQuery {
                date_rptd,
                date_occ,
                time_occ,
                area_name,
                lat,
                lon,
            };
            let prediction = context.predict_query(&query)?;
            println!("Predicted Reporting District: {}", prediction.label);
            Ok(())
        }
        Command::Schema { .. } => {
            println!("{}", serde_json::to_string_pretty(context.schema())?);
            Ok(())
        }
    }
}

async fn serve(context: InferenceContext, http_port: u16) -> anyhow::Result<()> {
    info!("Starting hotspot v{}", env!("CARGO_PKG_VERSION"));

    let context = Arc::new(context);
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(context, http_port).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
