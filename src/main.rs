//! Jyotish - terminal client for Vedic birth charts
//!
//! Collects birth details, has the backend compute the chart, then opens a
//! consultation REPL that forwards questions with a focus area.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use jyotish::api::{Backend, HttpBackend};
use jyotish::config::{self, Config, Settings};
use jyotish::intake::IntakeForm;
use jyotish::repl;
use jyotish::repl::colors::{self, ansi::*};

#[derive(Parser)]
#[command(name = "jyotish")]
#[command(about = "Vedic birth chart and astrology consultation client")]
#[command(version)]
struct Args {
    /// Backend base URL
    #[arg(long, env = "JYOTISH_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "JYOTISH_TIMEOUT_SECS")]
    timeout: Option<u64>,

    /// Name (optional)
    #[arg(long)]
    name: Option<String>,

    /// Birth date, YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,

    /// Birth time, HH:MM
    #[arg(long)]
    time: Option<String>,

    /// Birth city from the built-in list, or "other"
    #[arg(long)]
    city: Option<String>,

    /// Latitude for manual locations
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    /// Longitude for manual locations
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,

    /// Time zone for manual locations
    #[arg(long)]
    tz: Option<String>,
}

impl Args {
    /// Intake defaults from the flags
    fn prefill(&self) -> IntakeForm {
        let mut form = IntakeForm::new();
        if let Some(name) = &self.name {
            form.name = name.clone();
        }
        if let Some(date) = &self.date {
            form.date = date.clone();
        }
        if let Some(time) = &self.time {
            form.time = time.clone();
        }
        if let Some(city) = &self.city {
            form.select_city(city);
        }
        if self.lat.is_some() || self.lon.is_some() {
            form.set_coordinates(
                self.lat.clone().unwrap_or_default(),
                self.lon.clone().unwrap_or_default(),
            );
        }
        if let Some(tz) = &self.tz {
            form.timezone = tz.clone();
        }
        form
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (from ~/.jyotish/.env or current dir)
    let env_path = Some(config::home_dir().join(".env")).filter(|p| p.exists());
    if let Some(path) = env_path {
        let _ = dotenvy::from_path(&path);
    } else {
        let _ = dotenvy::dotenv(); // fallback to current dir
    }

    // Initialize logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Resolve values: CLI args > env vars (handled by clap) > config file > defaults
    let settings = Settings::resolve(args.api_url.clone(), args.timeout, Config::load());
    let backend = HttpBackend::new(settings.api_url.clone(), settings.timeout)?;

    // Pretty startup banner
    println!();
    println!(
        "{}",
        colors::banner_accent(&format!("🌟 AI Jyotish Guru {}", env!("CARGO_PKG_VERSION")))
    );
    println!("{}Vedic Wisdom Meets Artificial Intelligence{}", DIM, RESET);
    println!("{}", colors::separator(50));
    println!("{}", colors::banner_line("Backend", &settings.api_url));

    match backend.health().await {
        Ok(health) => {
            let model = health.model.map(|m| format!(" ({})", m)).unwrap_or_default();
            println!(
                "{}",
                colors::banner_line("Status", &format!("{}{}{}{}", GREEN, health.status, RESET, model))
            );
        }
        Err(e) => {
            tracing::debug!("health check failed: {}", e);
            println!(
                "{}",
                colors::banner_line("Status", &format!("{}unreachable{}", YELLOW, RESET))
            );
        }
    }
    println!("{}", colors::separator(50));
    println!("Ctrl+D to exit, /help for commands once your chart is ready");
    println!();

    let prefill = args.prefill();
    let backend: Arc<dyn Backend> = Arc::new(backend);
    repl::run(backend, &settings.api_url, prefill).await
}
