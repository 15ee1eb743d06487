use anomaly_core::{Adapter, Config, DeviationCalculator, HttpHandler, OpenWeatherProvider};
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::Level;

const DEFAULT_LOG_LEVEL: Level = Level::INFO;
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "anomaly", version, about = "Temperature anomaly adapter")]
pub struct Cli {
    /// Logging verbosity. Allowed values are 'trace', 'debug', 'info', 'warn', and 'error'
    /// (case insensitive)
    #[arg(long, global = true, default_value_t = DEFAULT_LOG_LEVEL)]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the adapter over HTTP (`POST /` with the request as JSON body).
    Serve {
        /// Address to bind to.
        #[arg(long, default_value_t = DEFAULT_BIND_ADDR.into())]
        bind: SocketAddr,
    },

    /// Run a single request and print the response.
    Check {
        /// Latitude of the location.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the location.
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// One Call endpoint; defaults to "timemachine".
        #[arg(long)]
        endpoint: Option<String>,

        /// Correlation id echoed in the response.
        #[arg(long, default_value = "1")]
        id: String,
    },

    /// Store the weather API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { bind } => {
                let handler = HttpHandler::new(Arc::new(build_adapter()?));
                crate::http::serve(handler, bind).await
            }
            Command::Check {
                lat,
                lon,
                endpoint,
                id,
            } => {
                let adapter = build_adapter()?;
                let input = json!({
                    "id": id,
                    "data": { "lat": lat, "lon": lon, "endpoint": endpoint },
                });

                let res = adapter.execute(&input).await;
                println!("{}", serde_json::to_string_pretty(&res.body)?);

                if !res.is_success() {
                    bail!("request failed with status {}", res.status);
                }
                Ok(())
            }
            Command::Configure => configure(),
        }
    }
}

fn build_adapter() -> anyhow::Result<Adapter<OpenWeatherProvider>> {
    let config = Config::from_environment()?;
    let provider = OpenWeatherProvider::from_config(&config)?;
    tracing::debug!(message = "weather provider configured", api_url = %config.api_url);

    Ok(Adapter::new(DeviationCalculator::new(provider)))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}
