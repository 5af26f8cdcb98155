use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use reqwest::{Client, Response};
use serde_json::json;

#[derive(Parser)]
#[command(name = "crop-advisor-cli")]
#[command(about = "Crop advisor CLI", long_about = None)]
struct Cli {
    #[arg(short, long, env = "CROP_ADVISOR_ENDPOINT", default_value = "http://localhost:8000")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a crop for the given conditions
    Predict {
        /// Temperature in degrees Celsius
        #[arg(short, long, allow_negative_numbers = true)]
        temperature: f64,

        /// Relative humidity in percent
        #[arg(short = 'u', long)]
        humidity: f64,
    },

    /// Recommend a crop from the latest sensor reading
    Sensor,

    /// Check server health
    Health,

    /// Show the loaded model
    Model,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();
    let endpoint = cli.endpoint.trim_end_matches('/');

    let response = match cli.command {
        Commands::Predict {
            temperature,
            humidity,
        } => client
            .post(format!("{}/predict", endpoint))
            .json(&json!({
                "temperature": temperature,
                "humidity": humidity,
            }))
            .send()
            .await
            .context("Failed to reach the crop advisor")?,

        Commands::Sensor => client
            .get(format!("{}/sensor-data", endpoint))
            .send()
            .await
            .context("Failed to reach the crop advisor")?,

        Commands::Health => client
            .get(format!("{}/health", endpoint))
            .send()
            .await
            .context("Failed to reach the crop advisor")?,

        Commands::Model => client
            .get(format!("{}/v1/model", endpoint))
            .send()
            .await
            .context("Failed to reach the crop advisor")?,
    };

    print_response(response).await
}

async fn print_response(response: Response) -> anyhow::Result<()> {
    let status = response.status();
    let body: serde_json::Value = response
        .json()
        .await
        .context("Server returned a non-JSON response")?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        bail!("Request failed with status {}", status);
    }
    Ok(())
}
