use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;
use serde_json::{json, Value};
use tourgid_agents::GuideAgent;
use tourgid_api::ApiConfig;
use tourgid_core::{Coordinates, RouteRequest, VoiceQueryInput};
use tourgid_gateway::CompletionBackend;
use tourgid_observability::{init_tracing, AppMetrics};

#[derive(Debug, Parser)]
#[command(name = "tourgid")]
#[command(about = "TourGid guide CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the attraction catalog.
    Attractions,
    /// Build the mock route toward one attraction.
    Route {
        destination_id: String,
        #[arg(long = "preference")]
        preferences: Vec<String>,
    },
    /// Run a voice query through the configured language model.
    Ask {
        query: String,
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
    },
    /// Exercise every endpoint of a running backend.
    Smoke {
        #[arg(long, env = "TOURGID_BACKEND_URL", default_value = "http://localhost:8000")]
        base_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("tourgid_cli");
    let cli = Cli::parse();

    match cli.command {
        Command::Attractions => {
            let agent = build_agent()?;
            println!("{}", serde_json::to_string_pretty(agent.attractions())?);
        }
        Command::Route {
            destination_id,
            preferences,
        } => {
            let agent = build_agent()?;
            let reply = agent
                .generate_route(RouteRequest {
                    destination_id,
                    preferences: Some(preferences),
                    user_location: None,
                })
                .context("route generation failed")?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Command::Ask { query, lat, lon } => {
            let agent = build_agent()?;
            let user_location = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
            let reply = agent
                .process_voice_query(VoiceQueryInput {
                    query,
                    user_location,
                })
                .await
                .context("voice query failed")?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
        Command::Smoke { base_url } => run_smoke(&base_url).await?,
    }

    Ok(())
}

fn build_agent() -> Result<GuideAgent<CompletionBackend>> {
    let config = ApiConfig::from_env();
    let catalog = config.load_catalog()?;
    let backend = config.completion_backend()?;
    Ok(GuideAgent::new(Arc::new(catalog), backend, AppMetrics::shared()))
}

async fn run_smoke(base_url: &str) -> Result<()> {
    let base_url = base_url.trim_end_matches('/');
    let client = Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .context("failed to build HTTP client")?;

    println!("Testing TourGid backend at {base_url}");

    let mut failures = 0usize;

    failures += check("health", client.get(format!("{base_url}/health")), |body| {
        format!("status={}", body["status"])
    })
    .await;

    failures += check("root", client.get(format!("{base_url}/")), |body| {
        format!("message={}", body["message"])
    })
    .await;

    failures += check(
        "attractions",
        client.get(format!("{base_url}/attractions")),
        |body| format!("count={} first={}", body["count"], body["data"][0]["name"]),
    )
    .await;

    failures += check(
        "process-voice",
        client
            .post(format!("{base_url}/ai/process-voice"))
            .json(&json!({
                "query": "Найди маршрут к Байтереку",
                "user_location": { "latitude": 52.3, "longitude": 76.95 }
            })),
        |body| {
            format!(
                "intent={} response={}",
                body["data"]["intent"], body["data"]["response_text"]
            )
        },
    )
    .await;

    failures += check(
        "generate-route",
        client
            .post(format!("{base_url}/ai/generate-route"))
            .json(&json!({
                "destination_id": "ast001",
                "preferences": ["scenic", "historical"]
            })),
        |body| {
            format!(
                "destination={} distance_km={}",
                body["data"]["destination"]["name"], body["data"]["route"]["estimated_distance"]
            )
        },
    )
    .await;

    if failures > 0 {
        bail!("{failures} smoke check(s) failed");
    }
    println!("all smoke checks passed");
    Ok(())
}

async fn check(
    name: &str,
    request: reqwest::RequestBuilder,
    describe: impl Fn(&Value) -> String,
) -> usize {
    match request.send().await {
        Ok(response) if response.status().is_success() => {
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            println!("ok   {name}: {}", describe(&body));
            0
        }
        Ok(response) => {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            println!("FAIL {name}: status {status}: {body}");
            1
        }
        Err(error) => {
            println!("FAIL {name}: {error}");
            1
        }
    }
}
