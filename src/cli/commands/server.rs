use clap::Subcommand;
use serde_json::Value;

use crate::cli::{utils, OutputFormat};

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health status from the /health endpoint")]
    Health {
        #[arg(help = "Server URL (defaults to SURVEY_API_URL or http://localhost:3000)")]
        url: Option<String>,
    },

    #[command(about = "Show server information from the API root endpoint")]
    Info {
        #[arg(help = "Server URL (defaults to SURVEY_API_URL or http://localhost:3000)")]
        url: Option<String>,
    },
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Health { url } => fetch(&output_format, &url, "/health").await,
        ServerCommands::Info { url } => fetch(&output_format, &url, "/").await,
    }
}

fn base_url(url: &Option<String>) -> String {
    url.clone()
        .or_else(|| std::env::var("SURVEY_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:3000".to_string())
}

async fn fetch(output_format: &OutputFormat, url: &Option<String>, path: &str) -> anyhow::Result<()> {
    let target = format!("{}{}", base_url(url).trim_end_matches('/'), path);

    let response = match reqwest::get(&target).await {
        Ok(r) => r,
        Err(e) => {
            utils::output_error(output_format, &format!("{}: {}", target, e), Some("UNREACHABLE"))?;
            anyhow::bail!("server unreachable");
        }
    };

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        utils::output_success(
            output_format,
            &format!("{} -> {}", target, status),
            body.get("data").cloned().map(|data| serde_json::json!({ "data": data })),
        )
    } else {
        utils::output_error(output_format, &format!("{} -> {}: {}", target, status, body), None)
    }
}
