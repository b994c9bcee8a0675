use clap::Subcommand;
use serde_json::json;

use crate::cli::{utils, OutputFormat};
use crate::config::AppConfig;
use crate::database::manager;

#[derive(Subcommand)]
pub enum InitCommands {
    #[command(about = "Create the surveys/responses tables and unique index")]
    Db,
}

pub async fn handle(cmd: InitCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        InitCommands::Db => {
            let config = AppConfig::from_env();
            let pool = manager::connect(&config.database)?;

            match manager::ensure_schema(&pool).await {
                Ok(()) => utils::output_success(
                    &output_format,
                    "Database schema ensured",
                    Some(json!({ "tables": ["surveys", "responses"] })),
                ),
                Err(e) => {
                    utils::output_error(&output_format, &e.to_string(), Some("SCHEMA_INIT_FAILED"))?;
                    anyhow::bail!("schema init failed");
                }
            }
        }
    }
}
