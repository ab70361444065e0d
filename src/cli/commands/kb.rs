use clap::Subcommand;
use serde_json::Value;

use crate::cli::client::ApiClient;
use crate::cli::utils::{entry_details, entry_line, output_collection};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum KbCommands {
    #[command(about = "List knowledge base entries, newest first")]
    List,

    #[command(about = "Show one knowledge base entry")]
    Show {
        #[arg(help = "Entry id (id_conhecimento)")]
        id: String,
    },
}

pub async fn handle(client: &ApiClient, cmd: KbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        KbCommands::List => {
            let data = client.get("/api/conhecimento").await?;
            let entries = match data {
                Value::Array(entries) => entries,
                _ => Vec::new(),
            };
            output_collection(
                &output_format,
                &entries,
                "No knowledge base entries",
                entry_line,
            )
        }
        KbCommands::Show { id } => {
            let entry = client.get(&format!("/api/conhecimento/{}", id)).await?;
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entry)?),
                OutputFormat::Text => println!("{}", entry_details(&entry)),
            }
            Ok(())
        }
    }
}
