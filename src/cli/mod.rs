pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use client::ApiClient;

#[derive(Parser)]
#[command(name = "acad")]
#[command(about = "acad - command-line client for the Academic API")]
#[command(version)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "ACAD_SERVER",
        default_value = "http://localhost:8000",
        help = "Base URL of the API server"
    )]
    pub server: String,

    #[arg(long, global = true, env = "ACAD_TOKEN", hide_env_values = true, help = "Bearer token")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check server health status from the /health endpoint")]
    Health,

    #[command(about = "Upload a document into the knowledge base")]
    Upload {
        #[arg(help = "Path of the PDF, TXT, DOC or DOCX file")]
        path: std::path::PathBuf,
        #[arg(long, short, help = "Subject name (nome_disciplina)")]
        subject: String,
    },

    #[command(about = "Knowledge base queries")]
    Kb {
        #[command(subcommand)]
        cmd: commands::kb::KbCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::new(&cli.server, cli.token.clone())?;

    match cli.command {
        Commands::Health => commands::health::handle(&client, output_format).await,
        Commands::Upload { path, subject } => {
            commands::upload::handle(&client, &path, &subject, output_format).await
        }
        Commands::Kb { cmd } => commands::kb::handle(&client, cmd, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upload_with_subject() {
        let cli = Cli::try_parse_from([
            "acad",
            "--server",
            "http://api.test",
            "upload",
            "ementa.pdf",
            "--subject",
            "Cálculo I",
        ])
        .unwrap();

        assert_eq!(cli.server, "http://api.test");
        match cli.command {
            Commands::Upload { path, subject } => {
                assert_eq!(path, std::path::PathBuf::from("ementa.pdf"));
                assert_eq!(subject, "Cálculo I");
            }
            _ => panic!("expected upload"),
        }
    }

    #[test]
    fn upload_requires_subject() {
        assert!(Cli::try_parse_from(["acad", "upload", "ementa.pdf"]).is_err());
    }

    #[test]
    fn json_flag_selects_json_output() {
        let cli = Cli::try_parse_from(["acad", "--json", "kb", "list"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
    }
}
