use anyhow::{Context, Result};
use checklist_mcp::config::Config;
use checklist_mcp::llm::OpenAiCompleter;
use checklist_mcp::persist::FsPersister;
use checklist_mcp::server::{tools, McpServer};
use checklist_mcp::{logging, ChecklistService};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "checklist-mcp",
    about = "Checklist generation tool server for editor assistants",
    version
)]
struct Args {
    /// Path to a TOML config file (defaults to ~/.config/checklist-mcp/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Completion model to use
    #[arg(long)]
    model: Option<String>,

    /// Directory checklist files are written to
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Log file, truncated at startup
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the tool descriptor as JSON and exit
    #[arg(long)]
    print_tools: bool,

    /// Generate one checklist for TOPIC, print the tool result and exit
    #[arg(long, value_name = "TOPIC")]
    once: Option<String>,

    /// Item count for --once (default: 5)
    #[arg(long, requires = "once")]
    items: Option<usize>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(file) = &self.log_file {
            config.log_file = Some(file.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_tools {
        println!("{}", serde_json::to_string_pretty(&tools::tool_definitions())?);
        return Ok(());
    }

    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);

    let log_file = logging::init(config.log_file.as_deref())?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = ?log_file,
        "Initializing MCP server..."
    );
    if !config.has_api_key() {
        warn!("OPENAI_API_KEY is not set; checklist requests will fail until it is");
    }

    let completer = OpenAiCompleter::from_config(&config)?;
    let service = ChecklistService::new(config, completer, FsPersister);

    if let Some(topic) = args.once.as_deref() {
        let response = service.create(Some(topic), args.items).await;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let server = McpServer::new(service);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    if let Err(err) = server
        .run(stdin, tokio::io::stdout())
        .await
        .context("MCP transport failed")
    {
        error!("FATAL ERROR: {:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
