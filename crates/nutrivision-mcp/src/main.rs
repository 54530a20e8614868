//! NutriVision MCP Server — entry point.

use std::sync::Arc;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use nutrivision::{
    data_url_from_file, NutritionAnalyzer, NutritionRecord, VisionClient, VisionConfig,
};
use nutrivision_mcp::config::{resolve_addr, resolve_api_key, API_KEY_ENV};
use nutrivision_mcp::protocol::ProtocolHandler;
use nutrivision_mcp::tools::ToolRegistry;
use nutrivision_mcp::transport::{HttpTransport, StdioTransport};

#[derive(Parser)]
#[command(
    name = "nutrivision-mcp",
    about = "MCP server for NutriVision — nutrition facts from food photos",
    version
)]
struct Cli {
    #[command(flatten)]
    vision: VisionArgs,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct VisionArgs {
    /// Vision API key. Also reads from OPENAI_API_KEY env var.
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Chat-completion endpoint URL.
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Vision-capable model identifier.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Maximum completion tokens per analysis.
    #[arg(long, global = true)]
    max_tokens: Option<u32>,
}

impl VisionArgs {
    fn to_config(&self) -> VisionConfig {
        let defaults = VisionConfig::default();
        VisionConfig {
            api_key: resolve_api_key(self.api_key.as_deref()),
            endpoint: self.endpoint.clone().unwrap_or(defaults.endpoint),
            model: self.model.clone().unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over HTTP (default).
    Serve {
        /// Listen address (host:port). Also reads from NUTRIVISION_ADDR env var.
        #[arg(long)]
        addr: Option<String>,
    },

    /// Start MCP server over stdio.
    ServeStdio,

    /// Analyze one image and print the nutrition record.
    Analyze {
        /// Image URL or data URL.
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        image: Option<String>,

        /// Local image file (png, jpeg, webp, gif).
        #[arg(long)]
        file: Option<String>,
    },

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   nutrivision-mcp completions bash > ~/.local/share/bash-completion/completions/nutrivision-mcp
    ///   nutrivision-mcp completions zsh > ~/.zfunc/_nutrivision-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

fn build_client(args: &VisionArgs) -> VisionClient {
    let client = VisionClient::new(args.to_config());
    let config = client.config();
    if config.api_key.is_empty() {
        tracing::warn!("{API_KEY_ENV} is not set; vision requests will be rejected upstream");
    }
    tracing::info!("Vision model: {} at {}", config.model, config.endpoint);
    client
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve { addr: None }) {
        Commands::Serve { addr } => {
            let addr = resolve_addr(addr.as_deref());
            tracing::info!("NutriVision MCP server");
            let handler = ProtocolHandler::new(Arc::new(build_client(&cli.vision)));
            let transport = HttpTransport::new(handler);
            transport.run(&addr).await?;
        }

        Commands::ServeStdio => {
            let handler = ProtocolHandler::new(Arc::new(build_client(&cli.vision)));
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        Commands::Analyze { image, file } => {
            let image_url = match (image, file) {
                (Some(url), _) => url,
                (None, Some(path)) => data_url_from_file(&path)?,
                (None, None) => anyhow::bail!("either --image or --file is required"),
            };

            let client = build_client(&cli.vision);
            let record = client.analyze(&image_url).await?;

            match NutritionRecord::from_value(&record) {
                Ok(typed) => tracing::info!("{}", typed.summary()),
                Err(e) => tracing::warn!("Reply does not match the nutrition record shape: {e}"),
            }
            println!("{}", serde_json::to_string_pretty(&record)?);
        }

        Commands::Info => {
            let capabilities = nutrivision_mcp::types::InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "nutrivision-mcp", &mut std::io::stdout());
        }
    }

    Ok(())
}
