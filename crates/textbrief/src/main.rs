mod commands;
mod context;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use textbrief_common::{logger, AppConfig};
use textbrief_llm::{length_from_slider, CancellationToken, SummarizationRequest};

use crate::commands::{Input, ProviderOverride};
use crate::context::ClientContext;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root, or from the working directory when there is none
fn load_dotenv(project_root: Option<PathBuf>) {
    if let Some(root) = project_root {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }
}

/// Load .env before parsing so clap's `env` fallbacks can see it
fn parse_cli<I, T>(project_root: Option<PathBuf>, args: I) -> std::result::Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    load_dotenv(project_root);
    Cli::try_parse_from(args)
}

#[derive(Parser)]
#[command(name = "textbrief")]
#[command(about = "TextBrief - summarize and grammar-check documents with your own LLM provider key", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct InputArgs {
    /// Text to process
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Document to process (.txt, .pdf, .doc, .docx)
    #[arg(long)]
    file: Option<PathBuf>,
}

impl InputArgs {
    fn into_input(self) -> Input {
        match (self.text, self.file) {
            (Some(text), _) => Input::Text(text),
            (None, Some(path)) => Input::File(path),
            (None, None) => Input::Stdin,
        }
    }
}

#[derive(Args)]
struct ProviderArgs {
    /// Provider override (openai, mistral, anthropic)
    #[arg(long)]
    provider: Option<String>,

    /// API key override
    #[arg(long, env = "TEXTBRIEF_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

impl From<ProviderArgs> for ProviderOverride {
    fn from(args: ProviderArgs) -> Self {
        Self {
            provider: args.provider,
            api_key: args.api_key,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    #[command(flatten)]
    Client(ClientCommands),
}

/// Commands that run against the local client context
#[derive(Subcommand)]
enum ClientCommands {
    /// Summarize text or a document
    Summarize {
        #[command(flatten)]
        input: InputArgs,

        /// paragraph, bullet or custom
        #[arg(long, default_value = "paragraph")]
        mode: String,

        /// Length factor in (0, 1]
        #[arg(long, conflicts_with = "level")]
        length: Option<f64>,

        /// Slider stop 0-3 (mapped to 0.25, 0.5, 0.75, 1.0)
        #[arg(long)]
        level: Option<u8>,

        /// Instructions for custom mode
        #[arg(long)]
        instructions: Option<String>,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Check grammar, spelling and style
    Grammar {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Print the text extracted from a document
    Extract {
        /// Document path
        file: PathBuf,
    },

    /// Show recent results
    History {
        /// Remove all entries
        #[arg(long)]
        clear: bool,
    },

    /// Show or change the saved provider settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print saved settings (key masked)
    Show,

    /// Save provider and API key
    Set {
        #[arg(long)]
        provider: String,

        #[arg(long)]
        api_key: String,
    },
}

/// Cancel the token on Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    token
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_cli(find_project_root(), std::env::args_os()).unwrap_or_else(|e| e.exit());

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            // CLI arguments override environment values
            if let Some(host) = &host {
                std::env::set_var("SERVER_HOST", host);
            }
            if let Some(port) = port {
                std::env::set_var("SERVER_PORT", port.to_string());
            }

            let config = AppConfig::from_env()?;
            serve(config).await?;
        }
        None => {
            let config = AppConfig::from_env()?;
            serve(config).await?;
        }
        Some(Commands::Client(command)) => {
            let config = AppConfig::from_env()?;
            logger::setup_console_logging(&config.log_level)?;
            let mut context = ClientContext::load(&config.data_dir)?;
            run(command, &config, &mut context).await?;
        }
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    config.ensure_directories()?;
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("TextBrief starting...");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Request timeout: {:?}", config.request_timeout());

    println!("Server listening on http://{}", config.server_bind_address());

    textbrief_server::start_server(config).await?;
    Ok(())
}

async fn run(command: ClientCommands, config: &AppConfig, context: &mut ClientContext) -> Result<()> {
    match command {
        ClientCommands::Summarize {
            input,
            mode,
            length,
            level,
            instructions,
            provider,
        } => {
            let text = commands::read_input(config, input.into_input()).await?;
            let length = length
                .or_else(|| level.map(length_from_slider))
                .unwrap_or_else(|| length_from_slider(1));
            let request = SummarizationRequest::new(text, &mode, length, instructions)?;
            let output =
                commands::run_request(config, context, request, provider.into(), cancel_on_ctrl_c())
                    .await?;
            println!("{}", output);
        }
        ClientCommands::Grammar { input, provider } => {
            let text = commands::read_input(config, input.into_input()).await?;
            let request = SummarizationRequest::grammar(text)?;
            let output =
                commands::run_request(config, context, request, provider.into(), cancel_on_ctrl_c())
                    .await?;
            println!("{}", output);
        }
        ClientCommands::Extract { file } => {
            let text = commands::extract_file(config, &file).await?;
            println!("{}", text);
        }
        ClientCommands::History { clear } => {
            if clear {
                context.history.clear();
                context.save()?;
                println!("History cleared");
            } else {
                for entry in context.history.entries() {
                    let when = chrono::DateTime::from_timestamp_millis(entry.timestamp)
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    println!("[{}] {} ({})", when, entry.mode, entry.id);
                    println!("{}\n", entry.output_text);
                }
            }
        }
        ClientCommands::Settings { action } => match action {
            Some(SettingsAction::Set { provider, api_key }) => {
                commands::set_settings(context, provider, api_key)?;
                println!("{}", commands::describe_settings(&context.settings));
            }
            Some(SettingsAction::Show) | None => {
                println!("{}", commands::describe_settings(&context.settings));
            }
        },
    }

    Ok(())
}
