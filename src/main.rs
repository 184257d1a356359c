//! mindscan CLI - mental-health text analysis from the terminal
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use dialoguer::Input;
use mindscan::logging::{self, LogTarget};
use mindscan::render::NO_RESULT_MESSAGE;
use mindscan::session::{Completion, ResultsView, GENERIC_FAILURE_MESSAGE};
use mindscan::{chat, ui, AnalysisClient, AnalysisResponse, Config, Report, Session, Transition};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mindscan")]
#[command(author, version, about = "Mental-health text analysis from the terminal", long_about = None)]
struct Cli {
    /// Path to a config file (defaults to ./mindscan.toml or ~/.config/mindscan/mindscan.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the analysis service (overrides config and MINDSCAN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal UI (default)
    Tui,
    /// Analyze a single piece of text and print the result
    Analyze {
        /// Text to analyze; read from stdin or prompted for when omitted
        text: Option<String>,
        /// Compose the text in $EDITOR
        #[arg(long)]
        editor: bool,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Chat with the assistant line by line
    Chat,
    /// Open the results view without a result
    Results,
    /// Print the effective configuration
    Config,
    /// Print the JSON Schema of the analysis response
    Schema,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Commands that need neither config nor network
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(*shell, &mut Cli::command(), "mindscan", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Schema) => {
            let schema = schemars::schema_for!(AnalysisResponse);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            return Ok(());
        }
        _ => {}
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load()?,
    }
    .with_base_url(cli.api_url.clone())?;

    let target = match cli.command {
        None | Some(Commands::Tui) | Some(Commands::Results) => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    logging::init(&config.log, target);
    tracing::debug!(base_url = %config.api.base_url, "configuration loaded");

    let client = AnalysisClient::from_config(&config)?;

    match cli.command {
        Some(Commands::Analyze { text, editor, json }) => {
            let text = read_input(text, editor)?;
            analyze_once(&client, text, json).await?;
        }
        Some(Commands::Chat) => {
            chat::run(&client).await?;
        }
        Some(Commands::Results) => {
            ui::run(client, Session::showing(Transition::empty())).await?;
        }
        Some(Commands::Config) => {
            print!("{}", config.to_toml()?);
        }
        // Handled before the config was loaded
        Some(Commands::Schema) | Some(Commands::Completions { .. }) => {}
        None | Some(Commands::Tui) => {
            // Default: Launch the TUI
            ui::run(client, Session::new()).await?;
        }
    }

    Ok(())
}

/// Pick the text from the argument, $EDITOR, piped stdin, or a prompt
fn read_input(text: Option<String>, editor: bool) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if editor {
        return Ok(edit::edit("")?);
    }
    if !atty::is(atty::Stream::Stdin) {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    let text: String = Input::new()
        .with_prompt("How are you feeling today?")
        .allow_empty(true)
        .interact_text()?;
    Ok(text)
}

async fn analyze_once(client: &AnalysisClient, text: String, json: bool) -> anyhow::Result<()> {
    let mut session = Session::new();
    if let Some(form) = session.submission_mut() {
        form.set_input(text);
    }

    // Validation errors carry the user-facing message
    let completion = session.submit(client).await?;
    let response = match (completion, session.results()) {
        (Completion::Shown, Some(ResultsView::Found(response))) => response,
        (Completion::Shown, _) => bail!(NO_RESULT_MESSAGE),
        _ => bail!(GENERIC_FAILURE_MESSAGE),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        Report::from_response(response).print();
    }
    Ok(())
}
