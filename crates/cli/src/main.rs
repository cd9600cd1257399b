use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use duet_core::logging::{LoggingGuard, LoggingOptions, init_logging};
use duet_core::{AnswerProviderConfig, Config, Reply, Transcript, TranscriptEntry};
use duet_providers::{ProviderFactory, complete_with_timeout};
use duet_ui::{AnswerSettings, App, ViewMode};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Duet - AI answers and decentralized messaging in one terminal
#[derive(Parser, Debug)]
#[command(name = "duet")]
#[command(about = "A dual-mode terminal chat: uncensored AI answers and wallet-based messaging", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to duet.toml (default: ./duet.toml)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the interactive TUI
    Start {
        /// Page to open on: welcome, ai-chat or xmtp-chat
        #[arg(short, long, value_name = "VIEW", default_value = "welcome")]
        mode: ViewMode,
    },
    /// Ask the answer service one question and print the reply
    Ask {
        /// Question text (joined with spaces)
        #[arg(required = true, value_name = "QUESTION")]
        question: Vec<String>,
    },
    /// Show the resolved configuration
    Status,
    /// Write an example config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    match cli.command {
        Commands::Init { force } => cmd_init(&config_path, force),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "duet", &mut std::io::stdout());
            Ok(())
        }
        Commands::Start { mode } => {
            let config = load_config(&config_path, cli.verbose)?;
            cmd_start(config, mode, cli.verbose).await
        }
        Commands::Ask { question } => {
            let config = load_config(&config_path, cli.verbose)?;
            let _guard = setup_logging(&config, cli.verbose, true)?;
            cmd_ask(&config, &question.join(" ")).await
        }
        Commands::Status => {
            let config = load_config(&config_path, cli.verbose)?;
            cmd_status(&config, &config_path, cli.verbose);
            Ok(())
        }
    }
}

/// Load config from file, falling back to defaults when the file is absent
fn load_config(path: &Path, verbose: bool) -> Result<Config> {
    if path.exists() {
        if verbose {
            println!("{} Loading config from {}", "Info:".green().bold(), path.display());
        }
        Config::from_file(path).with_context(|| format!("Failed to load config from {}", path.display()))
    } else {
        if verbose {
            println!(
                "{} Config not found at {}, using defaults (run `duet init` to create one)",
                "Warning:".yellow().bold(),
                path.display()
            );
        }
        Config::from_toml_str("").context("Failed to build default config")
    }
}

fn setup_logging(config: &Config, verbose: bool, stderr: bool) -> Result<LoggingGuard> {
    let mut options = LoggingOptions::from(&config.logging);
    if verbose {
        options = options.with_level("debug");
    }
    if !stderr {
        options = options.without_stderr();
    }
    init_logging(options).context("Failed to initialize logging")
}

/// Start the interactive TUI
async fn cmd_start(config: Config, mode: ViewMode, verbose: bool) -> Result<()> {
    if verbose {
        println!("{} Provider: {}", "Info:".blue().bold(), config.answer.provider.name().cyan());
        println!("{} Messaging: {}", "Info:".blue().bold(), config.messaging.backend.cyan());
        println!("{} Opening on: {}", "Info:".blue().bold(), mode.cyan());
    }

    let _guard = setup_logging(&config, verbose, false)?;
    let mut app = App::from_config(&config).context("Failed to set up the app")?.with_view(mode);
    tracing::info!(view = %mode, "starting tui");
    app.run().await.context("Terminal session failed")?;
    Ok(())
}

/// Run one question through a fresh transcript and return the reply entry
async fn ask(config: &Config, question: &str) -> Result<TranscriptEntry> {
    let settings = AnswerSettings::from_config(config);
    let provider = ProviderFactory::create_from_config(&config.answer.provider, settings.timeout)?;

    let mut transcript = Transcript::new();
    let dispatch = transcript.submit(question).context("Question is empty")?;
    let reply = match complete_with_timeout(provider.as_ref(), settings.request(&dispatch.text), settings.timeout).await
    {
        Ok(answer) => Reply::Answer { content: answer.content, citations: answer.citations },
        Err(e) => {
            tracing::warn!("answer request failed: {}", e);
            Reply::Failure
        }
    };
    transcript.complete(dispatch.ticket, reply);
    transcript.last().cloned().context("No reply recorded")
}

async fn cmd_ask(config: &Config, question: &str) -> Result<()> {
    let entry = ask(config, question).await?;
    if entry.is_error {
        anyhow::bail!("{}", entry.content);
    }

    println!("{}", entry.content);
    if let Some(citations) = entry.citations.as_ref().filter(|c| !c.is_empty()) {
        println!();
        println!("{}", "Sources:".bold());
        for (n, url) in citations.iter().enumerate() {
            println!("  {} {}", format!("[{}]", n + 1).cyan(), url);
        }
    }
    Ok(())
}

/// Show the resolved configuration
fn cmd_status(config: &Config, path: &Path, verbose: bool) {
    println!("{}", "Duet Status".green().bold().underline());
    println!();

    let source = if path.exists() { path.display().to_string() } else { "defaults".to_string() };
    println!("{} Configuration", "Info:".blue().bold());
    println!("  Source: {}", source.cyan());

    println!("{} Answer service", "Info:".blue().bold());
    println!("  Provider: {}", config.answer.provider.name().cyan());
    match &config.answer.provider {
        AnswerProviderConfig::Perplexity { api_key, model, base_url } => {
            println!("  Model: {}", model.cyan());
            println!("  Endpoint: {}", base_url.cyan());
            let key_state = if api_key.trim().is_empty() { "missing".red().to_string() } else { "set".green().to_string() };
            println!("  API key: {}", key_state);
        }
        AnswerProviderConfig::Mock { responses_file } => {
            let script = responses_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "built-in".to_string());
            println!("  Script: {}", script.cyan());
        }
    }
    println!("  Timeout: {}s", config.answer.timeout_secs);

    println!("{} Messaging", "Info:".blue().bold());
    println!("  Backend: {}", config.messaging.backend.cyan());
    println!("  Echo peer: {}", config.messaging.echo_peer);

    if verbose {
        println!("{} Logging", "Info:".blue().bold());
        println!("  Level: {}", config.logging.level.cyan());
        println!("  Format: {}", config.logging.format.cyan());
        println!("  File sink: {}", if config.logging.file.enabled { config.logging.file.level.as_str() } else { "off" });
    }
}

/// Write the example config to `path`
fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    std::fs::write(path, Config::example()).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Wrote example config to {}", "Success:".green().bold(), path.display());
    Ok(())
}
