use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use taskpilot::assistant::{Assistant, TerminalConsole};
use taskpilot::audit::SessionLogger;
use taskpilot::config::Config;
use taskpilot::error::AppResult;
use taskpilot::llm::OpenAIClient;
use taskpilot::preview;
use taskpilot::security::SafetyGate;
use taskpilot::shell::{CommandExecutor, EscalationPolicy, EscalationSession};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "taskpilot",
    version,
    about = "Turn task descriptions into vetted shell commands"
)]
struct Cli {
    /// Config file (default: ~/.config/taskpilot/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Classify and log commands without running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Session log file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Completion model
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive assistant (default)
    Run,
    /// Show how replacing a file with new content would change it
    Preview {
        /// File that would be written
        path: PathBuf,
        /// File holding the proposed content
        proposed: PathBuf,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = dispatch(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn resolve_config_path(explicit: Option<PathBuf>) -> AppResult<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(Config::config_path()?),
    }
}

async fn dispatch(cli: Cli) -> AppResult<()> {
    match cli.command {
        Some(Commands::Preview {
            ref path,
            ref proposed,
        }) => {
            let content = fs::read_to_string(proposed)?;
            let result = preview::preview(path, &content)?;
            preview::print_preview(path, &result);
            Ok(())
        }
        Some(Commands::Init { force }) => {
            let config_path = resolve_config_path(cli.config)?;
            if config_path.exists() && !force {
                println!(
                    "Config already exists at {} (use --force to overwrite)",
                    config_path.display()
                );
                return Ok(());
            }
            Config::default_config().save_to(&config_path)?;
            println!("Wrote default config to {}", config_path.display());
            Ok(())
        }
        Some(Commands::Run) | None => {
            let config_path = resolve_config_path(cli.config)?;
            // Validated once, after CLI flags are layered on
            let mut config = Config::read_from(&config_path)?;
            config.apply_cli_overrides(cli.dry_run, cli.log_file, cli.model);
            config.validate()?;

            run_assistant(config).await
        }
    }
}

async fn run_assistant(config: Config) -> AppResult<()> {
    let client = OpenAIClient::from_config(&config.llm)?;
    let logger = SessionLogger::with_path(&config.behavior.log_path)?;

    let gate = SafetyGate::with_lists(config.safety.allow.clone(), config.safety.deny.clone());
    let executor = CommandExecutor::with_shell(
        config.escalation.shell.clone(),
        EscalationPolicy::new(
            config.escalation.keyword.clone(),
            config.escalation.replacement.clone(),
        ),
    );

    tracing::debug!(
        model = client.model(),
        dry_run = config.behavior.dry_run,
        log = %config.behavior.log_path.display(),
        "starting assistant"
    );

    let mut assistant = Assistant::new(Box::new(client), TerminalConsole, logger)
        .with_gate(gate)
        .with_executor(executor)
        .with_session(EscalationSession::interactive())
        .with_dry_run(config.behavior.dry_run);

    assistant.run().await
}
