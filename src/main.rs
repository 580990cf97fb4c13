// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info};
use std::io::{Read, Write};
use std::path::PathBuf;

use overlay_translator::app_config::{Config, LogLevel};
use overlay_translator::errors::AppError;
use overlay_translator::layout::{OverlayPayload, Rect};
use overlay_translator::providers::ProviderKind;
use overlay_translator::session::{SessionConfigPatch, SessionId};
use overlay_translator::Controller;

/// CLI Wrapper for ProviderKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliProvider {
    Ollama,
    Google,
}

impl From<CliProvider> for ProviderKind {
    fn from(cli_provider: CliProvider) -> Self {
        match cli_provider {
            CliProvider::Ollama => ProviderKind::Ollama,
            CliProvider::Google => ProviderKind::Google,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Session selector: an explicit id or a process id
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SessionArgs {
    /// Session identifier (letters, digits, '-' and '_')
    #[arg(long)]
    session: Option<SessionId>,

    /// Process id of the overlay target; becomes a 16-digit hex session id
    #[arg(long)]
    pid: Option<u64>,
}

impl SessionArgs {
    fn resolve(&self) -> Result<SessionId> {
        match (&self.session, self.pid) {
            (Some(session), _) => Ok(session.clone()),
            (None, Some(pid)) => Ok(SessionId::from_pid(pid)),
            (None, None) => Err(anyhow!("Either --session or --pid is required")),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate recognized text and fit it into an overlay rectangle
    Translate(TranslateArgs),

    /// Show or change a session's config
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Inspect a session's translation cache
    #[command(subcommand)]
    Cache(CacheCommand),

    /// Generate shell completions for overlay-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Left edge of the overlay rectangle
    #[arg(long, allow_hyphen_values = true)]
    x: i32,

    /// Top edge of the overlay rectangle
    #[arg(long, allow_hyphen_values = true)]
    y: i32,

    /// Width of the overlay rectangle
    #[arg(long)]
    width: u32,

    /// Height of the overlay rectangle
    #[arg(long)]
    height: u32,

    /// Recognized text; read from stdin when omitted
    #[arg(value_name = "TEXT")]
    text: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the session config as JSON
    Show {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Apply a JSON patch, e.g. '{"caching": {"use_cache": false}}'
    Set {
        #[command(flatten)]
        session: SessionArgs,

        /// Patch with the same sections as the config
        #[arg(value_name = "PATCH_JSON")]
        patch: String,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommand {
    /// Entry counts of every cache store of a session
    Stats {
        #[command(flatten)]
        session: SessionArgs,
    },
}

/// Overlay Translator - translate recognized screen text into a fitted overlay
#[derive(Parser, Debug)]
#[command(name = "overlay-translator")]
#[command(version)]
#[command(about = "Translate recognized screen text and fit it into an overlay rectangle")]
#[command(long_about = "Translates text recognized in a captured screen region and computes the
largest font size and line wrapping that fit the region.

EXAMPLES:
    overlay-translator translate --pid 4242 --x 10 --y 20 --width 200 --height 50 \"Hello there.\"
    echo \"Hello there.\" | overlay-translator translate --session game --x 0 --y 0 --width 300 --height 80
    overlay-translator config show --session game
    overlay-translator config set --session game '{\"translation\": {\"dest_lang\": \"ukr\"}}'
    overlay-translator cache stats --session game
    overlay-translator completions bash > overlay-translator.bash

CONFIGURATION:
    Application settings are stored in conf.json by default. If the file doesn't
    exist, a default one will be created automatically. Session settings live in
    the data directory as <session>.json.

SUPPORTED PROVIDERS:
    ollama - Local Ollama server
    google - Google web translation")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config: PathBuf,

    /// Translation provider to use
    #[arg(short, long, value_enum, global = true)]
    provider: Option<CliProvider>,

    /// Directory for session configs and caches
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // Initialize the logger once; the level is updated after loading the config
    if CustomLogger::init(LevelFilter::Warn).is_err() {
        eprintln!("Logger already initialized");
    }

    let cli = CommandLineOptions::parse();

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        let code = match e.downcast_ref::<AppError>() {
            Some(app_error) if app_error.is_input_error() => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}

async fn run(cli: CommandLineOptions) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "overlay-translator", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.into());

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Translate(args) => run_translate(&controller, args).await,
        Commands::Config(ConfigCommand::Show { session }) => {
            let config = controller.session_config(&session.resolve()?).await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Config(ConfigCommand::Set { session, patch }) => {
            let session = session.resolve()?;
            let patch = SessionConfigPatch::from_json(&patch).map_err(AppError::from)?;
            let config = controller.update_session_config(&session, patch).await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::Cache(CacheCommand::Stats { session }) => {
            let session = session.resolve()?;
            let stores = controller.cache_summary(&session)?;
            if stores.is_empty() {
                println!("No cache stores for session {}", session);
            }
            for (name, stats) in stores {
                println!("{}: {}", name, stats);
            }
            Ok(())
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load or create the app config and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config)?;

    if let Some(provider) = &cli.provider {
        config.provider = provider.clone().into();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = Some(data_dir.clone());
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_translate(controller: &Controller, args: TranslateArgs) -> Result<()> {
    let session = args.session.resolve()?;
    let rect = Rect::new(args.x, args.y, args.width, args.height).map_err(AppError::from)?;

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read text from stdin")?;
            buffer
        }
    };

    let plan = controller.fit_and_translate(&session, &text, &rect).await?;
    info!(
        "Fitted {} line(s) at font size {}{}",
        plan.wrapped_lines.len(),
        plan.font_size,
        if plan.fits { "" } else { " (overflowing)" }
    );

    println!("{}", serde_json::to_string(&OverlayPayload::from(&plan))?);
    Ok(())
}
