// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use papertrans::app_config::{self, Config, OutputFormat, TranslationProvider};
use papertrans::errors::AppError;
use papertrans::file_utils::FileManager;
use papertrans::{Controller, language_utils};

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTranslationProvider {
    /// No translation, leave a placeholder to fill in by hand
    None,
    /// Local Ollama model
    #[value(alias = "local")]
    Ollama,
    /// Google web translate
    #[value(alias = "remote")]
    Google,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::None => TranslationProvider::None,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Google => TranslationProvider::Google,
        }
    }
}

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Docx,
    #[value(alias = "md")]
    Markdown,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Docx => OutputFormat::Docx,
            CliOutputFormat::Markdown => OutputFormat::Markdown,
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

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for papertrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// papertrans - bilingual translation of research papers
///
/// Extracts the text of a PDF, splits it into paragraphs and writes a
/// document where every paragraph is followed by its translation.
#[derive(Parser, Debug)]
#[command(name = "papertrans")]
#[command(version)]
#[command(about = "Turn a PDF paper into a bilingual document")]
#[command(long_about = "papertrans extracts the text of a PDF paper and writes a bilingual DOCX or Markdown document.

EXAMPLES:
    papertrans paper.pdf                          # Original text with placeholders
    papertrans -t ollama -m qwen2 paper.pdf       # Translate with a local Ollama model
    papertrans -t google paper.pdf                # Translate with Google
    papertrans -t google -T fr -o out.docx paper.pdf
    papertrans -f markdown paper.pdf              # Write Markdown instead of DOCX
    papertrans completions bash > papertrans.bash

CONFIGURATION:
    Configuration is stored in papertrans.json by default. You can specify a
    different file with --config-path. If the file doesn't exist, a default one
    will be created automatically. Command line flags override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// PDF file to translate
    #[arg(value_name = "PDF_PATH")]
    pdf_path: Option<PathBuf>,

    /// Output file (default: <pdf name>_translation.<ext> in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation backend
    #[arg(short, long, value_enum)]
    translate: Option<CliTranslationProvider>,

    /// Model name for the Ollama backend
    #[arg(short, long)]
    model: Option<String>,

    /// Source language code (e.g., 'en', 'de')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language code (e.g., 'zh-CN', 'fr')
    #[arg(short = 'T', long)]
    target_language: Option<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Configuration file path
    #[arg(short, long, default_value = "papertrans.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Switch to Google without asking when Ollama is unreachable
    #[arg(short, long)]
    yes: bool,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
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
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The level is lowered or raised once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "papertrans", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(e) = run_translate(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run_translate(options: CommandLineOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let pdf_path = options.pdf_path.clone()
        .ok_or_else(|| anyhow!("PDF_PATH is required when no subcommand is specified"))?;
    if !FileManager::file_exists(&pdf_path) {
        return Err(AppError::InputNotFound(pdf_path.display().to_string()).into());
    }

    let mut config = load_or_create_config(&options.config_path)?;
    apply_overrides(&mut config, &options);

    config.validate()
        .context("Configuration validation failed")?;

    if options.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    info!("Processing PDF: {:?}", pdf_path);
    let controller = Controller::with_config(config)?;
    // A PDF without text is reported before any backend check or prompt
    let pages = controller.extract_text(&pdf_path).await?;
    let controller = preflight(controller, options.yes).await?;

    if controller.config().translation.provider == TranslationProvider::Ollama {
        info!("Using Ollama ({})", controller.config().translation.get_model());
    }
    let target = controller.config().target_language.clone();
    if let Ok(name) = language_utils::get_language_name(&target) {
        info!("Target language: {}", name);
    }

    let summary = controller.run_with_pages(&pdf_path, &pages, options.output.clone()).await?;
    info!("Done! Document saved to {:?}", summary.output_path);

    Ok(())
}

/// Load the config file, writing a default one when it does not exist
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

/// Command line flags take precedence over the config file
fn apply_overrides(config: &mut Config, options: &CommandLineOptions) {
    if let Some(provider) = options.translate {
        config.translation.provider = provider.into();
    }

    if let Some(model) = &options.model {
        config.translation
            .provider_config_mut(TranslationProvider::Ollama)
            .model = model.clone();
    }

    if let Some(source_lang) = &options.source_language {
        config.source_language = source_lang.clone();
    }

    if let Some(target_lang) = &options.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(format) = options.format {
        config.document.format = format.into();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

/// Check the backend before starting; offer Google when Ollama is down
async fn preflight(controller: Controller, assume_yes: bool) -> Result<Controller> {
    if let Err(e) = controller.test_connection().await {
        match controller.config().translation.provider {
            TranslationProvider::Ollama => {
                warn!("Cannot reach the Ollama service: {}", e);
                warn!("Google translation ('-t google') is suggested instead.");

                if assume_yes || confirm("Switch to Google translation? (y/n): ").await? {
                    info!("Switching to Google translation");
                    let mut config = controller.config().clone();
                    config.translation.provider = TranslationProvider::Google;
                    return Controller::with_config(config);
                }
            }
            _ => warn!("Translation backend check failed: {}", e),
        }
    }

    Ok(controller)
}

/// Ask a yes/no question on the terminal
async fn confirm(prompt: &str) -> Result<bool> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || -> Result<bool> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    })
    .await
    .map_err(|e| anyhow!("Prompt task failed: {}", e))?
}
