// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use ftbq_localizer::app_config::{self, Config, TranslationProvider};
use ftbq_localizer::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    #[value(name = "deepl")]
    DeepL,
    Google,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::DeepL => TranslationProvider::DeepL,
            CliTranslationProvider::Google => TranslationProvider::Google,
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
    /// Generate shell completions for ftbq-localizer
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// ftbq-localizer - FTB Quests chapter localizer
///
/// Replaces quest titles, subtitles and descriptions with language keys,
/// writes the strings to en_us.json and optionally builds a translated
/// resource pack.
#[derive(Parser, Debug)]
#[command(name = "ftbq-localizer")]
#[command(version)]
#[command(about = "Extract FTB Quests strings into language files")]
#[command(long_about = "ftbq-localizer rewrites FTB Quests chapter files so every title, subtitle and
description points at a language key, and collects the strings into en_us.json.

EXAMPLES:
    ftbq-localizer -m MyPack                                  # Extract only
    ftbq-localizer -m MyPack --translate -t ko --target-locale kr
    ftbq-localizer -m MyPack --translate -p deepl -t de --target-locale de
    ftbq-localizer -i quests/chapters -o build -m MyPack      # Custom folders
    ftbq-localizer completions bash > ftbq-localizer.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. The DeepL key is read from DEEPL_AUTH_KEY
    (a .env file in the working directory is loaded first).

OUTPUT:
    output/<modpack>/chapters/*.snbt                 rewritten chapters
    output/<modpack>/en_us.json                      source strings
    output/<modpack>/<lang>_<locale>.json            translated strings
    output/<modpack>/<modpack>ResourcePack_<lang>_<locale>.zip")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Modpack name, used in keys and as the output folder
    #[arg(short, long)]
    modpack: Option<String>,

    /// Directory containing the chapter files
    #[arg(short, long, value_name = "DIR")]
    input: Option<PathBuf>,

    /// Output root directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Also produce a machine-translated catalog and resource pack
    #[arg(long)]
    translate: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Target language code (e.g. 'ko', 'es', 'zh-CN')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Target locale code (e.g. 'kr', 'es', 'cn')
    #[arg(long)]
    target_locale: Option<String>,

    /// DeepL auth key
    #[arg(long, env = "DEEPL_AUTH_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
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
                "{}{} {} {}\x1B[0m",
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
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // The logger accepts everything; the global max level does the filtering
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "ftbq-localizer", &mut std::io::stdout());
        return Ok(());
    }

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Load the config file, or create it with defaults when missing
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;

        Ok(config)
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

/// Override config values with CLI options
fn apply_cli_overrides(config: &mut Config, options: CommandLineOptions) {
    if let Some(modpack) = options.modpack {
        config.modpack_name = modpack;
    }
    if let Some(input) = options.input {
        config.input_dir = input;
    }
    if let Some(output) = options.output {
        config.output_dir = output;
    }
    if options.translate {
        config.translation.enabled = true;
    }
    if let Some(provider) = options.provider {
        config.translation.provider = provider.into();
    }
    if let Some(language) = options.target_language {
        config.translation.target_language = language;
    }
    if let Some(locale) = options.target_locale {
        config.translation.target_locale = locale;
    }
    if let Some(api_key) = options.api_key {
        config.translation.api_key = api_key;
    }
    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    }
}

async fn run(options: CommandLineOptions) -> Result<()> {
    // Apply the CLI log level before anything else logs
    if let Some(cli_level) = &options.log_level {
        log::set_max_level(level_filter(&cli_level.clone().into()));
    }

    let mut config = load_or_create_config(&options.config)?;
    apply_cli_overrides(&mut config, options);
    config.normalize();

    log::set_max_level(level_filter(&config.log_level));

    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    let summary = controller.run().await?;

    if summary.chapters_failed > 0 {
        warn!("{} chapters could not be processed", summary.chapters_failed);
    }

    Ok(())
}
