// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use readlingo::api::models::ArticleId;
use readlingo::app_config::{self, Config};
use readlingo::render::TextRenderer;
use readlingo::{AppError, HttpApi, ReadingSessionController};

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

/// Saved collections that can be listed
#[derive(Debug, Clone, ValueEnum)]
enum SavedKind {
    Articles,
    Vocabulary,
    Notes,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate an article and show it with its translation and vocabulary
    Generate(GenerateArgs),

    /// Analyze the grammar of a sentence or phrase
    Analyze {
        /// Text to analyze
        #[arg(value_name = "TEXT")]
        text: String,

        /// Save the resulting grammar note
        #[arg(short, long)]
        save: bool,
    },

    /// List saved articles, vocabulary or grammar notes
    Saved {
        /// Which collection to list
        #[arg(value_enum)]
        kind: SavedKind,

        /// Show the saved article with this id (articles only)
        #[arg(long)]
        open: Option<ArticleId>,
    },

    /// List the configured categories and article lengths
    Categories,

    /// Generate shell completions for readlingo
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Article category (defaults to the configured one)
    #[arg(short, long)]
    category: Option<String>,

    /// Article length in words (defaults to the configured one)
    #[arg(short, long)]
    word_count: Option<u32>,

    /// Save the generated article
    #[arg(short, long)]
    save: bool,

    /// Highlight a word in the article
    #[arg(long, value_name = "WORD")]
    highlight: Option<String>,

    /// Save a vocabulary word (repeatable)
    #[arg(long = "save-word", value_name = "WORD")]
    save_words: Vec<String>,

    /// Save every vocabulary word whose meaning was found
    #[arg(long, conflicts_with = "save_words")]
    save_all_words: bool,

    /// Analyze the grammar of a span of the article
    #[arg(long, value_name = "TEXT")]
    analyze: Option<String>,

    /// Save the grammar note produced by --analyze
    #[arg(long, requires = "analyze")]
    save_note: bool,

    /// Hide the vocabulary panel
    #[arg(long)]
    hide_vocabulary: bool,

    /// Hide the translation panel
    #[arg(long)]
    hide_translation: bool,
}

/// readlingo - graded reading practice
///
/// Generates reading passages through a reading API, shows them with a
/// translation and vocabulary list, and saves articles, words and grammar
/// notes for later review.
#[derive(Parser, Debug)]
#[command(name = "readlingo")]
#[command(version)]
#[command(about = "Graded reading practice client")]
#[command(long_about = "readlingo requests generated reading passages from a reading API and shows them with a translation and vocabulary list.

EXAMPLES:
    readlingo generate                              # Default category and length
    readlingo generate -c science -w 500 --save     # Generate and save an article
    readlingo generate --highlight market           # Highlight a word in the article
    readlingo generate --save-all-words             # Save every looked-up word
    readlingo analyze \"Had I known, I would have come.\" --save
    readlingo saved vocabulary                      # List saved words
    readlingo saved articles --open 3               # Reopen a saved article
    readlingo completions bash > readlingo.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Reading API base URL (overrides the config file)
    #[arg(long, global = true, env = "READLINGO_API_URL")]
    base_url: Option<String>,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
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

    // @returns: Emoji and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌", "1;31"),
            Level::Warn => ("🚧", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍", "1;36"),
            Level::Trace => ("📋", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Dependencies log at debug level on every request
        metadata.level() <= self.level && metadata.target().starts_with("readlingo")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::style_for_level(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                color,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Everything is let through here; the effective level is applied with
    // set_max_level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "readlingo", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Categories => {
            print_categories(&config);
            Ok(())
        }
        Commands::Generate(args) => run_generate(build_controller(config)?, args).await,
        Commands::Analyze { text, save } => run_analyze(build_controller(config)?, &text, save).await,
        Commands::Saved { kind, open } => run_saved(build_controller(config)?, kind, open).await,
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load or create the configuration and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config, AppError> {
    let mut config = Config::load_or_create(Path::new(&cli.config_path))
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config
        .validate()
        .map_err(|e| AppError::Config(format!("validation failed: {}", e)))?;
    Ok(config)
}

fn build_controller(config: Config) -> Result<ReadingSessionController, AppError> {
    let api = HttpApi::from_config(&config.api)?;
    info!("Using reading API at {}", config.api.base_url);
    Ok(ReadingSessionController::new(config, Arc::new(api)))
}

fn busy_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_notices(controller: &ReadingSessionController, renderer: &TextRenderer) {
    for notice in controller.take_notices() {
        println!("{}", renderer.notice(&notice));
    }
}

fn print_categories(config: &Config) {
    println!("Categories:");
    for category in &config.reading.categories {
        let marker = if *category == config.reading.default_category { "*" } else { " " };
        println!("  {} {}", marker, category);
    }
    println!("Word counts:");
    for count in &config.reading.word_counts {
        let marker = if *count == config.reading.default_word_count { "*" } else { " " };
        println!("  {} {}", marker, count);
    }
}

async fn run_generate(controller: ReadingSessionController, args: GenerateArgs) -> Result<()> {
    let renderer = TextRenderer::new(controller.config().display.clone());
    let category = args
        .category
        .unwrap_or_else(|| controller.config().reading.default_category.clone());
    let word_count = args
        .word_count
        .unwrap_or(controller.config().reading.default_word_count);

    let spinner = busy_spinner(format!("Generating a {}-word {} article...", word_count, category));
    let outcome = controller.generate(&category, word_count).await;
    spinner.finish_and_clear();
    print_notices(&controller, &renderer);
    let outcome = outcome?;

    if outcome.failed_lookups > 0 {
        warn!(
            "{} of {} word meanings could not be looked up",
            outcome.failed_lookups, outcome.words
        );
    }

    if args.hide_vocabulary {
        controller.toggle_vocabulary_panel();
    }
    if args.hide_translation {
        controller.toggle_translation_panel();
    }

    if let Some(word) = &args.highlight {
        let count = controller.highlight_word(word);
        info!("Highlighted {} occurrence(s) of \"{}\"", count, word);
    }

    // The article id links saved words and notes, so the article goes first
    if args.save {
        if let Err(e) = controller.save_article().await {
            error!("Article was not saved: {}", e);
        }
    }

    let words_to_save: Vec<String> = if args.save_all_words {
        controller
            .session()
            .map(|s| {
                s.vocabulary
                    .iter()
                    .filter(|e| e.meaning.resolved().is_some())
                    .map(|e| e.word.clone())
                    .collect()
            })
            .unwrap_or_default()
    } else {
        args.save_words.clone()
    };
    let saves = words_to_save.iter().map(|word| controller.save_word(word));
    for (word, result) in words_to_save.iter().zip(join_all(saves).await) {
        if let Err(e) = result {
            error!("Word \"{}\" was not saved: {}", word, e);
        }
    }

    if let Some(text) = &args.analyze {
        controller.select_text(text);
        if let Some(note) = controller.analyze_selection().await {
            if args.save_note {
                let _ = controller.save_grammar_note(&note).await;
            }
        }
    }

    println!("{}", renderer.screen(&controller.display()));
    print_notices(&controller, &renderer);
    Ok(())
}

async fn run_analyze(controller: ReadingSessionController, text: &str, save: bool) -> Result<()> {
    let renderer = TextRenderer::new(controller.config().display.clone());
    let spinner = busy_spinner("Analyzing grammar...".to_string());
    let note = controller.analyze_grammar(text).await;
    spinner.finish_and_clear();

    let Some(note) = note else {
        anyhow::bail!("Grammar analysis failed");
    };
    println!("{}", renderer.grammar_note(&note));

    if save {
        controller.save_grammar_note(&note).await?;
        print_notices(&controller, &renderer);
    }
    Ok(())
}

async fn run_saved(controller: ReadingSessionController, kind: SavedKind, open: Option<ArticleId>) -> Result<()> {
    let renderer = TextRenderer::new(controller.config().display.clone());
    match kind {
        SavedKind::Articles => {
            controller.load_saved_articles().await?;
            match open {
                Some(id) => {
                    controller.open_saved_article(&id)?;
                    println!("{}", renderer.screen(&controller.display()));
                }
                None => println!("{}", renderer.saved_articles(&controller.display().saved_articles)),
            }
        }
        SavedKind::Vocabulary => {
            controller.load_saved_vocabulary().await?;
            println!("{}", renderer.saved_vocabulary(&controller.display().saved_vocabulary));
        }
        SavedKind::Notes => {
            controller.load_saved_grammar_notes().await?;
            println!("{}", renderer.saved_grammar_notes(&controller.display().saved_grammar_notes));
        }
    }
    Ok(())
}
