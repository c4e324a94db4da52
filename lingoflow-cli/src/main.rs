mod cache;
mod missing;
mod translate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cache::{run_cache_clear_command, run_cache_stats_command};
use crate::missing::run_missing_command;
use crate::translate::{
    RetranslateOptions, TranslateOptions, run_retranslate_command, run_translate_command,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a localization file into another language, or a
    /// `{lang}` path pattern into every project language.
    Translate {
        /// The source localization file, or a pattern like `locales/{lang}.json`
        #[arg(short, long)]
        input: String,
        /// The file to write the translation to (defaults to the input pattern)
        #[arg(short, long)]
        output: Option<String>,
        /// Target language code (e.g. fr, pt-BR); must be configured in project mode
        #[arg(short, long, short_alias = 'l', visible_alias = "language")]
        target: Option<String>,
        /// Source language code; defaults to the project source language
        #[arg(short, long)]
        source: Option<String>,
        /// Keep translations no longer than the source text
        #[arg(long)]
        ui_safe: bool,
        /// Only translate keys the existing output file lacks
        #[arg(long)]
        only_missing: bool,
        /// Send one text per request instead of batches
        #[arg(long)]
        no_batch: bool,
        /// File holding extra instructions for the translator
        #[arg(long)]
        prompt_file: Option<String>,
        /// Project configuration file (default: ./.lingoflow.yml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Re-translate keys whose source text changed.
    Retranslate {
        /// The source localization file
        #[arg(short, long)]
        input: String,
        /// The translated file to update
        #[arg(short, long)]
        output: String,
        /// Target language code
        #[arg(short, long)]
        target: String,
        /// Source language code; defaults to the project source language
        #[arg(short, long)]
        source: Option<String>,
        /// Keys to re-translate (repeatable, dotted paths allowed)
        #[arg(short, long = "key", required = true)]
        keys: Vec<String>,
        /// Keep translations no longer than the source text
        #[arg(long)]
        ui_safe: bool,
        /// Send one text per request instead of batches
        #[arg(long)]
        no_batch: bool,
        /// Project configuration file (default: ./.lingoflow.yml)
        #[arg(long)]
        config: Option<String>,
    },

    /// List keys of a source file that a target file lacks.
    Missing {
        /// The source localization file
        #[arg(long)]
        source: String,
        /// The translated file to compare against
        #[arg(long)]
        target: String,
    },

    /// Inspect or reset the translation cache.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Show the number of cached translations.
    Stats {
        #[arg(long)]
        config: Option<String>,
    },
    /// Remove every cached translation.
    Clear {
        #[arg(long)]
        config: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_directives = if verbose {
        "lingoflow=debug,lingoflow_cli=debug"
    } else {
        "lingoflow=info,lingoflow_cli=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.commands {
        Commands::Translate {
            input,
            output,
            target,
            source,
            ui_safe,
            only_missing,
            no_batch,
            prompt_file,
            config,
        } => {
            run_translate_command(TranslateOptions {
                input,
                output,
                target_lang: target,
                source_lang: source,
                ui_safe,
                only_missing,
                no_batch,
                prompt_file,
                config,
            })
            .await
        }
        Commands::Retranslate {
            input,
            output,
            target,
            source,
            keys,
            ui_safe,
            no_batch,
            config,
        } => {
            run_retranslate_command(RetranslateOptions {
                input,
                output,
                target_lang: target,
                source_lang: source,
                keys,
                ui_safe,
                no_batch,
                config,
            })
            .await
        }
        Commands::Missing { source, target } => run_missing_command(&source, &target),
        Commands::Cache { action } => match action {
            CacheAction::Stats { config } => run_cache_stats_command(config.as_deref()),
            CacheAction::Clear { config } => run_cache_clear_command(config.as_deref()),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
