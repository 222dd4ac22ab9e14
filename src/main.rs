//! Vidgen Helper
//!
//! Command-line front end for the video generation helper services.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use vidgen_helper::{
    config::{Environment, Settings},
    logging::init_tracing,
    schemas::Outline,
    services::{clean_outline_in_place, clean_voiceover, validate_job_value},
    utils::{mask_key, read_text, write_text},
    AppContext, ToolError,
};

/// Vidgen Helper
///
/// API key rotation, Google Sheets/Drive fetching, job validation and
/// voiceover cleanup for the video generation tool.
#[derive(Parser, Debug)]
#[command(name = "vidgen-helper")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error (overrides LOG_LEVEL env var)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Environment: dev, staging, prod (overrides ENVIRONMENT env var)
    #[arg(short, long, global = true)]
    env: Option<Environment>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect configured API key pools
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },

    /// Fetch a Google Sheet and print its rows as JSON
    Sheet {
        /// Share or edit link of the sheet
        url: String,
    },

    /// Download a Google Drive file
    Download {
        /// Share link of the file
        url: String,

        /// Destination directory (overrides DOWNLOAD_DIR env var)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Validate a job parameter file
    Validate {
        /// JSON file containing the job parameters
        file: PathBuf,
    },

    /// Strip voiceover boilerplate from a piece of text
    CleanText {
        text: String,
    },

    /// Strip voiceover boilerplate from every scene of an outline
    CleanOutline {
        /// Outline JSON file
        file: PathBuf,

        /// Write the cleaned outline here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum KeysAction {
    /// List a category's keys (masked)
    List { category: String },

    /// Draw keys from a category in rotation order
    Next {
        category: String,

        /// Number of keys to draw
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },

    /// Show pool sizes for every category
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(env) = args.env {
        settings.environment = env;
    }

    init_tracing(&settings);

    tracing::debug!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        environment = %settings.environment,
        "Starting"
    );

    let result = match AppContext::with_global_keys(settings) {
        Ok(ctx) => run(&ctx, args.command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "Command failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(ctx: &AppContext, command: Command) -> Result<(), ToolError> {
    match command {
        Command::Keys { action } => run_keys(ctx, action),
        Command::Sheet { url } => {
            let table = ctx.fetcher.fetch_sheet(&url).await?;
            println!("{}", serde_json::to_string_pretty(&table.records())?);
            Ok(())
        }
        Command::Download { url, out } => {
            let dest = out.unwrap_or_else(|| ctx.settings.download_dir.clone());
            let path = ctx.fetcher.download_file(&url, &dest).await?;
            println!("{}", path.display());
            Ok(())
        }
        Command::Validate { file } => {
            let job: serde_json::Value = serde_json::from_str(&read_text(&file)?)?;
            let errors = validate_job_value(&job);
            if errors.is_empty() {
                println!("Job parameters are valid");
                Ok(())
            } else {
                Err(ToolError::Validation(errors))
            }
        }
        Command::CleanText { text } => {
            println!("{}", clean_voiceover(&text));
            Ok(())
        }
        Command::CleanOutline { file, output } => {
            let mut outline = Outline::from_json(&read_text(&file)?)?;
            if outline.scenes.is_empty() {
                return Err(ToolError::InvalidInput(format!(
                    "{} contains no scenes",
                    file.display()
                )));
            }
            clean_outline_in_place(&mut outline);
            let json = outline.to_json_pretty()?;
            match output {
                Some(path) => write_text(&path, &json)?,
                None => println!("{}", json),
            }
            Ok(())
        }
    }
}

fn run_keys(ctx: &AppContext, action: KeysAction) -> Result<(), ToolError> {
    match action {
        KeysAction::List { category } => {
            for key in ctx.keys.get_all_keys(&category) {
                println!("{}", mask_key(&key));
            }
        }
        KeysAction::Next { category, count } => {
            for _ in 0..count {
                println!("{}", mask_key(&ctx.require_key(&category)?));
            }
        }
        KeysAction::Stats => {
            let stats: Vec<_> = ctx
                .keys
                .categories()
                .iter()
                .filter_map(|category| ctx.keys.stats(category))
                .collect();
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
