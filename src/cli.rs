use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{self, CommandReport};
use crate::{env_loader, logging};

#[derive(Parser)]
#[command(name = "daylio-bridge")]
#[command(about = "Decode, encode, format, and merge Daylio backups", long_about = None)]
#[command(version)]
struct Cli {
    /// Print the command report as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Log at debug level (overrides DAYLIO_BRIDGE_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unzip and base64-decode a .daylio backup into JSON
    Decode {
        /// Path to the .daylio backup
        input_file: PathBuf,
        /// Output JSON path (default: decoded_backup.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Base64-encode a JSON backup and zip it into a .daylio file
    Encode {
        /// Path to the decoded JSON backup
        input_file: PathBuf,
        /// Output backup path (default: backup.daylio)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rewrite a JSON file with sorted keys and 4-space indentation
    Format {
        /// Path to the JSON file
        input_file: PathBuf,
        /// Output path (default: <input>_formatted.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge a Pixels export into a decoded Daylio backup
    Merge {
        /// Path to the Pixels backup JSON
        pixels_file: PathBuf,
        /// Path to the decoded Daylio backup JSON
        daylio_file: PathBuf,
        /// Output path (default: <daylio_file>_merged.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// CSV with pixels_tag,daylio_tag columns
        #[arg(long)]
        tag_mappings: Option<PathBuf>,
        /// CSV with keyword,daylio_tag columns
        #[arg(long)]
        keyword_mappings: Option<PathBuf>,
        /// Run the merge and report counts without writing
        #[arg(long)]
        dry_run: bool,
    },
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    env_loader::warn_unknown_env_keys();

    let report = match cli.command {
        Commands::Decode { input_file, output } => {
            commands::decode::run(&commands::decode::DecodeOptions {
                input: input_file,
                output,
            })?
        }
        Commands::Encode { input_file, output } => {
            commands::encode::run(&commands::encode::EncodeOptions {
                input: input_file,
                output,
            })?
        }
        Commands::Format { input_file, output } => {
            commands::format::run(&commands::format::FormatOptions {
                input: input_file,
                output,
            })?
        }
        Commands::Merge {
            pixels_file,
            daylio_file,
            output,
            tag_mappings,
            keyword_mappings,
            dry_run,
        } => commands::merge::run(&commands::merge::MergeOptions {
            pixels_file,
            daylio_file,
            output,
            tag_mappings,
            keyword_mappings,
            dry_run,
        })?,
    };

    print_report(&report, cli.json)
}
