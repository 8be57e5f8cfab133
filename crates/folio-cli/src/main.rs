mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "folio",
    version,
    about = "Rebuild tables, paragraphs and invoice fields from PDF text, and add OCR text layers"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF
    Convert {
        /// pdf-to-excel, pdf-to-word, pdf-to-text, scanned-to-searchable or invoice-to-table
        kind: String,

        /// Path to the PDF file
        input_file: PathBuf,

        /// Output format: text (default) or json
        #[arg(short, long, default_value = "text")]
        output: String,

        /// Write JSON output next to the input (or into --out-dir)
        #[arg(long)]
        save: bool,

        /// Directory for saved output (defaults to the input's directory)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Custom JSON layout config
        #[arg(short, long, value_name = "FILE", conflicts_with = "preset")]
        config: Option<PathBuf>,

        /// Predefined layout config: default, dense
        #[arg(short, long, value_name = "NAME")]
        preset: Option<String>,

        /// Tesseract language for scanned-to-searchable
        #[arg(long, default_value = "eng")]
        lang: String,

        /// Print progress events to stderr
        #[arg(long)]
        progress: bool,
    },
    /// Manage and inspect layout configs
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// List predefined configs
    List,
    /// Print a predefined config as JSON
    Show {
        #[arg(default_value = "default")]
        preset: String,
    },
    /// Validate a custom config file
    Validate {
        /// Path to JSON config file
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            kind,
            input_file,
            output,
            save,
            out_dir,
            config,
            preset,
            lang,
            progress,
        } => commands::convert::run(commands::convert::ConvertArgs {
            kind,
            input_file,
            output_format: output,
            save,
            out_dir,
            config,
            preset,
            lang,
            progress,
        }),
        Commands::Config { action } => match action {
            ConfigAction::List => commands::config::list(),
            ConfigAction::Show { preset } => commands::config::show(&preset),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
