mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "legalsplit",
    version,
    about = "Split concatenated legal PDFs into their individual documents"
)]
struct Cli {
    /// Log every boundary decision to stderr (overrides RUST_LOG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which pattern table drives detection and naming.
#[derive(Args, Clone, Debug)]
pub struct PatternArgs {
    /// Predefined pattern table (default: legal)
    #[arg(long, value_name = "NAME", conflicts_with = "patterns")]
    pub preset: Option<String>,

    /// Custom JSON pattern table
    #[arg(long, value_name = "FILE")]
    pub patterns: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split one PDF into its documents
    Split {
        /// PDF file to split
        pdf_file: PathBuf,

        /// Output directory (default: next to the input file)
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Show what would be written without creating files
        #[arg(long)]
        dry_run: bool,

        /// Delete the input once every document has been written
        #[arg(long)]
        delete_original: bool,

        /// Continue from the checkpoint of an interrupted run
        #[arg(long)]
        resume: bool,

        /// Save a checkpoint every N pages (0 disables)
        #[arg(long, value_name = "N", default_value_t = legalsplit_core::checkpoint::DEFAULT_CHECKPOINT_INTERVAL)]
        checkpoint_interval: usize,

        #[command(flatten)]
        patterns: PatternArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Split every PDF in a directory
    Batch {
        /// Directory containing PDF files
        directory: PathBuf,

        /// Output root; each input gets its own subdirectory named after it (default: DIRECTORY)
        #[arg(short = 'd', long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Search subdirectories
        #[arg(short, long)]
        recursive: bool,

        /// Delete each input once all of its documents have been written
        #[arg(long)]
        delete_originals: bool,

        /// Also process files with "_split_" in their name
        #[arg(long)]
        include_split: bool,

        /// Show what would be written without creating files
        #[arg(long)]
        dry_run: bool,

        /// Continue interrupted files from their checkpoints
        #[arg(long)]
        resume: bool,

        /// Number of files processed in parallel
        #[arg(short, long, value_name = "N", default_value_t = 1)]
        jobs: usize,

        #[command(flatten)]
        patterns: PatternArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Show detected boundaries and planned filenames without writing anything
    Analyze {
        /// PDF file to analyze
        pdf_file: PathBuf,

        #[command(flatten)]
        patterns: PatternArgs,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Inspect and validate pattern tables
    Patterns {
        #[command(subcommand)]
        action: PatternsAction,
    },
}

#[derive(Subcommand)]
enum PatternsAction {
    /// List predefined pattern tables
    List,
    /// Print a predefined pattern table as JSON
    Show {
        /// Preset name (e.g., "legal")
        preset: String,
    },
    /// Print the pattern table schema with field descriptions
    Schema,
    /// Validate a custom pattern table
    Validate {
        /// Path to JSON pattern table
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Split {
            pdf_file,
            output_dir,
            dry_run,
            delete_original,
            resume,
            checkpoint_interval,
            patterns,
            output,
        } => {
            let options = commands::split::SplitOptions {
                output_dir,
                dry_run,
                delete_original,
                resume,
                checkpoint_interval,
            };
            commands::split::run(&pdf_file, &options, &patterns, &output)
        }
        Commands::Batch {
            directory,
            output_dir,
            recursive,
            delete_originals,
            include_split,
            dry_run,
            resume,
            jobs,
            patterns,
            output,
        } => {
            let options = commands::batch::BatchOptions {
                output_dir,
                recursive,
                include_split,
                jobs,
                split: commands::split::SplitOptions {
                    output_dir: None,
                    dry_run,
                    delete_original: delete_originals,
                    resume,
                    checkpoint_interval: legalsplit_core::checkpoint::DEFAULT_CHECKPOINT_INTERVAL,
                },
            };
            commands::batch::run(&directory, &options, &patterns, &output)
        }
        Commands::Analyze {
            pdf_file,
            patterns,
            output,
        } => commands::analyze::run(&pdf_file, &patterns, &output),
        Commands::Patterns { action } => match action {
            PatternsAction::List => commands::patterns::list(),
            PatternsAction::Show { preset } => commands::patterns::show(&preset),
            PatternsAction::Schema => commands::patterns::schema(),
            PatternsAction::Validate { file } => commands::patterns::validate(&file),
        },
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(debug: bool) {
    let env_filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
