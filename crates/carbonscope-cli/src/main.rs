mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "carbonscope",
    version,
    about = "Energy and emissions indicators from company spreadsheets"
)]
struct Cli {
    /// JSON file with engine options (limits, forecast horizon, column synonyms)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Year assigned to rows when the sheet has no year column
    #[arg(long, global = true, value_name = "YEAR")]
    default_year: Option<i32>,

    /// Set the logging level
    #[arg(long, global = true, default_value = "info")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and validate records from a workbook (without computing indicators)
    Parse {
        /// Path to an .xlsx or .xls file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write parsed output to a JSON file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Compute the indicator set for a workbook
    Indicators {
        /// Path to an .xlsx or .xls file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Only show this year
        #[arg(long)]
        year: Option<i32>,

        /// Only show this sector
        #[arg(long)]
        sector: Option<String>,
    },
    /// Show emission trends, carbon-intensity trend and the forecast outlook
    Trends {
        /// Path to an .xlsx or .xls file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Print the column synonyms used to recognise headers
    Columns {
        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: could not install log subscriber");
    }

    let result = commands::load_options(cli.config.as_deref(), cli.default_year).and_then(|options| {
        match cli.command {
            Commands::Parse {
                input_file,
                output,
                out,
            } => commands::parse::run(input_file, &output, out, &options),
            Commands::Indicators {
                input_file,
                output,
                year,
                sector,
            } => commands::indicators::run(input_file, &output, year, sector, &options),
            Commands::Trends { input_file, output } => {
                commands::trends::run(input_file, &output, &options)
            }
            Commands::Columns { output } => commands::columns::run(&output, &options),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
