use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use equity_curve_rs::{
    equity_curve, example_returns, load_table, EquityCurveOptions, IngestError,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DataType {
    /// Each cell is a periodic return; the table is compounded first.
    Returns,
    /// Each cell is a price level, charted as given.
    Prices,
}

#[derive(Parser, Debug)]
#[command(
    name = "equity-curve",
    about = "Render an interactive cumulative-return chart from a table of asset prices or returns"
)]
struct Cli {
    /// Input table (.csv or .xlsx), first column holding the date index.
    /// The bundled example returns are used when omitted.
    file: Option<PathBuf>,

    /// Whether the table holds returns or price levels
    #[arg(long, value_enum, default_value = "returns")]
    data_type: DataType,

    /// Treat input returns as logarithmic when compounding
    #[arg(long)]
    log_returns: bool,

    /// Chart title
    #[arg(long, default_value = "Equity Curve")]
    title: String,

    /// Also write the chart to <OUTPUT>.html
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("equity_curve=info".parse()?)
                .add_directive("equity_curve_rs=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let table = match &cli.file {
        Some(path) => match load_table(path) {
            Ok(table) => table,
            Err(IngestError::UnsupportedFormat(ext)) => {
                // Not fatal: tell the user and skip the chart stages.
                error!(extension = %ext, "unsupported file format, expected .csv or .xlsx");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        },
        None => {
            info!("no input file given, using the bundled example returns");
            example_returns()
        }
    };

    info!(rows = table.len(), assets = table.width(), "loaded table");

    let mut options = EquityCurveOptions::default()
        .with_returns_data(matches!(cli.data_type, DataType::Returns))
        .with_log_returns(cli.log_returns)
        .with_title(cli.title.as_str());
    if let Some(output) = &cli.output {
        options = options.with_output(output);
    }

    let fragment = equity_curve(&table, options)?;

    match &cli.output {
        Some(output) => info!(
            "wrote {} bytes to {}.html",
            fragment.len(),
            output.display()
        ),
        None => println!("{fragment}"),
    }

    Ok(())
}
