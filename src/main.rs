//! CLI driver: reads a numeric CSV whose last column is the target, trains
//! on the first half of the rows, and reports the error on the second
//! half.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use xcsf::{Dataset, Xcsf, XcsfError, XcsfParams};

#[derive(Parser)]
#[command(name = "xcsf", about = "XCSF learning classifier system")]
struct Args {
    /// CSV input: feature columns followed by one target column.
    input: PathBuf,
    /// Optional INI-style `key = value` parameter file.
    config: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), XcsfError> {
    let mut params = match &args.config {
        Some(path) => XcsfParams::from_ini(path)?,
        None => XcsfParams::default(),
    };
    params.verbose = true;

    let data = Dataset::from_csv(&args.input, 1)?;
    let (train, test) = data.split_half();

    let mut xcsf = Xcsf::new(train.x.ncols(), 1, params)?;
    xcsf.fit_with_test(&train.x, &train.y, &test.x, &test.y, true)?;

    let mse = xcsf.score(&test.x, &test.y)?;
    println!("final test mse: {mse:.6} (pop {})", xcsf.pop_num());
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
