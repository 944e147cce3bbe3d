// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! This module contains the implementation of the `memgrid` binary.

use clap::Parser;
use colored::{ColoredString, Colorize};
use memgrid::{Analysis, MEMGRID_VERSION};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Calculate maps of leaflet and membrane thickness, maps of water defects, and the average water defect from Gromacs simulations."
)]
pub struct Args {
    #[arg(
        help = "Config yaml file",
        long_help = "Configuration yaml file specifying the analysis settings."
    )]
    pub config: String,

    #[arg(
        short = 's',
        long = "silent",
        help = "Print only errors",
        long_help = "Do not print anything to the standard output except for errors. Overrides the value in the config file."
    )]
    pub silent: bool,

    #[arg(
        long = "overwrite",
        help = "Overwrite existing output files",
        long_help = "Do not back up existing output files, overwrite them. Overrides the value in the config file."
    )]
    pub overwrite: bool,
}

pub(crate) fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let mut analysis = match Analysis::from_file(&args.config) {
        Ok(analysis) => analysis,
        Err(e) => {
            init_logging(true);
            log::error!("{}", e);
            if !args.silent {
                print_failure();
            }
            return Err(Box::new(e));
        }
    };

    if args.silent {
        analysis.set_silent(true);
    }

    if args.overwrite {
        analysis.set_overwrite(true);
    }

    init_logging(analysis.silent());
    if !analysis.silent() {
        let header = format!(">>> MEMGRID v{} <<<", MEMGRID_VERSION).bold();
        println!("\n{}\n", header);
        log::info!("Read config file '{}'.", args.config);
    }

    let result = analysis.run().and_then(|results| results.write());

    match &result {
        Ok(_) => {
            if !analysis.silent() {
                print_success();
            }
        }
        Err(e) => {
            log::error!("{}", e);
            if !analysis.silent() {
                print_failure();
            }
        }
    }

    result
}

/// Initialize the logger. Only errors are logged when silent.
fn init_logging(silent: bool) {
    if silent {
        colog::basic_builder()
            .filter(None, log::LevelFilter::Error)
            .init();
    } else {
        colog::init();
    }
}

fn bracketed(symbol: ColoredString) -> String {
    format!(
        "{}{}{}",
        "[".to_string().blue().bold(),
        symbol,
        "]".to_string().blue().bold()
    )
}

fn print_success() {
    let prefix = bracketed("✔".to_string().bright_green().bold());
    let message = "ANALYSIS COMPLETED".to_string().bright_green().bold();
    println!("{} {}", prefix, message);
}

fn print_failure() {
    let prefix = bracketed("✖".to_string().red().bold());
    let message = "ANALYSIS FAILED".to_string().red().bold();
    println!("{} {}", prefix, message);
}
