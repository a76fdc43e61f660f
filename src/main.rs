use clap::Parser;

use log::warn;
use snafu::ErrorCompat;

mod args;
mod results;

fn main() {
    let args = args::Args::parse();

    let debug_env = std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false);
    let default_level = if args.verbose || debug_env {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = results::run_summary(&args) {
        warn!("Error occured {:?}", e);
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
