mod cli;
mod config;
// Only `cli` drives the copy loop, and only with a native backend.
#[cfg_attr(not(feature = "with-opencv"), allow(dead_code))]
mod copy;
mod telemetry;

#[cfg(feature = "with-opencv")]
mod probe;

use clap::Parser;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    telemetry::init(cli.verbose);
    cli::handle_command(cli.command)
}
