use clap::Parser;

use flowsim::api::Scenario;
use flowsim::loader;

/// Discrete-event flow-level network simulator for 3D-parallel distributed
/// training. Loads a scenario file, runs it to completion, and prints the
/// resulting global time.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Path to a scenario JSON document (topology, workload, RNG seed).
    scenario: std::path::PathBuf,
}

fn main() {
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> flowsim::error::Result<()> {
    flowsim::logger::init();

    let cli = Cli::parse();
    let scenario: Scenario = loader::parse_json_file(&cli.scenario)?;

    let global_time = flowsim::run_scenario(&scenario)?;
    log::info!("simulation complete: global_time = {global_time:.6}");
    println!("{global_time:.6}");

    Ok(())
}
