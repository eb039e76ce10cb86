pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;
pub mod sim;

use api::Scenario;
use error::Result;

/// Runs one scenario end to end: build topology and workload, place ranks,
/// route every group's connections, build the 1F1B schedule table, then
/// drive the engine to completion. Returns the final global time.
pub fn run_scenario(scenario: &Scenario) -> Result<f64> {
    let mut topology = scenario.topology.build()?;
    let mut workload = domain::workload::builder::build(scenario.workload)?;

    domain::placement::place(&mut workload, &mut topology)?;
    domain::routing::route(&mut workload, &topology, scenario.seed)?;

    let schedule = domain::pipeline_schedule::build(scenario.workload.pp, scenario.workload.microbatches);

    let mut engine = sim::Engine::new(topology, workload, schedule)?;
    engine.run()
}
