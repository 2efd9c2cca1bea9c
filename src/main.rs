use ansi_term::Colour;

use elevatorsolver::elevator_logic::Fleet;
use elevatorsolver::elevator_logic::dispatch::{DispatchSettings, DispatchStats, Dispatcher};
use elevatorsolver::network::{oracle_client::TcpOracleClient, turn_client::TcpTurnClient};
use elevatorsolver::init::{self, ScenarioConfig};
use elevatorsolver::{config, print};


#[tokio::main]
async fn main() {
    let args = init::parse_args();
    if args.quiet {
        config::set_quiet();
    }

    let scenario = match ScenarioConfig::load(&args.scenario) {
        Ok(scenario) => scenario,
        Err(e) => {
            print::err(format!("{:#}", e));
            std::process::exit(1);
        }
    };
    print::info(format!(
        "Scenario: {} elevator(s), {} floor(s), {} solver(s), requests until turn {}",
        scenario.num_elevators, scenario.num_floors, scenario.num_solvers, scenario.last_request_turn
    ));

    if let Err(e) = run(&scenario).await {
        print::err(format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Kobler opp kanalane og køyrer dispatch til autoriteten seier stopp
async fn run(scenario: &ScenarioConfig) -> anyhow::Result<()> {
    let turn_client = TcpTurnClient::connect(&scenario.state_addr()?, &scenario.turn_addr()?).await?;
    let oracle = TcpOracleClient::connect(&scenario.solver_addr()?).await?;
    print::ok("Connected to turn authority and solver".to_string());

    let mut dispatcher = Dispatcher::start(DispatchSettings::from(scenario), turn_client, oracle).await?;
    print::fleet(dispatcher.fleet(), dispatcher.turn());

    dispatcher.run().await?;

    print::fleet(dispatcher.fleet(), dispatcher.turn());
    print::ok(format!("Simulation finished at turn {}", dispatcher.turn()));
    print_summary(dispatcher.stats(), dispatcher.fleet());
    Ok(())
}

fn print_summary(stats: &DispatchStats, fleet: &Fleet) {
    print::color(
        format!(
            "{} ticks, {} pickups, {} drop-offs, {} authorization rounds ({} exhausted)",
            stats.ticks, stats.pickups, stats.drop_offs, stats.auth_rounds, stats.auth_exhausted
        ),
        Colour::Cyan,
    );
    let dropped = stats.rejected_requests + stats.lost_requests + stats.unreachable_requests;
    if dropped > 0 {
        print::warn(format!(
            "{} request(s) never served: {} rejected by a full queue, {} lost to a full elevator, {} unreachable",
            dropped, stats.rejected_requests, stats.lost_requests, stats.unreachable_requests
        ));
    }
    let onboard = fleet.passengers();
    if onboard > 0 {
        print::warn(format!("{} passenger(s) still on board when the simulation ended", onboard));
    }
}
