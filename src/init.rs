//! # Start-up
//!
//! Reads the command line and the scenario file. Everything here runs once, before the first
//! connection is made, and every failure is fatal.

use std::{env, fs, path::{Path, PathBuf}};

use anyhow::{bail, ensure, Context};
use serde::Deserialize;

use crate::config;
use crate::elevator_logic::dispatch::DispatchSettings;


/// Scenario parameters, consumed once at start-up.
///
/// ## Text format
/// Whitespace separated, in this order:
/// `N K M T <state channel> <turn channel> <solver channel> * M`
///
/// A path ending in `.json` is read as JSON with the field names below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioConfig {
    /// Number of elevators `N`
    pub num_elevators: usize,
    /// Number of floors `K`
    pub num_floors: usize,
    /// Number of solver channels `M`
    pub num_solvers: usize,
    /// Last turn in which requests arrive `T`
    pub last_request_turn: u32,
    /// Identifier of the state channel
    pub state_channel: String,
    /// Identifier of the turn channel
    pub turn_channel: String,
    /// Identifiers of the solver channels, exactly `num_solvers` of them
    pub solver_channels: Vec<String>,
}

impl ScenarioConfig {
    /// Reads and validates a scenario file.
    ///
    /// ## Errors
    /// - the file cannot be read, does not parse or fails [ScenarioConfig::validate]
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read scenario file {}", path.display()))?;

        let scenario = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid JSON in {}", path.display()))?
        } else {
            Self::parse(&text).with_context(|| format!("Invalid scenario in {}", path.display()))?
        };

        scenario.validate()?;
        Ok(scenario)
    }

    /// Parses the whitespace separated text format. Does not validate ranges.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let mut tokens = text.split_whitespace();
        let mut next = |what: &str| {
            tokens.next().with_context(|| format!("Missing {}", what))
        };

        let num_elevators: usize = next("elevator count")?.parse().context("Elevator count is not a number")?;
        let num_floors: usize = next("floor count")?.parse().context("Floor count is not a number")?;
        let num_solvers: usize = next("solver count")?.parse().context("Solver count is not a number")?;
        let last_request_turn: u32 = next("last request turn")?
            .parse()
            .context("Last request turn is not a non-negative number")?;
        let state_channel = next("state channel")?.to_string();
        let turn_channel = next("turn channel")?.to_string();

        let mut solver_channels = Vec::with_capacity(num_solvers.min(config::MAX_SOLVERS));
        for i in 0..num_solvers {
            solver_channels.push(next(&format!("solver channel {}", i))?.to_string());
        }

        Ok(Self {
            num_elevators,
            num_floors,
            num_solvers,
            last_request_turn,
            state_channel,
            turn_channel,
            solver_channels,
        })
    }

    /// Checks the scenario against [config] limits and resolves every channel identifier.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            (1..=config::MAX_ELEVATORS).contains(&self.num_elevators),
            "Elevator count {} is outside 1..={}", self.num_elevators, config::MAX_ELEVATORS
        );
        ensure!(
            (1..=config::MAX_FLOORS).contains(&self.num_floors),
            "Floor count {} is outside 1..={}", self.num_floors, config::MAX_FLOORS
        );
        ensure!(
            (1..=config::MAX_SOLVERS).contains(&self.num_solvers),
            "Solver count {} is outside 1..={}", self.num_solvers, config::MAX_SOLVERS
        );
        ensure!(
            self.solver_channels.len() == self.num_solvers,
            "Expected {} solver channels, found {}", self.num_solvers, self.solver_channels.len()
        );

        resolve_channel(&self.state_channel).context("State channel")?;
        resolve_channel(&self.turn_channel).context("Turn channel")?;
        for id in &self.solver_channels {
            resolve_channel(id).context("Solver channel")?;
        }
        Ok(())
    }

    /// Address of the state channel
    pub fn state_addr(&self) -> anyhow::Result<String> {
        resolve_channel(&self.state_channel)
    }

    /// Address of the turn channel
    pub fn turn_addr(&self) -> anyhow::Result<String> {
        resolve_channel(&self.turn_channel)
    }

    /// Address of the solver used for authorization. Only the first one is ever used.
    pub fn solver_addr(&self) -> anyhow::Result<String> {
        let first = self.solver_channels.first().context("No solver channel configured")?;
        resolve_channel(first)
    }
}

impl From<&ScenarioConfig> for DispatchSettings {
    fn from(scenario: &ScenarioConfig) -> Self {
        DispatchSettings {
            num_elevators: scenario.num_elevators,
            // Grensa er 300, så dette passar alltid i ein i32
            num_floors: scenario.num_floors.min(config::MAX_FLOORS) as i32,
            horizon: scenario.last_request_turn,
        }
    }
}


/// Turns a channel identifier into a `host:port` address.
///
/// A bare port number means [config::DEFAULT_CHANNEL_HOST].
///
/// # Example
/// ```
/// use elevatorsolver::init::resolve_channel;
///
/// assert_eq!(resolve_channel("5000").unwrap(), "127.0.0.1:5000");
/// assert_eq!(resolve_channel("solver-1:7000").unwrap(), "solver-1:7000");
/// assert!(resolve_channel("nowhere").is_err());
/// ```
pub fn resolve_channel(id: &str) -> anyhow::Result<String> {
    if let Ok(port) = id.parse::<u16>() {
        return Ok(format!("{}:{}", config::DEFAULT_CHANNEL_HOST, port));
    }
    match id.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(id.to_string()),
        _ => bail!("'{}' is neither a port nor host:port", id),
    }
}


/// Command-line options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// Scenario file, [config::DEFAULT_INPUT_FILE] if none is given
    pub scenario: PathBuf,
    /// Only errors and warnings are printed
    pub quiet: bool,
}

/// ### Reads arguments from `cargo run`
///
/// `<path>` &rarr; Scenario file to read instead of `input.txt`
/// `--quiet` &rarr; Disables all prints except errors and warnings
/// `help` &rarr; Displays all possible arguments without starting the program
pub fn parse_args() -> Args {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "help" || a == "--help") {
        println!("Bruk: elevatorsolver [scenario-fil] [--quiet]");
        println!("  scenario-fil  (standard: {})", config::DEFAULT_INPUT_FILE);
        println!("  --quiet       (kun error- og warning-meldingar vises)");
        std::process::exit(0);
    }
    args_from(args)
}

/// [parse_args] without the process environment
pub fn args_from<I: IntoIterator<Item = String>>(args: I) -> Args {
    let mut parsed = Args {
        scenario: PathBuf::from(config::DEFAULT_INPUT_FILE),
        quiet: false,
    };
    let mut path_seen = false;
    for arg in args {
        if arg == "--quiet" {
            parsed.quiet = true;
        } else if !path_seen {
            parsed.scenario = PathBuf::from(arg);
            path_seen = true;
        }
    }
    parsed
}


#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "2 10 3 5\n6000 6001\n7000 7001 solver:7002\n";

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("elevatorsolver-{}-{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_text_scenario() {
        let scenario = ScenarioConfig::parse(SAMPLE).unwrap();
        assert_eq!(scenario.num_elevators, 2);
        assert_eq!(scenario.num_floors, 10);
        assert_eq!(scenario.last_request_turn, 5);
        assert_eq!(scenario.solver_channels, vec!["7000", "7001", "solver:7002"]);
        scenario.validate().unwrap();

        assert_eq!(scenario.state_addr().unwrap(), "127.0.0.1:6000");
        assert_eq!(scenario.turn_addr().unwrap(), "127.0.0.1:6001");
        assert_eq!(scenario.solver_addr().unwrap(), "127.0.0.1:7000");
    }

    #[test]
    fn missing_solver_channel_is_reported() {
        let err = ScenarioConfig::parse("1 10 2 0 6000 6001 7000").unwrap_err();
        assert!(format!("{:#}", err).contains("solver channel 1"));
    }

    #[test]
    fn negative_turn_is_rejected() {
        assert!(ScenarioConfig::parse("1 10 1 -1 6000 6001 7000").is_err());
    }

    #[test]
    fn limits_are_enforced() {
        let mut scenario = ScenarioConfig::parse(SAMPLE).unwrap();
        scenario.num_elevators = config::MAX_ELEVATORS + 1;
        assert!(scenario.validate().is_err());

        let mut scenario = ScenarioConfig::parse(SAMPLE).unwrap();
        scenario.num_floors = 0;
        assert!(scenario.validate().is_err());

        let mut scenario = ScenarioConfig::parse(SAMPLE).unwrap();
        scenario.solver_channels.pop();
        assert!(scenario.validate().is_err());

        let mut scenario = ScenarioConfig::parse(SAMPLE).unwrap();
        scenario.turn_channel = "not-a-channel".to_string();
        let err = scenario.validate().unwrap_err();
        assert!(format!("{:#}", err).starts_with("Turn channel"));
    }

    #[test]
    fn loads_text_and_json_files() {
        let text = scratch_file("scenario.txt", SAMPLE);
        let from_text = ScenarioConfig::load(&text).unwrap();

        let json = scratch_file(
            "scenario.json",
            r#"{
                "num_elevators": 2, "num_floors": 10, "num_solvers": 3, "last_request_turn": 5,
                "state_channel": "6000", "turn_channel": "6001",
                "solver_channels": ["7000", "7001", "solver:7002"]
            }"#,
        );
        let from_json = ScenarioConfig::load(&json).unwrap();
        assert_eq!(from_text, from_json);

        fs::remove_file(text).ok();
        fs::remove_file(json).ok();
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = ScenarioConfig::load(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn settings_follow_scenario() {
        let scenario = ScenarioConfig::parse(SAMPLE).unwrap();
        let settings = DispatchSettings::from(&scenario);
        assert_eq!(settings, DispatchSettings { num_elevators: 2, num_floors: 10, horizon: 5 });
    }

    #[test]
    fn args_default_to_input_file() {
        assert_eq!(
            args_from(Vec::<String>::new()),
            Args { scenario: PathBuf::from("input.txt"), quiet: false }
        );
        assert_eq!(
            args_from(vec!["--quiet".to_string(), "lobby.json".to_string()]),
            Args { scenario: PathBuf::from("lobby.json"), quiet: true }
        );
    }
}
