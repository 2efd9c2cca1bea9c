//! # config.rs – Centralized Parameter Store
//!
//! This module holds all static program parameters used throughout the controller.
//! Keeping configuration in one place makes tuning, experimentation, and testing easier.
//!
//! Scenario-specific values (number of elevators, floors, solvers and channel addresses)
//! are read at start-up, see [crate::init::ScenarioConfig].

use std::sync::Mutex;
use once_cell::sync::Lazy;

//
// ──────────────────────────────────────────────────────────────
//   1. SCENARIO LIMITS
// ──────────────────────────────────────────────────────────────
//

/// Highest number of elevators a scenario may contain
pub const MAX_ELEVATORS: usize = 100;

/// Highest number of floors a scenario may contain
pub const MAX_FLOORS: usize = 300;

/// Highest number of solver channels a scenario may list
pub const MAX_SOLVERS: usize = 100;

/// Number of request slots in the state envelope filled by the turn authority each tick
pub const MAX_NEW_REQUESTS: usize = 30;

/// Default scenario file, read when no path is given on the command line
pub const DEFAULT_INPUT_FILE: &str = "input.txt";

/// Host used when a channel identifier is a bare port number
pub const DEFAULT_CHANNEL_HOST: &str = "127.0.0.1";

//
// ──────────────────────────────────────────────────────────────
//   2. DISPATCH PARAMETERS
// ──────────────────────────────────────────────────────────────
//

/// Capacity of one arrival-turn request queue
pub const QUEUE_CAPACITY: usize = 1000;

/// Elevator load limit (onboard passengers)
pub const MAX_LOAD_LIMIT: usize = 20;

/// Sentinel for "no target floor"
pub const NO_FLOOR: i32 = -1;

//
// ──────────────────────────────────────────────────────────────
//   3. AUTHORIZATION
// ──────────────────────────────────────────────────────────────
//

/// Symbols an authorization string is built from, in odometer order
pub const AUTH_ALPHABET: [char; 6] = ['a', 'b', 'c', 'd', 'e', 'f'];

/// Longest authorization string the solvers accept
pub const AUTH_STRING_MAX: usize = 20;

// Ein full heis må kunne autoriserast
const _: () = assert!(MAX_LOAD_LIMIT <= AUTH_STRING_MAX);

/// Limit on guesses per authorization round, to avoid an infinite loop
pub const AUTH_GUESS_LIMIT: usize = 5000;

//
// ──────────────────────────────────────────────────────────────
//   4. WIRE FORMAT
// ──────────────────────────────────────────────────────────────
//

/// Largest frame accepted from a peer, in bytes
pub const MAX_FRAME_LEN: usize = 1 << 20;

//
// ──────────────────────────────────────────────────────────────
//   5. LOGGING CONFIGURATION
// ──────────────────────────────────────────────────────────────
//

/// Enable/disable printing of the fleet status table
pub static PRINT_FLEET_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of errors
pub static PRINT_ERR_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of warnings
pub static PRINT_WARN_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of success messages
pub static PRINT_OK_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable printing of general info
pub static PRINT_INFO_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Enable/disable miscellaneous debug prints
pub static PRINT_ELSE_ON: Lazy<Mutex<bool>> = Lazy::new(|| Mutex::new(true));

/// Switches off everything except errors and warnings.
///
/// Used by `--quiet` on the command line.
pub fn set_quiet() {
    for toggle in [&PRINT_FLEET_ON, &PRINT_OK_ON, &PRINT_INFO_ON, &PRINT_ELSE_ON] {
        if let Ok(mut on) = toggle.lock() {
            *on = false;
        }
    }
}
