//! Errors that end a dispatch run.
//!
//! Everything here is fatal. Non-fatal conditions (full queue, exhausted authorization,
//! full elevator) are handled where they happen and only logged.

use thiserror::Error;

use crate::world_view::ElevatorId;

/// Errors that can occur while driving the elevators
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The turn authority answered a turn-advance with `error_occurred`
    #[error("Turn authority reported an error in turn {turn}{}", elevator_suffix(.elevator))]
    AuthorityError {
        /// Turn number carried by the failing response
        turn: u32,
        /// Elevator being serviced when the error was reported, `None` during start-up
        elevator: Option<ElevatorId>,
    },

    /// The start-up turn has no request queue
    #[error("Turn {turn} is outside the configured horizon 0..={horizon}")]
    TurnOutOfRange {
        /// Turn reported by the authority
        turn: u32,
        /// Last request turn from the scenario
        horizon: u32,
    },

    /// The authority's snapshot describes a different number of elevators
    #[error("Snapshot has {found} elevator floors, expected {expected}")]
    SnapshotMismatch {
        /// Number of elevators in the scenario
        expected: usize,
        /// Number of floors in the snapshot
        found: usize,
    },

    /// A channel to the authority or a solver failed
    #[error("Channel failure: {0:#}")]
    Channel(#[from] anyhow::Error),
}

fn elevator_suffix(elevator: &Option<ElevatorId>) -> String {
    match elevator {
        Some(id) => format!(" while moving elevator {}", id),
        None => String::new(),
    }
}
