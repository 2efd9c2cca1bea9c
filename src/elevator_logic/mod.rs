//! ## Elevator logic
//!
//! Per-elevator state and the logic that drives it:
//! - [request]: which way to move toward a floor
//! - [authorization]: brute-forcing the token a loaded elevator needs to move
//! - [dispatch]: the per-tick state machine assigning requests to elevators
//!
//! The fleet is an arena of [ElevatorState] records indexed by elevator id. The controller
//! owns everything in it except `current_floor`, which is copied from the authority's
//! snapshot after every tick.

pub mod request;
pub mod authorization;
pub mod dispatch;

use std::ops::{Index, IndexMut};

use crate::config;
use crate::world_view::{Directive, ElevatorId, OnboardPassenger, PassengerRequest};


#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Phase of the dispatch state machine an elevator is in.
pub enum Phase {
    #[default]
    Idle,
    ApproachPickup,
    Pickup,
    Transit,
    DropOff,
}

/// State of one elevator as seen by the controller.
#[derive(Debug, Clone, Default)]
pub struct ElevatorState {
    /// Floor reported by the turn authority. Never changed by the controller.
    pub current_floor: i32,

    /// Passengers on board, in boarding order, at most [config::MAX_LOAD_LIMIT]
    pub onboard: Vec<OnboardPassenger>,

    /// Directive for the next tick. Default: [Directive::Stay]
    pub directive: Directive,

    /// Most recent authorization guess (accepted or in progress)
    pub auth_token: String,

    /// Where the elevator is in the dispatch cycle
    pub phase: Phase,
}

impl ElevatorState {
    /// `true` if the elevator carries at least one passenger
    pub fn is_loaded(&self) -> bool {
        !self.onboard.is_empty()
    }

    /// `true` if nobody else fits
    pub fn is_full(&self) -> bool {
        self.onboard.len() >= config::MAX_LOAD_LIMIT
    }

    /// Boards the passenger of `request`.
    ///
    /// ## Returns
    /// - `false` if the elevator is full. Nothing changes.
    pub fn board(&mut self, request: PassengerRequest) -> bool {
        if self.is_full() {
            return false;
        }
        self.onboard.push(OnboardPassenger::from(request));
        true
    }

    /// Index of the first passenger who wants off at the current floor
    pub fn next_leaving_here(&self) -> Option<usize> {
        self.onboard.iter().position(|p| p.requested_floor == self.current_floor)
    }

    /// Removes the passenger at `idx`, keeping the order of the others
    pub fn alight(&mut self, idx: usize) -> OnboardPassenger {
        self.onboard.remove(idx)
    }
}


/// All elevators, indexed by [ElevatorId].
#[derive(Debug, Clone, Default)]
pub struct Fleet {
    elevators: Vec<ElevatorState>,
}

impl Fleet {
    /// Creates `num_elevators` idle elevators
    pub fn new(num_elevators: usize) -> Self {
        Self { elevators: vec![ElevatorState::default(); num_elevators] }
    }

    /// Number of elevators
    pub fn len(&self) -> usize {
        self.elevators.len()
    }

    /// `true` for a fleet without elevators
    pub fn is_empty(&self) -> bool {
        self.elevators.is_empty()
    }

    /// Elevators in id order
    pub fn iter(&self) -> impl Iterator<Item = &ElevatorState> {
        self.elevators.iter()
    }

    /// Sets every directive to [Directive::Stay]
    pub fn reset_directives(&mut self) {
        for elevator in &mut self.elevators {
            elevator.directive = Directive::Stay;
        }
    }

    /// Copies authority floors into the fleet, in id order
    pub fn refresh_floors(&mut self, floors: &[i32]) {
        for (elevator, floor) in self.elevators.iter_mut().zip(floors) {
            elevator.current_floor = *floor;
        }
    }

    /// Current directive of every elevator, in id order
    pub fn directives(&self) -> impl Iterator<Item = Directive> + '_ {
        self.elevators.iter().map(|e| e.directive)
    }

    /// Total number of passengers on board across the fleet
    pub fn passengers(&self) -> usize {
        self.elevators.iter().map(|e| e.onboard.len()).sum()
    }
}

impl Index<ElevatorId> for Fleet {
    type Output = ElevatorState;

    fn index(&self, id: ElevatorId) -> &ElevatorState {
        &self.elevators[id]
    }
}

impl IndexMut<ElevatorId> for Fleet {
    fn index_mut(&mut self, id: ElevatorId) -> &mut ElevatorState {
        &mut self.elevators[id]
    }
}
