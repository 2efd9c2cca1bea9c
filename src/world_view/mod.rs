//! ## World view shared with the turn authority
//!
//! The controller and the turn authority agree on one snapshot of the simulation per tick,
//! the [StateEnvelope]. The authority owns the elevator floors and the newly arrived requests,
//! the controller owns the movement directives, authorization strings and the
//! drop-off/pickup slots. Ownership alternates strictly: the controller fills in its fields,
//! hands the envelope over with a turn-advance request, and adopts the authority's fields
//! from the snapshot that comes back.

pub mod serial;

use serde::{Serialize, Deserialize};
use crate::config;

/// Identifier of a passenger request, assigned by the turn authority
pub type RequestId = i32;

/// Index of an elevator, `0..N`
pub type ElevatorId = usize;

/// A passenger waiting at `start_floor` who wants to go to `requested_floor`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassengerRequest {
    /// Unique id of the request
    pub request_id: RequestId,
    /// Floor the passenger is waiting at
    pub start_floor: i32,
    /// Floor the passenger wants to go to
    pub requested_floor: i32,
}

impl PassengerRequest {
    /// Creates a new request
    pub fn new(request_id: RequestId, start_floor: i32, requested_floor: i32) -> Self {
        Self { request_id, start_floor, requested_floor }
    }

    /// Absolute distance between `floor` and the start floor of the request.
    ///
    /// Floors come from the authority unchecked, so the whole `i32` range is allowed.
    pub fn distance_from(&self, floor: i32) -> u32 {
        floor.abs_diff(self.start_floor)
    }

    /// Signed travel of the passenger, positive when going up
    pub fn travel(&self) -> i64 {
        i64::from(self.requested_floor) - i64::from(self.start_floor)
    }
}

/// A passenger that has been picked up and rides until `requested_floor`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardPassenger {
    /// Id of the request the passenger came from
    pub request_id: RequestId,
    /// Floor the passenger leaves the elevator at
    pub requested_floor: i32,
}

impl From<PassengerRequest> for OnboardPassenger {
    fn from(request: PassengerRequest) -> Self {
        Self { request_id: request.request_id, requested_floor: request.requested_floor }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
/// Movement command for one elevator for one tick.
pub enum Directive {
    Up,
    Down,
    #[default]
    Stay,
}

impl Directive {
    /// The character the turn authority uses for the directive (`u`, `d`, `s`)
    pub fn as_char(self) -> char {
        match self {
            Directive::Up => 'u',
            Directive::Down => 'd',
            Directive::Stay => 's',
        }
    }
}

/// The per-tick snapshot exchanged with the turn authority.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StateEnvelope {
    /// Current authorization guess per elevator (controller → authority/oracle)
    pub auth_strings: Vec<String>,

    /// One directive per elevator (controller → authority)
    pub elevator_movement_instructions: Vec<Directive>,

    /// Requests that arrived this tick, at most [config::MAX_NEW_REQUESTS] (authority → controller)
    pub new_passenger_requests: Vec<PassengerRequest>,

    /// Current floor per elevator (authority → controller)
    pub elevator_floors: Vec<i32>,

    /// Request id dropped off in this sub-step (controller → authority)
    pub dropped_passenger: Option<RequestId>,

    /// `(request id, elevator)` picked up in this sub-step (controller → authority)
    pub picked_up_passenger: Option<(RequestId, ElevatorId)>,
}

impl StateEnvelope {
    /// Creates an envelope for `num_elevators` elevators, every directive set to [Directive::Stay]
    pub fn new(num_elevators: usize) -> Self {
        Self {
            auth_strings: vec![String::new(); num_elevators],
            elevator_movement_instructions: vec![Directive::Stay; num_elevators],
            new_passenger_requests: Vec::new(),
            elevator_floors: vec![0; num_elevators],
            dropped_passenger: None,
            picked_up_passenger: None,
        }
    }

    /// Adopts the authority-owned fields of `snapshot`.
    ///
    /// Floors and new requests are copied, everything the controller writes is left alone.
    /// New requests beyond [config::MAX_NEW_REQUESTS] are cut off.
    pub fn absorb_authority_snapshot(&mut self, snapshot: StateEnvelope) {
        self.elevator_floors = snapshot.elevator_floors;
        self.new_passenger_requests = snapshot.new_passenger_requests;
        self.new_passenger_requests.truncate(config::MAX_NEW_REQUESTS);
    }

    /// The first `count` newly arrived requests, capped at what the envelope actually holds
    pub fn new_requests(&self, count: usize) -> &[PassengerRequest] {
        let n = count.min(self.new_passenger_requests.len());
        &self.new_passenger_requests[..n]
    }

    /// Directive string as the authority reads it, e.g. `"usd"`
    pub fn instructions_string(&self) -> String {
        self.elevator_movement_instructions.iter().map(|d| d.as_char()).collect()
    }
}
