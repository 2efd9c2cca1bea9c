//! # Dispatch loop
//!
//! Drives every elevator through the phases
//! `Idle → ApproachPickup → Pickup → Transit → DropOff → Idle`, one elevator at a time.
//!
//! Each single-floor step, each pickup and each drop-off is one turn-advance exchange with
//! the authority. Before every exchange the directive of the serviced elevator is written to
//! the envelope (all others stay at [Directive::Stay]) and, if the elevator carries
//! passengers, an authorization round is run. After every exchange new requests are queued
//! and floors are refreshed.
//!
//! `finished` from the authority ends the run successfully wherever it happens,
//! `error_occurred` ends it with [DispatchError::AuthorityError].

use crate::config;
use crate::elevator_logic::{authorization, request, Fleet, Phase};
use crate::error::DispatchError;
use crate::manager::TurnQueues;
use crate::network::oracle_client::Oracle;
use crate::network::turn_client::{TurnAuthority, TurnChangeResponse};
use crate::print;
use crate::world_view::{Directive, ElevatorId, PassengerRequest, StateEnvelope};


/// Scenario dimensions the dispatcher needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Number of elevators `N`
    pub num_elevators: usize,
    /// Number of floors `K`
    pub num_floors: i32,
    /// Last request turn `T`, one queue is kept per turn `0..=T`
    pub horizon: u32,
}

/// Whether the run goes on after an exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep going
    Continue,
    /// The authority said the simulation is over
    Finished,
}

/// Counters for one run, logged on completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Turn-advance exchanges made, start-up excluded
    pub ticks: u64,
    /// Passengers boarded
    pub pickups: u64,
    /// Passengers delivered
    pub drop_offs: u64,
    /// Requests dropped because the active queue was full
    pub rejected_requests: u64,
    /// Requests lost because the assigned elevator was full
    pub lost_requests: u64,
    /// Requests lost because the start floor is outside the building
    pub unreachable_requests: u64,
    /// Authorization rounds run
    pub auth_rounds: u64,
    /// Authorization rounds that ran out of guesses
    pub auth_exhausted: u64,
}


/// The dispatch engine.
///
/// Owns the fleet, the request queues, the controller's copy of the state envelope and the
/// two channels. Only one exchange is ever in flight.
pub struct Dispatcher<A: TurnAuthority, O: Oracle> {
    settings: DispatchSettings,
    fleet: Fleet,
    envelope: StateEnvelope,
    queues: TurnQueues,
    authority: A,
    oracle: O,
    turn: u32,
    finished: bool,
    stats: DispatchStats,
}

impl<A: TurnAuthority, O: Oracle> Dispatcher<A, O> {
    /// Synchronizes with the authority and prepares the run.
    ///
    /// Waits for the authority's first response. Its turn number selects the active request
    /// queue for the whole run, and its requests are queued.
    ///
    /// ## Errors
    /// - [DispatchError::AuthorityError] if the first response carries `error_occurred`
    /// - [DispatchError::TurnOutOfRange] if the first turn is beyond the horizon
    /// - [DispatchError::SnapshotMismatch] or [DispatchError::Channel] on a bad channel
    pub async fn start(settings: DispatchSettings, mut authority: A, oracle: O) -> Result<Self, DispatchError> {
        let mut envelope = StateEnvelope::new(settings.num_elevators);
        let first = authority.await_first_turn(&mut envelope).await?;
        if first.error_occurred {
            return Err(DispatchError::AuthorityError { turn: first.turn_number, elevator: None });
        }
        let queues = TurnQueues::new(settings.horizon, first.turn_number)?;

        let mut dispatcher = Self {
            settings,
            fleet: Fleet::new(settings.num_elevators),
            envelope,
            queues,
            authority,
            oracle,
            turn: first.turn_number,
            finished: false,
            stats: DispatchStats::default(),
        };
        if dispatcher.accept(first, None)? == Flow::Finished {
            dispatcher.finished = true;
        }
        print::info(format!(
            "Synchronized at turn {}, {} request(s) pending",
            dispatcher.turn,
            dispatcher.queues.pending()
        ));
        Ok(dispatcher)
    }

    /// Runs ticks until the authority reports `finished`.
    ///
    /// Every tick starts with all directives at [Directive::Stay] and services the elevators
    /// in id order. A tick in which no elevator had anything to do still advances time once,
    /// so new requests keep arriving.
    pub async fn run(&mut self) -> Result<(), DispatchError> {
        while !self.finished {
            let ticks_before = self.stats.ticks;
            self.fleet.reset_directives();

            for id in 0..self.fleet.len() {
                if self.service_elevator(id).await? == Flow::Finished {
                    self.finished = true;
                    break;
                }
            }

            if !self.finished
                && self.stats.ticks == ticks_before
                && self.advance(None, 0, 0).await? == Flow::Finished
            {
                self.finished = true;
            }
        }
        Ok(())
    }

    /// Takes the nearest pending request for elevator `id` and carries it through every phase.
    async fn service_elevator(&mut self, id: ElevatorId) -> Result<Flow, DispatchError> {
        self.fleet[id].phase = Phase::Idle;
        self.fleet[id].directive = Directive::Stay;

        let current_floor = self.fleet[id].current_floor;
        let Some(request) = self.queues.active_mut().select_nearest(current_floor) else {
            return Ok(Flow::Continue);
        };

        self.fleet[id].phase = Phase::ApproachPickup;
        if self.approach_pickup(id, &request).await? == Flow::Finished {
            return Ok(Flow::Finished);
        }
        self.fleet[id].phase = Phase::Pickup;
        if self.pickup(id, &request).await? == Flow::Finished {
            return Ok(Flow::Finished);
        }
        self.fleet[id].phase = Phase::Transit;
        if self.transit(id, request.requested_floor).await? == Flow::Finished {
            return Ok(Flow::Finished);
        }
        self.fleet[id].phase = Phase::DropOff;
        if self.drop_off(id).await? == Flow::Finished {
            return Ok(Flow::Finished);
        }

        self.fleet[id].phase = Phase::Idle;
        Ok(Flow::Continue)
    }

    /// Moves elevator `id` one floor at a time toward the start floor of `request`.
    async fn approach_pickup(&mut self, id: ElevatorId, request: &PassengerRequest) -> Result<Flow, DispatchError> {
        while self.fleet[id].current_floor != request.start_floor {
            let directive = request::directive_towards(
                self.fleet[id].current_floor,
                request.start_floor,
                self.settings.num_floors,
            );
            if directive == Directive::Stay {
                // As close as the building allows
                self.stats.unreachable_requests += 1;
                print::warn(format!(
                    "Elevator {} cannot reach floor {} for request {}",
                    id, request.start_floor, request.request_id
                ));
                break;
            }
            if self.step(id, directive).await? == Flow::Finished {
                return Ok(Flow::Finished);
            }
        }
        Ok(Flow::Continue)
    }

    /// Boards the passenger of `request` if elevator `id` is at its start floor and has room.
    ///
    /// A request that does not fit is not queued again.
    async fn pickup(&mut self, id: ElevatorId, request: &PassengerRequest) -> Result<Flow, DispatchError> {
        if self.fleet[id].current_floor != request.start_floor {
            return Ok(Flow::Continue);
        }
        if !self.fleet[id].board(*request) {
            self.stats.lost_requests += 1;
            print::warn(format!(
                "Elevator {} is full ({} onboard), request {} is lost",
                id,
                config::MAX_LOAD_LIMIT,
                request.request_id
            ));
            return Ok(Flow::Continue);
        }

        self.stats.pickups += 1;
        self.envelope.picked_up_passenger = Some((request.request_id, id));

        self.fleet.reset_directives();
        self.fleet[id].directive = request::directive_towards(
            self.fleet[id].current_floor,
            request.requested_floor,
            self.settings.num_floors,
        );
        self.authorize_if_loaded(id).await?;
        self.advance(Some(id), 0, 1).await
    }

    /// Moves elevator `id` one floor at a time toward `target_floor`.
    async fn transit(&mut self, id: ElevatorId, target_floor: i32) -> Result<Flow, DispatchError> {
        while target_floor != config::NO_FLOOR && self.fleet[id].current_floor != target_floor {
            let directive = request::directive_towards(
                self.fleet[id].current_floor,
                target_floor,
                self.settings.num_floors,
            );
            if directive == Directive::Stay {
                break;
            }
            if self.step(id, directive).await? == Flow::Finished {
                return Ok(Flow::Finished);
            }
        }
        Ok(Flow::Continue)
    }

    /// Lets off every passenger of elevator `id` whose floor is the current one.
    ///
    /// Only one drop-off can be reported per exchange, so each passenger costs one tick.
    async fn drop_off(&mut self, id: ElevatorId) -> Result<Flow, DispatchError> {
        while let Some(idx) = self.fleet[id].next_leaving_here() {
            let passenger = self.fleet[id].alight(idx);
            self.stats.drop_offs += 1;
            self.envelope.dropped_passenger = Some(passenger.request_id);

            self.fleet.reset_directives();
            if self.advance(Some(id), 1, 0).await? == Flow::Finished {
                return Ok(Flow::Finished);
            }
        }
        Ok(Flow::Continue)
    }

    /// One single-floor move of elevator `id`, authorized first if it is loaded.
    async fn step(&mut self, id: ElevatorId, directive: Directive) -> Result<Flow, DispatchError> {
        self.fleet.reset_directives();
        self.fleet[id].directive = directive;
        self.authorize_if_loaded(id).await?;
        self.advance(Some(id), 0, 0).await
    }

    /// Runs an authorization round for elevator `id` when it carries passengers.
    ///
    /// Running out of guesses is not fatal, the move goes ahead with the last candidate.
    async fn authorize_if_loaded(&mut self, id: ElevatorId) -> Result<(), DispatchError> {
        if !self.fleet[id].is_loaded() {
            return Ok(());
        }
        let passenger_count = self.fleet[id].onboard.len();

        let outcome = authorization::authorize(
            &mut self.oracle,
            id,
            passenger_count,
            &mut self.fleet[id].auth_token,
        )
        .await?;
        self.envelope.auth_strings[id] = self.fleet[id].auth_token.clone();

        self.stats.auth_rounds += 1;
        if !outcome.accepted {
            self.stats.auth_exhausted += 1;
            print::warn(format!(
                "No accepted authorization for elevator {} after {} guesses",
                id, outcome.attempts
            ));
        }
        Ok(())
    }

    /// One turn-advance exchange. `elevator` is the one being serviced, if any.
    async fn advance(
        &mut self,
        elevator: Option<ElevatorId>,
        dropped_passengers_count: u32,
        picked_up_passengers_count: u32,
    ) -> Result<Flow, DispatchError> {
        for (slot, directive) in self.envelope.elevator_movement_instructions.iter_mut().zip(self.fleet.directives()) {
            *slot = directive;
        }

        let response = self
            .authority
            .advance(&mut self.envelope, dropped_passengers_count, picked_up_passengers_count)
            .await?;
        self.stats.ticks += 1;

        // Slottane gjeld berre for denne runden
        self.envelope.dropped_passenger = None;
        self.envelope.picked_up_passenger = None;

        self.accept(response, elevator)
    }

    /// Applies a response and the snapshot already absorbed into the envelope.
    fn accept(&mut self, response: TurnChangeResponse, elevator: Option<ElevatorId>) -> Result<Flow, DispatchError> {
        self.turn = response.turn_number;
        if response.finished {
            return Ok(Flow::Finished);
        }
        if response.error_occurred {
            print::err(format!("Error during movement in turn {}", response.turn_number));
            return Err(DispatchError::AuthorityError { turn: response.turn_number, elevator });
        }

        let expected = self.settings.num_elevators;
        let found = self.envelope.elevator_floors.len();
        if found != expected {
            return Err(DispatchError::SnapshotMismatch { expected, found });
        }

        let arrived = self.envelope.new_requests(response.new_passenger_request_count as usize);
        self.stats.rejected_requests += self.queues.absorb(arrived) as u64;
        self.fleet.refresh_floors(&self.envelope.elevator_floors);
        Ok(Flow::Continue)
    }

    /// The fleet as the controller sees it
    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Turn number of the last response
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// `true` once the authority has reported `finished`
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Counters so far
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Request queues
    pub fn queues(&self) -> &TurnQueues {
        &self.queues
    }

    /// Gives the channels back, e.g. to inspect test doubles
    pub fn into_channels(self) -> (A, O) {
        (self.authority, self.oracle)
    }
}
