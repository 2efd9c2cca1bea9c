//! ## Turn synchronization with the turn authority
//!
//! The authority owns the simulation clock. Each turn-advance hands it the controller's
//! half of the [StateEnvelope] and the drop/pickup counts for the sub-step, and returns a
//! [TurnChangeResponse] together with the authority's snapshot of floors and new requests.
//!
//! Two TCP streams are used, mirroring the two channels of the scenario file:
//! the state channel carries envelopes, the turn channel carries turn-change messages.

use anyhow::Context;
use serde::{Serialize, Deserialize};
use tokio::net::TcpStream;

use crate::network;
use crate::world_view::StateEnvelope;


/// Turn-advance request: what happened in this sub-step
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnChangeRequest {
    /// Passengers dropped off, reported in [StateEnvelope::dropped_passenger]
    pub dropped_passengers_count: u32,
    /// Passengers picked up, reported in [StateEnvelope::picked_up_passenger]
    pub picked_up_passengers_count: u32,
}

/// Turn-advance response from the authority
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnChangeResponse {
    /// Simulated turn after the advance
    pub turn_number: u32,
    /// Number of valid entries in [StateEnvelope::new_passenger_requests]
    pub new_passenger_request_count: u32,
    /// Fatal: the authority rejected the controller's last move
    pub error_occurred: bool,
    /// The simulation is over
    pub finished: bool,
}

/// A synchronous turn-advance exchange with the turn authority.
///
/// Implementations must complete the full round trip before returning and must update
/// `envelope` with the authority-owned fields of the new snapshot
/// (see [StateEnvelope::absorb_authority_snapshot]).
#[allow(async_fn_in_trait)]
pub trait TurnAuthority {
    /// Waits for the unsolicited first response the authority sends on start-up.
    async fn await_first_turn(&mut self, envelope: &mut StateEnvelope) -> anyhow::Result<TurnChangeResponse>;

    /// Advances the simulation by exactly one tick.
    async fn advance(
        &mut self,
        envelope: &mut StateEnvelope,
        dropped_passengers_count: u32,
        picked_up_passengers_count: u32,
    ) -> anyhow::Result<TurnChangeResponse>;
}


/// [TurnAuthority] over TCP
pub struct TcpTurnClient {
    state_stream: TcpStream,
    turn_stream: TcpStream,
}

impl TcpTurnClient {
    /// Connects to the state channel and the turn channel
    pub async fn connect(state_addr: &str, turn_addr: &str) -> anyhow::Result<Self> {
        let state_stream = network::connect(state_addr).await.context("State channel")?;
        let turn_stream = network::connect(turn_addr).await.context("Turn channel")?;
        Ok(Self { state_stream, turn_stream })
    }

    async fn receive(&mut self, envelope: &mut StateEnvelope) -> anyhow::Result<TurnChangeResponse> {
        let response: TurnChangeResponse = network::read_frame(&mut self.turn_stream)
            .await
            .context("Reading turn response")?;
        let snapshot: StateEnvelope = network::read_frame(&mut self.state_stream)
            .await
            .context("Reading state snapshot")?;
        envelope.absorb_authority_snapshot(snapshot);
        Ok(response)
    }
}

impl TurnAuthority for TcpTurnClient {
    async fn await_first_turn(&mut self, envelope: &mut StateEnvelope) -> anyhow::Result<TurnChangeResponse> {
        self.receive(envelope).await
    }

    async fn advance(
        &mut self,
        envelope: &mut StateEnvelope,
        dropped_passengers_count: u32,
        picked_up_passengers_count: u32,
    ) -> anyhow::Result<TurnChangeResponse> {
        network::write_frame(&mut self.state_stream, envelope)
            .await
            .context("Writing state envelope")?;
        let request = TurnChangeRequest { dropped_passengers_count, picked_up_passengers_count };
        network::write_frame(&mut self.turn_stream, &request)
            .await
            .context("Writing turn request")?;
        self.receive(envelope).await
    }
}
