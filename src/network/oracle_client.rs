//! ## Solver (oracle) channel
//!
//! A solver judges authorization guesses for one elevator at a time.
//! A round starts with [SolverRequest::BeginRound], after which every
//! [SolverRequest::Guess] is answered with a [SolverResponse].

use anyhow::Context;
use serde::{Serialize, Deserialize};
use tokio::net::TcpStream;

use crate::network;
use crate::world_view::ElevatorId;


/// Messages from the controller to a solver
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum SolverRequest {
    /// Announces that guesses for `elevator_number` follow. Not answered.
    BeginRound {
        /// Elevator the round is for
        elevator_number: ElevatorId,
    },
    /// One guess. Answered with a [SolverResponse].
    Guess {
        /// Elevator the guess is for
        elevator_number: ElevatorId,
        /// The candidate authorization string
        auth_string_guess: String,
    },
}

/// Verdict on one guess
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverResponse {
    /// `true` if the guess authorizes the elevator's next move
    pub guess_is_correct: bool,
}

/// Synchronous exchange with a solver.
#[allow(async_fn_in_trait)]
pub trait Oracle {
    /// Starts a guessing round for `elevator`
    async fn begin_round(&mut self, elevator: ElevatorId) -> anyhow::Result<()>;

    /// Submits `guess` and waits for the verdict
    async fn guess(&mut self, elevator: ElevatorId, guess: &str) -> anyhow::Result<bool>;
}


/// [Oracle] over TCP
pub struct TcpOracleClient {
    stream: TcpStream,
}

impl TcpOracleClient {
    /// Connects to a solver channel
    pub async fn connect(addr: &str) -> anyhow::Result<Self> {
        let stream = network::connect(addr).await.context("Solver channel")?;
        Ok(Self { stream })
    }
}

impl Oracle for TcpOracleClient {
    async fn begin_round(&mut self, elevator: ElevatorId) -> anyhow::Result<()> {
        network::write_frame(&mut self.stream, &SolverRequest::BeginRound { elevator_number: elevator })
            .await
            .context("Writing begin-round")
    }

    async fn guess(&mut self, elevator: ElevatorId, guess: &str) -> anyhow::Result<bool> {
        let request = SolverRequest::Guess {
            elevator_number: elevator,
            auth_string_guess: guess.to_string(),
        };
        network::write_frame(&mut self.stream, &request).await.context("Writing guess")?;
        let response: SolverResponse = network::read_frame(&mut self.stream)
            .await
            .context("Reading solver verdict")?;
        Ok(response.guess_is_correct)
    }
}
