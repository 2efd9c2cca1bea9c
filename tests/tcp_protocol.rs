//! One elevator, one request, over real sockets.
//!
//! The turn authority and the solver are played by tasks behind tokio listeners that speak
//! the same framed protocol as the real collaborators.

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use elevatorsolver::elevator_logic::dispatch::{DispatchSettings, Dispatcher};
use elevatorsolver::network::oracle_client::{SolverRequest, SolverResponse, TcpOracleClient};
use elevatorsolver::network::turn_client::{TcpTurnClient, TurnChangeRequest, TurnChangeResponse};
use elevatorsolver::network::{read_frame, write_frame};
use elevatorsolver::world_view::{Directive, PassengerRequest, StateEnvelope};

const NUM_FLOORS: i32 = 10;
const FINISH_AT: u32 = 9;
const SECRET: &str = "c";

/// What the authority stand-in received in one exchange
#[derive(Debug)]
struct Exchange {
    directives: String,
    request: TurnChangeRequest,
    picked: Option<(i32, usize)>,
    dropped: Option<i32>,
    floor_before: i32,
}

async fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    (listener, addr)
}

fn snapshot(floor: i32, turn: u32) -> StateEnvelope {
    let mut envelope = StateEnvelope::new(1);
    envelope.elevator_floors = vec![floor];
    if turn == 0 {
        envelope.new_passenger_requests.push(PassengerRequest::new(1, 3, 7));
    }
    envelope
}

fn response(turn: u32) -> TurnChangeResponse {
    TurnChangeResponse {
        turn_number: turn,
        new_passenger_request_count: u32::from(turn == 0),
        error_occurred: false,
        finished: turn >= FINISH_AT,
    }
}

/// Plays the turn authority until it has announced `finished`
fn spawn_authority(state: TcpListener, turn: TcpListener) -> JoinHandle<Vec<Exchange>> {
    tokio::spawn(async move {
        let (mut state_stream, _) = state.accept().await.unwrap();
        let (mut turn_stream, _) = turn.accept().await.unwrap();

        let mut floor = 0;
        let mut current = 0;
        write_frame(&mut state_stream, &snapshot(floor, current)).await.unwrap();
        write_frame(&mut turn_stream, &response(current)).await.unwrap();

        let mut log = Vec::new();
        while current < FINISH_AT {
            let envelope: StateEnvelope = read_frame(&mut state_stream).await.unwrap();
            let request: TurnChangeRequest = read_frame(&mut turn_stream).await.unwrap();
            log.push(Exchange {
                directives: envelope.instructions_string(),
                request,
                picked: envelope.picked_up_passenger,
                dropped: envelope.dropped_passenger,
                floor_before: floor,
            });

            floor = match envelope.elevator_movement_instructions[0] {
                Directive::Up => (floor + 1).min(NUM_FLOORS - 1),
                Directive::Down => (floor - 1).max(0),
                Directive::Stay => floor,
            };
            current += 1;
            write_frame(&mut state_stream, &snapshot(floor, current)).await.unwrap();
            write_frame(&mut turn_stream, &response(current)).await.unwrap();
        }
        log
    })
}

/// Plays a solver that accepts only [SECRET], until the controller hangs up
fn spawn_solver(solver: TcpListener) -> JoinHandle<(usize, Vec<String>)> {
    tokio::spawn(async move {
        let (mut stream, _) = solver.accept().await.unwrap();
        let mut rounds = 0;
        let mut guesses = Vec::new();
        while let Ok(request) = read_frame::<_, SolverRequest>(&mut stream).await {
            match request {
                SolverRequest::BeginRound { elevator_number } => {
                    assert_eq!(elevator_number, 0);
                    rounds += 1;
                }
                SolverRequest::Guess { auth_string_guess, .. } => {
                    let verdict = SolverResponse { guess_is_correct: auth_string_guess == SECRET };
                    guesses.push(auth_string_guess);
                    write_frame(&mut stream, &verdict).await.unwrap();
                }
            }
        }
        (rounds, guesses)
    })
}

#[tokio::test]
async fn single_request_over_tcp() {
    let (state, state_addr) = listener().await;
    let (turn, turn_addr) = listener().await;
    let (solver, solver_addr) = listener().await;
    let authority_task = spawn_authority(state, turn);
    let solver_task = spawn_solver(solver);

    let turn_client = TcpTurnClient::connect(&state_addr, &turn_addr).await.unwrap();
    let oracle = TcpOracleClient::connect(&solver_addr).await.unwrap();
    let settings = DispatchSettings { num_elevators: 1, num_floors: NUM_FLOORS, horizon: 10 };

    let mut dispatcher = Dispatcher::start(settings, turn_client, oracle).await.unwrap();
    dispatcher.run().await.unwrap();
    assert!(dispatcher.is_finished());
    assert_eq!(dispatcher.turn(), FINISH_AT);
    assert_eq!(dispatcher.fleet()[0].current_floor, 7);
    assert!(dispatcher.fleet()[0].onboard.is_empty());
    drop(dispatcher);

    let log = authority_task.await.unwrap();
    let directives: Vec<&str> = log.iter().map(|e| e.directives.as_str()).collect();
    assert_eq!(directives, vec!["u", "u", "u", "u", "u", "u", "u", "s", "s"]);

    let pickup = &log[3];
    assert_eq!(pickup.floor_before, 3);
    assert_eq!(pickup.request, TurnChangeRequest { dropped_passengers_count: 0, picked_up_passengers_count: 1 });
    assert_eq!(pickup.picked, Some((1, 0)));

    let drop_off = &log[7];
    assert_eq!(drop_off.floor_before, 7);
    assert_eq!(drop_off.request, TurnChangeRequest { dropped_passengers_count: 1, picked_up_passengers_count: 0 });
    assert_eq!(drop_off.dropped, Some(1));

    assert!(log.iter().enumerate().all(|(i, e)| i == 3 || e.picked.is_none()));
    assert!(log.iter().enumerate().all(|(i, e)| i == 7 || e.dropped.is_none()));

    // One round for the pickup, one per loaded step. The token carries over between rounds.
    let (rounds, guesses) = solver_task.await.unwrap();
    assert_eq!(rounds, 4);
    assert_eq!(&guesses[..3], ["a", "b", "c"]);
    assert_eq!(guesses.len(), 3 + 3 * 6);
    assert!(guesses.iter().all(|g| g.len() == 1));
}
