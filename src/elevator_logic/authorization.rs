//! Authorization of a loaded elevator's next move.
//!
//! A loaded elevator may only move once a solver has accepted an authorization string of
//! exactly one character per passenger, drawn from [config::AUTH_ALPHABET]. The string is found
//! by brute force: candidates are enumerated like an odometer, rightmost character first.
//! A round is run before every single-floor step; nothing is cached between steps except the
//! last candidate, which the next round continues from.

use crate::config;
use crate::network::oracle_client::Oracle;
use crate::world_view::ElevatorId;


/// Result of one authorization round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthOutcome {
    /// `true` if a solver accepted the final candidate
    pub accepted: bool,
    /// Number of guesses sent in the round
    pub attempts: usize,
}

/// Steps `token` to the next candidate, base-6 over [config::AUTH_ALPHABET].
///
/// The rightmost character that is not the last symbol is bumped by one and every last symbol
/// to its right wraps to the first one. A token of only last symbols wraps around completely.
///
/// # Example
/// ```
/// use elevatorsolver::elevator_logic::authorization::increment;
///
/// let mut token = String::from("af");
/// increment(&mut token);
/// assert_eq!(token, "ba");
/// ```
pub fn increment(token: &mut String) {
    let first = config::AUTH_ALPHABET[0];
    let last = config::AUTH_ALPHABET[config::AUTH_ALPHABET.len() - 1];

    let mut chars: Vec<char> = token.chars().collect();
    for c in chars.iter_mut().rev() {
        if *c < last {
            *c = (*c as u8 + 1) as char;
            break;
        }
        *c = first;
    }
    *token = chars.into_iter().collect();
}

/// Produces the next guess in place.
///
/// An empty token, or one whose length no longer matches the passenger count, starts over
/// at `"a" * passenger_count`. Otherwise the token is incremented.
pub fn next_candidate(token: &mut String, passenger_count: usize) {
    if token.is_empty() || token.chars().count() != passenger_count {
        *token = config::AUTH_ALPHABET[0].to_string().repeat(passenger_count);
    } else {
        increment(token);
    }
}

/// Number of guesses allowed in one round for `passenger_count` passengers.
///
/// Capped at [config::AUTH_GUESS_LIMIT], and at the number of distinct candidates since the
/// odometer repeats itself after that.
pub fn guess_budget(passenger_count: usize) -> usize {
    let distinct = u32::try_from(passenger_count)
        .ok()
        .and_then(|n| (config::AUTH_ALPHABET.len() as u64).checked_pow(n))
        .unwrap_or(u64::MAX);
    distinct.min(config::AUTH_GUESS_LIMIT as u64) as usize
}

/// Runs one authorization round for `elevator` carrying `passenger_count` passengers.
///
/// Sends a begin-round, then guesses until a solver accepts or the budget from
/// [guess_budget] is spent. `token` holds the last candidate afterwards, accepted or not.
///
/// ## Errors
/// - only channel failures. An exhausted budget is reported through [AuthOutcome::accepted].
pub async fn authorize<O: Oracle>(
    oracle: &mut O,
    elevator: ElevatorId,
    passenger_count: usize,
    token: &mut String,
) -> anyhow::Result<AuthOutcome> {
    oracle.begin_round(elevator).await?;

    let budget = guess_budget(passenger_count);
    let mut attempts = 0;
    while attempts < budget {
        next_candidate(token, passenger_count);
        attempts += 1;
        if oracle.guess(elevator, token).await? {
            return Ok(AuthOutcome { accepted: true, attempts });
        }
    }
    Ok(AuthOutcome { accepted: false, attempts })
}


#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Accepts a single secret and records every message
    struct SecretOracle {
        secret: String,
        rounds: Vec<ElevatorId>,
        guesses: Vec<String>,
    }

    impl SecretOracle {
        fn new(secret: &str) -> Self {
            Self { secret: secret.to_string(), rounds: Vec::new(), guesses: Vec::new() }
        }
    }

    impl Oracle for SecretOracle {
        async fn begin_round(&mut self, elevator: ElevatorId) -> anyhow::Result<()> {
            self.rounds.push(elevator);
            Ok(())
        }

        async fn guess(&mut self, _elevator: ElevatorId, guess: &str) -> anyhow::Result<bool> {
            self.guesses.push(guess.to_string());
            Ok(guess == self.secret)
        }
    }

    #[test]
    fn odometer_for_two_passengers() {
        let mut token = String::new();
        let mut seen = Vec::new();
        for _ in 0..8 {
            next_candidate(&mut token, 2);
            seen.push(token.clone());
        }
        assert_eq!(seen, vec!["aa", "ab", "ac", "ad", "ae", "af", "ba", "bb"]);
    }

    #[test]
    fn odometer_wraps_completely() {
        let mut token = String::from("fff");
        increment(&mut token);
        assert_eq!(token, "aaa");
    }

    #[test]
    fn token_restarts_when_load_changes() {
        let mut token = String::from("cd");
        next_candidate(&mut token, 3);
        assert_eq!(token, "aaa");
    }

    #[test]
    fn budget_is_capped_by_distinct_candidates() {
        assert_eq!(guess_budget(1), 6);
        assert_eq!(guess_budget(4), 1296);
        assert_eq!(guess_budget(5), config::AUTH_GUESS_LIMIT);
        assert_eq!(guess_budget(config::MAX_LOAD_LIMIT), config::AUTH_GUESS_LIMIT);
    }

    #[tokio::test]
    async fn finds_the_secret() {
        let mut oracle = SecretOracle::new("bc");
        let mut token = String::new();
        let outcome = authorize(&mut oracle, 3, 2, &mut token).await.unwrap();

        assert_eq!(outcome, AuthOutcome { accepted: true, attempts: 9 });
        assert_eq!(token, "bc");
        assert_eq!(oracle.rounds, vec![3]);
        assert_eq!(oracle.guesses.first().map(String::as_str), Some("aa"));
    }

    #[tokio::test]
    async fn next_round_continues_after_last_candidate() {
        let mut oracle = SecretOracle::new("ab");
        let mut token = String::from("ab");
        let outcome = authorize(&mut oracle, 0, 2, &mut token).await.unwrap();

        // "ab" is only reached again after a full cycle
        assert_eq!(outcome, AuthOutcome { accepted: true, attempts: 36 });
        assert_eq!(oracle.guesses[0], "ac");
    }

    #[tokio::test]
    async fn exhaustion_is_not_an_error() {
        let mut oracle = SecretOracle::new("never");
        let mut token = String::new();
        let outcome = authorize(&mut oracle, 1, 1, &mut token).await.unwrap();

        assert_eq!(outcome, AuthOutcome { accepted: false, attempts: 6 });
        assert_eq!(oracle.guesses, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[tokio::test]
    async fn exhaustion_stops_at_guess_limit() {
        let mut oracle = SecretOracle::new("never");
        let mut token = String::new();
        let outcome = authorize(&mut oracle, 1, 6, &mut token).await.unwrap();
        assert_eq!(outcome.attempts, config::AUTH_GUESS_LIMIT);
        assert_eq!(oracle.guesses.len(), config::AUTH_GUESS_LIMIT);
    }

    proptest! {
        #[test]
        fn prop_candidates_are_distinct_within_a_cycle(n in 1usize..=4) {
            let mut token = String::new();
            let mut seen = std::collections::HashSet::new();
            let cycle = 6usize.pow(n as u32);
            for _ in 0..cycle {
                next_candidate(&mut token, n);
                prop_assert_eq!(token.len(), n);
                prop_assert!(token.chars().all(|c| config::AUTH_ALPHABET.contains(&c)));
                prop_assert!(seen.insert(token.clone()));
            }
            next_candidate(&mut token, n);
            prop_assert_eq!(token, "a".repeat(n));
        }
    }
}
