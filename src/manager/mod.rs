//! ## Request manager
//!
//! Keeps pending passenger requests until an elevator is assigned to them.
//! There is one [RequestQueue] per arrival turn, but only the queue for the turn the
//! controller was started in is ever filled and drained, see [TurnQueues].

pub mod request_queue;

pub use request_queue::{ProximityContext, RequestQueue};

use crate::error::DispatchError;
use crate::world_view::PassengerRequest;


/// One request queue per arrival turn `0..=horizon`, with a single active queue.
#[derive(Debug, Clone)]
pub struct TurnQueues {
    queues: Vec<RequestQueue>,
    active_turn: usize,
}

impl TurnQueues {
    /// Creates queues for turns `0..=horizon` and activates `active_turn`.
    ///
    /// ## Errors
    /// - [DispatchError::TurnOutOfRange] if `active_turn > horizon`
    pub fn new(horizon: u32, active_turn: u32) -> Result<Self, DispatchError> {
        if active_turn > horizon {
            return Err(DispatchError::TurnOutOfRange { turn: active_turn, horizon });
        }
        Ok(Self {
            queues: vec![RequestQueue::new(); horizon as usize + 1],
            active_turn: active_turn as usize,
        })
    }

    /// Turn whose queue receives and serves every request
    pub fn active_turn(&self) -> usize {
        self.active_turn
    }

    /// Number of queues allocated
    pub fn num_turns(&self) -> usize {
        self.queues.len()
    }

    /// The active queue
    pub fn active(&self) -> &RequestQueue {
        &self.queues[self.active_turn]
    }

    /// The active queue, mutably
    pub fn active_mut(&mut self) -> &mut RequestQueue {
        &mut self.queues[self.active_turn]
    }

    /// Enqueues every request into the active queue.
    ///
    /// ## Returns
    /// - the number of requests that were rejected because the queue was full
    pub fn absorb(&mut self, requests: &[PassengerRequest]) -> usize {
        let queue = self.active_mut();
        requests.iter().filter(|r| !queue.enqueue(**r)).count()
    }

    /// Total number of requests waiting in all queues
    pub fn pending(&self) -> usize {
        self.queues.iter().map(RequestQueue::len).sum()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    #[test]
    fn start_turn_beyond_horizon_is_rejected() {
        assert!(matches!(
            TurnQueues::new(3, 4),
            Err(DispatchError::TurnOutOfRange { turn: 4, horizon: 3 })
        ));
        assert_eq!(TurnQueues::new(3, 3).unwrap().num_turns(), 4);
    }

    // Requests always land in the start-up queue, whatever turn they actually arrived in.
    // Kept on purpose: the turn from later responses is never used to rotate queues.
    #[test]
    fn absorb_targets_the_start_up_queue_only() {
        let mut queues = TurnQueues::new(5, 2).unwrap();
        let rejected = queues.absorb(&[PassengerRequest::new(1, 0, 3), PassengerRequest::new(2, 1, 3)]);
        assert_eq!(rejected, 0);
        assert_eq!(queues.active_turn(), 2);
        assert_eq!(queues.active().len(), 2);
        assert_eq!(queues.pending(), 2);
    }

    #[test]
    fn absorb_counts_rejections_when_full() {
        let mut queues = TurnQueues::new(0, 0).unwrap();
        let flood: Vec<PassengerRequest> = (0..config::QUEUE_CAPACITY as i32 + 3)
            .map(|i| PassengerRequest::new(i, 0, 1))
            .collect();
        assert_eq!(queues.absorb(&flood), 3);
        assert_eq!(queues.active().len(), config::QUEUE_CAPACITY);
    }
}
