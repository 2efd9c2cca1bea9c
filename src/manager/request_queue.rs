//! Bounded FIFO of pending passenger requests, with nearest-to-floor extraction.

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::config;
use crate::print;
use crate::world_view::PassengerRequest;


/// Pending requests in arrival order.
///
/// The queue never holds more than [config::QUEUE_CAPACITY] requests. Removing a request
/// from the middle keeps the order of the remaining requests, since tie-breaking in
/// [RequestQueue::select_nearest] depends on it.
#[derive(Debug, Clone)]
pub struct RequestQueue {
    requests: VecDeque<PassengerRequest>,
    capacity: usize,
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestQueue {
    /// Creates an empty queue holding at most [config::QUEUE_CAPACITY] requests
    pub fn new() -> Self {
        Self::with_capacity(config::QUEUE_CAPACITY)
    }

    /// Creates an empty queue with a custom bound
    pub fn with_capacity(capacity: usize) -> Self {
        Self { requests: VecDeque::with_capacity(capacity), capacity }
    }

    /// Number of queued requests
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// `true` if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// `true` if another enqueue would be rejected
    pub fn is_full(&self) -> bool {
        self.requests.len() >= self.capacity
    }

    /// Queued requests, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &PassengerRequest> {
        self.requests.iter()
    }

    /// Appends `request` at the back.
    ///
    /// ## Returns
    /// - `false` if the queue is full. The request is dropped and a warning is printed.
    pub fn enqueue(&mut self, request: PassengerRequest) -> bool {
        if self.is_full() {
            print::warn(format!("Queue is full, cannot enqueue request {}", request.request_id));
            return false;
        }
        self.requests.push_back(request);
        true
    }

    /// Removes and returns the oldest request, `None` if the queue is empty
    pub fn dequeue_front(&mut self) -> Option<PassengerRequest> {
        self.requests.pop_front()
    }

    /// Removes and returns the request whose start floor is closest to `current_floor`.
    ///
    /// The whole queue is scanned front to back, and a best candidate is only replaced by a
    /// strictly closer one, so among equally close requests the oldest wins.
    ///
    /// ## Returns
    /// - `None` on an empty queue
    pub fn select_nearest(&mut self, current_floor: i32) -> Option<PassengerRequest> {
        let mut best: Option<(usize, u32)> = None;
        for (idx, request) in self.requests.iter().enumerate() {
            let distance = request.distance_from(current_floor);
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((idx, distance)),
            }
        }
        // VecDeque::remove shifts the tail, so untouched requests keep insertion order
        best.and_then(|(idx, _)| self.requests.remove(idx))
    }

    /// Sorts the queue with the proximity-plus-direction ordering of `ctx`.
    pub fn sort_by_proximity(&mut self, ctx: &ProximityContext<'_>) {
        if self.requests.len() > 1 {
            self.requests.make_contiguous().sort_by(|a, b| ctx.compare(a, b));
        }
    }
}


/// Snapshot of elevator floors used to order requests by proximity.
///
/// Passed explicitly to the comparison so no global scheduling state is needed.
#[derive(Debug, Clone, Copy)]
pub struct ProximityContext<'a> {
    elevator_floors: &'a [i32],
}

impl<'a> ProximityContext<'a> {
    /// Creates a context over the current elevator floors
    pub fn new(elevator_floors: &'a [i32]) -> Self {
        Self { elevator_floors }
    }

    /// Distance from the start floor of `request` to the nearest elevator.
    ///
    /// With no elevators every request is equally far away.
    pub fn nearest_elevator_distance(&self, request: &PassengerRequest) -> u32 {
        self.elevator_floors
            .iter()
            .map(|&floor| request.distance_from(floor))
            .min()
            .unwrap_or(u32::MAX)
    }

    /// Orders by distance to the nearest elevator, then by signed travel
    /// (`requested_floor - start_floor`, downward trips first), then by request id.
    pub fn compare(&self, a: &PassengerRequest, b: &PassengerRequest) -> Ordering {
        self.nearest_elevator_distance(a)
            .cmp(&self.nearest_elevator_distance(b))
            .then_with(|| a.travel().cmp(&b.travel()))
            .then_with(|| a.request_id.cmp(&b.request_id))
    }
}
