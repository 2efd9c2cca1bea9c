//! Direction decision toward a floor.
//!
//! Stateless: the decision only looks at the current floor, the floor to reach and
//! the number of floors in the building. Movement is clamped at the building's bounds,
//! the authority's reported floor is never clamped.

use crate::world_view::Directive;

/// Decides which way to move from `current_floor` to reach `target_floor`.
///
/// # Returns
/// - `Directive::Up` if the target is above and the elevator is below the top floor
/// - `Directive::Down` if the target is below and the elevator is above the ground floor
/// - `Directive::Stay` if the elevator is at the target or can get no closer
///
/// # Example
/// ```
/// use elevatorsolver::elevator_logic::request::directive_towards;
/// use elevatorsolver::world_view::Directive;
///
/// assert_eq!(directive_towards(0, 3, 10), Directive::Up);
/// assert_eq!(directive_towards(9, 12, 10), Directive::Stay);
/// ```
pub fn directive_towards(current_floor: i32, target_floor: i32, num_floors: i32) -> Directive {
    if current_floor < target_floor && current_floor < num_floors - 1 {
        Directive::Up
    } else if current_floor > target_floor && current_floor > 0 {
        Directive::Down
    } else {
        Directive::Stay
    }
}

/// Floor reached after following `directive` for one tick from `floor`.
///
/// Mirrors what the authority does with a directive, used when reasoning about bounds.
pub fn next_floor(floor: i32, directive: Directive) -> i32 {
    match directive {
        Directive::Up => floor + 1,
        Directive::Down => floor - 1,
        Directive::Stay => floor,
    }
}
