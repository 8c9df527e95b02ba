//! Orthogonal connectivity over sets of grid positions.
//!
//! Pure functions, no grid dependency: callers pass the occupied positions
//! and get a yes/no or the list of components back. Diagonal contact never
//! counts as a connection.

use crate::grid::Position;
use std::collections::{HashSet, VecDeque};

/// The four orthogonal neighbors of `pos` (up, down, left, right).
pub fn orthogonal_neighbors(pos: Position) -> [Position; 4] {
    [
        pos.offset(-1, 0),
        pos.offset(1, 0),
        pos.offset(0, -1),
        pos.offset(0, 1),
    ]
}

/// True if `a` and `b` differ by exactly one step along a single axis.
pub fn are_adjacent(a: Position, b: Position) -> bool {
    let dr = (a.row - b.row).abs();
    let dc = (a.col - b.col).abs();
    dr + dc == 1
}

/// True if `positions` form a single orthogonally-connected group.
///
/// An empty slice is *not* connected. The traversal must visit every input
/// entry exactly once, so a repeated position makes the input disconnected.
pub fn is_connected(positions: &[Position]) -> bool {
    let Some(&start) = positions.first() else {
        return false;
    };
    let set: HashSet<Position> = positions.iter().copied().collect();
    reachable_from(start, &set).len() == positions.len()
}

/// Split `positions` into orthogonally-connected components.
///
/// Components are returned in order of their first member in the input.
pub fn components(positions: &[Position]) -> Vec<Vec<Position>> {
    let set: HashSet<Position> = positions.iter().copied().collect();
    let mut seen: HashSet<Position> = HashSet::new();
    let mut result = Vec::new();

    for &pos in positions {
        if seen.contains(&pos) {
            continue;
        }
        let group = reachable_from(pos, &set);
        seen.extend(group.iter().copied());
        result.push(group);
    }
    result
}

/// BFS from `start` through members of `set`, returning visit order.
fn reachable_from(start: Position, set: &HashSet<Position>) -> Vec<Position> {
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        order.push(current);
        for next in orthogonal_neighbors(current) {
            if set.contains(&next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_empty_is_not_connected() {
        assert!(!is_connected(&[]));
    }

    #[test]
    fn test_single_is_connected() {
        assert!(is_connected(&[p(0, 0)]));
    }

    #[test]
    fn test_diagonal_only_is_not_connected() {
        assert!(!is_connected(&[p(0, 0), p(1, 1)]));
    }

    #[test]
    fn test_orthogonal_pair_is_connected() {
        assert!(is_connected(&[p(0, 0), p(1, 0)]));
        assert!(is_connected(&[p(0, 0), p(0, 1)]));
    }

    #[test]
    fn test_l_shape_and_gap() {
        assert!(is_connected(&[p(0, 0), p(1, 0), p(1, 1), p(1, 2)]));
        assert!(!is_connected(&[p(0, 0), p(0, 1), p(0, 3)]));
    }

    #[test]
    fn test_start_order_does_not_matter() {
        let shape = [p(2, 2), p(0, 0), p(1, 0), p(2, 0), p(2, 1)];
        assert!(is_connected(&shape));
    }

    #[test]
    fn test_repeated_position_is_not_connected() {
        assert!(!is_connected(&[p(0, 0), p(0, 0), p(0, 1)]));
        assert!(!is_connected(&[p(4, 4), p(4, 4)]));
        // Components still treat a repeat as one member
        assert_eq!(components(&[p(0, 0), p(0, 0), p(0, 1)]).len(), 1);
    }

    #[test]
    fn test_are_adjacent() {
        assert!(are_adjacent(p(3, 3), p(2, 3)));
        assert!(!are_adjacent(p(3, 3), p(2, 2)));
        assert!(!are_adjacent(p(3, 3), p(3, 3)));
        assert!(!are_adjacent(p(0, 0), p(0, 2)));
    }

    #[test]
    fn test_components() {
        let groups = components(&[p(0, 0), p(0, 1), p(5, 5), p(1, 1), p(5, 6)]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[1], vec![p(5, 5), p(5, 6)]);
    }
}
