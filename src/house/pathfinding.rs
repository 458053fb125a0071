//! Breadth-first pathfinding over the room graph
//!
//! Outside is not part of the graph: cats only get there through the front
//! door, never by walking.

use std::collections::VecDeque;

use ahash::AHashMap;

use crate::core::types::Location;
use crate::house::rooms::RoomId;

/// Shortest room sequence from `from` to `to`, both included
///
/// Returns None when `from == to` or the destination is unreachable.
/// Ties resolve in the fixed order of [`RoomId::neighbors`].
pub fn find_path(from: RoomId, to: RoomId) -> Option<Vec<RoomId>> {
    if from == to {
        return None;
    }

    let mut came_from: AHashMap<RoomId, RoomId> = AHashMap::new();
    let mut queue = VecDeque::new();
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        for &neighbor in current.neighbors() {
            if neighbor == from || came_from.contains_key(&neighbor) {
                continue;
            }
            came_from.insert(neighbor, current);
            if neighbor == to {
                return Some(reconstruct_path(&came_from, from, to));
            }
            queue.push_back(neighbor);
        }
    }

    None // No path found
}

/// Path between two locations; anything involving Outside or Missing has no walking path
pub fn find_location_path(from: Location, to: Location) -> Option<Vec<RoomId>> {
    match (from, to) {
        (Location::Room(a), Location::Room(b)) => find_path(a, b),
        _ => None,
    }
}

fn reconstruct_path(came_from: &AHashMap<RoomId, RoomId>, from: RoomId, to: RoomId) -> Vec<RoomId> {
    let mut path = vec![to];
    let mut current = to;
    while current != from {
        match came_from.get(&current) {
            Some(&prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

/// Hop count between two rooms (0 for the same room)
pub fn distance(from: RoomId, to: RoomId) -> usize {
    find_path(from, to).map(|p| p.len() - 1).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_room_has_no_path() {
        for room in RoomId::ALL {
            assert_eq!(find_path(room, room), None);
        }
    }

    #[test]
    fn test_adjacent_rooms() {
        assert_eq!(
            find_path(RoomId::Kitchen, RoomId::LivingRoom),
            Some(vec![RoomId::Kitchen, RoomId::LivingRoom])
        );
    }

    #[test]
    fn test_diagonal_tie_breaks_by_enumeration_order() {
        // Kitchen lists LivingRoom before Bedroom
        assert_eq!(
            find_path(RoomId::Kitchen, RoomId::Bathroom),
            Some(vec![RoomId::Kitchen, RoomId::LivingRoom, RoomId::Bathroom])
        );
        // Bathroom lists LivingRoom before Bedroom
        assert_eq!(
            find_path(RoomId::Bathroom, RoomId::Kitchen),
            Some(vec![RoomId::Bathroom, RoomId::LivingRoom, RoomId::Kitchen])
        );
    }

    #[test]
    fn test_outside_unreachable() {
        assert_eq!(
            find_location_path(Location::Room(RoomId::LivingRoom), Location::Outside),
            None
        );
        assert_eq!(
            find_location_path(Location::Outside, Location::Room(RoomId::LivingRoom)),
            None
        );
    }
}
