//! Board entities that live outside the snake: the portal pair and meteors.

use snake_surge_core::GridPosition;

/// Bidirectional pair of linked cells.
///
/// At most one portal exists at a time; reshuffling replaces the whole pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Portal {
    a: GridPosition,
    b: GridPosition,
}

impl Portal {
    pub(crate) const fn new(a: GridPosition, b: GridPosition) -> Self {
        Self { a, b }
    }

    pub(crate) const fn endpoints(&self) -> (GridPosition, GridPosition) {
        (self.a, self.b)
    }

    /// Maps either endpoint to its partner; `None` for every other cell.
    pub(crate) fn other_end(&self, position: GridPosition) -> Option<GridPosition> {
        if position == self.a {
            Some(self.b)
        } else if position == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    /// Reports whether `position` is one of the two endpoints.
    pub(crate) fn covers(&self, position: GridPosition) -> bool {
        position == self.a || position == self.b
    }
}

/// Expiring hazard cell; contact with the head is lethal even through ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Meteor {
    pub(crate) position: GridPosition,
    /// Remaining lifetime in whole simulation steps.
    pub(crate) ttl: u32,
}

impl Meteor {
    pub(crate) const fn new(position: GridPosition, ttl: u32) -> Self {
        Self { position, ttl }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_maps_each_endpoint_to_the_other() {
        let a = GridPosition::new(3, 4);
        let b = GridPosition::new(10, 2);
        let portal = Portal::new(a, b);
        assert_eq!(portal.other_end(a), Some(b));
        assert_eq!(portal.other_end(b), Some(a));
        assert_eq!(portal.other_end(GridPosition::new(0, 0)), None);
        assert!(portal.covers(a));
        assert!(portal.covers(b));
        assert!(!portal.covers(GridPosition::new(9, 9)));
    }
}
