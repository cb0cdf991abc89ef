//! Timing state for the randomized event system.
//!
//! The director owns the firing cooldown, the counter of fired events, and
//! every delayed reversal. Reversals are countdown fields advanced only by
//! active frame updates, never real timers, so pausing freezes them and
//! deterministic replay stays exact. Selecting and applying the fired event
//! is the world's job; the director only says when.

/// Expiries produced by one frame of director time.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct DirectorWake {
    /// The firing cooldown lapsed; the world should fire one event and
    /// re-roll the cooldown.
    pub(crate) fire_event: bool,
    /// The inverted-controls window closed this frame.
    pub(crate) invert_expired: bool,
    /// Step-rate deltas whose reversal fell due this frame.
    pub(crate) rate_reverts: Vec<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct RateRevert {
    remaining: f32,
    delta: f32,
}

/// Cooldown-driven scheduler for the six world events.
#[derive(Clone, Debug)]
pub(crate) struct Director {
    cooldown: f32,
    events_triggered: u32,
    invert_remaining: f32,
    fog_remaining: f32,
    rate_reverts: Vec<RateRevert>,
}

impl Director {
    pub(crate) fn new(initial_cooldown: f32) -> Self {
        Self {
            cooldown: initial_cooldown,
            events_triggered: 0,
            invert_remaining: 0.0,
            fog_remaining: 0.0,
            rate_reverts: Vec::new(),
        }
    }

    /// Advances every countdown by `dt` seconds of active play.
    pub(crate) fn advance(&mut self, dt: f32) -> DirectorWake {
        let mut wake = DirectorWake::default();

        self.cooldown -= dt;
        if self.cooldown <= 0.0 {
            wake.fire_event = true;
        }

        if self.invert_remaining > 0.0 {
            self.invert_remaining -= dt;
            if self.invert_remaining <= 0.0 {
                wake.invert_expired = true;
            }
        }

        if self.fog_remaining > 0.0 {
            self.fog_remaining -= dt;
        }

        let mut index = 0;
        while index < self.rate_reverts.len() {
            self.rate_reverts[index].remaining -= dt;
            if self.rate_reverts[index].remaining <= 0.0 {
                wake.rate_reverts.push(self.rate_reverts.swap_remove(index).delta);
            } else {
                index += 1;
            }
        }

        wake
    }

    /// Arms the next firing window; called after every fire.
    pub(crate) fn set_cooldown(&mut self, seconds: f32) {
        self.cooldown = seconds;
    }

    pub(crate) fn note_fired(&mut self) {
        self.events_triggered += 1;
    }

    pub(crate) fn events_triggered(&self) -> u32 {
        self.events_triggered
    }

    /// Opens (or refreshes) the inverted-controls window.
    pub(crate) fn schedule_invert(&mut self, seconds: f32) {
        self.invert_remaining = seconds;
    }

    /// Opens (or refreshes) the fog window.
    pub(crate) fn schedule_fog(&mut self, seconds: f32) {
        self.fog_remaining = seconds;
    }

    /// Schedules a step-rate delta to be applied after `seconds`.
    ///
    /// Each time shift keeps its own reversal, so overlapping shifts undo
    /// themselves independently.
    pub(crate) fn schedule_rate_revert(&mut self, delta: f32, seconds: f32) {
        self.rate_reverts.push(RateRevert {
            remaining: seconds,
            delta,
        });
    }

    pub(crate) fn fog_active(&self) -> bool {
        self.fog_remaining > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_expiry_requests_a_fire() {
        let mut director = Director::new(1.0);
        assert!(!director.advance(0.5).fire_event);
        assert!(director.advance(0.6).fire_event);
        director.set_cooldown(2.0);
        assert!(!director.advance(0.5).fire_event);
    }

    #[test]
    fn invert_window_expires_exactly_once() {
        let mut director = Director::new(100.0);
        director.schedule_invert(1.0);
        assert!(!director.advance(0.5).invert_expired);
        assert!(director.advance(0.6).invert_expired);
        assert!(!director.advance(1.0).invert_expired);
    }

    #[test]
    fn fog_and_invert_windows_are_independent() {
        let mut director = Director::new(100.0);
        director.schedule_fog(2.0);
        director.schedule_invert(1.0);
        let wake = director.advance(1.5);
        assert!(wake.invert_expired);
        assert!(director.fog_active());
        let _ = director.advance(1.0);
        assert!(!director.fog_active());
    }

    #[test]
    fn overlapping_rate_shifts_revert_independently() {
        let mut director = Director::new(100.0);
        director.schedule_rate_revert(-3.0, 1.0);
        director.schedule_rate_revert(3.0, 2.0);
        let first = director.advance(1.2);
        assert_eq!(first.rate_reverts, vec![-3.0]);
        let second = director.advance(1.0);
        assert_eq!(second.rate_reverts, vec![3.0]);
        assert!(director.advance(1.0).rate_reverts.is_empty());
    }

    #[test]
    fn fired_events_are_counted() {
        let mut director = Director::new(0.1);
        director.note_fired();
        director.note_fired();
        assert_eq!(director.events_triggered(), 2);
    }
}
