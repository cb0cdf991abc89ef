#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-step accumulator that converts frame time into discrete steps.
//!
//! Frames arrive at arbitrary rates; the simulation advances in whole steps
//! at the world's current step rate. This system watches the
//! [`Event::TimeAdvanced`] stream, banks the elapsed time, and emits one
//! [`Command::Step`] per full interval so slow frames catch up with several
//! steps and fast frames sometimes earn none. Fractional remainders carry
//! over, so no simulated time is ever lost or duplicated.

use snake_surge_core::{Command, Event};

/// Accumulator state carried between frames.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stepper {
    accumulator: f32,
}

impl Stepper {
    /// Creates an accumulator with no banked time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Banks the frame time found in `events` and pushes one `Step` command
    /// per whole interval at `steps_per_second` into `out_commands`.
    ///
    /// The rate is sampled once per call, so a mid-frame rate change takes
    /// effect on the next frame.
    pub fn handle(
        &mut self,
        events: &[Event],
        steps_per_second: f32,
        out_commands: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                self.accumulator += dt.as_secs_f32();
            }
        }

        if steps_per_second <= 0.0 {
            return;
        }
        let interval = 1.0 / steps_per_second;
        while self.accumulator >= interval {
            self.accumulator -= interval;
            out_commands.push(Command::Step);
        }
    }
}
