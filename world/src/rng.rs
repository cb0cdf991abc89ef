//! Session-scoped deterministic randomness.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Single random stream owned by a world instance.
///
/// Every random decision in a session draws from this stream, so a run is
/// reproducible from its seed and the call sequence alone.
#[derive(Clone, Debug)]
pub(crate) struct SessionRng {
    inner: ChaCha8Rng,
}

impl SessionRng {
    pub(crate) fn seeded(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform float in `[0, 1)`.
    pub(crate) fn next_unit(&mut self) -> f32 {
        self.inner.gen::<f32>()
    }

    /// Uniform float in `[min, max)`.
    pub(crate) fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_unit()
    }

    /// Uniform integer in `[min, max_inclusive]`.
    pub(crate) fn int(&mut self, min: i32, max_inclusive: i32) -> i32 {
        self.inner.gen_range(min..=max_inclusive)
    }

    /// True with probability `p`; never for `p <= 0`, always for `p >= 1`.
    pub(crate) fn chance(&mut self, p: f32) -> bool {
        self.next_unit() < p
    }

    /// Uniform element of `items`, or `None` for an empty slice.
    pub(crate) fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.int(0, items.len() as i32 - 1) as usize;
        items.get(index)
    }
}
