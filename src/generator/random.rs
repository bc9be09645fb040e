use rand::Rng;
use uuid::Uuid;

/// Source of every random draw the generator makes.
///
/// Any [`rand::Rng`] qualifies; tests substitute a scripted source to pin
/// individual draws.
pub trait RandomSource {
    /// Uniform real in `[low, high]`.
    fn uniform_f64(&mut self, low: f64, high: f64) -> f64;

    /// Uniform integer in `[low, high]`.
    fn uniform_u32(&mut self, low: u32, high: u32) -> u32;

    /// Uniform index in `[0, len)`. `len` is never zero.
    fn choose_index(&mut self, len: usize) -> usize;

    /// Fresh random (version 4) identifier.
    fn uuid(&mut self) -> Uuid;
}

impl<R: Rng> RandomSource for R {
    fn uniform_f64(&mut self, low: f64, high: f64) -> f64 {
        self.gen_range(low..=high)
    }

    fn uniform_u32(&mut self, low: u32, high: u32) -> u32 {
        self.gen_range(low..=high)
    }

    fn choose_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }

    fn uuid(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.gen()).into_uuid()
    }
}
