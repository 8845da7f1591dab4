//! Shared helpers for stakecore tests.

use std::sync::Once;

use arbitrary::{Arbitrary, Unstructured};
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use tracing_subscriber::EnvFilter;

/// The default buffer size for the `ArbitraryGenerator`.
const ARB_GEN_LEN: usize = 4_096;

/// Seed used when none is given, so failures reproduce across runs.
const DEFAULT_SEED: u64 = 0x5743_4b45;

static TRACING: Once = Once::new();

/// Installs a test-friendly fmt subscriber once per process.
///
/// The filter comes from `RUST_LOG`, falling back to `debug`.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        // Another harness may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Deterministic generator of [`Arbitrary`] values.
///
/// Every call refills the buffer from a seeded ChaCha stream, so a given seed
/// always yields the same sequence of values.
#[derive(Debug)]
pub struct ArbitraryGenerator {
    rng: ChaCha20Rng,
    buf: Vec<u8>,
}

impl Default for ArbitraryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ArbitraryGenerator {
    pub fn new() -> Self {
        Self::new_seeded(DEFAULT_SEED)
    }

    pub fn new_seeded(seed: u64) -> Self {
        Self::new_with_size(seed, ARB_GEN_LEN)
    }

    /// Creates a generator whose buffer holds `size` bytes per draw.
    pub fn new_with_size(seed: u64, size: usize) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            buf: vec![0u8; size],
        }
    }

    /// Generates the next value.
    ///
    /// # Panics
    ///
    /// If no value could be built from several fresh buffers.
    pub fn generate<T>(&mut self) -> T
    where
        T: for<'a> Arbitrary<'a>,
    {
        const MAX_ATTEMPTS: usize = 16;
        let mut last_error = None;

        for _ in 0..MAX_ATTEMPTS {
            self.rng.fill_bytes(&mut self.buf);
            let mut u = Unstructured::new(&self.buf);
            match T::arbitrary(&mut u) {
                Ok(value) => return value,
                Err(err) => last_error = Some(err),
            }
        }

        let error_msg = last_error
            .map(|err| err.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        panic!("failed to generate arbitrary instance: {error_msg}");
    }

    /// Generates `n` values.
    pub fn generate_n<T>(&mut self, n: usize) -> Vec<T>
    where
        T: for<'a> Arbitrary<'a>,
    {
        (0..n).map(|_| self.generate()).collect()
    }
}
