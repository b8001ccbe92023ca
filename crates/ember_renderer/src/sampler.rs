//! Per-worker random streams.
//!
//! Workers never share generator state. With a fixed seed each scanline
//! gets its own stream derived from `(seed, row)`, which makes the image
//! independent of how rows land on threads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// How worker random streams are seeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Reproducible: every scanline is reseeded from this base seed.
    Fixed(u64),
    /// Each worker seeds once from the high-resolution clock.
    #[default]
    Clock,
}

/// SplitMix64 finalizer. Bijective, so distinct inputs give distinct seeds.
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for one scanline under `SeedPolicy::Fixed(base)`.
pub fn scanline_seed(base: u64, row: u32) -> u64 {
    splitmix64(splitmix64(base) ^ row as u64)
}

static CLOCK_SEEDS_ISSUED: AtomicU64 = AtomicU64::new(0);

/// Seed from wall-clock nanoseconds mixed with a process-wide counter, so
/// two workers starting in the same clock tick still differ.
pub fn clock_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let serial = CLOCK_SEEDS_ISSUED.fetch_add(1, Ordering::Relaxed);
    splitmix64(nanos ^ splitmix64(serial))
}

/// A worker's private random stream.
pub struct WorkerRng {
    policy: SeedPolicy,
    rng: StdRng,
}

impl WorkerRng {
    pub fn new(policy: SeedPolicy) -> Self {
        let seed = match policy {
            SeedPolicy::Fixed(base) => base,
            SeedPolicy::Clock => clock_seed(),
        };
        log::trace!("Worker stream seeded with {:#018x}", seed);

        Self {
            policy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Stream to use for the given scanline.
    pub fn for_scanline(&mut self, row: u32) -> &mut StdRng {
        if let SeedPolicy::Fixed(base) = self.policy {
            self.rng = StdRng::seed_from_u64(scanline_seed(base, row));
        }
        &mut self.rng
    }
}
