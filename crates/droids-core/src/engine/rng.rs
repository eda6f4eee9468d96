use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of independent random streams, one per analysed site.
///
/// Streams depend only on the site index, never on which worker thread asks for them, so
/// resampling results are reproducible under any scheduling.
pub trait SiteRngSource: Sync {
    type Rng: Rng;

    fn for_site(&self, site: usize) -> Self::Rng;
}

/// ChaCha8 streams derived from one run seed; the site index selects the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededStreams {
    seed: u64,
}

impl SeededStreams {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Uses `seed` when given, otherwise draws a fresh one from the thread RNG.
    pub fn from_optional(seed: Option<u64>) -> Self {
        Self::new(seed.unwrap_or_else(rand::random))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl SiteRngSource for SeededStreams {
    type Rng = ChaCha8Rng;

    fn for_site(&self, site: usize) -> Self::Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(site as u64);
        rng
    }
}
