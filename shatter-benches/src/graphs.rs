//! Seeded graphs shaped like crawled overlays.

use rand::{SeedableRng, rngs::SmallRng};
use shatter_core::{DiGraph, barabasi_albert};

use crate::error::BenchSetupError;

/// Preferential-attachment exponent used for every benchmark graph.
const ATTACHMENT_POWER: f64 = 2.0;

/// Configuration for a crawl-like benchmark graph.
#[derive(Clone, Copy, Debug)]
pub struct CrawlShape {
    /// Number of peers.
    pub vertex_count: usize,
    /// Outgoing links per newly joining peer.
    pub out_edges: usize,
    /// Seed for the generator.
    pub seed: u64,
}

impl CrawlShape {
    /// Generates the graph described by this shape.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::ZeroValue`] when `out_edges` is zero and
    /// [`BenchSetupError::Synthetic`] if generation fails.
    pub fn generate(&self) -> Result<DiGraph, BenchSetupError> {
        if self.out_edges == 0 {
            return Err(BenchSetupError::ZeroValue {
                context: "out_edges",
            });
        }
        let mut rng = SmallRng::seed_from_u64(self.seed);
        Ok(barabasi_albert(
            self.vertex_count,
            self.out_edges,
            ATTACHMENT_POWER,
            &mut rng,
        )?)
    }
}
