//! Seed management for structure planning
//!
//! Each planning stage draws from its own RNG so that, for example, turning
//! decoration off does not change where the house lands.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for each planning stage.
///
/// Every stage seed is derived from the master seed by default.
/// Individual seeds can be overridden for experimentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Choice among flat candidate sites
    pub site: u64,
    /// Footprint dimensions, orientation and wall height
    pub layout: u64,
    /// Window glass, furnishing colours, trees and flowers
    pub decor: u64,
}

impl PlanSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            site: derive_seed(master, "site"),
            layout: derive_seed(master, "layout"),
            decor: derive_seed(master, "decor"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> PlanSeedsBuilder {
        PlanSeedsBuilder::new(master)
    }

    pub fn site_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.site)
    }

    pub fn layout_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.layout)
    }

    pub fn decor_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.decor)
    }
}

impl Default for PlanSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// Builder for customizing individual seeds while deriving others from master
pub struct PlanSeedsBuilder {
    seeds: PlanSeeds,
}

impl PlanSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: PlanSeeds::from_master(master),
        }
    }

    /// Override the site seed
    pub fn site(mut self, seed: u64) -> Self {
        self.seeds.site = seed;
        self
    }

    /// Override the layout seed
    pub fn layout(mut self, seed: u64) -> Self {
        self.seeds.layout = seed;
        self
    }

    /// Override the decor seed
    pub fn decor(mut self, seed: u64) -> Self {
        self.seeds.decor = seed;
        self
    }

    pub fn build(self) -> PlanSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and a stage name.
///
/// FNV-1a over the stage name followed by a splitmix64 finaliser, so the
/// result is stable across compiler versions (std's hasher is not).
fn derive_seed(master: u64, stage: &str) -> u64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in stage.bytes() {
        h ^= byte as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    let mut z = master ^ h;
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

impl std::fmt::Display for PlanSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PlanSeeds {{ master: {}, site: {}, layout: {}, decor: {} }}",
            self.master, self.site, self.layout, self.decor,
        )
    }
}
