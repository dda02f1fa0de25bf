//! Series colour assignment.
//!
//! Colours come from the caller's overrides first. Titles without an override
//! get a synthesized RGB colour with every channel in `[50, 240]`, drawn from a
//! single generator guarded by one lock; this is the only shared mutable state
//! of the engine. Seeding the generator makes assignments reproducible.
//!
//! # Example
//!
//! ```rust
//! use dashboard_analytics::style::ColorAssigner;
//!
//! let a = ColorAssigner::seeded(7);
//! let b = ColorAssigner::seeded(7);
//! assert_eq!(a.next_color(), b.next_color());
//! ```

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::models::ColorOverrides;

/// Fixed neutral gray for the synthetic "Others" group (Office gray `#A5A5A5`).
pub const OTHERS_COLOR: Rgb8 = Rgb8 {
    r: 165,
    g: 165,
    b: 165,
};

/// Inclusive channel range of synthesized colours.
const CHANNEL_MIN: u8 = 50;
const CHANNEL_MAX: u8 = 240;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let h = hex.trim().trim_start_matches('#');
        if h.len() != 6 || !h.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
        Some(Rgb8 {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

/// Hands out series colours. Shareable across threads.
pub struct ColorAssigner {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl std::fmt::Debug for ColorAssigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorAssigner").finish_non_exhaustive()
    }
}

impl ColorAssigner {
    /// Use an injected generator.
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Reproducible assigner.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Draw one synthesized colour.
    pub fn next_color(&self) -> Rgb8 {
        let mut rng = self.rng.lock();
        Rgb8 {
            r: rng.gen_range(CHANNEL_MIN..=CHANNEL_MAX),
            g: rng.gen_range(CHANNEL_MIN..=CHANNEL_MAX),
            b: rng.gen_range(CHANNEL_MIN..=CHANNEL_MAX),
        }
    }

    /// Colour for a series: "Others" is always gray, then the caller's
    /// `(slot, title)` override if it parses, then a synthesized colour.
    pub fn color_for(&self, overrides: &ColorOverrides, slot: &str, title: &str, is_others: bool) -> String {
        if is_others {
            return OTHERS_COLOR.to_hex();
        }
        overrides
            .get(slot, title)
            .and_then(Rgb8::from_hex)
            .unwrap_or_else(|| self.next_color())
            .to_hex()
    }
}
