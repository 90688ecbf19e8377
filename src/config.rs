//! Packing configuration: kerf, usable-offcut thresholds, split axis
//! preference, and scoring weights. All values are tunable defaults.

use crate::error::PackError;
use crate::types::{Rect, deserialize_u32_from_number};
use serde::{Deserialize, Serialize};

/// Which leftover axis to cut first when a placement leaves material on
/// both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitAxis {
    /// Cut along the smaller remainder first. Produces squarer, more
    /// reusable offcuts.
    #[default]
    Shorter,
    /// Cut along the larger remainder first. Packs denser, fragments more.
    Longer,
}

impl std::str::FromStr for SplitAxis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shorter" => Ok(SplitAxis::Shorter),
            "longer" => Ok(SplitAxis::Longer),
            _ => Err(format!("invalid split axis '{s}', expected shorter or longer")),
        }
    }
}

/// Relative weight of each term in a candidate placement's combined score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Immediate fit tightness: placed area over the chosen free rect's area.
    pub fit: f64,
    /// Quality of the free-space shape left behind after the split.
    pub waste: f64,
    /// Bonus for placements needing fewer follow-up cuts (exact edge matches).
    pub guillotine: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            fit: 0.3,
            waste: 0.5,
            guillotine: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackConfig {
    /// Saw blade width in mm, lost at every cut.
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub kerf: u32,
    /// An offcut narrower than this is not worth keeping.
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub min_usable_width: u32,
    #[serde(deserialize_with = "deserialize_u32_from_number")]
    pub min_usable_height: u32,
    /// Area floor for the usable classification, in mm².
    pub min_usable_area: u64,
    pub split_axis_preference: SplitAxis,
    pub scoring_weights: ScoringWeights,
    /// Multiplier applied to the waste score when the largest leftover
    /// clears the usable thresholds.
    pub usable_bonus: f64,
    /// Waste-score penalty per free region beyond the first.
    pub fragmentation_penalty: f64,
    /// Upper bound on the accumulated fragmentation penalty.
    pub fragmentation_cap: f64,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            kerf: 3,
            min_usable_width: 150,
            min_usable_height: 150,
            min_usable_area: 50_000,
            split_axis_preference: SplitAxis::default(),
            scoring_weights: ScoringWeights::default(),
            usable_bonus: 1.3,
            fragmentation_penalty: 0.05,
            fragmentation_cap: 0.4,
        }
    }
}

/// Upper bound on any stock dimension, in mm (100m). Keeps every split
/// computation (`dimension + kerf`, child bound checks) far from `u32`
/// overflow, since parts and free rects never exceed the stock.
pub const MAX_DIMENSION: u32 = 100_000;

impl PackConfig {
    /// Fail-fast validation, run before any placement work.
    pub fn validate(&self, stock: Rect) -> Result<(), PackError> {
        if stock.w == 0 || stock.h == 0 {
            return Err(PackError::InvalidConfiguration(format!(
                "stock dimensions must be non-zero, got {stock}"
            )));
        }
        if stock.w > MAX_DIMENSION || stock.h > MAX_DIMENSION {
            return Err(PackError::InvalidConfiguration(format!(
                "stock dimensions must not exceed {MAX_DIMENSION}mm, got {stock}"
            )));
        }
        if self.kerf >= stock.w.min(stock.h) {
            return Err(PackError::InvalidConfiguration(format!(
                "kerf {} leaves no cuttable material in stock {stock}",
                self.kerf
            )));
        }
        let w = &self.scoring_weights;
        for (name, v) in [("fit", w.fit), ("waste", w.waste), ("guillotine", w.guillotine)] {
            if !v.is_finite() || v < 0.0 {
                return Err(PackError::InvalidConfiguration(format!(
                    "scoring weight '{name}' must be finite and non-negative, got {v}"
                )));
            }
        }
        if w.fit + w.waste + w.guillotine == 0.0 {
            return Err(PackError::InvalidConfiguration(
                "scoring weights must not all be zero".into(),
            ));
        }
        if !self.usable_bonus.is_finite() || self.usable_bonus < 1.0 {
            return Err(PackError::InvalidConfiguration(format!(
                "usable bonus must be >= 1.0, got {}",
                self.usable_bonus
            )));
        }
        if !self.fragmentation_penalty.is_finite() || self.fragmentation_penalty < 0.0 {
            return Err(PackError::InvalidConfiguration(format!(
                "fragmentation penalty must be finite and non-negative, got {}",
                self.fragmentation_penalty
            )));
        }
        if !(0.0..1.0).contains(&self.fragmentation_cap) {
            return Err(PackError::InvalidConfiguration(format!(
                "fragmentation cap must be in [0, 1), got {}",
                self.fragmentation_cap
            )));
        }
        Ok(())
    }

    /// True when a free rect is worth tracking at all. Anything smaller is
    /// dropped at split time and counted as discarded material.
    pub fn is_trackable(&self, rect: Rect) -> bool {
        rect.w >= self.min_usable_width && rect.h >= self.min_usable_height
    }

    /// Usable-offcut classification: both dimensions and the area must
    /// clear their thresholds.
    pub fn is_usable_offcut(&self, rect: Rect) -> bool {
        self.is_trackable(rect) && rect.area() >= self.min_usable_area
    }

    /// The preset sweep tried by `Solver::solve_best`.
    pub fn presets(&self) -> Vec<PackConfig> {
        let mut presets = Vec::with_capacity(4);
        for axis in [SplitAxis::Shorter, SplitAxis::Longer] {
            for weights in [
                self.scoring_weights,
                // Fit-heavy alternative for dense jobs.
                ScoringWeights {
                    fit: 0.6,
                    waste: 0.25,
                    guillotine: 0.15,
                },
            ] {
                presets.push(PackConfig {
                    split_axis_preference: axis,
                    scoring_weights: weights,
                    ..self.clone()
                });
            }
        }
        presets
    }
}
