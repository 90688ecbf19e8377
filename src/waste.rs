//! Leftover-shape scoring.
//!
//! Ranks a sheet's free-space set by how reusable its leftovers are: one
//! large square-ish region outranks the same area scattered across many
//! slivers. Called once per candidate placement, so it stays O(n) over the
//! free rect list.

use crate::config::PackConfig;
use crate::types::FreeRect;

/// Desirability of a free-space set, higher is better. A fully consumed
/// sheet scores 1.0 (no waste to fragment).
pub fn score(free_rects: &[FreeRect], cfg: &PackConfig) -> f64 {
    let total: u64 = free_rects.iter().map(|f| f.rect.area()).sum();
    if total == 0 {
        return 1.0;
    }
    // Area ties resolve by list position, identically on every run.
    let largest = free_rects
        .iter()
        .map(|f| f.rect)
        .max_by_key(|r| r.area())
        .unwrap();

    let concentration = largest.area() as f64 / total as f64;
    let usability = if cfg.is_usable_offcut(largest) {
        cfg.usable_bonus
    } else {
        1.0
    };
    let fragmentation = (cfg.fragmentation_penalty * (free_rects.len() - 1) as f64)
        .min(cfg.fragmentation_cap);
    let aspect = largest.aspect_ratio();

    concentration * usability * (1.0 - fragmentation) * (0.5 + 0.5 * aspect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn free(x: u32, y: u32, w: u32, h: u32) -> FreeRect {
        FreeRect {
            x,
            y,
            rect: Rect::new(w, h),
        }
    }

    #[test]
    fn test_empty_set_is_perfect() {
        assert_eq!(score(&[], &PackConfig::default()), 1.0);
    }

    #[test]
    fn test_one_big_region_beats_equal_area_fragments() {
        let cfg = PackConfig::default();
        let consolidated = [free(0, 0, 600, 600)];
        let fragmented = [
            free(0, 0, 300, 300),
            free(400, 0, 300, 300),
            free(0, 400, 300, 300),
            free(400, 400, 300, 300),
        ];
        // Same total free area on both sides.
        assert!(score(&consolidated, &cfg) > score(&fragmented, &cfg));
    }

    #[test]
    fn test_square_leftover_beats_sliver_of_same_area() {
        let cfg = PackConfig::default();
        assert!(score(&[free(0, 0, 600, 600)], &cfg) > score(&[free(0, 0, 2400, 150)], &cfg));
    }

    #[test]
    fn test_usable_bonus_applies_at_threshold() {
        let cfg = PackConfig::default();
        // 400x200 clears width, height and area thresholds; a long sliver
        // of larger area does not.
        let with_bonus = score(&[free(0, 0, 400, 200)], &cfg);
        let no_bonus = PackConfig {
            usable_bonus: 1.0,
            ..cfg.clone()
        };
        assert!(with_bonus > score(&[free(0, 0, 400, 200)], &no_bonus));
    }

    #[test]
    fn test_fragmentation_penalty_is_capped() {
        let cfg = PackConfig::default();
        let many: Vec<FreeRect> = (0..40)
            .map(|i| free(i * 200, 0, 160, 160))
            .collect();
        // 40 regions would exceed the cap uncapped (0.05 * 39); score must
        // stay positive.
        assert!(score(&many, &cfg) > 0.0);
    }

    #[test]
    fn test_monotone_in_fragment_count() {
        let cfg = PackConfig::default();
        // Identical largest region and total area, split across more or
        // fewer companions.
        let two = [free(0, 0, 800, 800), free(900, 0, 400, 400)];
        let three = [
            free(0, 0, 800, 800),
            free(900, 0, 400, 200),
            free(900, 300, 400, 200),
        ];
        assert!(score(&two, &cfg) > score(&three, &cfg));
    }
}
