//! Per-sheet free-space tracking with guillotine-legal splits.
//!
//! A sheet starts as one free rect. Every placement consumes a free rect
//! and splits the remainder with a single full-length cut, so the recorded
//! layout is always reproducible on a panel saw. Remainders too small to
//! ever hold a part or a usable offcut are dropped at split time and
//! accounted as discarded material, together with the kerf bands.

use crate::config::{PackConfig, SplitAxis};
use crate::error::PackError;
use crate::types::{FreeRect, Rect};

/// A free rect that can host a given shape, with its top-left anchor.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub free_idx: usize,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone)]
pub struct SheetSpace {
    stock: Rect,
    free_rects: Vec<FreeRect>,
    placed_area: u64,
    discarded_area: u64,
}

impl SheetSpace {
    pub fn new(stock: Rect) -> Self {
        Self {
            stock,
            free_rects: vec![FreeRect {
                x: 0,
                y: 0,
                rect: stock,
            }],
            placed_area: 0,
            discarded_area: 0,
        }
    }

    pub fn stock(&self) -> Rect {
        self.stock
    }

    pub fn free_rects(&self) -> &[FreeRect] {
        &self.free_rects
    }

    pub fn free_area(&self) -> u64 {
        self.free_rects.iter().map(|f| f.rect.area()).sum()
    }

    pub fn placed_area(&self) -> u64 {
        self.placed_area
    }

    /// Kerf bands plus dropped slivers, in mm².
    pub fn discarded_area(&self) -> u64 {
        self.discarded_area
    }

    /// Every free rect that can contain `shape`, in list order. Kerf is not
    /// charged against the shape itself, only against the remainders at
    /// split time.
    pub fn find_candidates(&self, shape: Rect) -> Vec<Candidate> {
        self.free_rects
            .iter()
            .enumerate()
            .filter(|(_, free)| shape.fits_in(&free.rect))
            .map(|(idx, free)| Candidate {
                free_idx: idx,
                x: free.x,
                y: free.y,
            })
            .collect()
    }

    /// Commits `shape` into the free rect at `free_idx`, anchored top-left,
    /// and splits the remainder. Returns the anchor position.
    pub fn place(
        &mut self,
        free_idx: usize,
        shape: Rect,
        cfg: &PackConfig,
    ) -> Result<(u32, u32), PackError> {
        let free = *self
            .free_rects
            .get(free_idx)
            .ok_or_else(|| PackError::InvariantViolation("free rect index out of range".into()))?;
        if !shape.fits_in(&free.rect) {
            return Err(PackError::InvariantViolation(format!(
                "shape {shape} does not fit free rect {} at ({}, {})",
                free.rect, free.x, free.y
            )));
        }

        self.free_rects.swap_remove(free_idx);
        let kept = self.split(free, shape, cfg)?;
        self.merge_free_rects();

        self.placed_area += shape.area();
        // Whatever the split did not keep is kerf or dropped sliver.
        self.discarded_area += free.rect.area() - shape.area() - kept;

        debug_assert!(self.conservation_holds());
        Ok((free.x, free.y))
    }

    /// Splits the remainder of `free` around `shape` with one full-length
    /// cut, per the configured leftover-axis preference. Returns the total
    /// area of the children actually kept.
    fn split(&mut self, free: FreeRect, shape: Rect, cfg: &PackConfig) -> Result<u64, PackError> {
        let kerf = cfg.kerf;
        let right_w = free.rect.w.saturating_sub(shape.w + kerf);
        let below_h = free.rect.h.saturating_sub(shape.h + kerf);

        let mut kept = 0u64;
        let mut push = |this: &mut Self, child: FreeRect| -> Result<(), PackError> {
            if child.x + child.rect.w > free.x + free.rect.w
                || child.y + child.rect.h > free.y + free.rect.h
            {
                return Err(PackError::InvariantViolation(format!(
                    "split child {} at ({}, {}) escapes parent {} at ({}, {})",
                    child.rect, child.x, child.y, free.rect, free.x, free.y
                )));
            }
            if cfg.is_trackable(child.rect) {
                kept += child.rect.area();
                this.free_rects.push(child);
            }
            Ok(())
        };

        if right_w > 0 && below_h > 0 {
            let right_remainder_shorter = free.rect.w - shape.w < free.rect.h - shape.h;
            let full_height_right = match cfg.split_axis_preference {
                // Cut the shorter leftover off first: the cut runs along
                // the long axis of the remainder, so the other child keeps
                // the full span and stays closer to square.
                SplitAxis::Shorter => !right_remainder_shorter,
                SplitAxis::Longer => right_remainder_shorter,
            };
            if full_height_right {
                // Vertical cut: right child spans the full height, the
                // strip below the part spans only its width.
                push(
                    self,
                    FreeRect {
                        x: free.x + shape.w + kerf,
                        y: free.y,
                        rect: Rect::new(right_w, free.rect.h),
                    },
                )?;
                push(
                    self,
                    FreeRect {
                        x: free.x,
                        y: free.y + shape.h + kerf,
                        rect: Rect::new(shape.w, below_h),
                    },
                )?;
            } else {
                // Horizontal cut: child below spans the full width.
                push(
                    self,
                    FreeRect {
                        x: free.x + shape.w + kerf,
                        y: free.y,
                        rect: Rect::new(right_w, shape.h),
                    },
                )?;
                push(
                    self,
                    FreeRect {
                        x: free.x,
                        y: free.y + shape.h + kerf,
                        rect: Rect::new(free.rect.w, below_h),
                    },
                )?;
            }
        } else if right_w > 0 {
            push(
                self,
                FreeRect {
                    x: free.x + shape.w + kerf,
                    y: free.y,
                    rect: Rect::new(right_w, free.rect.h),
                },
            )?;
        } else if below_h > 0 {
            push(
                self,
                FreeRect {
                    x: free.x,
                    y: free.y + shape.h + kerf,
                    rect: Rect::new(free.rect.w, below_h),
                },
            )?;
        }

        Ok(kept)
    }

    /// Recombines free rects sharing a full edge. The merged rect is
    /// re-splittable with one full cut, so guillotine legality survives.
    fn merge_free_rects(&mut self) {
        let mut merged = true;
        while merged {
            merged = false;
            'outer: for i in 0..self.free_rects.len() {
                for j in (i + 1)..self.free_rects.len() {
                    if let Some(m) = Self::try_merge(self.free_rects[i], self.free_rects[j]) {
                        self.free_rects[i] = m;
                        self.free_rects.swap_remove(j);
                        merged = true;
                        break 'outer;
                    }
                }
            }
        }
    }

    fn try_merge(a: FreeRect, b: FreeRect) -> Option<FreeRect> {
        // Same row, same height, touching on x.
        if a.y == b.y && a.rect.h == b.rect.h {
            if a.x + a.rect.w == b.x {
                return Some(FreeRect {
                    x: a.x,
                    y: a.y,
                    rect: Rect::new(a.rect.w + b.rect.w, a.rect.h),
                });
            }
            if b.x + b.rect.w == a.x {
                return Some(FreeRect {
                    x: b.x,
                    y: b.y,
                    rect: Rect::new(a.rect.w + b.rect.w, a.rect.h),
                });
            }
        }
        // Same column, same width, touching on y.
        if a.x == b.x && a.rect.w == b.rect.w {
            if a.y + a.rect.h == b.y {
                return Some(FreeRect {
                    x: a.x,
                    y: a.y,
                    rect: Rect::new(a.rect.w, a.rect.h + b.rect.h),
                });
            }
            if b.y + b.rect.h == a.y {
                return Some(FreeRect {
                    x: b.x,
                    y: b.y,
                    rect: Rect::new(a.rect.w, a.rect.h + b.rect.h),
                });
            }
        }
        None
    }

    /// Placed + free + discarded must tile the stock exactly.
    pub fn conservation_holds(&self) -> bool {
        self.placed_area + self.free_area() + self.discarded_area == self.stock.area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(kerf: u32) -> PackConfig {
        PackConfig {
            kerf,
            // Track everything down to 1mm so the split geometry itself is
            // under test, not the sliver filter.
            min_usable_width: 1,
            min_usable_height: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_place_anchors_top_left() {
        let mut space = SheetSpace::new(Rect::new(1000, 1000));
        let c = space.find_candidates(Rect::new(500, 300));
        assert_eq!(c.len(), 1);
        let (x, y) = space.place(c[0].free_idx, Rect::new(500, 300), &cfg(0)).unwrap();
        assert_eq!((x, y), (0, 0));
        assert!(space.conservation_holds());
    }

    #[test]
    fn test_shorter_axis_trims_narrow_remainder_first() {
        // 500 left over in x, 700 in y: the x remainder is shorter, so the
        // first cut runs horizontally and the child below keeps the full
        // sheet width, staying close to square.
        let mut space = SheetSpace::new(Rect::new(1000, 1000));
        space.place(0, Rect::new(500, 300), &cfg(0)).unwrap();
        assert!(
            space
                .free_rects()
                .iter()
                .any(|f| f.rect == Rect::new(1000, 700) && f.x == 0 && f.y == 300)
        );
        assert!(
            space
                .free_rects()
                .iter()
                .any(|f| f.rect == Rect::new(500, 300) && f.x == 500 && f.y == 0)
        );
    }

    #[test]
    fn test_longer_axis_gives_full_height_right_child() {
        let mut space = SheetSpace::new(Rect::new(1000, 1000));
        let c = PackConfig {
            split_axis_preference: SplitAxis::Longer,
            ..cfg(0)
        };
        space.place(0, Rect::new(500, 300), &c).unwrap();
        assert!(
            space
                .free_rects()
                .iter()
                .any(|f| f.rect == Rect::new(500, 1000) && f.x == 500 && f.y == 0)
        );
        assert!(
            space
                .free_rects()
                .iter()
                .any(|f| f.rect == Rect::new(500, 700) && f.x == 0 && f.y == 300)
        );
    }

    #[test]
    fn test_kerf_charged_to_remainders() {
        let mut space = SheetSpace::new(Rect::new(1000, 500));
        space.place(0, Rect::new(400, 500), &cfg(4)).unwrap();
        // 1000 - 400 - 4 kerf = 596 wide remainder.
        assert_eq!(space.free_rects().len(), 1);
        assert_eq!(space.free_rects()[0].rect, Rect::new(596, 500));
        assert_eq!(space.free_rects()[0].x, 404);
        // The 4x500 kerf band is discarded.
        assert_eq!(space.discarded_area(), 2_000);
        assert!(space.conservation_holds());
    }

    #[test]
    fn test_exact_fill_leaves_nothing() {
        let mut space = SheetSpace::new(Rect::new(600, 400));
        space.place(0, Rect::new(600, 400), &cfg(3)).unwrap();
        assert!(space.free_rects().is_empty());
        assert_eq!(space.discarded_area(), 0);
        assert_eq!(space.placed_area(), 240_000);
    }

    #[test]
    fn test_sliver_below_threshold_dropped() {
        let mut space = SheetSpace::new(Rect::new(1000, 1000));
        let c = PackConfig {
            kerf: 0,
            min_usable_width: 150,
            min_usable_height: 150,
            ..Default::default()
        };
        // Leaves a 1000x80 strip below: under the 150mm threshold, dropped.
        space.place(0, Rect::new(1000, 920), &c).unwrap();
        assert!(space.free_rects().is_empty());
        assert_eq!(space.discarded_area(), 80_000);
        assert!(space.conservation_holds());
    }

    #[test]
    fn test_adjacent_free_rects_merge() {
        let mut space = SheetSpace::new(Rect::new(1000, 1000));
        let c = cfg(0);
        // Two 500x1000 columns; fill the left one with two stacked parts.
        space.place(0, Rect::new(500, 500), &c).unwrap();
        let below = space
            .free_rects()
            .iter()
            .position(|f| f.x == 0 && f.y == 500)
            .unwrap();
        space.place(below, Rect::new(500, 500), &c).unwrap();
        // Left column full; the right column must be a single merged rect.
        assert_eq!(space.free_rects().len(), 1);
        assert_eq!(space.free_rects()[0].rect, Rect::new(500, 1000));
    }

    #[test]
    fn test_candidates_skip_too_small_rects() {
        let mut space = SheetSpace::new(Rect::new(1000, 1000));
        space.place(0, Rect::new(700, 700), &cfg(0)).unwrap();
        // 300-wide column and 700x300 band remain; an 800-wide shape has
        // no candidate.
        assert!(space.find_candidates(Rect::new(800, 200)).is_empty());
        assert_eq!(space.find_candidates(Rect::new(300, 300)).len(), 2);
    }

    #[test]
    fn test_oversized_place_is_invariant_violation() {
        let mut space = SheetSpace::new(Rect::new(500, 500));
        let err = space.place(0, Rect::new(600, 100), &cfg(0)).unwrap_err();
        assert!(matches!(err, PackError::InvariantViolation(_)));
    }

    #[test]
    fn test_conservation_through_many_places() {
        let mut space = SheetSpace::new(Rect::new(2700, 1800));
        let c = PackConfig {
            kerf: 4,
            ..Default::default()
        };
        let shape = Rect::new(600, 400);
        loop {
            let cands = space.find_candidates(shape);
            let Some(cand) = cands.first() else { break };
            space.place(cand.free_idx, shape, &c).unwrap();
            assert!(space.conservation_holds());
        }
        assert!(space.placed_area() > 0);
    }
}
