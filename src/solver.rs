//! The placement engine: a strictly greedy, deterministic single pass over
//! the ordered part instances. Candidate placements are evaluated by
//! simulating the split on a cloned free-rect list and committing only the
//! winner, so speculative work never touches shared state.
//!
//! Outer search (preset sweep, budgeted random restarts) lives here too,
//! re-invoking the deterministic pass as a black-box decoder.

use crate::config::PackConfig;
use crate::error::PackError;
use crate::guillotine::SheetSpace;
use crate::offcut;
use crate::ordering::{self, Instance};
use crate::orientation;
use crate::types::{Part, Placement, Rect, SheetLayout, Solution};
use crate::waste;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};

pub struct Solver {
    stock: Rect,
    config: PackConfig,
    parts: Vec<Part>,
}

/// A sheet being packed: its free space plus the placements committed so far.
#[derive(Debug, Clone)]
struct OpenSheet {
    space: SheetSpace,
    placements: Vec<Placement>,
}

/// The winning candidate for one instance, across all sheets and
/// orientations.
#[derive(Debug, Clone, Copy)]
struct Chosen {
    sheet_idx: usize,
    free_idx: usize,
    orientation_idx: usize,
    score: f64,
}

impl Solver {
    pub fn new(stock: Rect, config: PackConfig, parts: Vec<Part>) -> Self {
        Self {
            stock,
            config,
            parts,
        }
    }

    /// One deterministic greedy pass with the configured settings.
    pub fn solve(&self) -> Result<Solution, PackError> {
        self.preflight()?;
        let order = ordering::expand_and_order(&self.parts);
        let sheets = self.pack(&order, &self.config)?;
        Ok(self.to_solution(sheets, &self.config))
    }

    /// Runs the greedy pass once per configuration preset (both split axes,
    /// both weight profiles) and keeps the best complete result: fewest
    /// sheets, then best leftover quality.
    pub fn solve_best(&self) -> Result<Solution, PackError> {
        self.preflight()?;
        let order = ordering::expand_and_order(&self.parts);

        let mut best: Option<(Vec<OpenSheet>, PackConfig)> = None;
        for preset in self.config.presets() {
            let sheets = self.pack(&order, &preset)?;
            if best
                .as_ref()
                .is_none_or(|(cur, _)| Self::better_layout(&sheets, cur, &self.config))
            {
                best = Some((sheets, preset));
            }
        }
        let (sheets, preset) = best.expect("presets are never empty");
        Ok(self.to_solution(sheets, &preset))
    }

    /// "Optimize harder": seeded randomized restarts of the placement order
    /// around the deterministic core, until the budget runs out. The preset
    /// sweep runs first, so the result is never worse than `solve_best`.
    /// A fixed seed and generous budget reproduce the same search sequence.
    pub fn solve_with_budget(
        &self,
        budget: Duration,
        seed: u64,
    ) -> Result<Solution, PackError> {
        self.preflight()?;
        let deadline = Instant::now() + budget;
        let mut rng = StdRng::seed_from_u64(seed);

        let base_order = ordering::expand_and_order(&self.parts);
        let presets = self.config.presets();
        let mut best: Option<(Vec<OpenSheet>, PackConfig)> = None;
        for preset in &presets {
            let sheets = self.pack(&base_order, preset)?;
            if best
                .as_ref()
                .is_none_or(|(cur, _)| Self::better_layout(&sheets, cur, &self.config))
            {
                best = Some((sheets, preset.clone()));
            }
        }

        let mut restarts = 0usize;
        while Instant::now() < deadline {
            let order = ordering::shuffled_order(&self.parts, &mut rng);
            let preset = &presets[restarts % presets.len()];
            let sheets = self.pack(&order, preset)?;
            if best
                .as_ref()
                .is_none_or(|(cur, _)| Self::better_layout(&sheets, cur, &self.config))
            {
                best = Some((sheets, preset.clone()));
            }
            restarts += 1;
        }
        tracing::debug!(restarts, "random restart budget exhausted");

        let (sheets, preset) = best.expect("baseline sweep always produces a layout");
        Ok(self.to_solution(sheets, &preset))
    }

    /// Fail-fast checks. Nothing is placed if any of these reject.
    fn preflight(&self) -> Result<(), PackError> {
        self.config.validate(self.stock)?;
        for part in &self.parts {
            if part.rect.w == 0 || part.rect.h == 0 {
                return Err(PackError::InvalidConfiguration(format!(
                    "part '{}' has zero dimension {}",
                    part.id, part.rect
                )));
            }
            if part.qty == 0 {
                return Err(PackError::InvalidConfiguration(format!(
                    "part '{}' has zero quantity",
                    part.id
                )));
            }
        }
        orientation::check_all_fit(&self.parts, self.stock)
    }

    /// The greedy pass. Aborts on the first unplaceable instance; partial
    /// layouts are never returned.
    fn pack(&self, order: &[Instance], cfg: &PackConfig) -> Result<Vec<OpenSheet>, PackError> {
        let mut sheets: Vec<OpenSheet> = Vec::new();

        for inst in order {
            let chosen = match self.best_candidate(inst, &sheets, cfg)? {
                Some(c) => c,
                None => {
                    sheets.push(OpenSheet {
                        space: SheetSpace::new(self.stock),
                        placements: Vec::new(),
                    });
                    tracing::debug!(sheet = sheets.len(), "opened new sheet");
                    let fresh = &sheets[sheets.len() - 1..];
                    match self.best_candidate(inst, fresh, cfg)? {
                        Some(c) => Chosen {
                            sheet_idx: sheets.len() - 1,
                            ..c
                        },
                        // check_all_fit should have caught this; re-checked
                        // so an unplaceable part can never be dropped.
                        None => {
                            return Err(PackError::PartTooLarge {
                                ids: vec![self.parts[inst.part_idx].id.clone()],
                                stock: self.stock,
                            });
                        }
                    }
                }
            };

            let sheet = &mut sheets[chosen.sheet_idx];
            let orient = inst.orientations[chosen.orientation_idx];
            let (x, y) = sheet.space.place(chosen.free_idx, orient.rect, cfg)?;
            sheet.placements.push(Placement {
                part_id: self.parts[inst.part_idx].id.clone(),
                rect: orient.rect,
                x,
                y,
                rotated: orient.rotated,
            });
        }

        Ok(sheets)
    }

    /// Evaluates every (sheet, orientation, free rect) candidate for one
    /// instance and returns the highest-scoring one. Ties keep the earliest
    /// candidate in enumeration order, which makes the whole pass
    /// deterministic.
    fn best_candidate(
        &self,
        inst: &Instance,
        sheets: &[OpenSheet],
        cfg: &PackConfig,
    ) -> Result<Option<Chosen>, PackError> {
        let mut best: Option<Chosen> = None;

        for (sheet_idx, sheet) in sheets.iter().enumerate() {
            for (orientation_idx, orient) in inst.orientations.iter().enumerate() {
                for cand in sheet.space.find_candidates(orient.rect) {
                    let free = sheet.space.free_rects()[cand.free_idx];

                    let mut sim = sheet.space.clone();
                    sim.place(cand.free_idx, orient.rect, cfg)?;

                    let fit = orient.rect.area() as f64 / free.rect.area() as f64;
                    let leftover = waste::score(sim.free_rects(), cfg);
                    let cut = cut_simplicity(free.rect, orient.rect);
                    let w = &cfg.scoring_weights;
                    let score = w.fit * fit + w.waste * leftover + w.guillotine * cut;

                    if best.is_none_or(|b| score > b.score) {
                        best = Some(Chosen {
                            sheet_idx,
                            free_idx: cand.free_idx,
                            orientation_idx,
                            score,
                        });
                    }
                }
            }
        }

        Ok(best)
    }

    /// Fewest sheets wins; equal sheet counts are ranked by leftover
    /// quality under the caller's base configuration.
    fn better_layout(a: &[OpenSheet], b: &[OpenSheet], cfg: &PackConfig) -> bool {
        if a.len() != b.len() {
            return a.len() < b.len();
        }
        Self::leftover_quality(a, cfg) > Self::leftover_quality(b, cfg)
    }

    fn leftover_quality(sheets: &[OpenSheet], cfg: &PackConfig) -> f64 {
        sheets
            .iter()
            .map(|s| waste::score(s.space.free_rects(), cfg))
            .sum()
    }

    fn to_solution(&self, sheets: Vec<OpenSheet>, cfg: &PackConfig) -> Solution {
        let stock_area = self.stock.area();
        let mut placed_area = 0u64;
        let layouts: Vec<SheetLayout> = sheets
            .iter()
            .enumerate()
            .map(|(index, sheet)| {
                debug_assert!(sheet.space.conservation_holds());
                placed_area += sheet.space.placed_area();
                let offcuts = offcut::extract(&sheet.space, cfg);
                SheetLayout {
                    index,
                    placements: sheet.placements.clone(),
                    usable_offcuts: offcuts.usable,
                    scrap_area: offcuts.scrap_area,
                }
            })
            .collect();

        let utilization = offcut::utilization(placed_area, layouts.len(), stock_area);
        tracing::info!(
            sheets = layouts.len(),
            utilization = format!("{:.1}%", utilization * 100.0),
            "packing finished"
        );
        Solution {
            sheets: layouts,
            stock: self.stock,
            utilization,
        }
    }
}

/// Bonus for placements whose edges already line up with the free rect:
/// each matched edge is one guillotine cut saved.
fn cut_simplicity(free: Rect, shape: Rect) -> f64 {
    match (free.w == shape.w, free.h == shape.h) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.5,
        (false, false) => 0.0,
    }
}
