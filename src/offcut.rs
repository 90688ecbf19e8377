//! Classifies the free space left on a finished sheet.

use crate::config::PackConfig;
use crate::guillotine::SheetSpace;
use crate::types::FreeRect;

#[derive(Debug, Clone)]
pub struct OffcutSummary {
    /// Regions worth returning to stock, largest first.
    pub usable: Vec<FreeRect>,
    /// Everything else: sub-threshold regions, dropped slivers, kerf.
    pub scrap_area: u64,
}

/// Splits a finished sheet's leftover into usable offcuts and scrap.
pub fn extract(space: &SheetSpace, cfg: &PackConfig) -> OffcutSummary {
    let mut usable: Vec<FreeRect> = Vec::new();
    let mut scrap_area = space.discarded_area();

    for free in space.free_rects() {
        if cfg.is_usable_offcut(free.rect) {
            usable.push(*free);
        } else {
            scrap_area += free.rect.area();
        }
    }
    usable.sort_by(|a, b| {
        b.rect
            .area()
            .cmp(&a.rect.area())
            .then(a.y.cmp(&b.y))
            .then(a.x.cmp(&b.x))
    });

    OffcutSummary { usable, scrap_area }
}

/// Placed area over total stock area across all opened sheets.
pub fn utilization(placed_area: u64, sheet_count: usize, stock_area: u64) -> f64 {
    let total = stock_area * sheet_count as u64;
    if total == 0 {
        return 0.0;
    }
    placed_area as f64 / total as f64
}
