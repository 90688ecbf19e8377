//! Quantity expansion and deterministic placement ordering.

use crate::orientation::legal_orientations;
use crate::types::{Orientation, Part};
use rand::Rng;
use rand::seq::SliceRandom;

/// One unit of demand: a single physical piece to cut.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Index into the caller's part list.
    pub part_idx: usize,
    /// Unit number within the part's quantity, for stable tie-breaking.
    pub unit: u32,
    pub orientations: Vec<Orientation>,
}

impl Instance {
    pub fn area(&self) -> u64 {
        self.orientations[0].rect.area()
    }

    fn is_constrained(&self) -> bool {
        self.orientations.len() == 1
    }
}

/// Expands quantities and produces the placement order: grain-constrained
/// units first (they cannot adapt to whatever space is left later), then
/// rotatable ones; each group largest-area first; remaining ties broken by
/// submission order. Computed once per run.
pub fn expand_and_order(parts: &[Part]) -> Vec<Instance> {
    let mut instances = Vec::new();
    for (part_idx, part) in parts.iter().enumerate() {
        let orientations = legal_orientations(part.rect, part.grain);
        for unit in 0..part.qty {
            instances.push(Instance {
                part_idx,
                unit,
                orientations: orientations.clone(),
            });
        }
    }
    instances.sort_by(|a, b| {
        a.is_constrained()
            .cmp(&b.is_constrained())
            .reverse()
            .then(b.area().cmp(&a.area()))
            .then(a.part_idx.cmp(&b.part_idx))
            .then(a.unit.cmp(&b.unit))
    });
    instances
}

/// Randomized-restart variant: shuffles within the constrained and
/// rotatable groups but never lets a rotatable unit jump ahead of a
/// constrained one.
pub fn shuffled_order<R: Rng>(parts: &[Part], rng: &mut R) -> Vec<Instance> {
    let mut instances = expand_and_order(parts);
    let split = instances.partition_point(|i| i.is_constrained());
    instances[..split].shuffle(rng);
    instances[split..].shuffle(rng);
    instances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Grain, Rect};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn part(id: &str, w: u32, h: u32, grain: Grain, qty: u32) -> Part {
        Part {
            id: id.into(),
            rect: Rect::new(w, h),
            grain,
            qty,
        }
    }

    #[test]
    fn test_quantity_expansion() {
        let order = expand_and_order(&[part("a", 300, 200, Grain::Any, 5)]);
        assert_eq!(order.len(), 5);
        assert_eq!(order.iter().map(|i| i.unit).collect::<Vec<_>>(), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_constrained_before_rotatable() {
        let order = expand_and_order(&[
            part("big-free", 1200, 800, Grain::Any, 1),
            part("small-grained", 300, 200, Grain::Lengthwise, 1),
        ]);
        // The grained part sorts first despite being far smaller.
        assert_eq!(order[0].part_idx, 1);
        assert_eq!(order[1].part_idx, 0);
    }

    #[test]
    fn test_area_descending_within_group() {
        let order = expand_and_order(&[
            part("small", 300, 200, Grain::Any, 1),
            part("large", 900, 600, Grain::Any, 1),
            part("medium", 600, 400, Grain::Any, 1),
        ]);
        let areas: Vec<u64> = order.iter().map(|i| i.area()).collect();
        assert_eq!(areas, [540_000, 240_000, 60_000]);
    }

    #[test]
    fn test_square_any_counts_as_constrained() {
        // A square has one orientation even with free grain, so it sorts
        // with the constrained group.
        let order = expand_and_order(&[
            part("rect", 900, 600, Grain::Any, 1),
            part("square", 400, 400, Grain::Any, 1),
        ]);
        assert_eq!(order[0].part_idx, 1);
    }

    #[test]
    fn test_order_is_deterministic() {
        let parts = vec![
            part("a", 500, 300, Grain::Any, 3),
            part("b", 500, 300, Grain::Widthwise, 2),
            part("c", 700, 200, Grain::Any, 2),
        ];
        assert_eq!(
            expand_and_order(&parts)
                .iter()
                .map(|i| (i.part_idx, i.unit))
                .collect::<Vec<_>>(),
            expand_and_order(&parts)
                .iter()
                .map(|i| (i.part_idx, i.unit))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_shuffle_keeps_groups_separate() {
        let parts = vec![
            part("grained", 400, 300, Grain::Lengthwise, 4),
            part("free", 500, 350, Grain::Any, 4),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let order = shuffled_order(&parts, &mut rng);
        let split = order.iter().position(|i| i.part_idx == 1).unwrap();
        assert!(order[..split].iter().all(|i| i.part_idx == 0));
        assert!(order[split..].iter().all(|i| i.part_idx == 1));
    }
}
