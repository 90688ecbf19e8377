//! Expands a part into its grain-legal orientations.
//!
//! Every consumer of "which ways may this part lie" goes through here, so
//! grain rules live in exactly one place.

use crate::error::PackError;
use crate::types::{Grain, Orientation, Part, Rect};

/// Grain-legal orientations for a part, in a fixed order (unrotated first).
/// `Any` yields one entry for squares, two otherwise.
pub fn legal_orientations(rect: Rect, grain: Grain) -> Vec<Orientation> {
    match grain {
        Grain::Lengthwise => vec![Orientation {
            rect,
            rotated: false,
        }],
        Grain::Widthwise => vec![Orientation {
            rect: rect.rotated(),
            rotated: true,
        }],
        Grain::Any => {
            let mut out = vec![Orientation {
                rect,
                rotated: false,
            }];
            if rect.w != rect.h {
                out.push(Orientation {
                    rect: rect.rotated(),
                    rotated: true,
                });
            }
            out
        }
    }
}

/// Rejects the submission when any part has no orientation that fits the
/// stock. All offending ids are collected so one round trip reports them all.
pub fn check_all_fit(parts: &[Part], stock: Rect) -> Result<(), PackError> {
    let mut too_large: Vec<String> = Vec::new();
    for part in parts {
        let fits = legal_orientations(part.rect, part.grain)
            .iter()
            .any(|o| o.rect.fits_in(&stock));
        if !fits {
            too_large.push(part.id.clone());
        }
    }
    if too_large.is_empty() {
        Ok(())
    } else {
        Err(PackError::PartTooLarge {
            ids: too_large,
            stock,
        })
    }
}
