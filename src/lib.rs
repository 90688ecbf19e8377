//! Guillotine cutting-stock optimizer for sheet materials.
//!
//! Packs rectangular parts onto fixed-size stock sheets so that every cut
//! is a full edge-to-edge saw pass, grain constraints limit rotation, and
//! the leftover material is scored by shape: one large reusable offcut
//! beats a denser layout that shreds the remainder into scrap.
//!
//! ```
//! use sheetcut::{Grain, PackConfig, Part, Rect, Solver};
//!
//! let parts = vec![Part {
//!     id: "shelf".into(),
//!     rect: Rect::new(900, 300),
//!     grain: Grain::Lengthwise,
//!     qty: 4,
//! }];
//! let solver = Solver::new(Rect::new(2700, 1800), PackConfig::default(), parts);
//! let solution = solver.solve().unwrap();
//! assert_eq!(solution.sheet_count(), 1);
//! ```

pub mod config;
pub mod error;
pub mod guillotine;
pub mod offcut;
pub mod ordering;
pub mod orientation;
pub mod render;
pub mod solver;
pub mod types;
pub mod waste;

pub use config::{PackConfig, ScoringWeights, SplitAxis};
pub use error::PackError;
pub use solver::Solver;
pub use types::{FreeRect, Grain, Part, Placement, Rect, SheetLayout, Solution};
