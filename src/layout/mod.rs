//! Canvas auto-layout for newly discovered tables.

mod analysis;
mod engine;
mod placement;
mod types;

pub use analysis::looks_like_junction;
pub use engine::LayoutEngine;
pub use placement::is_occupied;
pub use types::{InvalidLayoutConfig, LayoutConfig, Rect};
