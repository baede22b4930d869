//! Layout engine core implementation.

use tracing::debug;

use crate::model::{Position, Table};

use super::analysis::{junction_target, looks_like_junction, related_centroid};
use super::placement::{find_best_position_near, find_spiral_position};
use super::types::{InvalidLayoutConfig, LayoutConfig};

/// Assigns canvas positions to newly discovered tables.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub(crate) config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Result<Self, InvalidLayoutConfig> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Position for table `name`, created at `index`, given the tables already
    /// placed in this batch and the tables its foreign keys point at.
    pub fn place(&self, name: &str, fk_targets: &[&str], index: usize, placed: &[Table]) -> Position {
        if placed.is_empty() {
            return self.config.anchor;
        }

        let occupied: Vec<Position> = placed.iter().map(|t| t.position).collect();

        // Phase 1: next to the tables it references
        if let Some(centroid) = related_centroid(placed, fk_targets) {
            if let Some(position) = find_best_position_near(centroid, &occupied, &self.config) {
                debug!(table = name, x = position.x, y = position.y, "placed near related tables");
                return position;
            }
        }

        // Phase 2: beside the two tables a join table connects
        if looks_like_junction(name, fk_targets.len()) {
            let offset = self.config.min_spacing * self.config.junction_offset;
            if let Some(target) = junction_target(placed, fk_targets, offset) {
                if let Some(position) = find_best_position_near(target, &occupied, &self.config) {
                    debug!(table = name, x = position.x, y = position.y, "placed as junction");
                    return position;
                }
            }
        }

        // Phase 3: spiral, then grid
        let position = find_spiral_position(index, &occupied, &self.config);
        debug!(table = name, x = position.x, y = position.y, "placed on spiral");
        position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::placement::is_occupied;
    use crate::layout::types::Rect;

    fn table(name: &str, position: Position) -> Table {
        Table {
            name: name.to_string(),
            columns: vec![],
            position,
        }
    }

    #[test]
    fn test_first_table_gets_anchor() {
        let engine = LayoutEngine::default();
        assert_eq!(engine.place("users", &[], 0, &[]), Position::new(150.0, 150.0));
        // Foreign keys do not matter for the first table
        assert_eq!(engine.place("orders", &["users"], 3, &[]), Position::new(150.0, 150.0));
    }

    #[test]
    fn test_related_table_does_not_overlap_target() {
        let engine = LayoutEngine::default();
        let cfg = engine.config();
        let placed = vec![table("authors", cfg.anchor)];

        let position = engine.place("books", &["authors"], 1, &placed);

        let footprint = |p: Position| Rect::new(p, cfg.table_width, cfg.table_height);
        assert!(!footprint(position).intersects(&footprint(cfg.anchor)));
        assert!(!is_occupied(position, &[cfg.anchor], cfg, cfg.min_spacing * cfg.ring_margin));
        // Stays in the neighbourhood of its target
        let distance = (position.x - cfg.anchor.x).hypot(position.y - cfg.anchor.y);
        assert!(distance <= cfg.min_spacing * cfg.ring_end + 1e-9);
    }

    #[test]
    fn test_unrelated_table_uses_spiral() {
        let engine = LayoutEngine::default();
        let cfg = engine.config().clone();
        let placed = vec![table("authors", cfg.anchor)];

        let position = engine.place("settings", &[], 1, &placed);
        assert!(!is_occupied(position, &[cfg.anchor], &cfg, cfg.min_spacing * cfg.spiral_margin));
    }

    #[test]
    fn test_placement_is_deterministic() {
        let engine = LayoutEngine::default();
        let placed = vec![
            table("authors", Position::new(150.0, 150.0)),
            table("tags", Position::new(1000.0, 150.0)),
        ];

        let a = engine.place("book_tags", &["authors", "tags"], 2, &placed);
        let b = engine.place("book_tags", &["authors", "tags"], 2, &placed);
        assert_eq!(a, b);
    }

    #[test]
    fn test_stalling_config_is_rejected() {
        let config = LayoutConfig {
            min_spacing: 0.0,
            ..LayoutConfig::default()
        };
        assert!(LayoutEngine::new(config).is_err());

        let wide = LayoutConfig {
            min_spacing: 500.0,
            ..LayoutConfig::default()
        };
        let engine = LayoutEngine::new(wide).unwrap();
        assert_eq!(engine.config().min_spacing, 500.0);
    }
}
