//! Free-slot search on the canvas.

use std::f64::consts::PI;

use crate::model::Position;

use super::types::{Candidate, LayoutConfig, Rect};

/// Whether a table at `position` would overlap any placed table once both are
/// padded by `spacing`.
pub fn is_occupied(
    position: Position,
    placed: &[Position],
    config: &LayoutConfig,
    spacing: f64,
) -> bool {
    let candidate = Rect::new(position, config.table_width, config.table_height).padded(spacing);
    placed.iter().any(|&existing| {
        Rect::new(existing, config.table_width, config.table_height)
            .padded(spacing)
            .intersects(&candidate)
    })
}

fn point_on_circle(center: Position, radius: f64, angle_deg: u32) -> Position {
    let rad = f64::from(angle_deg) * PI / 180.0;
    Position::new(center.x + rad.cos() * radius, center.y + rad.sin() * radius)
}

/// Best free slot around `target`: the 8 compass points first, then
/// concentric rings until one yields a slot. Axis-aligned directions win over
/// diagonals, then the nearest slot wins.
pub fn find_best_position_near(
    target: Position,
    placed: &[Position],
    config: &LayoutConfig,
) -> Option<Position> {
    let spacing = config.min_spacing;
    let radius = spacing * config.near_radius;
    let margin = spacing * config.near_margin;

    let mut candidates: Vec<Candidate> = (0..8)
        .map(|i| i * 45)
        .filter_map(|angle_deg| {
            let position = point_on_circle(target, radius, angle_deg);
            if is_occupied(position, placed, config, margin) {
                return None;
            }
            Some(Candidate {
                position,
                distance: (position.x - target.x).hypot(position.y - target.y),
                angle_deg,
            })
        })
        .collect();

    if candidates.is_empty() {
        candidates = search_rings(target, placed, config);
    }

    candidates.sort_by(|a, b| {
        b.is_axis_aligned()
            .cmp(&a.is_axis_aligned())
            .then(a.distance.total_cmp(&b.distance))
    });

    candidates.first().map(|c| c.position)
}

fn search_rings(target: Position, placed: &[Position], config: &LayoutConfig) -> Vec<Candidate> {
    let spacing = config.min_spacing;
    let margin = spacing * config.ring_margin;
    let step = config.ring_angle_step_deg.max(1);
    let max_radius = spacing * config.ring_end;

    let mut radius = spacing * config.ring_start;
    while radius <= max_radius {
        let ring: Vec<Candidate> = (0..360)
            .step_by(step as usize)
            .filter_map(|angle_deg| {
                let position = point_on_circle(target, radius, angle_deg);
                if is_occupied(position, placed, config, margin) {
                    return None;
                }
                Some(Candidate {
                    position,
                    distance: radius,
                    angle_deg,
                })
            })
            .collect();

        if !ring.is_empty() {
            return ring;
        }
        radius += spacing * config.ring_step;
    }

    Vec::new()
}

/// Outward spiral from the canvas center, falling back to a grid slot keyed
/// by `index` once the spiral leaves the maximum radius.
pub fn find_spiral_position(index: usize, placed: &[Position], config: &LayoutConfig) -> Position {
    let spacing = config.min_spacing;
    let margin = spacing * config.spiral_margin;
    let angle_step = PI / 6.0;
    let growth = spacing / config.spiral_growth_divisor;
    let center = config.spiral_center;

    let mut radius = spacing * config.spiral_start;
    let mut angle: f64 = 0.0;

    while radius < spacing * config.spiral_max {
        let position = Position::new(
            angle.cos() * radius + center.x,
            angle.sin() * radius + center.y,
        );
        if !is_occupied(position, placed, config, margin) {
            return position;
        }

        angle += angle_step;
        radius += growth;

        if angle > PI * 2.0 {
            angle = 0.0;
            radius += spacing * config.spiral_revolution_growth;
        }
    }

    grid_position(index, placed.len(), config)
}

/// Row-major grid slot for creation index `index`.
pub fn grid_position(index: usize, placed_count: usize, config: &LayoutConfig) -> Position {
    let cols = ((placed_count + 1) as f64).sqrt().ceil().max(1.0) as usize;
    let col = index % cols;
    let row = index / cols;
    let pitch = config.min_spacing * config.grid_pitch;

    Position::new(
        col as f64 * pitch + config.grid_offset.x,
        row as f64 * pitch + config.grid_offset.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LayoutConfig {
        LayoutConfig::default()
    }

    #[test]
    fn test_empty_canvas_is_free() {
        assert!(!is_occupied(Position::new(0.0, 0.0), &[], &config(), 280.0));
    }

    #[test]
    fn test_occupied_by_nearby_table() {
        let placed = [Position::new(150.0, 150.0)];
        assert!(is_occupied(Position::new(430.0, 150.0), &placed, &config(), 280.0));
        assert!(!is_occupied(Position::new(1000.0, 150.0), &placed, &config(), 280.0));
    }

    #[test]
    fn test_near_prefers_axis_aligned() {
        let target = Position::new(0.0, 0.0);
        let found = find_best_position_near(target, &[], &config()).unwrap();
        // 0 degrees comes first among equally distant axis-aligned candidates
        assert!((found.x - 280.0).abs() < 1e-9);
        assert!(found.y.abs() < 1e-9);
    }

    #[test]
    fn test_near_falls_back_to_rings() {
        let cfg = config();
        let placed = [Position::new(150.0, 150.0)];
        let found = find_best_position_near(Position::new(150.0, 150.0), &placed, &cfg).unwrap();

        let distance = (found.x - 150.0).hypot(found.y - 150.0);
        assert!(distance >= cfg.min_spacing - 1e-9);
        assert!(!is_occupied(found, &placed, &cfg, cfg.min_spacing * cfg.ring_margin));
    }

    #[test]
    fn test_spiral_avoids_placed_tables() {
        let cfg = config();
        let placed = [Position::new(150.0, 150.0), Position::new(800.0, 150.0)];
        let found = find_spiral_position(2, &placed, &cfg);

        assert!(!is_occupied(found, &placed, &cfg, cfg.min_spacing * cfg.spiral_margin));
    }

    #[test]
    fn test_grid_position() {
        let cfg = config();
        // 3 placed -> 2 columns; index 3 lands on row 1, column 1
        let pos = grid_position(3, 3, &cfg);
        assert!((pos.x - 570.0).abs() < 1e-9);
        assert!((pos.y - 570.0).abs() < 1e-9);
    }
}
