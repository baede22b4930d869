//! Relationship-driven target points for placement.

use std::f64::consts::FRAC_PI_2;

use crate::model::{Position, Table, find_table};

/// Name patterns that mark a table as a likely join table during placement.
const JUNCTION_NAME_HINTS: [&str; 4] = ["junction", "bridge", "link", "rel"];

/// Placement-time junction heuristic. Looser than the relationship
/// inferencer's: it also accepts names containing `rel`.
pub fn looks_like_junction(name: &str, foreign_key_count: usize) -> bool {
    if foreign_key_count < 2 {
        return false;
    }
    let lower = name.to_lowercase();
    name.contains('_') || JUNCTION_NAME_HINTS.iter().any(|hint| lower.contains(hint))
}

/// Centroid of the placed tables referenced by any of `targets`.
pub fn related_centroid(placed: &[Table], targets: &[&str]) -> Option<Position> {
    let related: Vec<&Table> = placed
        .iter()
        .filter(|t| targets.iter().any(|target| t.name.eq_ignore_ascii_case(target)))
        .collect();

    if related.is_empty() {
        return None;
    }

    let n = related.len() as f64;
    let x = related.iter().map(|t| t.position.x).sum::<f64>() / n;
    let y = related.iter().map(|t| t.position.y).sum::<f64>() / n;
    Some(Position::new(x, y))
}

/// Point beside the midpoint of the first two targets, pushed off the line
/// joining them by `offset`.
pub fn junction_target(placed: &[Table], targets: &[&str], offset: f64) -> Option<Position> {
    let [first, second, ..] = targets else {
        return None;
    };
    let a = find_table(placed, first)?.position;
    let b = find_table(placed, second)?.position;

    let mid_x = (a.x + b.x) / 2.0;
    let mid_y = (a.y + b.y) / 2.0;
    let perp = (b.y - a.y).atan2(b.x - a.x) + FRAC_PI_2;

    Some(Position::new(
        mid_x + perp.cos() * offset,
        mid_y + perp.sin() * offset,
    ))
}
