use glam::Vec2;

use crate::map::Map;
use crate::math::sign;

/// Which family of grid lines the ray crossed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallSide {
    /// A vertical grid line (the ray stepped along x).
    Vertical,
    /// A horizontal grid line (the ray stepped along y).
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Cell value that stopped the ray, `0` if nothing was hit.
    pub cell: u8,
    /// Perpendicular distance to the last crossed grid line.
    pub distance: f32,
    pub side: WallSide,
}

impl RayHit {
    pub fn is_wall(&self) -> bool {
        self.cell != 0
    }
}

/// Walks the grid along `direction` from `origin`, visiting at most
/// `max_steps` cells. Stops at the first non-empty cell or when leaving the map.
pub fn trace_ray(map: &Map, origin: Vec2, direction: Vec2, max_steps: u32) -> RayHit {
    let base = origin.floor();
    let frac = origin - base;
    let mut cell_x = base.x as i32;
    let mut cell_y = base.y as i32;

    // Ray length between two consecutive vertical (x) or horizontal (y) grid lines
    let delta_x = (1.0 / direction.x).abs();
    let delta_y = (1.0 / direction.y).abs();

    let step_x = sign(direction.x) as i32;
    let step_y = sign(direction.y) as i32;

    let mut side_x = delta_x * if direction.x.is_sign_positive() { 1.0 - frac.x } else { frac.x };
    let mut side_y = delta_y * if direction.y.is_sign_positive() { 1.0 - frac.y } else { frac.y };

    let mut side = WallSide::Vertical;
    let mut cell = 0;

    for _ in 0..max_steps {
        match map.cell(cell_x, cell_y) {
            None => break,
            Some(0) => {}
            Some(value) => {
                cell = value;
                break;
            }
        }

        if side_x < side_y {
            side_x += delta_x;
            cell_x += step_x;
            side = WallSide::Vertical;
        } else {
            side_y += delta_y;
            cell_y += step_y;
            side = WallSide::Horizontal;
        }
    }

    let distance = match side {
        WallSide::Vertical => side_x - delta_x,
        WallSide::Horizontal => side_y - delta_y,
    };

    RayHit {
        cell,
        distance,
        side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Map {
        Map::from_rows(&["#####", "#...#", "#...#", "#...#", "#####"]).unwrap()
    }

    #[test]
    fn test_hits_adjacent_wall() {
        let map = corridor();
        let hit = trace_ray(&map, Vec2::new(1.5, 2.5), Vec2::new(-1.0, 0.0), 8);
        assert_eq!(hit.cell, 1);
        assert_eq!(hit.side, WallSide::Vertical);
        assert!((hit.distance - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_horizontal_hit_reports_side() {
        let map = corridor();
        let hit = trace_ray(&map, Vec2::new(2.5, 2.25), Vec2::new(0.0, 1.0), 8);
        assert_eq!(hit.cell, 1);
        assert_eq!(hit.side, WallSide::Horizontal);
        assert!((hit.distance - 1.75).abs() < 1e-5);
    }

    #[test]
    fn test_step_limit_stops_short() {
        let map = Map::from_rows(&["........#"]).unwrap();
        let hit = trace_ray(&map, Vec2::new(0.5, 0.5), Vec2::new(1.0, 0.0), 4);
        assert!(!hit.is_wall());
    }

    #[test]
    fn test_leaving_the_grid_is_a_miss() {
        let map = Map::from_rows(&["...", "...", "..."]).unwrap();
        let hit = trace_ray(&map, Vec2::new(1.5, 1.5), Vec2::new(0.6, 0.8), 8);
        assert!(!hit.is_wall());
    }
}
