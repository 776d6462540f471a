use glam::DVec2;

use crate::map::OccupancyMap;

/// Which side of the ship touched a wall along one axis this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AxisContact {
    Clear,
    NegativeSide,
    PositiveSide,
}

impl AxisContact {
    /// Velocity on the axis after the hit: an open axis keeps its velocity,
    /// a touched side replaces it with the bounce impulse pointing away
    /// from the wall.
    pub fn respond(self, velocity: f64, bounce: f64) -> f64 {
        match self {
            AxisContact::Clear => velocity,
            AxisContact::NegativeSide => bounce,
            AxisContact::PositiveSide => -bounce,
        }
    }
}

/// Point-sample the two cells straddling the ship at +/- radius along x,
/// in the ship's current row. Sampling once per tick means a fast enough
/// ship can tunnel through a one-cell wall; that's the established feel,
/// not something to compensate for here.
pub fn probe_x(map: &OccupancyMap, position: DVec2, radius: f64) -> AxisContact {
    let row = position.y.floor() as i64;
    let negative = map.is_wall((position.x - radius).floor() as i64, row);
    let positive = map.is_wall((position.x + radius).floor() as i64, row);
    contact(negative, positive)
}

/// Same probe along y, in the ship's current column.
pub fn probe_y(map: &OccupancyMap, position: DVec2, radius: f64) -> AxisContact {
    let column = position.x.floor() as i64;
    let negative = map.is_wall(column, (position.y - radius).floor() as i64);
    let positive = map.is_wall(column, (position.y + radius).floor() as i64);
    contact(negative, positive)
}

// walls on both sides pin the ship rather than bounce it; no response
fn contact(negative: bool, positive: bool) -> AxisContact {
    match (negative, positive) {
        (false, true) => AxisContact::PositiveSide,
        (true, false) => AxisContact::NegativeSide,
        _ => AxisContact::Clear,
    }
}
