use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::controls::ControlVector;

// ShipPose gets handed from the simulation to the renderer after each tick
// to tell it where to draw the ship and which thruster flames to show
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct ShipPose {
    pub position: DVec2,
    pub orientation: f64,
    pub control: ControlVector,
}
