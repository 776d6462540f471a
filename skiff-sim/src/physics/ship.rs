use std::f64::consts::TAU;
use std::time::Instant;

use glam::DVec2;

use skiff_core::controls::ControlVector;
use skiff_core::lap::LapEvent;
use skiff_core::pose::ShipPose;
use skiff_core::ShipTuning;

use crate::map::{OccupancyMap, StartPose};
use crate::physics::collision;

/// The whole mutable race state: continuous motion plus the checkpoint
/// counter and lap timer. A race reset builds a fresh Ship; only the
/// persisted best lap outlives it.
pub struct Ship {
    pub position: DVec2,
    pub velocity: DVec2,
    pub orientation: f64,
    pub angular_velocity: f64,
    pub last_checkpoint: Option<usize>,
    pub lap_start: Option<Instant>,
    pub control: ControlVector,
}

impl Ship {
    pub fn new(pose: &StartPose) -> Ship {
        Ship {
            position: pose.position,
            velocity: DVec2::ZERO,
            orientation: pose.orientation,
            angular_velocity: 0.0,
            last_checkpoint: None,
            lap_start: None,
            control: ControlVector::default(),
        }
    }

    pub fn pose(&self) -> ShipPose {
        ShipPose {
            position: self.position,
            orientation: self.orientation,
            control: self.control,
        }
    }

    /// Advance one fixed tick. Step order matters and is deliberate:
    /// checkpoints first (against the pre-move cell), then linear drag,
    /// thrust, wall response, displacement, and finally rotation.
    pub fn integrate(
        &mut self,
        control: ControlVector,
        map: &OccupancyMap,
        tuning: &ShipTuning,
        dt: f64,
        now: Instant,
    ) -> Option<LapEvent> {
        self.control = control;
        let lap = self.advance_checkpoint(map, now);

        // drag as a decay factor per unit time; the power of dt keeps the
        // decay identical across tick rates
        self.velocity *= (1.0 - tuning.drag).powf(dt);

        let acceleration = tuning.thrust * control.thrust_factor();
        let forward = DVec2::new(-self.orientation.sin(), self.orientation.cos());
        self.velocity += dt * acceleration * forward;

        let contact_x = collision::probe_x(map, self.position, tuning.radius);
        let contact_y = collision::probe_y(map, self.position, tuning.radius);
        self.velocity.x = contact_x.respond(self.velocity.x, tuning.bounce);
        self.velocity.y = contact_y.respond(self.velocity.y, tuning.bounce);

        self.position += dt * self.velocity;

        self.angular_velocity *= (1.0 - tuning.angular_drag).powf(dt);
        self.angular_velocity += dt * tuning.angular_thrust * control.steer();
        // rem_euclid rather than %, so the wrap never goes negative
        self.orientation = (self.orientation + dt * self.angular_velocity).rem_euclid(TAU);

        lap
    }

    // Only the next checkpoint in sequence counts; out-of-order touches are
    // ignored so laps can't be shortcut or driven in reverse. Sitting on
    // the current checkpoint doesn't re-fire it.
    fn advance_checkpoint(&mut self, map: &OccupancyMap, now: Instant) -> Option<LapEvent> {
        let count = map.checkpoint_count();
        if count == 0 {
            return None;
        }
        let cell = map.cell_index(self.position)?;
        let next = self.last_checkpoint.map_or(0, |current| (current + 1) % count);
        if !map.checkpoint_contains(next, cell) {
            return None;
        }
        self.last_checkpoint = Some(next);
        if next != 0 {
            return None;
        }
        // crossing the finish line closes the running lap, if any, and
        // always starts the next one
        let lap = self.lap_start.map(|started| LapEvent {
            duration: now - started,
        });
        self.lap_start = Some(now);
        lap
    }
}
