use std::time::{Duration, Instant};

use glam::DVec2;

use skiff_core::controls::{ControlVector, SteerIntent};
use skiff_core::ShipTuning;

use crate::map::{OccupancyMap, PixelBuffer, StartPose};
use crate::physics::collision::{probe_x, probe_y, AxisContact};
use crate::physics::Ship;

const NEUTRAL: ControlVector = ControlVector {
    left: false,
    forward: false,
    right: false,
};

fn open_map(size: usize) -> OccupancyMap {
    let row = " ".repeat(size);
    let rows: Vec<&str> = (0..size).map(|_| row.as_str()).collect();
    OccupancyMap::decode(&PixelBuffer::from_template(&rows)).unwrap()
}

fn map_from(rows: &[&str]) -> OccupancyMap {
    OccupancyMap::decode(&PixelBuffer::from_template(rows)).unwrap()
}

fn ship_at(x: f64, y: f64) -> Ship {
    Ship::new(&StartPose {
        position: DVec2::new(x, y),
        orientation: 0.0,
    })
}

#[test]
fn drag_decay_is_independent_of_tick_rate() {
    let map = open_map(50);
    let tuning = ShipTuning::default();
    let t0 = Instant::now();

    let mut fine = ship_at(25.0, 25.0);
    fine.velocity = DVec2::new(3.0, 4.0);
    for _ in 0..100 {
        fine.integrate(NEUTRAL, &map, &tuning, 0.01, t0);
    }

    let mut coarse = ship_at(25.0, 25.0);
    coarse.velocity = DVec2::new(3.0, 4.0);
    for _ in 0..10 {
        coarse.integrate(NEUTRAL, &map, &tuning, 0.1, t0);
    }

    // both should land on the closed form v0 * (1 - drag)^t after 1s
    let expected = DVec2::new(3.0, 4.0) * (1.0 - tuning.drag).powf(1.0);
    assert!(fine.velocity.abs_diff_eq(expected, 1e-9));
    assert!(coarse.velocity.abs_diff_eq(expected, 1e-9));
}

#[test]
fn first_tick_of_thrust_matches_the_closed_form() {
    let map = open_map(10);
    let tuning = ShipTuning::default();
    let mut ship = ship_at(1.5, 1.5);

    ship.integrate(SteerIntent::Forward.vector(), &map, &tuning, 0.01, Instant::now());

    // from rest: v1 = dt * thrust along the heading, pos1 = pos0 + dt * v1
    let v1 = 0.01 * tuning.thrust;
    assert!(ship.velocity.abs_diff_eq(DVec2::new(0.0, v1), 1e-12));
    assert!(ship
        .position
        .abs_diff_eq(DVec2::new(1.5, 1.5 + 0.01 * v1), 1e-12));
}

#[test]
fn forward_thrust_keeps_the_initial_heading() {
    // the ten-by-ten scenario: open map, checkpoint ring on cell (5, 5),
    // ship starting at (1.5, 1.5) facing along +y
    let mut rows = vec![" ".repeat(10); 10];
    rows[5].replace_range(5..6, "a");
    let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
    let map = map_from(&rows);
    let tuning = ShipTuning::default();
    let mut ship = ship_at(1.5, 1.5);

    let mut previous_y = ship.position.y;
    for _ in 0..500 {
        ship.integrate(SteerIntent::Forward.vector(), &map, &tuning, 0.01, Instant::now());
        assert!(ship.position.y > previous_y, "ship must keep moving forward");
        previous_y = ship.position.y;
    }
    assert!((ship.position.x - 1.5).abs() < 1e-12);
    assert_eq!(ship.orientation, 0.0);
    // never wandered into the ring, so no checkpoint progress
    assert_eq!(ship.last_checkpoint, None);
}

#[test]
fn checkpoints_only_advance_in_sequence() {
    let map = map_from(&["abc  "]);
    let tuning = ShipTuning::default();
    let t0 = Instant::now();
    let at = |ms: u64| t0 + Duration::from_millis(ms);

    let mut ship = ship_at(2.5, 0.5); // inside checkpoint 2
    ship.integrate(NEUTRAL, &map, &tuning, 0.01, at(0));
    assert_eq!(ship.last_checkpoint, None, "expecting 0 first, 2 is ignored");
    assert_eq!(ship.lap_start, None);

    // checkpoint 0 is reachable from the initial state: (-1 + 1) mod K = 0
    ship.position = DVec2::new(0.5, 0.5);
    let event = ship.integrate(NEUTRAL, &map, &tuning, 0.01, at(100));
    assert_eq!(ship.last_checkpoint, Some(0));
    assert_eq!(ship.lap_start, Some(at(100)));
    assert!(event.is_none(), "the first crossing only starts the timer");

    ship.position = DVec2::new(1.5, 0.5);
    ship.integrate(NEUTRAL, &map, &tuning, 0.01, at(200));
    assert_eq!(ship.last_checkpoint, Some(1));

    // trying to skip from 1 straight back to 0 must fail
    ship.position = DVec2::new(0.5, 0.5);
    ship.integrate(NEUTRAL, &map, &tuning, 0.01, at(300));
    assert_eq!(ship.last_checkpoint, Some(1));

    ship.position = DVec2::new(2.5, 0.5);
    ship.integrate(NEUTRAL, &map, &tuning, 0.01, at(400));
    assert_eq!(ship.last_checkpoint, Some(2));

    // completing the ring closes the lap with the time since the start line
    ship.position = DVec2::new(0.5, 0.5);
    let event = ship.integrate(NEUTRAL, &map, &tuning, 0.01, at(500));
    assert_eq!(ship.last_checkpoint, Some(0));
    let event = event.expect("full ring should complete a lap");
    assert_eq!(event.duration, Duration::from_millis(400));
    assert_eq!(ship.lap_start, Some(at(500)));
}

#[test]
fn sitting_on_the_finish_line_does_not_refire() {
    let map = map_from(&["ab"]);
    let tuning = ShipTuning::default();
    let t0 = Instant::now();
    let at = |ms: u64| t0 + Duration::from_millis(ms);

    let mut ship = ship_at(0.5, 0.5);
    let event = ship.integrate(NEUTRAL, &map, &tuning, 0.01, at(0));
    assert!(event.is_none());
    assert_eq!(ship.lap_start, Some(at(0)));

    // still in checkpoint 0's cell on the next ticks; the advance rule
    // wants checkpoint 1 now, so nothing fires and the timer keeps running
    for ms in [10, 20, 30] {
        let event = ship.integrate(NEUTRAL, &map, &tuning, 0.01, at(ms));
        assert!(event.is_none());
        assert_eq!(ship.last_checkpoint, Some(0));
        assert_eq!(ship.lap_start, Some(at(0)));
    }
}

#[test]
fn open_space_probes_are_clear_on_both_axes() {
    let map = open_map(3);
    let center = DVec2::new(1.5, 1.5);
    assert_eq!(probe_x(&map, center, 0.25), AxisContact::Clear);
    assert_eq!(probe_y(&map, center, 0.25), AxisContact::Clear);
}

#[test]
fn wall_on_one_side_zeroes_and_reverses_that_axis_only() {
    let map = map_from(&["   ", "  #", "   "]);
    let tuning = ShipTuning {
        radius: 0.5,
        ..ShipTuning::default()
    };
    let mut ship = ship_at(1.6, 1.5);
    ship.velocity = DVec2::new(3.0, 2.0);

    ship.integrate(NEUTRAL, &map, &tuning, 0.01, Instant::now());

    // x ran into the wall on the positive side: velocity replaced by the
    // bounce impulse pointing back out
    assert!((ship.velocity.x + tuning.bounce).abs() < 1e-12);
    // y only saw drag
    let expected_vy = 2.0 * (1.0 - tuning.drag).powf(0.01);
    assert!((ship.velocity.y - expected_vy).abs() < 1e-12);
}

#[test]
fn wall_on_the_negative_side_bounces_positive() {
    let map = map_from(&["   ", "#  ", "   "]);
    let mut ship = ship_at(1.4, 1.5);
    ship.velocity = DVec2::new(-3.0, 0.0);
    let tuning = ShipTuning {
        radius: 0.5,
        ..ShipTuning::default()
    };

    ship.integrate(NEUTRAL, &map, &tuning, 0.01, Instant::now());
    assert!((ship.velocity.x - tuning.bounce).abs() < 1e-12);
}

#[test]
fn walls_on_both_sides_cancel_out() {
    let map = map_from(&["   ", "# #", "   "]);
    assert_eq!(
        probe_x(&map, DVec2::new(1.5, 1.5), 0.6),
        AxisContact::Clear
    );

    let tuning = ShipTuning {
        radius: 0.6,
        ..ShipTuning::default()
    };
    let mut ship = ship_at(1.5, 1.5);
    ship.velocity = DVec2::new(1.0, 0.0);
    ship.integrate(NEUTRAL, &map, &tuning, 0.01, Instant::now());

    // pinned, not bounced: x kept its (dragged) velocity
    let expected_vx = 1.0 * (1.0 - tuning.drag).powf(0.01);
    assert!((ship.velocity.x - expected_vx).abs() < 1e-12);
}

#[test]
fn turning_input_spins_and_wraps_without_going_negative() {
    let map = open_map(10);
    let tuning = ShipTuning::default();
    let mut ship = ship_at(5.0, 5.0);

    ship.integrate(SteerIntent::Left.vector(), &map, &tuning, 0.01, Instant::now());

    // one tick of left: angular velocity goes counter-clockwise and the
    // wrapped orientation stays inside [0, 2pi)
    let expected_spin = -0.01 * tuning.angular_thrust;
    assert!((ship.angular_velocity - expected_spin).abs() < 1e-12);
    assert!(ship.orientation >= 0.0 && ship.orientation < std::f64::consts::TAU);
    // just below the wrap point, not negative
    let expected_orientation = (0.01 * expected_spin).rem_euclid(std::f64::consts::TAU);
    assert!((ship.orientation - expected_orientation).abs() < 1e-12);

    // turning alone still produces half forward thrust
    let speed = ship.velocity.length();
    assert!((speed - 0.01 * tuning.thrust * 0.5).abs() < 1e-9);
}
