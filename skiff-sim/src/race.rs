use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use skiff_core::audio::{ControlClassifier, SpectrumBuffer, SpectrumSource};
use skiff_core::controls::ControlSource;
use skiff_core::lap::LapTracker;
use skiff_core::pose::ShipPose;
use skiff_core::{PlayerSlot, Settings, ShipTuning};

use crate::map::{MapError, OccupancyMap};
use crate::physics::Ship;

/// One running race: the map, the ship, the control pipeline and the lap
/// tracker, advanced in lockstep by `tick`. The ship is owned and mutated
/// here and nowhere else; renderers only ever see the returned pose.
pub struct Race {
    map: OccupancyMap,
    ship: Ship,
    spectrum: SpectrumBuffer,
    classifier: ControlClassifier,
    audio: Box<dyn SpectrumSource>,
    keys: Box<dyn ControlSource>,
    tracker: LapTracker,
    tuning: ShipTuning,
    dt: f64,
}

impl Race {
    pub fn new(
        map: OccupancyMap,
        slot: PlayerSlot,
        settings: &Settings,
        audio: Box<dyn SpectrumSource>,
        keys: Box<dyn ControlSource>,
        tracker: LapTracker,
    ) -> Result<Race, MapError> {
        let pose = map
            .start
            .get(slot)
            .copied()
            .ok_or(MapError::UnknownStartSlot(slot))?;
        let format = settings.spectrum_format();
        Ok(Race {
            ship: Ship::new(&pose),
            spectrum: SpectrumBuffer::new(format),
            classifier: ControlClassifier::new(format, &settings.classifier()),
            map,
            audio,
            keys,
            tracker,
            tuning: settings.ship_tuning(),
            dt: settings.dt,
        })
    }

    /// One fixed tick: refresh the spectrum, classify, merge with the
    /// keyboard, integrate, track laps, snapshot for the renderer.
    pub fn tick(&mut self, now: Instant) -> ShipPose {
        // a stale spectrum is fine; the classifier reuses the last sample
        let _ = self.audio.sample_into(&mut self.spectrum);
        let intent = self.classifier.classify(&self.spectrum);
        let control = intent.vector().or(self.keys.poll());

        if let Some(lap) = self
            .ship
            .integrate(control, &self.map, &self.tuning, self.dt, now)
        {
            info!("lap complete in {:.1}s", lap.duration.as_secs_f64());
            self.tracker.record(lap);
        }
        self.ship.pose()
    }

    /// Abandon the current attempt and put a fresh ship on the chosen start
    /// slot. Lap history (and the persisted best) carries over.
    pub fn restart(&mut self, slot: PlayerSlot) -> Result<(), MapError> {
        let pose = self
            .map
            .start
            .get(slot)
            .copied()
            .ok_or(MapError::UnknownStartSlot(slot))?;
        self.ship = Ship::new(&pose);
        Ok(())
    }

    pub fn map(&self) -> &OccupancyMap {
        &self.map
    }

    pub fn tracker(&self) -> &LapTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut LapTracker {
        &mut self.tracker
    }

    /// Spectrum and band bounds for the scope overlay.
    pub fn spectrum(&self) -> &SpectrumBuffer {
        &self.spectrum
    }

    pub fn classifier(&self) -> &ControlClassifier {
        &self.classifier
    }

    // WARNING: with `ticks` unset this function never returns
    pub fn run(&mut self, ticks: Option<u64>, mut on_frame: impl FnMut(&ShipPose, &LapTracker)) {
        let tick_budget = Duration::from_secs_f64(self.dt);
        let mut remaining = ticks;
        loop {
            if let Some(count) = remaining.as_mut() {
                if *count == 0 {
                    break;
                }
                *count -= 1;
            }

            let start_time = Instant::now();
            let pose = self.tick(start_time);
            on_frame(&pose, &self.tracker);

            // wait out the rest of the tick; skip the sleep if we ran long
            if let Some(rest) = tick_budget.checked_sub(start_time.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}
