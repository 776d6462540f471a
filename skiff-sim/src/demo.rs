use std::path::Path;

use rand::Rng;
use tracing::info;

use skiff_core::audio::{SpectrumBuffer, SpectrumFormat, SpectrumSource};
use skiff_core::controls::NullControls;
use skiff_core::lap::LapTracker;
use skiff_core::Settings;

use crate::map::{MapError, OccupancyMap, PixelBuffer};
use crate::race::Race;
use crate::store::FileBestLapStore;

// Bundled oval: outer wall, inner island, finish line 'a' across the bottom
// straight with checkpoints 'b' and 'c' around the ring, one start slot
// heading right.
const TRACK: [&str; 14] = [
    "########################",
    "#           c          #",
    "#           c          #",
    "#           c          #",
    "#    ##############    #",
    "#    ##############    #",
    "#    ##############    #",
    "#    ##############bbbb#",
    "#    ##############    #",
    "#    ##############    #",
    "#           a          #",
    "#     >     a          #",
    "#           a          #",
    "########################",
];

/// Fake whistler: holds a forward tone, with periodic left chirps to pull
/// the ship around the oval, over a jittered noise floor.
struct SyntheticWhistle {
    format: SpectrumFormat,
    bins: Vec<f32>,
    tick: u64,
}

impl SyntheticWhistle {
    fn new(format: SpectrumFormat) -> SyntheticWhistle {
        SyntheticWhistle {
            format,
            bins: vec![0.0; format.half_size()],
            tick: 0,
        }
    }

    // 2.2s of forward tone, then 0.8s of low (left) tone, on repeat
    fn tone(&self) -> f64 {
        const CYCLE: u64 = 300;
        if self.tick % CYCLE < 220 {
            600.0
        } else {
            420.0
        }
    }
}

impl SpectrumSource for SyntheticWhistle {
    fn sample_into(&mut self, buf: &mut SpectrumBuffer) -> bool {
        self.tick += 1;
        let mut rng = rand::thread_rng();
        for bin in self.bins.iter_mut() {
            *bin = rng.gen_range(-95.0..-85.0);
        }
        let peak = (self.tone() / self.format.bin_width()).floor() as usize;
        if let Some(bin) = self.bins.get_mut(peak) {
            *bin = -30.0;
        }
        buf.write(&self.bins);
        true
    }
}

const MAP_PATH: &str = "maps/simple.png";

pub fn run(settings: &Settings) -> Result<(), MapError> {
    let map = match PixelBuffer::load_png(Path::new(MAP_PATH)) {
        Ok(img) => {
            info!("loaded track from {}", MAP_PATH);
            OccupancyMap::decode(&img)?
        }
        Err(_) => OccupancyMap::decode(&PixelBuffer::from_template(&TRACK))?,
    };
    info!(
        "demo track loaded: {}x{} cells, {} start slots, {} checkpoints",
        map.width,
        map.height,
        map.start.len(),
        map.checkpoint_count()
    );

    let tracker = LapTracker::new(Box::new(FileBestLapStore::new("best-lap.json")));
    if let Some(best) = tracker.best_lap() {
        info!("best lap on record: {:.1}s", best.as_secs_f64());
    }

    let whistle = SyntheticWhistle::new(settings.spectrum_format());
    let mut race = Race::new(
        map,
        0,
        settings,
        Box::new(whistle),
        Box::new(NullControls),
        tracker,
    )?;

    // half a minute of simulated whistling at the configured tick rate
    let ticks = (30.0 / settings.dt) as u64;
    let mut frame = 0u64;
    race.run(Some(ticks), |pose, _tracker| {
        frame += 1;
        if frame % 100 == 0 {
            info!(
                "ship at ({:.1}, {:.1}) heading {:.2} rad",
                pose.position.x, pose.position.y, pose.orientation
            );
        }
    });

    match (race.tracker().last_lap(), race.tracker().best_lap()) {
        (Some(last), Some(best)) => info!(
            "done; last lap {:.1}s, best {:.1}s",
            last.as_secs_f64(),
            best.as_secs_f64()
        ),
        _ => info!("done; no complete lap this run"),
    }
    Ok(())
}
