use std::fmt;
use std::time::Duration;

use tracing::warn;

/// Emitted by the simulation, at most once per tick, when the ship crosses
/// the finish line with a running lap timer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LapEvent {
    pub duration: Duration,
}

#[derive(Debug)]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> StoreError {
        StoreError {
            message: message.into(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StoreError {}

/// Key/value persistence for the best lap. Failures here are never allowed
/// to take down the simulation tick.
pub trait BestLapStore {
    fn load(&mut self) -> Result<Option<Duration>, StoreError>;
    fn save(&mut self, best: Duration) -> Result<(), StoreError>;
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Store that persists nothing; best laps last until the race is dropped.
pub struct NullBestLapStore;

impl BestLapStore for NullBestLapStore {
    fn load(&mut self) -> Result<Option<Duration>, StoreError> {
        Ok(None)
    }

    fn save(&mut self, _best: Duration) -> Result<(), StoreError> {
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Tracks last and best lap times from the simulation's lap events and asks
/// the store to persist improvements.
pub struct LapTracker {
    last_lap: Option<Duration>,
    best_lap: Option<Duration>,
    store: Box<dyn BestLapStore>,
}

impl LapTracker {
    pub fn new(mut store: Box<dyn BestLapStore>) -> LapTracker {
        let best_lap = match store.load() {
            Ok(best) => best,
            Err(e) => {
                warn!("could not read persisted best lap: {}", e);
                None
            }
        };
        LapTracker {
            last_lap: None,
            best_lap,
            store,
        }
    }

    pub fn record(&mut self, event: LapEvent) {
        self.last_lap = Some(event.duration);
        let improved = self.best_lap.map_or(true, |best| event.duration < best);
        if improved {
            self.best_lap = Some(event.duration);
            if let Err(e) = self.store.save(event.duration) {
                warn!("could not persist best lap: {}", e);
            }
        }
    }

    /// Forget the best lap; the last lap and any running lap are untouched.
    pub fn reset_best(&mut self) {
        self.best_lap = None;
        if let Err(e) = self.store.clear() {
            warn!("could not clear persisted best lap: {}", e);
        }
    }

    pub fn last_lap(&self) -> Option<Duration> {
        self.last_lap
    }

    pub fn best_lap(&self) -> Option<Duration> {
        self.best_lap
    }
}
