use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use skiff_core::lap::{BestLapStore, StoreError};

#[derive(Serialize, Deserialize)]
struct BestLapFile {
    best_lap_ms: f64,
}

/// Best-lap persistence in a small json file next to the game. A missing
/// file just means nobody has set a time yet.
pub struct FileBestLapStore {
    path: PathBuf,
}

impl FileBestLapStore {
    pub fn new(path: impl Into<PathBuf>) -> FileBestLapStore {
        FileBestLapStore { path: path.into() }
    }
}

impl BestLapStore for FileBestLapStore {
    fn load(&mut self) -> Result<Option<Duration>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::new(format!(
                    "read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };
        let file: BestLapFile = serde_json::from_str(&contents)
            .map_err(|e| StoreError::new(format!("parse {}: {}", self.path.display(), e)))?;
        Ok(Some(Duration::from_secs_f64(file.best_lap_ms / 1000.0)))
    }

    fn save(&mut self, best: Duration) -> Result<(), StoreError> {
        let file = BestLapFile {
            best_lap_ms: best.as_secs_f64() * 1000.0,
        };
        let contents = serde_json::to_string(&file)
            .map_err(|e| StoreError::new(format!("encode best lap: {}", e)))?;
        fs::write(&self.path, contents)
            .map_err(|e| StoreError::new(format!("write {}: {}", self.path.display(), e)))
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::new(format!(
                "remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
