pub mod audio;
pub mod controls;
pub mod lap;
pub mod pose;
mod settings;

pub use settings::{ClassifierConfig, Settings, ShipTuning};

pub type PlayerSlot = usize;
