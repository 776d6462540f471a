use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::audio::SpectrumFormat;

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub dt: f64,
    pub ship_radius: f64,
    pub ship_bounce: f64,
    pub ship_thrust: f64,
    pub ship_drag: f64,
    pub ship_angular_thrust: f64,
    pub ship_angular_drag: f64,
    pub freq_mid: f64,
    pub freq_half_range: f64,
    pub amplitude_threshold: f64,
    pub sample_rate: f64,
    pub fft_size: usize,
}

impl Settings {
    pub fn load() -> Result<Settings, ConfigError> {
        let config = Config::builder()
            .set_default("dt", 0.01)?
            .set_default("ship_radius", 0.25)?
            .set_default("ship_bounce", 2.0)?
            .set_default("ship_thrust", 4.0)?
            .set_default("ship_drag", 0.6)?
            .set_default("ship_angular_thrust", 8.0)?
            .set_default("ship_angular_drag", 0.98)?
            .set_default("freq_mid", 600.0)?
            .set_default("freq_half_range", 200.0)?
            .set_default("amplitude_threshold", -60.0)?
            .set_default("sample_rate", 48000.0)?
            .set_default("fft_size", 4096_i64)?
            .add_source(File::with_name("skiff.yaml").required(false))
            .build()?;

        config.try_deserialize()
    }

    pub fn ship_tuning(&self) -> ShipTuning {
        ShipTuning {
            radius: self.ship_radius,
            bounce: self.ship_bounce,
            thrust: self.ship_thrust,
            drag: self.ship_drag,
            angular_thrust: self.ship_angular_thrust,
            angular_drag: self.ship_angular_drag,
        }
    }

    pub fn classifier(&self) -> ClassifierConfig {
        ClassifierConfig {
            freq_min: self.freq_mid - self.freq_half_range,
            freq_max: self.freq_mid + self.freq_half_range,
            amplitude_threshold: self.amplitude_threshold as f32,
        }
    }

    pub fn spectrum_format(&self) -> SpectrumFormat {
        SpectrumFormat {
            sample_rate: self.sample_rate,
            fft_size: self.fft_size,
        }
    }
}

// The tunables are handed to the simulation and the classifier as explicit
// structs; nothing in the core reads settings ambiently.

#[derive(Clone, Copy, Debug)]
pub struct ShipTuning {
    pub radius: f64,
    pub bounce: f64,
    pub thrust: f64,
    pub drag: f64,
    pub angular_thrust: f64,
    pub angular_drag: f64,
}

impl Default for ShipTuning {
    fn default() -> Self {
        ShipTuning {
            radius: 0.25,
            bounce: 2.0,
            thrust: 4.0,
            drag: 0.6,
            angular_thrust: 8.0,
            angular_drag: 0.98,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ClassifierConfig {
    pub freq_min: f64,
    pub freq_max: f64,
    pub amplitude_threshold: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            freq_min: 400.0,
            freq_max: 800.0,
            amplitude_threshold: -60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;

    #[test]
    fn defaults_match_the_shipped_tuning() {
        let settings = Settings::load().expect("defaults alone should always build");

        assert_eq!(settings.dt, 0.01);
        assert_eq!(settings.ship_radius, 0.25);
        assert_eq!(settings.fft_size, 4096);

        let classifier = settings.classifier();
        assert_eq!(classifier.freq_min, 400.0);
        assert_eq!(classifier.freq_max, 800.0);
        assert_eq!(classifier.amplitude_threshold, -60.0);
    }
}
