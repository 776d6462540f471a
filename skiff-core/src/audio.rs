use serde::{Deserialize, Serialize};

use crate::controls::SteerIntent;
use crate::ClassifierConfig;

/// Shape of the spectrum the audio collaborator produces: one log-magnitude
/// sample per bin, bin width = sample_rate / (2 * fft_size).
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
pub struct SpectrumFormat {
    pub sample_rate: f64,
    pub fft_size: usize,
}

impl SpectrumFormat {
    pub fn bin_width(&self) -> f64 {
        self.sample_rate / (2.0 * self.fft_size as f64)
    }

    pub fn half_size(&self) -> usize {
        self.fft_size / 2
    }
}

/// Latest magnitude spectrum handed over by the audio collaborator. Bins
/// start at -inf so silence classifies as no intent before the first
/// sample arrives.
pub struct SpectrumBuffer {
    format: SpectrumFormat,
    bins: Vec<f32>,
}

impl SpectrumBuffer {
    pub fn new(format: SpectrumFormat) -> SpectrumBuffer {
        SpectrumBuffer {
            format,
            bins: vec![f32::NEG_INFINITY; format.half_size()],
        }
    }

    pub fn format(&self) -> SpectrumFormat {
        self.format
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }

    pub fn write(&mut self, samples: &[f32]) {
        let n = samples.len().min(self.bins.len());
        self.bins[..n].copy_from_slice(&samples[..n]);
    }
}

/// Non-blocking "latest sample" read from the audio collaborator. Returns
/// false when nothing fresh was available this tick; the buffer then keeps
/// its previous contents and the classifier works from those.
pub trait SpectrumSource {
    fn sample_into(&mut self, buf: &mut SpectrumBuffer) -> bool;
}

/// Turns the loudest bin inside the configured band into a steering intent:
/// the band splits into three equal thirds, low pitch steers left, middle
/// accelerates, high steers right.
pub struct ControlClassifier {
    idx_min: usize,
    idx_max: usize,
    amplitude_threshold: f32,
}

impl ControlClassifier {
    pub fn new(format: SpectrumFormat, config: &ClassifierConfig) -> ControlClassifier {
        let bin_width = format.bin_width();
        ControlClassifier {
            idx_min: (config.freq_min / bin_width).floor() as usize,
            idx_max: (config.freq_max / bin_width).ceil() as usize + 1,
            amplitude_threshold: config.amplitude_threshold,
        }
    }

    /// Bin index range the classifier listens to, for the scope overlay.
    pub fn band_range(&self) -> (usize, usize) {
        (self.idx_min, self.idx_max)
    }

    pub fn amplitude_threshold(&self) -> f32 {
        self.amplitude_threshold
    }

    pub fn classify(&self, spectrum: &SpectrumBuffer) -> SteerIntent {
        let bins = spectrum.bins();
        let hi = self.idx_max.min(bins.len());
        if self.idx_min >= hi {
            return SteerIntent::Neutral;
        }

        let mut best_idx = self.idx_min;
        let mut best_value = f32::NEG_INFINITY;
        for i in self.idx_min..hi {
            if bins[i] > best_value {
                best_value = bins[i];
                best_idx = i;
            }
        }
        if best_value <= self.amplitude_threshold {
            return SteerIntent::Neutral;
        }

        // a single-bin band has no thirds to split; read it as forward
        let span = self.idx_max - 1 - self.idx_min;
        if span == 0 {
            return SteerIntent::Forward;
        }

        // the topmost bin lands exactly on 3; clamp it into the high third
        let third = (3 * (best_idx - self.idx_min) / span).min(2);
        match third {
            0 => SteerIntent::Left,
            1 => SteerIntent::Forward,
            _ => SteerIntent::Right,
        }
    }
}
