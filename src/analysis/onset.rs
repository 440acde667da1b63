//! Offline onset detection via spectral flux.
//!
//! The waveform is cut into overlapping Hann-windowed frames, each frame is
//! transformed with a forward FFT, and the half-wave rectified magnitude
//! difference against the previous frame gives one flux value per frame.
//! Peaks of the flux curve that rise above a local moving average become
//! onsets.

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("window size {0} is not a power of two")]
    InvalidWindowSize(usize),
    #[error("hop size {hop} must be in 1..={window}")]
    InvalidHopSize { hop: usize, window: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnsetConfig {
    pub window_size: usize,
    pub hop_size: usize,
    /// Frames on each side used for the moving average (and skipped at the edges).
    pub average_radius: usize,
    /// Multiplier applied to the local average (`C`).
    pub sensitivity: f32,
    /// Constant added to the scaled average (`delta`).
    pub threshold_delta: f32,
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            hop_size: 512,
            average_radius: 7,
            sensitivity: 1.5,
            threshold_delta: 0.0,
        }
    }
}

/// Spectral-flux onset detector with a pre-planned FFT.
pub struct OnsetDetector {
    config: OnsetConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
}

impl OnsetDetector {
    /// Plans the FFT for `config`. Bad window/hop sizes are rejected here,
    /// never during detection.
    pub fn new(config: OnsetConfig) -> Result<Self, AnalysisError> {
        let n = config.window_size;
        if n < 2 || !n.is_power_of_two() {
            return Err(AnalysisError::InvalidWindowSize(n));
        }
        if config.hop_size == 0 || config.hop_size > n {
            return Err(AnalysisError::InvalidHopSize {
                hop: config.hop_size,
                window: n,
            });
        }

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n);

        Ok(Self {
            config,
            fft,
            window: hann_window(n),
        })
    }

    pub fn config(&self) -> &OnsetConfig {
        &self.config
    }

    /// Detects onsets in interleaved `samples` with `channels` channels.
    /// Returns strictly increasing onset times in seconds.
    pub fn detect(&self, samples: &[f32], channels: usize, sample_rate: u32) -> Vec<f64> {
        if sample_rate == 0 {
            return Vec::new();
        }
        let mono = downmix(samples, channels);
        let flux = self.spectral_flux(&mono);
        let seconds_per_frame = self.config.hop_size as f64 / sample_rate as f64;

        let onsets: Vec<f64> = pick_peaks(
            &flux,
            self.config.average_radius,
            self.config.sensitivity,
            self.config.threshold_delta,
        )
        .into_iter()
        .map(|frame| frame as f64 * seconds_per_frame)
        .collect();

        log::debug!(
            "ONSET: {} frames, {} onsets ({:.1}s of audio)",
            flux.len(),
            onsets.len(),
            mono.len() as f64 / sample_rate as f64
        );
        onsets
    }

    /// One flux value per full frame; empty when the input is shorter than a window.
    pub fn spectral_flux(&self, mono: &[f32]) -> Vec<f32> {
        let n = self.config.window_size;
        let hop = self.config.hop_size;
        if mono.len() < n {
            return Vec::new();
        }

        let frames = (mono.len() - n) / hop + 1;
        let bins = n / 2;
        let mut buffer = vec![Complex32::new(0.0, 0.0); n];
        let mut previous = vec![0.0f32; bins];
        let mut flux = Vec::with_capacity(frames);

        for frame in 0..frames {
            let start = frame * hop;
            for (slot, (&sample, &w)) in buffer
                .iter_mut()
                .zip(mono[start..start + n].iter().zip(&self.window))
            {
                *slot = Complex32::new(sample * w, 0.0);
            }

            self.fft.process(&mut buffer);

            let mut sum = 0.0f32;
            for (prev, bin) in previous.iter_mut().zip(&buffer[..bins]) {
                let magnitude = bin.norm();
                sum += (magnitude - *prev).max(0.0);
                *prev = magnitude;
            }
            flux.push(sum);
        }

        flux
    }
}

/// Detects onsets in a mono waveform with the default window and hop.
pub fn detect_onsets(
    samples: &[f32],
    sample_rate: u32,
    sensitivity_c: f32,
    threshold_delta: f32,
) -> Vec<f64> {
    let config = OnsetConfig {
        sensitivity: sensitivity_c,
        threshold_delta,
        ..OnsetConfig::default()
    };
    match OnsetDetector::new(config) {
        Ok(detector) => detector.detect(samples, 1, sample_rate),
        Err(e) => {
            log::error!("ONSET: {}", e);
            Vec::new()
        }
    }
}

/// Symmetric Hann window: w[j] = 0.5 * (1 - cos(2πj/(N-1)))
pub fn hann_window(n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denom = (n - 1) as f32;
            (0..n)
                .map(|j| 0.5 * (1.0 - (std::f32::consts::TAU * j as f32 / denom).cos()))
                .collect()
        }
    }
}

/// Averages interleaved channels into one.
pub fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Frame indices whose flux beats `avg * sensitivity + delta` and both neighbours.
pub fn pick_peaks(flux: &[f32], radius: usize, sensitivity: f32, delta: f32) -> Vec<usize> {
    let radius = radius.max(1);
    if flux.len() <= radius * 2 {
        return Vec::new();
    }

    let mut peaks = Vec::new();
    for i in radius..flux.len() - radius {
        let local = &flux[i - radius..=i + radius];
        let avg = local.iter().sum::<f32>() / local.len() as f32;
        let value = flux[i];
        if value > avg * sensitivity + delta && value > flux[i - 1] && value > flux[i + 1] {
            peaks.push(i);
        }
    }
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: u32 = 44_100;

    /// Silence with short noise-like bursts at the given times.
    fn clicks(times: &[f64], seconds: f64) -> Vec<f32> {
        let mut samples = vec![0.0f32; (seconds * SAMPLE_RATE as f64) as usize];
        for &t in times {
            let start = (t * SAMPLE_RATE as f64) as usize;
            for k in 0..2048 {
                if let Some(s) = samples.get_mut(start + k) {
                    let decay = 1.0 - k as f32 / 2048.0;
                    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                    *s = sign * decay * ((k % 7) as f32 / 7.0 + 0.3);
                }
            }
        }
        samples
    }

    #[test]
    fn test_rejects_non_power_of_two_window() {
        let config = OnsetConfig {
            window_size: 1000,
            ..OnsetConfig::default()
        };
        assert_eq!(
            OnsetDetector::new(config).err(),
            Some(AnalysisError::InvalidWindowSize(1000))
        );

        let config = OnsetConfig {
            hop_size: 0,
            ..OnsetConfig::default()
        };
        assert!(matches!(
            OnsetDetector::new(config),
            Err(AnalysisError::InvalidHopSize { .. })
        ));
    }

    #[test]
    fn test_short_input_yields_nothing() {
        assert!(detect_onsets(&[], SAMPLE_RATE, 1.5, 0.0).is_empty());
        assert!(detect_onsets(&[0.5; 500], SAMPLE_RATE, 1.5, 0.0).is_empty());
        assert!(detect_onsets(&[0.5; 5000], 0, 1.5, 0.0).is_empty());
    }

    #[test]
    fn test_hann_window_endpoints() {
        let w = hann_window(1024);
        assert!(w[0].abs() < 1e-6);
        assert!(w[1023].abs() < 1e-6);
        assert!(w[511] > 0.99);
    }

    #[test]
    fn test_downmix_averages_channels() {
        assert_eq!(downmix(&[1.0, 0.0, 0.5, 0.5], 2), vec![0.5, 0.5]);
        assert_eq!(downmix(&[0.25, 0.75], 1), vec![0.25, 0.75]);
    }

    #[test]
    fn test_pick_peaks_requires_strict_local_maximum() {
        let mut flux = vec![0.0f32; 30];
        flux[15] = 10.0;
        flux[20] = 5.0;
        flux[21] = 5.0; // plateau, not strict
        assert_eq!(pick_peaks(&flux, 7, 1.5, 0.0), vec![15]);
        // Peaks inside the margin are ignored.
        flux[3] = 50.0;
        assert_eq!(pick_peaks(&flux, 7, 1.5, 0.0), vec![15]);
    }

    #[test]
    fn test_detects_clicks_near_their_times() {
        let times = [1.0, 2.0, 3.0];
        let samples = clicks(&times, 4.5);
        let onsets = detect_onsets(&samples, SAMPLE_RATE, 1.5, 0.01);

        for t in times {
            assert!(
                onsets.iter().any(|o| (o - t).abs() < 0.05),
                "no onset near {t}: {onsets:?}"
            );
        }
        assert!(onsets.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_detection_is_deterministic() {
        let samples = clicks(&[0.5, 1.25, 2.0], 3.0);
        let detector = OnsetDetector::new(OnsetConfig::default()).unwrap();
        let first = detector.detect(&samples, 1, SAMPLE_RATE);
        let second = detector.detect(&samples, 1, SAMPLE_RATE);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_stereo_matches_mono() {
        let mono = clicks(&[1.0], 2.0);
        let stereo: Vec<f32> = mono.iter().flat_map(|&s| [s, s]).collect();
        let detector = OnsetDetector::new(OnsetConfig::default()).unwrap();
        assert_eq!(
            detector.detect(&mono, 1, SAMPLE_RATE),
            detector.detect(&stereo, 2, SAMPLE_RATE)
        );
    }
}
