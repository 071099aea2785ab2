// src/lib.rs
// Power Quality Analyzer Library - Public API

//! # Power Quality Analyzer
//!
//! A Rust library for deriving power-quality quantities and a one-cycle
//! harmonic spectrum from synchronized voltage/current waveform recordings.
//!
//! ## Features
//!
//! - Read decimal-comma text recordings (one channel per line)
//! - Validate voltage/current matrices into an immutable dataset
//! - Per-channel RMS, active, apparent and reactive power
//! - FFT half-spectrum of one fundamental cycle
//! - Idempotent spectrum artifact export (tab-separated text)
//!
//! ## Example
//!
//! ```no_run
//! use pq_analyzer::{
//!     analyze_spectrum, compute_quantities, default_spectrum_path,
//!     persist_spectrum, read_matrix, AnalysisConfig, WaveformDataset,
//! };
//!
//! let config = AnalysisConfig::default();
//! let voltage = read_matrix("ub.txt").expect("Failed to read voltage file");
//! let current = read_matrix("ib.txt").expect("Failed to read current file");
//!
//! let dataset = WaveformDataset::new(voltage, current, config.sampling_rate_hz)
//!     .expect("Failed to build dataset");
//!
//! for (channel, q) in compute_quantities(&dataset).iter().enumerate() {
//!     println!("channel {}: P = {} W, S = {} VA", channel, q.active_power, q.apparent_power);
//! }
//!
//! let record = analyze_spectrum(&dataset, config.spectrum_channel, config.fundamental_hz)
//!     .expect("Failed to analyze spectrum");
//! persist_spectrum(&record, default_spectrum_path("ub.txt"))
//!     .expect("Failed to persist spectrum");
//! ```

mod config;
mod quantities;
mod spectrum;
mod waveform;

pub use config::AnalysisConfig;
pub use quantities::{compute_quantities, instantaneous_power, reactive_power, ChannelQuantities};
pub use spectrum::{
    analyze_spectrum, default_spectrum_path, persist_spectrum, PersistOutcome, SpectrumRecord,
};
pub use waveform::{read_matrix, PqError, Result, WaveformDataset};
