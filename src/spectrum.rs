// Harmonic spectrum module
// One-fundamental-cycle FFT of a single channel, plus the TSV artifact store.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use num_complex::Complex;
use rustfft::FftPlanner;

use crate::waveform::{PqError, Result, WaveformDataset};

/// Half-spectrum of one fundamental cycle of a single channel.
///
/// `frequencies`, `voltage_magnitude` and `current_magnitude` are aligned
/// index-for-index and share length `cycle_length / 2`. Magnitudes are raw
/// `|X[k]|` values without 1/N normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumRecord {
    pub fundamental_hz: f64,
    pub cycle_length: usize,
    pub frequencies: Vec<f64>,
    pub voltage_magnitude: Vec<f64>,
    pub current_magnitude: Vec<f64>,
}

/// Outcome of persisting a spectrum artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The artifact was created at this path.
    Written(PathBuf),
    /// A file already existed at this path; it was left untouched.
    AlreadyExists(PathBuf),
}

/// Compute the magnitude spectrum of the first fundamental cycle of one
/// channel's voltage and current.
///
/// The window is `floor(sampling_rate / fundamental)` samples long and
/// rectangular; the recording is assumed to start on the fundamental's
/// period, so an exact-integer-cycle window keeps leakage out of the
/// harmonic bins. Bins at and above Nyquist are discarded as redundant
/// images of the retained half.
pub fn analyze_spectrum(
    dataset: &WaveformDataset,
    channel: usize,
    fundamental_hz: f64,
) -> Result<SpectrumRecord> {
    if !(fundamental_hz > 0.0) {
        return Err(PqError::InvalidFundamental(fundamental_hz));
    }

    let fs = dataset.sampling_rate_hz();
    let cycle_length = (fs / fundamental_hz).floor() as usize;
    if cycle_length == 0 {
        return Err(PqError::InvalidFundamental(fundamental_hz));
    }
    if dataset.samples_per_channel() < cycle_length {
        return Err(PqError::InsufficientSamples {
            needed: cycle_length,
            available: dataset.samples_per_channel(),
        });
    }

    let voltage = dataset
        .voltage_channel(channel)
        .ok_or(PqError::ChannelOutOfRange {
            index: channel,
            channels: dataset.channels(),
        })?;
    let current = dataset
        .current_channel(channel)
        .ok_or(PqError::ChannelOutOfRange {
            index: channel,
            channels: dataset.channels(),
        })?;

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(cycle_length);

    let half = cycle_length / 2;
    let frequencies = (0..half)
        .map(|k| k as f64 * fs / cycle_length as f64)
        .collect();

    Ok(SpectrumRecord {
        fundamental_hz,
        cycle_length,
        frequencies,
        voltage_magnitude: magnitude_half_spectrum(&*fft, &voltage[..cycle_length], half),
        current_magnitude: magnitude_half_spectrum(&*fft, &current[..cycle_length], half),
    })
}

/// Forward-transform one windowed signal and keep the magnitudes of the
/// non-redundant lower half of the bins.
fn magnitude_half_spectrum(fft: &dyn rustfft::Fft<f64>, window: &[f64], half: usize) -> Vec<f64> {
    let mut buffer: Vec<Complex<f64>> =
        window.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft.process(&mut buffer);
    buffer.iter().take(half).map(|c| c.norm()).collect()
}

/// Write a spectrum record to `target_path`, at most once per path.
///
/// An existing file is never inspected or overwritten: repeated analysis
/// runs must not clobber a prior artifact that may have been annotated by
/// hand. The exclusive-create open makes the existence check atomic, so
/// two racing writers cannot both succeed.
pub fn persist_spectrum<P: AsRef<Path>>(
    record: &SpectrumRecord,
    target_path: P,
) -> Result<PersistOutcome> {
    let target_path = target_path.as_ref();

    let file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target_path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(PersistOutcome::AlreadyExists(target_path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut writer = BufWriter::new(file);
    writeln!(writer, "Frequency(Hz)\tU(f)\tI(f)")?;
    for (idx, freq) in record.frequencies.iter().enumerate() {
        writeln!(
            writer,
            "{}\t{}\t{}",
            freq, record.voltage_magnitude[idx], record.current_magnitude[idx]
        )?;
    }
    writer.flush()?;

    Ok(PersistOutcome::Written(target_path.to_path_buf()))
}

/// Default artifact location: `spectrum.txt` next to the voltage input file.
pub fn default_spectrum_path<P: AsRef<Path>>(voltage_file: P) -> PathBuf {
    voltage_file
        .as_ref()
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("spectrum.txt")
}
