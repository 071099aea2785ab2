// Waveform dataset module
// Validated voltage/current matrices plus the text-file reader.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PqError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("shape mismatch: voltage is {v_channels}x{v_samples}, current is {i_channels}x{i_samples}")]
    ShapeMismatch {
        v_channels: usize,
        v_samples: usize,
        i_channels: usize,
        i_samples: usize,
    },

    #[error("ragged matrix: row {row} has {got} samples, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("dataset must contain at least one channel and one sample")]
    EmptyDataset,

    #[error("sampling rate must be positive, got {0} Hz")]
    InvalidSamplingRate(f64),

    #[error("fundamental frequency must be positive and below the sampling rate, got {0} Hz")]
    InvalidFundamental(f64),

    #[error("channel {index} out of range: dataset has {channels} channels")]
    ChannelOutOfRange { index: usize, channels: usize },

    #[error("insufficient samples: one fundamental cycle needs {needed}, dataset has {available}")]
    InsufficientSamples { needed: usize, available: usize },

    #[error("parse error at line {line}, token {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, PqError>;

/// Synchronized voltage and current recordings for one measurement session.
///
/// Both matrices have shape (channels, samples) and are stored flat,
/// channel-major. The dataset is immutable once constructed; consumers
/// borrow per-channel slices.
///
/// Values are not sanity-checked beyond shape: NaN or otherwise
/// physically meaningless samples pass through to the computations.
#[derive(Debug, Clone)]
pub struct WaveformDataset {
    channels: usize,
    samples_per_channel: usize,
    sampling_rate_hz: f64,
    voltage: Vec<f64>,
    current: Vec<f64>,
}

impl WaveformDataset {
    /// Build a dataset from row-per-channel voltage and current matrices.
    ///
    /// Fails if either matrix is ragged, if the two shapes differ, if
    /// either dimension is zero, or if the sampling rate is not positive.
    pub fn new(
        voltage_rows: Vec<Vec<f64>>,
        current_rows: Vec<Vec<f64>>,
        sampling_rate_hz: f64,
    ) -> Result<Self> {
        let (v_channels, v_samples) = matrix_shape(&voltage_rows)?;
        let (i_channels, i_samples) = matrix_shape(&current_rows)?;

        if v_channels != i_channels || v_samples != i_samples {
            return Err(PqError::ShapeMismatch {
                v_channels,
                v_samples,
                i_channels,
                i_samples,
            });
        }
        if v_channels == 0 || v_samples == 0 {
            return Err(PqError::EmptyDataset);
        }
        if !(sampling_rate_hz > 0.0) {
            return Err(PqError::InvalidSamplingRate(sampling_rate_hz));
        }

        Ok(WaveformDataset {
            channels: v_channels,
            samples_per_channel: v_samples,
            sampling_rate_hz,
            voltage: voltage_rows.into_iter().flatten().collect(),
            current: current_rows.into_iter().flatten().collect(),
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn samples_per_channel(&self) -> usize {
        self.samples_per_channel
    }

    pub fn sampling_rate_hz(&self) -> f64 {
        self.sampling_rate_hz
    }

    /// Voltage samples for one channel, or `None` if the index is out of range.
    pub fn voltage_channel(&self, channel: usize) -> Option<&[f64]> {
        self.channel_slice(&self.voltage, channel)
    }

    /// Current samples for one channel, or `None` if the index is out of range.
    pub fn current_channel(&self, channel: usize) -> Option<&[f64]> {
        self.channel_slice(&self.current, channel)
    }

    /// Recording length in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples_per_channel as f64 / self.sampling_rate_hz
    }

    /// Time axis for the recording: `t[i] = i / sampling_rate_hz`.
    pub fn sample_times(&self) -> Vec<f64> {
        (0..self.samples_per_channel)
            .map(|i| i as f64 / self.sampling_rate_hz)
            .collect()
    }

    fn channel_slice<'a>(&self, data: &'a [f64], channel: usize) -> Option<&'a [f64]> {
        if channel >= self.channels {
            return None;
        }
        let start = channel * self.samples_per_channel;
        Some(&data[start..start + self.samples_per_channel])
    }
}

/// Shape of a row-per-channel matrix, verifying it is rectangular.
fn matrix_shape(rows: &[Vec<f64>]) -> Result<(usize, usize)> {
    let samples = rows.first().map_or(0, Vec::len);
    for (row, values) in rows.iter().enumerate() {
        if values.len() != samples {
            return Err(PqError::RaggedMatrix {
                row,
                expected: samples,
                got: values.len(),
            });
        }
    }
    Ok((rows.len(), samples))
}

/// Read a signal matrix from a text file: one channel per line,
/// whitespace-separated sample values with a comma as the decimal
/// separator (e.g. `230,1 229,8 -230,4`). Blank lines are skipped.
pub fn read_matrix<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<f64>>> {
    let contents = fs::read_to_string(path)?;
    let mut rows = Vec::new();

    for (line_idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut row = Vec::new();
        for (col_idx, token) in line.split_whitespace().enumerate() {
            let value = token
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|e| PqError::Parse {
                    line: line_idx + 1,
                    column: col_idx + 1,
                    message: format!("invalid value '{}': {}", token, e),
                })?;
            row.push(value);
        }
        rows.push(row);
    }

    Ok(rows)
}
