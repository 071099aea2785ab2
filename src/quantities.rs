// Electrical quantity computation
// Full-window RMS and power-triangle quantities, one result per channel.

use crate::waveform::{PqError, Result, WaveformDataset};

/// Aggregate electrical quantities for one measurement channel.
///
/// `reactive_power` is `None` when measurement noise pushes the
/// power-triangle radicand `S^2 - P^2` negative; the other quantities
/// stay valid, so one bad channel never poisons a multi-channel batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelQuantities {
    /// RMS voltage over the full sample window.
    pub u_rms: f64,
    /// RMS current over the full sample window.
    pub i_rms: f64,
    /// Time-averaged instantaneous power (signed).
    pub active_power: f64,
    /// `u_rms * i_rms`.
    pub apparent_power: f64,
    /// `sqrt(S^2 - P^2)` where defined.
    pub reactive_power: Option<f64>,
}

/// Compute RMS voltage/current and active/apparent/reactive power for
/// every channel of the dataset. Results are aligned with the dataset's
/// channel indices.
///
/// All averages run over the full sample window. For the active power
/// this assumes the recording spans an integer number of fundamental
/// periods; a fractional trailing cycle biases the mean.
pub fn compute_quantities(dataset: &WaveformDataset) -> Vec<ChannelQuantities> {
    (0..dataset.channels())
        .map(|channel| {
            // Accessors cannot fail inside 0..channels.
            let voltage = dataset.voltage_channel(channel).unwrap_or(&[]);
            let current = dataset.current_channel(channel).unwrap_or(&[]);
            let n = voltage.len() as f64;

            let u_rms = (voltage.iter().map(|&v| v * v).sum::<f64>() / n).sqrt();
            let i_rms = (current.iter().map(|&i| i * i).sum::<f64>() / n).sqrt();
            let active_power = voltage
                .iter()
                .zip(current)
                .map(|(&v, &i)| v * i)
                .sum::<f64>()
                / n;
            let apparent_power = u_rms * i_rms;

            ChannelQuantities {
                u_rms,
                i_rms,
                active_power,
                apparent_power,
                reactive_power: reactive_power(apparent_power, active_power),
            }
        })
        .collect()
}

/// Power-triangle complement `sqrt(S^2 - P^2)`, or `None` when the
/// radicand is negative and the quantity is undefined.
pub fn reactive_power(apparent_power: f64, active_power: f64) -> Option<f64> {
    let radicand = apparent_power * apparent_power - active_power * active_power;
    if radicand >= 0.0 {
        Some(radicand.sqrt())
    } else {
        None
    }
}

/// Elementwise instantaneous power `p[k] = u[k] * i[k]` for one channel.
pub fn instantaneous_power(dataset: &WaveformDataset, channel: usize) -> Result<Vec<f64>> {
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

    Ok(voltage.iter().zip(current).map(|(&v, &i)| v * i).collect())
}
