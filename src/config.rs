// Analysis configuration

use std::path::PathBuf;

/// Options the caller passes into an analysis run.
///
/// Defaults match a 1 kHz acquisition of a 50 Hz grid with the spectrum
/// taken from the first channel and the artifact placed next to the
/// voltage input file.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Acquisition sampling rate in Hz. Constant across the dataset; this
    /// is configuration, not inferred from the recording.
    pub sampling_rate_hz: f64,
    /// Grid fundamental frequency in Hz (50 or 60 in practice).
    pub fundamental_hz: f64,
    /// Channel the one-cycle spectrum is taken from.
    pub spectrum_channel: usize,
    /// Explicit artifact location; `None` derives `spectrum.txt` from the
    /// voltage file's directory.
    pub output_path: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            sampling_rate_hz: 1000.0,
            fundamental_hz: 50.0,
            spectrum_channel: 0,
            output_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.sampling_rate_hz, 1000.0);
        assert_eq!(config.fundamental_hz, 50.0);
        assert_eq!(config.spectrum_channel, 0);
        assert_eq!(config.output_path, None);
    }
}
