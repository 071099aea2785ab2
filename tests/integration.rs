// tests/integration.rs
// End-to-end tests: text recordings -> dataset -> quantities + spectrum artifact

use std::f64::consts::PI;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use pq_analyzer::{
    analyze_spectrum, compute_quantities, default_spectrum_path, persist_spectrum, read_matrix,
    AnalysisConfig, PersistOutcome, PqError, WaveformDataset,
};

/// Write a recording file in the decimal-comma text format: one channel
/// per line, whitespace-separated samples.
fn write_recording(path: &Path, channels: &[Vec<f64>]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    for channel in channels {
        let line: Vec<String> = channel
            .iter()
            .map(|v| format!("{}", v).replace('.', ","))
            .collect();
        writeln!(file, "{}", line.join(" "))?;
    }
    Ok(())
}

fn sine(amplitude: f64, freq_hz: f64, phase_rad: f64, fs: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|k| amplitude * (2.0 * PI * freq_hz * k as f64 / fs + phase_rad).sin())
        .collect()
}

/// Build a two-channel 50 Hz session on disk and return the file paths.
fn write_session(dir: &Path, fs: f64, n: usize) -> (PathBuf, PathBuf) {
    let ub_path = dir.join("ub.txt");
    let ib_path = dir.join("ib.txt");

    let voltage = vec![
        sine(325.0, 50.0, 0.0, fs, n),
        sine(325.0, 50.0, 2.0 * PI / 3.0, fs, n),
    ];
    let current = vec![
        sine(10.0, 50.0, -PI / 4.0, fs, n),
        sine(8.0, 50.0, 2.0 * PI / 3.0 - PI / 4.0, fs, n),
    ];

    write_recording(&ub_path, &voltage).expect("Failed to write voltage file");
    write_recording(&ib_path, &current).expect("Failed to write current file");
    (ub_path, ib_path)
}

#[test]
fn test_full_analysis_session() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig::default();
    let (ub_path, ib_path) = write_session(dir.path(), config.sampling_rate_hz, 1000);

    let voltage = read_matrix(&ub_path).expect("Failed to read voltage file");
    let current = read_matrix(&ib_path).expect("Failed to read current file");
    let dataset = WaveformDataset::new(voltage, current, config.sampling_rate_hz)
        .expect("Failed to build dataset");

    assert_eq!(dataset.channels(), 2);
    assert_eq!(dataset.samples_per_channel(), 1000);
    assert!((dataset.duration_seconds() - 1.0).abs() < 1e-9);

    // Both channels carry a 45 degree lagging load.
    let results = compute_quantities(&dataset);
    assert_eq!(results.len(), 2);

    let q = &results[0];
    let s_expected = (325.0 / 2f64.sqrt()) * (10.0 / 2f64.sqrt());
    assert!((q.u_rms - 325.0 / 2f64.sqrt()).abs() < 1e-3);
    assert!((q.apparent_power - s_expected).abs() < 1e-3);
    assert!((q.active_power - s_expected * (PI / 4.0).cos()).abs() < 1e-3);
    let reactive = q.reactive_power.expect("reactive power should be defined");
    assert!((reactive - s_expected * (PI / 4.0).sin()).abs() < 1e-3);

    // Spectrum of channel 0: 20-sample cycle, fundamental in bin 1.
    let record = analyze_spectrum(&dataset, config.spectrum_channel, config.fundamental_hz)
        .expect("Failed to analyze spectrum");
    assert_eq!(record.cycle_length, 20);
    assert_eq!(record.frequencies.len(), 10);
    assert!((record.frequencies[1] - 50.0).abs() < 1e-9);
    let peak = record.voltage_magnitude[1];
    assert!((peak - 325.0 * 10.0).abs() < 0.5, "fundamental peak: {}", peak);

    // Persist next to the voltage file and verify the artifact.
    let target = default_spectrum_path(&ub_path);
    assert_eq!(target, dir.path().join("spectrum.txt"));

    match persist_spectrum(&record, &target).expect("Failed to persist spectrum") {
        PersistOutcome::Written(path) => assert_eq!(path, target),
        other => panic!("expected Written, got {:?}", other),
    }

    let contents = fs::read_to_string(&target).expect("Failed to read artifact");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1 + record.frequencies.len());
    assert_eq!(lines[0], "Frequency(Hz)\tU(f)\tI(f)");
    for line in &lines[1..] {
        assert_eq!(line.split('\t').count(), 3);
    }
}

#[test]
fn test_repeated_persist_keeps_first_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let (ub_path, ib_path) = write_session(dir.path(), 1000.0, 200);

    let dataset = WaveformDataset::new(
        read_matrix(&ub_path).unwrap(),
        read_matrix(&ib_path).unwrap(),
        1000.0,
    )
    .unwrap();

    let record = analyze_spectrum(&dataset, 0, 50.0).unwrap();
    let target = default_spectrum_path(&ub_path);

    persist_spectrum(&record, &target).unwrap();
    let first = fs::read(&target).unwrap();

    let again = persist_spectrum(&record, &target).unwrap();
    assert_eq!(again, PersistOutcome::AlreadyExists(target.clone()));
    assert_eq!(fs::read(&target).unwrap(), first);
}

#[test]
fn test_mismatched_recordings_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let ub_path = dir.path().join("ub.txt");
    let ib_path = dir.path().join("ib.txt");

    write_recording(&ub_path, &[vec![1.0, 2.0, 3.0]]).unwrap();
    write_recording(&ib_path, &[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();

    let result = WaveformDataset::new(
        read_matrix(&ub_path).unwrap(),
        read_matrix(&ib_path).unwrap(),
        1000.0,
    );
    assert!(matches!(result, Err(PqError::ShapeMismatch { .. })));
}

#[test]
fn test_short_recording_fails_spectrum_only() {
    let dir = tempfile::tempdir().unwrap();
    // 15 samples is under the 20-sample cycle at 1 kHz / 50 Hz.
    let (ub_path, ib_path) = write_session(dir.path(), 1000.0, 15);

    let dataset = WaveformDataset::new(
        read_matrix(&ub_path).unwrap(),
        read_matrix(&ib_path).unwrap(),
        1000.0,
    )
    .unwrap();

    // Quantities still come out for every channel.
    assert_eq!(compute_quantities(&dataset).len(), 2);

    assert!(matches!(
        analyze_spectrum(&dataset, 0, 50.0),
        Err(PqError::InsufficientSamples {
            needed: 20,
            available: 15,
        })
    ));
}

#[test]
fn test_spectrum_deterministic_across_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let (ub_path, ib_path) = write_session(dir.path(), 1000.0, 500);

    let load = || {
        WaveformDataset::new(
            read_matrix(&ub_path).unwrap(),
            read_matrix(&ib_path).unwrap(),
            1000.0,
        )
        .unwrap()
    };

    let a = analyze_spectrum(&load(), 0, 50.0).unwrap();
    let b = analyze_spectrum(&load(), 0, 50.0).unwrap();
    assert_eq!(a, b);
}
