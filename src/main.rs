// src/main.rs
// Command-line front end for the power quality analyzer

use std::env;
use std::process;

use pq_analyzer::{
    analyze_spectrum, compute_quantities, default_spectrum_path, persist_spectrum, read_matrix,
    AnalysisConfig, PersistOutcome, WaveformDataset,
};

fn print_usage() {
    eprintln!("Usage: pq_analyzer <command> <voltage_file> <current_file> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  info <ub> <ib>        Display recording information");
    eprintln!("  quantities <ub> <ib>  Compute per-channel electrical quantities");
    eprintln!("  spectrum <ub> <ib>    Compute and save the one-cycle harmonic spectrum");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --rate <hz>           Sampling rate in Hz (default 1000)");
    eprintln!("  --fundamental <hz>    Grid fundamental in Hz (default 50)");
    eprintln!("  --channel <n>         Channel for the spectrum (default 0)");
    eprintln!("  --output <path>       Spectrum file location (default: spectrum.txt");
    eprintln!("                        next to the voltage file)");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  pq_analyzer info ub.txt ib.txt");
    eprintln!("  pq_analyzer quantities ub.txt ib.txt --rate 2000");
    eprintln!("  pq_analyzer spectrum ub.txt ib.txt --fundamental 60 --output out.txt");
}

fn parse_config(args: &[String]) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    let mut iter = args.iter();

    while let Some(flag) = iter.next() {
        let value = match iter.next() {
            Some(v) => v,
            None => {
                eprintln!("Error: Missing value for option '{}'", flag);
                process::exit(1);
            }
        };

        match flag.as_str() {
            "--rate" => config.sampling_rate_hz = parse_number(flag, value),
            "--fundamental" => config.fundamental_hz = parse_number(flag, value),
            "--channel" => match value.parse() {
                Ok(n) => config.spectrum_channel = n,
                Err(_) => {
                    eprintln!("Error: Invalid channel index '{}'", value);
                    process::exit(1);
                }
            },
            "--output" => config.output_path = Some(value.into()),
            _ => {
                eprintln!("Error: Unknown option '{}'", flag);
                print_usage();
                process::exit(1);
            }
        }
    }

    config
}

fn parse_number(flag: &str, value: &str) -> f64 {
    match value.parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Error: Invalid value '{}' for option '{}'", value, flag);
            process::exit(1);
        }
    }
}

fn load_dataset(voltage_file: &str, current_file: &str, config: &AnalysisConfig) -> WaveformDataset {
    let voltage = match read_matrix(voltage_file) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error reading voltage file '{}': {}", voltage_file, e);
            process::exit(1);
        }
    };
    let current = match read_matrix(current_file) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error reading current file '{}': {}", current_file, e);
            process::exit(1);
        }
    };

    match WaveformDataset::new(voltage, current, config.sampling_rate_hz) {
        Ok(dataset) => dataset,
        Err(e) => {
            eprintln!("Error building dataset: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        print_usage();
        process::exit(1);
    }

    let command = &args[1];
    let voltage_file = &args[2];
    let current_file = &args[3];
    let config = parse_config(&args[4..]);

    let dataset = load_dataset(voltage_file, current_file, &config);

    match command.as_str() {
        "info" => {
            print_recording_info(voltage_file, current_file, &dataset);
        }

        "quantities" => {
            println!("Channel\tU_rms\tI_rms\tP\tS\tQ");
            for (channel, q) in compute_quantities(&dataset).iter().enumerate() {
                let reactive = match q.reactive_power {
                    Some(value) => format!("{:.6}", value),
                    None => "undefined".to_string(),
                };
                println!(
                    "{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}\t{}",
                    channel, q.u_rms, q.i_rms, q.active_power, q.apparent_power, reactive
                );
            }
        }

        "spectrum" => {
            let record =
                match analyze_spectrum(&dataset, config.spectrum_channel, config.fundamental_hz) {
                    Ok(record) => record,
                    Err(e) => {
                        eprintln!("Error analyzing spectrum: {}", e);
                        process::exit(1);
                    }
                };

            let target = config
                .output_path
                .clone()
                .unwrap_or_else(|| default_spectrum_path(voltage_file));

            match persist_spectrum(&record, &target) {
                Ok(PersistOutcome::Written(path)) => {
                    println!("Spectrum saved to {}", path.display());
                }
                Ok(PersistOutcome::AlreadyExists(path)) => {
                    println!("Spectrum file already exists: {}", path.display());
                }
                Err(e) => {
                    eprintln!("Error writing spectrum file: {}", e);
                    process::exit(1);
                }
            }

            println!();
            println!("Frequency(Hz)\tU(f)\tI(f)");
            for (idx, freq) in record.frequencies.iter().enumerate() {
                println!(
                    "{:.1}\t{:.6}\t{:.6}",
                    freq, record.voltage_magnitude[idx], record.current_magnitude[idx]
                );
            }
        }

        _ => {
            eprintln!("Error: Unknown command '{}'", command);
            print_usage();
            process::exit(1);
        }
    }
}

fn print_recording_info(voltage_file: &str, current_file: &str, dataset: &WaveformDataset) {
    println!("Recording Information");
    println!("=====================");
    println!();
    println!("Voltage file: {}", voltage_file);
    println!("Current file: {}", current_file);
    println!();

    println!("Acquisition Parameters:");
    println!("  Channels: {}", dataset.channels());
    println!("  Samples per channel: {}", dataset.samples_per_channel());
    println!("  Sampling rate: {} Hz", dataset.sampling_rate_hz());

    let total = dataset.duration_seconds();
    let hours = (total / 3600.0) as u64;
    let minutes = ((total / 60.0) as u64) % 60;
    let seconds = total - (hours * 3600 + minutes * 60) as f64;
    println!(
        "  Experiment duration: {}:{:02}:{:06.3}",
        hours, minutes, seconds
    );
    println!();

    println!("Channel Statistics:");
    for channel in 0..dataset.channels() {
        if let (Some(voltage), Some(current)) = (
            dataset.voltage_channel(channel),
            dataset.current_channel(channel),
        ) {
            let u_min = voltage.iter().fold(f64::INFINITY, |a, &b| a.min(b));
            let u_max = voltage.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            let u_rms =
                (voltage.iter().map(|&x| x * x).sum::<f64>() / voltage.len() as f64).sqrt();
            let i_rms =
                (current.iter().map(|&x| x * x).sum::<f64>() / current.len() as f64).sqrt();

            println!(
                "  Channel {}: u_min={:.3}V, u_max={:.3}V, u_rms={:.3}V, i_rms={:.3}A",
                channel, u_min, u_max, u_rms, i_rms
            );
        }
    }
}
