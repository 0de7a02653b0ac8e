//! ecgsyn - synthetic ECG generator
//!
//! Configuration is layered: built-in defaults, an optional TOML/YAML/JSON
//! file, `ECGSYN_*` environment variables, then command-line flags.
//!
//! ```text
//! ecgsyn --duration 30 --hmean 72 --seed 7 --format csv -o ecg.csv
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use ecg_pipeline::{init_logging, write_recording, EcgGenerator, OutputFormat};
use hrv_synth::TransformKind;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use synth_config::SynthesisConfig;
use tracing::info;

#[derive(Parser)]
#[command(name = "ecgsyn")]
#[command(version)]
#[command(about = "Generate a synthetic ECG with realistic heart-rate variability")]
struct Cli {
    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from a named parameter set
    #[arg(long, value_enum)]
    preset: Option<Preset>,

    /// Recording length (seconds)
    #[arg(short, long)]
    duration: Option<f64>,

    /// Sampling frequency (Hz)
    #[arg(long)]
    fs: Option<f64>,

    /// Mean heart rate (BPM)
    #[arg(long)]
    hmean: Option<f64>,

    /// Heart rate standard deviation (BPM)
    #[arg(long)]
    hstd: Option<f64>,

    /// Seed for the phase randomizer
    #[arg(long)]
    seed: Option<u64>,

    /// Inverse transform implementation
    #[arg(long, value_enum)]
    transform: Option<Transform>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Scale ECG samples to [0, 1]
    #[arg(long)]
    normalize: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Resting,
    Exercise,
}

#[derive(Clone, Copy, ValueEnum)]
enum Transform {
    Fft,
    Direct,
}

impl From<Transform> for TransformKind {
    fn from(transform: Transform) -> Self {
        match transform {
            Transform::Fft => TransformKind::Fft,
            Transform::Direct => TransformKind::Direct,
        }
    }
}

impl Cli {
    fn resolve_config(&self) -> Result<SynthesisConfig> {
        let mut config = SynthesisConfig::load(self.config.as_deref())
            .context("Failed to load configuration")?;

        if let Some(preset) = self.preset {
            let base = match preset {
                Preset::Resting => SynthesisConfig::resting(),
                Preset::Exercise => SynthesisConfig::exercise(),
            };
            config.hmean = base.hmean;
            config.hstd = base.hstd;
        }

        if let Some(duration) = self.duration {
            config.duration_s = duration;
        }
        if let Some(fs) = self.fs {
            config.sampling_rate_hz = fs;
        }
        if let Some(hmean) = self.hmean {
            config.hmean = hmean;
        }
        if self.hstd.is_some() {
            config.hstd = self.hstd;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(transform) = self.transform {
            config.transform = transform.into();
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs).map_err(|e| anyhow!(e))?;

    let config = cli.resolve_config()?;
    info!(
        "Generating {:.1}s at {} Hz, {} BPM",
        config.duration_s, config.sampling_rate_hz, config.hmean
    );

    let mut generator = EcgGenerator::new(config)?;
    let recording = generator.generate()?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_recording(&recording, cli.format, BufWriter::new(file), cli.normalize)?;
            info!("Recording written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            write_recording(&recording, cli.format, stdout.lock(), cli.normalize)?;
        }
    }

    let hrv = &recording.hrv;
    info!(
        "Seed {:?}: mean RR {:.1}ms ({:.1} BPM), SDNN {:.2}ms, RMSSD {:.2}ms, pNN50 {:.1}%",
        recording.seed, hrv.mean_rr_ms, hrv.mean_bpm, hrv.sdnn_ms, hrv.rmssd_ms, hrv.pnn50
    );
    if let Some((low, high)) = recording.heart_rate_range {
        info!("Heart rate range {:.1} - {:.1} BPM", low, high);
    }

    Ok(())
}
