//! Recording Output

use crate::{EcgRecording, PipelineError};
use hrv_metrics::normalize_min_max;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Write;
use tracing::debug;

/// Serialized form of a recording
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON document
    #[default]
    Json,
    /// Compact postcard binary
    Postcard,
    /// One `time_s,ecg,rr_s` row per sample
    Csv,
}

/// Write `recording` to `writer`
///
/// With `normalize` the ECG samples are min/max scaled to [0, 1] first.
pub fn write_recording<W: Write>(
    recording: &EcgRecording,
    format: OutputFormat,
    mut writer: W,
    normalize: bool,
) -> Result<(), PipelineError> {
    let recording = if normalize {
        let mut scaled = recording.clone();
        scaled.ecg = normalize_min_max(&recording.ecg);
        Cow::Owned(scaled)
    } else {
        Cow::Borrowed(recording)
    };

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, recording.as_ref())?;
            writeln!(writer)?;
        }
        OutputFormat::Postcard => {
            let bytes = postcard::to_allocvec(recording.as_ref())?;
            writer.write_all(&bytes)?;
        }
        OutputFormat::Csv => write_csv(&recording, &mut writer)?,
    }

    writer.flush()?;
    debug!("Wrote {} samples as {:?}", recording.len(), format);
    Ok(())
}

fn write_csv<W: Write>(recording: &EcgRecording, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "time_s,ecg,rr_s")?;
    for ((t, ecg), rr) in recording
        .time_axis()
        .iter()
        .zip(&recording.ecg)
        .zip(&recording.rr_intervals)
    {
        writeln!(writer, "{:.6},{:.8},{:.6}", t, ecg, rr)?;
    }
    Ok(())
}
