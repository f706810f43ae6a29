//! Artifact store: trained model blobs plus bin metadata.
//!
//! A training run replaces prior artifacts wholesale. Every document is
//! staged to a temp file in the target directory first and only published
//! once all of them serialized cleanly, so a failed run never leaves a
//! partial artifact set behind.

use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::classifier::GbdtClassifier;
use crate::error::{AppError, AppResult};
use shared::{WeatherBins, TARGET_PRECIPITATION, TARGET_TEMPERATURE};

/// File name of the bin metadata document.
pub const BINS_FILE: &str = "weather_bins.json";

/// Path of one target's model blob inside the artifact directory.
pub fn model_path(dir: &Path, target: &str) -> PathBuf {
    dir.join(format!("{target}_model.json"))
}

fn stage<T: Serialize>(dir: &Path, value: &T) -> AppResult<NamedTempFile> {
    let file = NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(file.as_file());
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    drop(writer);
    Ok(file)
}

/// Persist both models and the bins document atomically.
pub fn store(
    dir: &Path,
    temperature: &GbdtClassifier,
    precipitation: &GbdtClassifier,
    bins: &WeatherBins,
) -> AppResult<()> {
    std::fs::create_dir_all(dir)?;
    let staged = [
        (stage(dir, temperature)?, model_path(dir, TARGET_TEMPERATURE)),
        (
            stage(dir, precipitation)?,
            model_path(dir, TARGET_PRECIPITATION),
        ),
        (stage(dir, bins)?, dir.join(BINS_FILE)),
    ];
    for (file, path) in staged {
        file.persist(&path)
            .map_err(|e| AppError::Artifact(format!("failed to publish {}: {e}", path.display())))?;
        tracing::info!(path = %path.display(), "artifact written");
    }
    Ok(())
}

/// Load one target's trained model.
pub fn load_model(dir: &Path, target: &str) -> AppResult<GbdtClassifier> {
    let path = model_path(dir, target);
    let file = File::open(&path)
        .map_err(|e| AppError::Artifact(format!("cannot open {}: {e}", path.display())))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Load the bin metadata document.
pub fn load_bins(dir: &Path) -> AppResult<WeatherBins> {
    let path = dir.join(BINS_FILE);
    let file = File::open(&path)
        .map_err(|e| AppError::Artifact(format!("cannot open {}: {e}", path.display())))?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
