//! Prediction commands

use anyhow::{Context, Result};
use filetype_lib::{FileTypePredictor, Prediction};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::{Path, PathBuf};
use tabled::Tabled;

use crate::output::{color_probability, print_success, print_table, print_warning, OutputFormat};

/// Row for predictions table
#[derive(Tabled, Serialize)]
struct PredictionRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Probability", display_with = "display_probability")]
    probability: f32,
}

fn display_probability(probability: &f32) -> String {
    color_probability(*probability)
}

impl PredictionRow {
    fn new(path: impl Into<String>, prediction: Prediction) -> Self {
        Self {
            path: path.into(),
            label: prediction.label,
            probability: prediction.probability,
        }
    }
}

/// Rows sorted by path for stable output
fn rows(predictions: HashMap<PathBuf, Prediction>) -> Vec<PredictionRow> {
    let mut entries: Vec<_> = predictions.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
        .into_iter()
        .map(|(path, prediction)| PredictionRow::new(path.display().to_string(), prediction))
        .collect()
}

/// Predict the given files; directories are skipped
pub fn predict_files(
    predictor: &FileTypePredictor,
    paths: &[PathBuf],
    format: OutputFormat,
) -> Result<()> {
    let predictions = predictor
        .predict_many(paths)
        .context("Failed to predict file types")?;

    let skipped = skipped_inputs(paths, &predictions);
    if skipped > 0 {
        print_warning(&format!("Skipped {} director{}", skipped, if skipped == 1 { "y" } else { "ies" }));
    }
    print_table(&rows(predictions), format)
}

/// Inputs with no prediction; batch prediction fails on any file it cannot
/// classify, so these are the skipped directories
fn skipped_inputs(paths: &[PathBuf], predictions: &HashMap<PathBuf, Prediction>) -> usize {
    let unique: HashSet<&PathBuf> = paths.iter().collect();
    unique
        .into_iter()
        .filter(|path| !predictions.contains_key(*path))
        .count()
}

/// Predict every file in a directory
pub fn predict_directory(
    predictor: &FileTypePredictor,
    dir: &Path,
    recursive: bool,
    format: OutputFormat,
) -> Result<()> {
    let predictions = predictor
        .predict_directory(dir, recursive)
        .with_context(|| format!("Failed to predict files in {}", dir.display()))?;

    let count = predictions.len();
    print_table(&rows(predictions), format)?;
    if matches!(format, OutputFormat::Table) && count > 0 {
        print_success(&format!("Classified {} files in {}", count, dir.display()));
    }
    Ok(())
}

/// Predict bytes read from standard input
pub fn predict_stdin(predictor: &FileTypePredictor, format: OutputFormat) -> Result<()> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read standard input")?;

    let prediction = predictor
        .predict_bytes(&buffer)
        .context("Failed to predict standard input")?;
    print_table(&[PredictionRow::new("<stdin>", prediction)], format)
}
