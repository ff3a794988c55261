//! Feature run with explicit stages.
//!
//! 1. **Load**: read and project the qualifying and race CSV files
//! 2. **Derive**: run the feature pipeline
//! 3. **Output**: encode, write the feature CSV and the optional JSON files
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use pitwall_ingest::{load_qualifying, load_race};
use pitwall_model::{QualifyingRecord, RaceRecord, RunReport};
use pitwall_transform::{CategoryVocabulary, FeaturePipeline, PipelineOutput};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::{info, info_span};

// ============================================================================
// Stage 1: Load
// ============================================================================

/// Source records of one run.
#[derive(Debug)]
pub struct LoadedInputs {
    pub qualifying: Vec<QualifyingRecord>,
    pub race: Vec<RaceRecord>,
}

pub fn load(qualifying: &Path, race: &Path) -> Result<LoadedInputs> {
    info_span!("load").in_scope(|| {
        let start = Instant::now();
        let qualifying = load_qualifying(qualifying)
            .with_context(|| format!("load qualifying results from {}", qualifying.display()))?;
        let race = load_race(race)
            .with_context(|| format!("load race results from {}", race.display()))?;
        info!(
            qualifying_rows = qualifying.len(),
            race_rows = race.len(),
            duration_ms = start.elapsed().as_millis(),
            "load complete"
        );
        Ok(LoadedInputs { qualifying, race })
    })
}

// ============================================================================
// Stage 2: Derive
// ============================================================================

pub fn derive(inputs: &LoadedInputs, pipeline: &FeaturePipeline) -> Result<PipelineOutput> {
    pipeline
        .run(&inputs.qualifying, &inputs.race)
        .context("derive features")
}

// ============================================================================
// Stage 3: Output
// ============================================================================

/// Where and how the run's results are written.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Feature table CSV.
    pub features: PathBuf,
    /// Run report JSON.
    pub report: Option<PathBuf>,
    /// Pinned vocabulary to encode against instead of the observed one.
    pub vocabulary: Option<PathBuf>,
    /// Where to save the vocabulary used for encoding.
    pub save_vocabulary: Option<PathBuf>,
}

/// What the output stage wrote.
#[derive(Debug, Clone)]
pub struct OutputResult {
    pub report: RunReport,
    pub vocabulary: CategoryVocabulary,
    pub written: Vec<PathBuf>,
}

pub fn output(derived: &PipelineOutput, config: &OutputConfig) -> Result<OutputResult> {
    info_span!("output").in_scope(|| {
        let start = Instant::now();
        let vocabulary = match &config.vocabulary {
            Some(path) => read_vocabulary(path)?,
            None => derived.table.vocabulary(),
        };

        let mut frame = derived
            .table
            .to_dataframe(&vocabulary)
            .context("encode feature table")?;
        write_features_csv(&mut frame, &config.features)?;
        let mut written = vec![config.features.clone()];

        let report = derived.report(&vocabulary);
        if let Some(path) = &config.report {
            write_json(&report, path).context("write run report")?;
            written.push(path.clone());
        }
        if let Some(path) = &config.save_vocabulary {
            write_json(&vocabulary, path).context("write vocabulary")?;
            written.push(path.clone());
        }

        info!(
            rows = frame.height(),
            columns = frame.width(),
            files = written.len(),
            duration_ms = start.elapsed().as_millis(),
            "output complete"
        );
        Ok(OutputResult {
            report,
            vocabulary,
            written,
        })
    })
}

pub fn write_features_csv(frame: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(frame)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn write_json<T: serde::Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, format!("{json}\n"))
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn read_vocabulary(path: &Path) -> Result<CategoryVocabulary> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let vocabulary: CategoryVocabulary = serde_json::from_str(&text)
        .with_context(|| format!("parse vocabulary {}", path.display()))?;
    Ok(CategoryVocabulary::new(
        vocabulary.drivers,
        vocabulary.teams,
        vocabulary.events,
    ))
}
