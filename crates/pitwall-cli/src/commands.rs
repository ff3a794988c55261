use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span, warn};

use pitwall_cli::pipeline::{OutputConfig, derive, load, output};
use pitwall_transform::{FeaturePipeline, PipelineConfig, TeamAliasTable};

use crate::cli::{FeaturesArgs, TeamsArgs};
use crate::summary::apply_table_style;
use crate::types::FeaturesResult;

/// Configuration file values with command line flags applied on top.
fn resolve_config(args: &FeaturesArgs) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("load configuration {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(window) = args.window {
        config.features.rolling_window = window;
    }
    if args.no_normalize {
        config.features.normalize_delta = false;
    }
    if let Some(teams) = &args.teams {
        config.teams_file = Some(teams.clone());
    }
    config.features.validate().context("invalid feature options")?;
    Ok(config)
}

pub fn run_features(args: &FeaturesArgs) -> Result<FeaturesResult> {
    let span = info_span!("features_command", output = %args.output.display());
    let _guard = span.enter();

    let config = resolve_config(args)?;
    let teams = config.team_table().context("load team aliases")?;
    let pipeline = FeaturePipeline::new(teams, config.features.clone());

    let inputs = load(&args.qualifying, &args.race)?;
    let derived = derive(&inputs, &pipeline)?;
    if !derived.issues.is_empty() {
        warn!(
            excluded = derived.issues.len(),
            "records excluded because of unparseable values"
        );
    }

    let written = output(
        &derived,
        &OutputConfig {
            features: args.output.clone(),
            report: args.report.clone(),
            vocabulary: args.vocabulary.clone(),
            save_vocabulary: args.save_vocabulary.clone(),
        },
    )?;
    info!(rows = written.report.output_rows, "feature table written");

    Ok(FeaturesResult {
        report: written.report,
        window: config.features.rolling_window,
        normalized: config.features.normalize_delta,
        written: written.written,
    })
}

pub fn run_teams(args: &TeamsArgs) -> Result<()> {
    let table = match &args.teams {
        Some(path) => TeamAliasTable::load(path)
            .with_context(|| format!("load team aliases {}", path.display()))?,
        None => TeamAliasTable::load_default().context("load team aliases")?,
    };
    let mut output = Table::new();
    output.set_header(vec!["Recorded name", "Canonical team"]);
    apply_table_style(&mut output);
    for (alias, canonical) in table.iter() {
        output.add_row(vec![alias, canonical]);
    }
    println!("{output}");
    println!("{} aliases", table.len());
    Ok(())
}
