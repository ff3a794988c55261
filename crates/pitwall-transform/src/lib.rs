//! Feature derivation for race result data.
//!
//! Turns joined qualifying and race records into model input rows:
//!
//! - **Join** ([`join`]): inner join on season, event, driver, car and team
//! - **Cleanse** ([`cleanse`]): position codes, lap times and race status
//! - **Aggregate** ([`aggregate`]): season totals as of before each event
//! - **Rolling form** ([`rolling`]): trailing mean finishing position
//! - **Teams** ([`teams`]): sponsor and engine variants to one team identity
//! - **Finalize** ([`finalize`]): qualifying delta and one-hot encoding
//!
//! [`FeaturePipeline`] chains the stages in that order.
//!
//! # Example
//!
//! ```ignore
//! use pitwall_model::FeatureOptions;
//! use pitwall_transform::{FeaturePipeline, TeamAliasTable};
//!
//! let pipeline = FeaturePipeline::new(TeamAliasTable::embedded()?, FeatureOptions::default());
//! let output = pipeline.run(&qualifying, &race)?;
//! let frame = output.table.to_dataframe(&output.table.vocabulary())?;
//! ```

pub mod aggregate;
pub mod cleanse;
pub mod config;
pub mod error;
pub mod finalize;
pub mod join;
pub mod pipeline;
pub mod rolling;
pub mod teams;

pub use aggregate::{
    SeasonAccumulator, SeasonAggregates, driver_season_points, season_aggregates,
    team_season_dnfs, totals_before_event,
};
pub use cleanse::{
    CleanseOutput, FieldError, backfill_segments, classify_lap_time, classify_position,
    classify_race_status, cleanse_entries, cleanse_entry, cleanse_qualifying, cleanse_race,
    duration_value, parse_lap_time, parse_points, position_value,
};
pub use config::PipelineConfig;
pub use error::{Result, TransformError};
pub use finalize::{
    BASE_COLUMNS, CategoryVocabulary, DerivedColumns, FeatureTable, event_pole_times, finalize,
    z_scores,
};
pub use join::{EventOrdinals, JoinOutput, join_results};
pub use pipeline::{FeaturePipeline, PipelineOutput};
pub use rolling::rolling_form;
pub use teams::{EMBEDDED_TEAM_ALIASES, TEAMS_ENV_VAR, TeamAliasTable, canonicalize};
