//! Feature pipeline with explicit stages.
//!
//! The stages run in this order:
//! 1. **Join**: inner join of qualifying and race records, event ordinals
//! 2. **Cleanse**: status codes and lap times to numbers, flags
//! 3. **Aggregate**: team DNFs and driver points earlier in the season
//! 4. **Rolling form**: trailing mean race position per driver
//! 5. **Canonicalize**: team variants to canonical identities
//! 6. **Finalize**: qualifying delta, feature rows
//!
//! Each stage consumes the previous stage's output. Aggregation groups teams
//! by their recorded name because it runs before canonicalization. Entries
//! whose qualifying cells could not be read still take part in the
//! aggregates and the rolling form; finalization leaves them out.

use std::time::Instant;

use pitwall_model::{
    FeatureOptions, JoinStats, ParseIssue, QualifyingRecord, RaceRecord, RunReport,
};
use tracing::{debug, info, info_span};

use crate::aggregate::season_aggregates;
use crate::cleanse::cleanse_entries;
use crate::error::Result;
use crate::finalize::{BASE_COLUMNS, CategoryVocabulary, DerivedColumns, FeatureTable, finalize};
use crate::join::join_results;
use crate::rolling::rolling_form;
use crate::teams::{TeamAliasTable, canonicalize};

/// Everything a run produces besides the encoded frame.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: FeatureTable,
    pub join: JoinStats,
    pub issues: Vec<ParseIssue>,
}

impl PipelineOutput {
    /// Run report for an output encoded with `vocabulary`.
    pub fn report(&self, vocabulary: &CategoryVocabulary) -> RunReport {
        RunReport {
            join: self.join,
            excluded_records: self.issues.len(),
            parse_issues: self.issues.clone(),
            output_rows: self.table.len(),
            output_columns: BASE_COLUMNS.len() + vocabulary.width(),
        }
    }
}

/// Derives feature rows from the two result relations.
#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    teams: TeamAliasTable,
    options: FeatureOptions,
}

impl FeaturePipeline {
    pub fn new(teams: TeamAliasTable, options: FeatureOptions) -> Self {
        Self { teams, options }
    }

    pub fn options(&self) -> &FeatureOptions {
        &self.options
    }

    pub fn teams(&self) -> &TeamAliasTable {
        &self.teams
    }

    /// Runs every stage.
    ///
    /// # Errors
    ///
    /// Fails on invalid options and on schema errors found by the join.
    /// Unparseable values only exclude their records; they are returned in
    /// [`PipelineOutput::issues`].
    pub fn run(
        &self,
        qualifying: &[QualifyingRecord],
        race: &[RaceRecord],
    ) -> Result<PipelineOutput> {
        self.options.validate()?;
        let span = info_span!(
            "features",
            qualifying_rows = qualifying.len(),
            race_rows = race.len()
        );
        let _guard = span.enter();
        let run_start = Instant::now();

        let joined = info_span!("join").in_scope(|| -> Result<_> {
            let start = Instant::now();
            let joined = join_results(qualifying, race)?;
            info!(
                merged_rows = joined.stats.merged_rows,
                dropped_rows = joined.stats.dropped(),
                unmatched_qualifying = joined.stats.unmatched_qualifying,
                unmatched_race = joined.stats.unmatched_race,
                duration_ms = start.elapsed().as_millis(),
                "join complete"
            );
            Ok(joined)
        })?;

        let cleansed = info_span!("cleanse").in_scope(|| {
            let start = Instant::now();
            let cleansed = cleanse_entries(&joined.entries);
            info!(
                clean_rows = cleansed.entries.len(),
                output_rows = cleansed.output_rows(),
                excluded_rows = cleansed.issues.len(),
                duration_ms = start.elapsed().as_millis(),
                "cleanse complete"
            );
            cleansed
        });
        let entries = cleansed.entries;

        let aggregates = info_span!("aggregate").in_scope(|| {
            let start = Instant::now();
            let aggregates = season_aggregates(&entries);
            debug!(
                rows = entries.len(),
                duration_ms = start.elapsed().as_millis(),
                "season aggregates complete"
            );
            aggregates
        });

        let form = info_span!("rolling_form").in_scope(|| {
            let start = Instant::now();
            let form = rolling_form(&entries, self.options.rolling_window);
            debug!(
                window = self.options.rolling_window,
                duration_ms = start.elapsed().as_millis(),
                "rolling form complete"
            );
            form
        });

        let canonical_teams: Vec<String> = entries
            .iter()
            .map(|entry| canonicalize(&entry.team, &self.teams).to_string())
            .collect();
        debug!(
            aliased = entries
                .iter()
                .zip(&canonical_teams)
                .filter(|(entry, team)| entry.team != **team)
                .count(),
            "teams canonicalized"
        );

        let derived = DerivedColumns {
            aggregates,
            rolling_form: form,
            canonical_teams,
        };
        let table = finalize(&entries, &derived, &self.options);

        info!(
            output_rows = table.len(),
            excluded_rows = cleansed.issues.len(),
            duration_ms = run_start.elapsed().as_millis(),
            "feature derivation complete"
        );
        Ok(PipelineOutput {
            table,
            join: joined.stats,
            issues: cleansed.issues,
        })
    }
}
