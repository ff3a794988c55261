pub mod error;
pub mod features;
pub mod options;
pub mod outcome;
pub mod records;
pub mod report;

pub use error::{ConfigError, ParseError, SchemaError};
pub use features::{CleanEntry, FeatureRow, QualifyingResult};
pub use options::{DEFAULT_ROLLING_WINDOW, FeatureOptions};
pub use outcome::{MAX_CLASSIFIED_POSITION, NO_TIME_SECONDS, Outcome, UNCLASSIFIED_POSITION};
pub use records::{JoinKey, MergedEntry, QualifyingRecord, RaceRecord, Relation};
pub use report::{JoinStats, ParseIssue, RunReport};
