pub mod datasets;
pub mod dates;
pub mod passes;
pub mod report;
pub mod validate;
pub mod weight;

pub use datasets::{CleanedBatch, CleanerRegistry, DatasetCleaner, DatasetProfile};
pub use dates::{DateOutcome, DateShape, DateTextNormalizer};
pub use report::{DiagnosticReport, RejectionReason};
pub use validate::{FilterOutcome, PatternValidator, Predicate};
pub use weight::{WeightError, WeightUnitConverter};
