//! Trend collection job.
//!
//! A run lists genres by name, asks the researcher for each genre's trends,
//! and upserts the results keyed on `(genre_id, trend_name)`. Runs can be
//! triggered over HTTP or by the [`CollectionScheduler`].

mod runner;
mod scheduler;
mod types;

pub use runner::{prepare_batch, TrendCollector, NO_GENRES_MESSAGE};
pub use scheduler::CollectionScheduler;
pub use types::{CollectionError, CollectionReport, CollectionResult, CollectionStatus};
