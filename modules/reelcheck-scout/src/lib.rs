pub mod analyzer;
pub mod fact_check;
pub mod gatherer;
pub mod queries;
pub mod scraper;
pub mod searcher;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use fact_check::{FactCheckDeps, FactCheckRecord, FactChecker};
pub use gatherer::{EvidenceGatherer, GatherOutcome, GatheredEvidence};
