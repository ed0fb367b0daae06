pub mod types;
pub mod config;
pub mod settings;
pub mod error;
pub mod util;

pub use types::*;
pub use config::Config;
pub use settings::{AggregationSettings, GatheringSettings, PublisherWeight, Settings};
pub use error::ReelCheckError;
pub use util::truncate_chars;
