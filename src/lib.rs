pub mod config;
pub mod error;
pub mod load;
pub mod plot;
pub mod report;
pub mod stats;
pub mod tally;

pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use load::{DrawHistory, DrawRecord};
pub use stats::ChiSquareResult;
pub use tally::{FrequencyTable, SectionTally, TopN};
