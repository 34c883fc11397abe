pub mod config;
pub mod error;
pub mod export;
pub mod indicators;
pub mod process;
pub mod schema;
pub mod series;
pub mod transform;

pub use config::Settings;
pub use error::LoadError;
pub use indicators::{build_daily, build_monthly, Assembled, IndicatorSet, IndicatorTable};
pub use process::{CleanedTable, LoadedTable, SourceLoader};
pub use series::Series;
