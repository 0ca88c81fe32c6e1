pub mod aggregate;
pub mod color;
pub mod duration;
pub mod etl;
pub mod export;
pub mod ingest;
pub mod reader;
pub mod report;
pub mod roster;

pub use crate::domain::model::{BatchReport, Extraction};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
