use crate::domain::model::{BatchReport, ColumnSpec, Extraction};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_files(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn chart_title(&self) -> &str;
    fn sort_by_hours_descending(&self) -> bool;
    fn roster(&self) -> &[String];
    fn columns(&self) -> ColumnSpec;
    fn output_formats(&self) -> &[String];
    fn bundle_outputs(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Extraction>;
    async fn transform(&self, data: Extraction) -> Result<BatchReport>;
    async fn load(&self, report: BatchReport) -> Result<String>;
}
