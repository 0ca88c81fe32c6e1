use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting technician hours run");

        // Extract
        tracing::info!("Reading and ingesting datasets...");
        let extraction = self.pipeline.extract().await?;
        tracing::info!(
            "Ingested {} rows from {} datasets ({} skipped)",
            extraction.rows.len(),
            extraction.datasets_ingested,
            extraction.issues.len()
        );

        // Transform
        tracing::info!("Aggregating and reconciling against the roster...");
        let report = self.pipeline.transform(extraction).await?;
        tracing::info!(
            "Summary built for {} technicians ({:.2} total hours, {} work orders)",
            report.metrics.total_technicians,
            report.metrics.total_hours,
            report.metrics.total_work_orders
        );

        // Load
        tracing::info!("Writing outputs...");
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
