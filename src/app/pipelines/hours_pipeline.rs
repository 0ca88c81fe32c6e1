use crate::core::aggregate::Aggregator;
use crate::core::export::{self, OutputFormat, BUNDLE_FILE};
use crate::core::roster::{self, Roster};
use crate::core::{ingest, reader};
use crate::core::{BatchReport, ConfigProvider, Extraction, Pipeline, Storage};
use crate::domain::model::{BatchMetrics, ChartSpec, ColumnSpec, DatasetIssue, NormalizedRecord};
use crate::utils::error::{HoursError, Result};
use std::path::Path;

/// Reads labor exports through `source` and writes the report through `sink`.
pub struct HoursPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) source: S,
    pub(crate) sink: S,
    pub(crate) config: C,
    pub(crate) roster: Roster,
}

impl<S: Storage, C: ConfigProvider> HoursPipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        let roster = Roster::new(config.roster());
        Self {
            source,
            sink,
            config,
            roster,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    async fn ingest_file(&self, path: &str, columns: &ColumnSpec) -> Result<Vec<NormalizedRecord>> {
        let name = dataset_name(path);
        let bytes = self
            .source
            .read_file(path)
            .await
            .map_err(|e| HoursError::dataset_read(&name, e))?;
        let dataset = reader::read_dataset(&name, &bytes)?;
        ingest::ingest(&dataset, columns)
    }
}

fn dataset_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string()
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for HoursPipeline<S, C> {
    async fn extract(&self) -> Result<Extraction> {
        let columns = self.config.columns();
        let mut extraction = Extraction::default();

        for path in self.config.input_files() {
            tracing::debug!("Processing dataset: {}", path);
            match self.ingest_file(path, &columns).await {
                Ok(rows) => {
                    extraction.datasets_ingested += 1;
                    extraction.rows.extend(rows);
                }
                Err(e) if e.is_dataset_scoped() => {
                    tracing::warn!("{}", e.user_friendly_message());
                    extraction.issues.push(DatasetIssue {
                        dataset: dataset_name(path),
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(extraction)
    }

    async fn transform(&self, data: Extraction) -> Result<BatchReport> {
        if data.rows.is_empty() {
            tracing::info!(
                "No valid rows after ingesting {} datasets ({} skipped)",
                data.datasets_ingested,
                data.issues.len()
            );
            return Err(HoursError::EmptyBatchError);
        }

        let mut aggregator = Aggregator::new();
        aggregator.extend(&data.rows);
        let rows_seen = aggregator.rows_seen();
        let totals = aggregator.finish();
        tracing::debug!("Aggregated {} rows into {} technicians", rows_seen, totals.len());

        let outcome = roster::merge(
            &self.roster,
            &totals,
            self.config.sort_by_hours_descending(),
        );

        let metrics = BatchMetrics::from_summary(&outcome.summary);
        let chart = ChartSpec::from_summary(self.config.chart_title(), &outcome.summary);

        Ok(BatchReport {
            summary: outcome.summary,
            metrics,
            chart,
            issues: data.issues,
            unrostered: outcome.unrostered,
        })
    }

    async fn load(&self, report: BatchReport) -> Result<String> {
        let formats = self
            .config
            .output_formats()
            .iter()
            .map(|f| OutputFormat::parse(f))
            .collect::<Result<Vec<_>>>()?;

        let mut files = Vec::with_capacity(formats.len());
        for format in formats {
            let name = format.file_name(&report);
            let data = format.render(&report)?;
            tracing::debug!("Rendered {} ({} bytes)", name, data.len());
            files.push((name, data));
        }

        if self.config.bundle_outputs() {
            let zip_data = export::bundle(&files)?;
            tracing::debug!("Writing ZIP bundle ({} bytes) to storage", zip_data.len());
            self.sink.write_file(BUNDLE_FILE, &zip_data).await?;
            return Ok(format!("{}/{}", self.config.output_path(), BUNDLE_FILE));
        }

        for (name, data) in &files {
            self.sink.write_file(name, data).await?;
        }

        let primary = files
            .first()
            .map(|(name, _)| format!("{}/{}", self.config.output_path(), name))
            .unwrap_or_else(|| self.config.output_path().to_string());
        Ok(primary)
    }
}
