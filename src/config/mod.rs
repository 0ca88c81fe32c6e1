pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::ColumnSpec;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_CHART_TITLE: &str = "Technician Hours Summary";
pub const DEFAULT_OUTPUT_PATH: &str = "./output";

pub fn default_output_formats() -> Vec<String> {
    vec!["csv".to_string(), "xlsx".to_string(), "json".to_string()]
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "tech-hours")]
#[command(about = "Summarize technician labor hours from spreadsheet exports")]
pub struct CliConfig {
    /// Labor export files (csv, tsv, json, xlsx, xls, xlsb, ods)
    pub inputs: Vec<String>,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_CHART_TITLE)]
    pub chart_title: String,

    #[arg(long, help = "Keep roster order instead of sorting by total hours")]
    pub no_sort: bool,

    #[arg(long, value_delimiter = ',', help = "Comma-separated technician roster")]
    pub roster: Vec<String>,

    #[arg(long, value_delimiter = ',', default_values = ["csv", "xlsx", "json"])]
    pub formats: Vec<String>,

    #[arg(long, help = "Bundle every output into a single ZIP archive")]
    pub bundle: bool,

    #[arg(long, default_value = "Technician")]
    pub technician_column: String,

    #[arg(long, default_value = "Work order for labor reporting")]
    pub work_order_column: String,

    #[arg(long, default_value = "Labor reporting time (duration)")]
    pub duration_column: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_files(&self) -> &[String] {
        &self.inputs
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn chart_title(&self) -> &str {
        &self.chart_title
    }

    fn sort_by_hours_descending(&self) -> bool {
        !self.no_sort
    }

    fn roster(&self) -> &[String] {
        &self.roster
    }

    fn columns(&self) -> ColumnSpec {
        ColumnSpec {
            technician: self.technician_column.clone(),
            work_order: self.work_order_column.clone(),
            duration: self.duration_column.clone(),
        }
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn bundle_outputs(&self) -> bool {
        self.bundle
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_roster("roster", &self.roster)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("formats", &self.formats)?;
        for (field, value) in [
            ("technician_column", &self.technician_column),
            ("work_order_column", &self.work_order_column),
            ("duration_column", &self.duration_column),
        ] {
            validation::validate_non_empty_string(field, value)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config =
            CliConfig::parse_from(["tech-hours", "--roster", "SRIJAN,rohit", "week1.xlsx"]);

        assert_eq!(config.inputs, vec!["week1.xlsx"]);
        assert_eq!(config.roster, vec!["SRIJAN", "rohit"]);
        assert_eq!(config.formats, vec!["csv", "xlsx", "json"]);
        assert_eq!(config.chart_title(), "Technician Hours Summary");
        assert!(config.sort_by_hours_descending());
        assert_eq!(config.columns(), ColumnSpec::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_requires_roster() {
        let config = CliConfig::parse_from(["tech-hours", "week1.xlsx"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_accepts_any_input_name() {
        // unreadable inputs are skipped per dataset at run time
        let config =
            CliConfig::parse_from(["tech-hours", "--roster", "A", "good.xlsx", "notes.txt"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_formats_are_case_insensitive() {
        let config = CliConfig::parse_from(["tech-hours", "--roster", "A", "--formats", "CSV,Json"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let config = CliConfig::parse_from([
            "tech-hours",
            "--roster",
            "A",
            "--no-sort",
            "--bundle",
            "--formats",
            "tsv",
            "--chart-title",
            "Crew Hours",
        ]);
        assert!(!config.sort_by_hours_descending());
        assert!(config.bundle_outputs());
        assert_eq!(config.output_formats(), &["tsv".to_string()]);
        assert_eq!(config.chart_title(), "Crew Hours");
    }
}
