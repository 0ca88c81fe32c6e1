use crate::config::{default_output_formats, DEFAULT_CHART_TITLE, DEFAULT_OUTPUT_PATH};
use crate::core::ConfigProvider;
use crate::domain::model::ColumnSpec;
use crate::utils::error::{HoursError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub report: ReportConfig,
    pub roster: RosterConfig,
    #[serde(default)]
    pub columns: ColumnSpec,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_chart_title")]
    pub chart_title: String,
    #[serde(default = "default_true")]
    pub sort_by_hours_descending: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            chart_title: default_chart_title(),
            sort_by_hours_descending: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    pub technicians: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_output_formats")]
    pub output_formats: Vec<String>,
    #[serde(default)]
    pub bundle: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            output_formats: default_output_formats(),
            bundle: false,
        }
    }
}

fn default_chart_title() -> String {
    DEFAULT_CHART_TITLE.to_string()
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_true() -> bool {
    true
}

impl TomlConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HoursError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses the configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HoursError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` placeholders with environment values; unknown ones are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HoursError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_roster("roster.technicians", &self.roster.technicians)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;
        validation::validate_non_empty_string("columns.technician", &self.columns.technician)?;
        validation::validate_non_empty_string("columns.work_order", &self.columns.work_order)?;
        validation::validate_non_empty_string("columns.duration", &self.columns.duration)?;
        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_files(&self) -> &[String] {
        &self.input.files
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn chart_title(&self) -> &str {
        &self.report.chart_title
    }

    fn sort_by_hours_descending(&self) -> bool {
        self.report.sort_by_hours_descending
    }

    fn roster(&self) -> &[String] {
        &self.roster.technicians
    }

    fn columns(&self) -> ColumnSpec {
        self.columns.clone()
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn bundle_outputs(&self) -> bool {
        self.load.bundle
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
