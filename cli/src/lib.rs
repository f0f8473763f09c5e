use monitor::{
    AnalysisResult, InboxReport, MonitorCommand, MonitorError, MonitorOutcome, PipelineSettings,
    ReportResult, Submission,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),
    #[error(transparent)]
    TomlDeError(#[from] toml::de::Error),
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Monitor(#[from] MonitorError),
    #[error("Batch lists no photos, reports or email sources")]
    EmptyBatch,
    #[error("Unsupported file format. Please use .toml or .json files")]
    UnsupportedFileFormat,
}

fn default_email_count() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PhotoEntry {
    pub path: String,
    /// Overrides the file name for keyword hints
    #[serde(default)]
    pub filename_hint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ReportEntry {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EmailEntry {
    /// JSON array of messages; the demo inbox when absent
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_email_count")]
    pub count: usize,
}

/// Batch run configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BatchConfig {
    #[serde(default)]
    pub settings: PipelineSettings,
    /// Where to write the JSON results; stdout when absent
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub photos: Vec<PhotoEntry>,
    #[serde(default)]
    pub reports: Vec<ReportEntry>,
    #[serde(default)]
    pub emails: Vec<EmailEntry>,
}

impl BatchConfig {
    /// Load BatchConfig from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, BatchError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load BatchConfig from TOML string
    pub fn from_toml(content: &str) -> Result<Self, BatchError> {
        let config: BatchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load BatchConfig from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, BatchError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load BatchConfig from JSON string
    pub fn from_json(content: &str) -> Result<Self, BatchError> {
        let config: BatchConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Auto-detect file format and load configuration
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, BatchError> {
        let path_ref = path.as_ref();
        match path_ref.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(BatchError::UnsupportedFileFormat),
        }
    }

    fn validate(&self) -> Result<(), BatchError> {
        if self.photos.is_empty() && self.reports.is_empty() && self.emails.is_empty() {
            return Err(BatchError::EmptyBatch);
        }
        self.settings.validate()?;
        Ok(())
    }

    /// One command per entry: photos, then reports, then email sources
    pub fn commands(&self) -> Vec<MonitorCommand> {
        let photos = self.photos.iter().map(|photo| MonitorCommand::AnalyzePhoto {
            path: photo.path.clone(),
            filename_hint: photo.filename_hint.clone(),
        });
        let reports = self.reports.iter().map(|report| MonitorCommand::AnalyzeReport {
            path: report.path.clone(),
        });
        let emails = self.emails.iter().map(|entry| MonitorCommand::AnalyzeEmails {
            path: entry.path.clone(),
            count: entry.count,
        });
        photos.chain(reports).chain(emails).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchFailure {
    pub command: String,
    pub message: String,
}

/// Everything a batch run produced
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchResults {
    pub photos: Vec<Submission<AnalysisResult>>,
    pub reports: Vec<Submission<ReportResult>>,
    pub inboxes: Vec<InboxReport>,
    pub failures: Vec<BatchFailure>,
}

impl BatchResults {
    pub fn record(&mut self, command: &MonitorCommand, outcome: Result<MonitorOutcome, MonitorError>) {
        match outcome {
            Ok(MonitorOutcome::Photo(submission)) => self.photos.push(submission),
            Ok(MonitorOutcome::Report(submission)) => self.reports.push(submission),
            Ok(MonitorOutcome::Emails(report)) => self.inboxes.push(report),
            Ok(MonitorOutcome::Superseded) => {}
            Err(error) => self.failures.push(BatchFailure {
                command: format!("{}: {}", command, command.description()),
                message: error.user_message(),
            }),
        }
    }

    /// Save results as pretty JSON
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), BatchError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, BatchError> {
        Ok(serde_json::to_string_pretty(&self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATCH_TOML: &str = r#"
output = "results.json"

[settings]
sample_stride = 3
seed = 42

[[photos]]
path = "photos/left_arm.jpg"

[[photos]]
path = "photos/IMG_0042.png"
filename_hint = "teeth"

[[reports]]
path = "reports/discharge.pdf"

[[emails]]
count = 2
"#;

    #[test]
    fn test_batch_from_toml() {
        let config = BatchConfig::from_toml(BATCH_TOML).unwrap();
        assert_eq!(config.settings.sample_stride, 3);
        assert_eq!(config.settings.seed, Some(42));
        assert_eq!(config.settings.edge_threshold, 50);
        assert_eq!(config.photos[1].filename_hint.as_deref(), Some("teeth"));
        assert_eq!(config.emails[0].path, None);

        let commands = config.commands();
        assert_eq!(commands.len(), 4);
        assert_eq!(
            commands[3],
            MonitorCommand::AnalyzeEmails { path: None, count: 2 }
        );
    }

    #[test]
    fn test_batch_from_json_defaults_email_count() {
        let config = BatchConfig::from_json(r#"{"emails": [{"path": "inbox.json"}]}"#).unwrap();
        assert_eq!(config.emails[0].count, 10);
        assert_eq!(config.output, None);
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        assert!(matches!(BatchConfig::from_json("{}"), Err(BatchError::EmptyBatch)));
        assert!(matches!(
            BatchConfig::from_file("batch.yaml"),
            Err(BatchError::UnsupportedFileFormat)
        ));
    }

    #[test]
    fn test_failures_are_recorded_with_user_message() {
        let mut results = BatchResults::default();
        let command = MonitorCommand::AnalyzeReport { path: "missing.pdf".to_string() };
        results.record(
            &command,
            Err(MonitorError::MissingFile { path: "missing.pdf".to_string() }),
        );
        assert_eq!(results.failures.len(), 1);
        assert!(results.failures[0].command.starts_with("analyze_report"));
        assert!(results.failures[0].message.contains("missing.pdf"));
    }
}
