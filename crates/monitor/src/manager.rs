use std::{
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    email::{EmailMessage, InboxReport, MailSession, analyze_emails},
    error::{MonitorError, Result},
    io::decode_image_bytes,
    pipeline::Pipeline,
    random::{RandomSource, ThreadRandom},
    slots::{ResultSlot, Ticket},
    types::{AnalysisResult, FileDescriptor, ReportResult, Submission},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr, VariantNames};
use tracing::{info, warn};

#[derive(
    Debug, Clone,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter, VariantNames, IntoStaticStr,
    PartialEq
)]
#[serde(tag = "type", content = "params")]
#[strum(serialize_all = "snake_case")]
pub enum MonitorCommand {
    /// Analyse a photo of skin, teeth or a chest X-ray
    #[serde(rename = "analyze_photo")]
    AnalyzePhoto {
        #[schemars(length(min = 1))]
        path: String,
        /// Name used for the keyword fast path instead of the file's own
        #[serde(default)]
        filename_hint: Option<String>,
    },

    /// Classify a medical report document (PDF or text)
    #[serde(rename = "analyze_report")]
    AnalyzeReport {
        #[schemars(length(min = 1))]
        path: String,
    },

    /// Scan mail messages for disease mentions
    #[serde(rename = "analyze_emails")]
    AnalyzeEmails {
        /// JSON array of messages; the demo inbox when absent
        #[serde(default)]
        path: Option<String>,
        #[schemars(range(min = 1, max = 100))]
        count: usize,
    },
}

impl MonitorCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(MonitorCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }

    /// Get a description of the command
    pub fn description(&self) -> &'static str {
        match self {
            Self::AnalyzePhoto { .. } => "Classify a photo into skin, dental or chest and pick a likely condition",
            Self::AnalyzeReport { .. } => "Match a report's text against known infections and their treatment advice",
            Self::AnalyzeEmails { .. } => "Find disease mentions in mail messages and summarise them per category",
        }
    }

    /// Get parameter requirements for the command
    pub fn parameters_info(&self) -> Vec<(&'static str, &'static str, bool)> {
        match self {
            Self::AnalyzePhoto { .. } => vec![
                ("path", "Path of the image file (PNG, JPEG or TIFF)", true),
                ("filename_hint", "Name to use for keyword hints instead of the file name", false),
            ],
            Self::AnalyzeReport { .. } => vec![
                ("path", "Path of the report (PDF or plain text)", true),
            ],
            Self::AnalyzeEmails { .. } => vec![
                ("path", "JSON file holding an array of messages; demo inbox when omitted", false),
                ("count", "Maximum number of messages to analyse", true),
            ],
        }
    }
}

/// Result of one executed command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "result", rename_all = "snake_case")]
pub enum MonitorOutcome {
    Photo(Submission<AnalysisResult>),
    Report(Submission<ReportResult>),
    Emails(InboxReport),
    /// A newer request of the same kind finished first
    Superseded,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|error| match error.kind() {
        std::io::ErrorKind::NotFound => MonitorError::MissingFile {
            path: path.display().to_string(),
        },
        _ => MonitorError::Io(error),
    })
}

/// Runs analyses off the async executor and keeps the latest photo and
/// report results.
#[derive(Clone)]
pub struct MonitorService {
    pipeline: Arc<Pipeline>,
    rng: Arc<Mutex<Box<dyn RandomSource>>>,
    photos: Arc<ResultSlot<Submission<AnalysisResult>>>,
    reports: Arc<ResultSlot<Submission<ReportResult>>>,
}

impl MonitorService {
    pub fn new() -> Self {
        Self::with_pipeline(Pipeline::builder().build(), Box::new(ThreadRandom))
    }

    /// Create a service with a custom pipeline and random source
    pub fn with_pipeline(pipeline: Pipeline, rng: Box<dyn RandomSource>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            rng: Arc::new(Mutex::new(rng)),
            photos: Arc::new(ResultSlot::new()),
            reports: Arc::new(ResultSlot::new()),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    fn settle<T: Clone>(slot: &ResultSlot<T>, ticket: Ticket, value: T) -> Option<T> {
        if slot.complete(ticket, value.clone()) {
            Some(value)
        } else {
            warn!("Discarding result of superseded request #{}", ticket.generation());
            None
        }
    }

    async fn run_photo(
        &self,
        descriptor: FileDescriptor,
        hint: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<Option<Submission<AnalysisResult>>> {
        let ticket = self.photos.begin();
        self.finish_photo(ticket, descriptor, hint, bytes).await
    }

    async fn finish_photo(
        &self,
        ticket: Ticket,
        descriptor: FileDescriptor,
        hint: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<Option<Submission<AnalysisResult>>> {
        let pipeline = Arc::clone(&self.pipeline);
        let rng = Arc::clone(&self.rng);

        let analysis = tokio::task::spawn_blocking(move || -> Result<AnalysisResult> {
            let image = decode_image_bytes(&bytes)?;
            let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
            pipeline.analyze_photo(&image, hint.as_deref(), rng.as_mut())
        })
        .await??;

        let submission = Submission {
            files: vec![descriptor],
            analysis,
        };
        Ok(Self::settle(&self.photos, ticket, submission))
    }

    /// Analyse an uploaded photo; `name` doubles as the filename hint.
    /// `Ok(None)` means a newer photo request completed the slot instead.
    pub async fn analyze_photo_bytes(
        &self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Option<Submission<AnalysisResult>>> {
        let name = name.into();
        let descriptor = FileDescriptor::new(name.clone(), bytes.len() as u64);
        self.run_photo(descriptor, Some(name), bytes).await
    }

    pub async fn analyze_photo_file(
        &self,
        path: impl AsRef<Path>,
        filename_hint: Option<String>,
    ) -> Result<Option<Submission<AnalysisResult>>> {
        let path = path.as_ref();
        let bytes = read_input(path).await?;
        let name = file_name(path);
        info!("📷 Analysing photo {}", path.display());
        let descriptor = FileDescriptor::new(name.clone(), bytes.len() as u64);
        self.run_photo(descriptor, Some(filename_hint.unwrap_or(name)), bytes)
            .await
    }

    /// Classify an uploaded report. Unreadable documents degrade to the
    /// general result instead of failing.
    pub async fn analyze_report_bytes(
        &self,
        name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Option<Submission<ReportResult>>> {
        let name = name.into();
        let ticket = self.reports.begin();
        let descriptor = FileDescriptor::new(name.clone(), bytes.len() as u64);
        let pipeline = Arc::clone(&self.pipeline);
        let rng = Arc::clone(&self.rng);

        let analysis = tokio::task::spawn_blocking(move || {
            let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
            pipeline.analyze_report_bytes(&bytes, &name, rng.as_mut())
        })
        .await?;

        let submission = Submission {
            files: vec![descriptor],
            analysis,
        };
        Ok(Self::settle(&self.reports, ticket, submission))
    }

    pub async fn analyze_report_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Option<Submission<ReportResult>>> {
        let path = path.as_ref();
        let bytes = read_input(path).await?;
        info!("📄 Analysing report {}", path.display());
        self.analyze_report_bytes(file_name(path), bytes).await
    }

    /// Scan at most `count` messages
    pub fn analyze_emails(&self, messages: &[EmailMessage], count: usize) -> InboxReport {
        let messages = &messages[..count.min(messages.len())];
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        analyze_emails(messages, rng.as_mut())
    }

    /// Load messages from a JSON array on disk
    pub async fn load_emails(&self, path: impl AsRef<Path>) -> Result<Vec<EmailMessage>> {
        let bytes = read_input(path.as_ref()).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Messages for a session that needs no mail API
    pub fn session_emails(&self, session: &MailSession, count: usize) -> Result<Vec<EmailMessage>> {
        session
            .offline_messages(count)
            .ok_or_else(|| MonitorError::InvalidParameter {
                parameter: "mail_session".to_string(),
                value: "token sessions need messages fetched by the mail client".to_string(),
            })
    }

    pub fn latest_photo(&self) -> Option<Submission<AnalysisResult>> {
        self.photos.latest()
    }

    pub fn latest_report(&self) -> Option<Submission<ReportResult>> {
        self.reports.latest()
    }

    pub async fn execute(&self, command: MonitorCommand) -> Result<MonitorOutcome> {
        let outcome = match command {
            MonitorCommand::AnalyzePhoto { path, filename_hint } => self
                .analyze_photo_file(&path, filename_hint)
                .await?
                .map_or(MonitorOutcome::Superseded, MonitorOutcome::Photo),
            MonitorCommand::AnalyzeReport { path } => self
                .analyze_report_file(&path)
                .await?
                .map_or(MonitorOutcome::Superseded, MonitorOutcome::Report),
            MonitorCommand::AnalyzeEmails { path, count } => {
                let messages = match path {
                    Some(path) => self.load_emails(&path).await?,
                    None => self.session_emails(&MailSession::Demo, count)?,
                };
                MonitorOutcome::Emails(self.analyze_emails(&messages, count))
            }
        };
        Ok(outcome)
    }
}

impl Default for MonitorService {
    fn default() -> Self {
        Self::new()
    }
}
