use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("No input file provided")]
    NoInputFile,

    #[error("Input file not found: {path}")]
    MissingFile { path: String },

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for a {width}x{height} RGBA image")]
    InvalidBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    #[error("Text extraction degraded: {0}")]
    ExtractionDegraded(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background analysis task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl MonitorError {
    /// Whether the pipeline can carry on with a degraded input
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MonitorError::ExtractionDegraded(_))
    }

    /// Wrap a failure so callers continue with degraded input
    pub fn into_degraded(self) -> MonitorError {
        if self.is_recoverable() {
            self
        } else {
            MonitorError::ExtractionDegraded(self.to_string())
        }
    }

    /// Message suitable for showing to the person who uploaded the file
    pub fn user_message(&self) -> String {
        match self {
            MonitorError::NoInputFile => "Please select a file to analyze first.".to_string(),
            MonitorError::MissingFile { path } => {
                format!("Could not find '{}'. Please select the file again.", path)
            }
            MonitorError::Decode(_)
            | MonitorError::InvalidBuffer { .. }
            | MonitorError::EmptyImage { .. } => {
                "Error analyzing image. Please try again.".to_string()
            }
            MonitorError::ExtractionDegraded(_) => {
                "The report text could not be read; showing a general result.".to_string()
            }
            _ => "Analysis failed. Please try again.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;
