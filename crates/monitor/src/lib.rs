//! # Disease Monitor Analysis Engine
//!
//! Heuristic screening of medical photos, reports and mail messages.
//! A photo is reduced to colour and texture features, assigned to a body
//! category (skin, dental or chest) and matched to a likely condition with
//! a confidence and severity. Reports are matched against a catalog of
//! common infections by keyword.
//!
//! The scoring is deliberately simple and partly random. It is a demo of the
//! pipeline, not a diagnostic model.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use monitor::{Pipeline, SeededRandom, decode_image_file};
//!
//! let pipeline = Pipeline::builder().build();
//! let image = decode_image_file("tooth_photo.jpg")?;
//!
//! let mut rng = SeededRandom::new(7);
//! let result = pipeline.analyze_photo(&image, Some("tooth_photo.jpg"), &mut rng)?;
//! println!("{} ({:.0}%)", result.primary_disease, result.confidence * 100.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use monitor::{Pipeline, WeightedDiseaseSelector};
//!
//! let pipeline = Pipeline::builder()
//!     .with_sample_stride(2)
//!     .with_edge_threshold(40)
//!     .set_selector(WeightedDiseaseSelector)
//!     .build();
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod random;
pub mod catalog;
pub mod algorithms;
pub mod report;
pub mod email;
pub mod config;
pub mod slots;
pub mod pipeline;
pub mod io;
pub mod manager;

// Re-exports for convenience
pub use error::{MonitorError, Result};
pub use types::*;
pub use traits::*;
pub use random::{RandomSource, ScriptedRandom, SeededRandom, ThreadRandom};
pub use algorithms::*;
pub use report::ReportTextClassifier;
pub use email::{EmailMessage, InboxReport, MailSession, analyze_emails, demo_emails};
pub use config::PipelineSettings;
pub use pipeline::{Pipeline, builder::PipelineBuilder};
pub use io::*;
pub use manager::{MonitorCommand, MonitorOutcome, MonitorService};
