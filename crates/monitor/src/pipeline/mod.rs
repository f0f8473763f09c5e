pub mod builder;

use std::path::Path;

use image::RgbaImage;
use tracing::info;
use crate::{
    algorithms::{FilenameHint, confidence_score, estimate_severity, filename_hint, sample_symptoms},
    catalog::profile_for,
    error::Result,
    io::{extract_text_or_degraded, extractor_for_name},
    random::RandomSource,
    report::ReportTextClassifier,
    traits::{CategoryClassifier, DiseaseSelector, FeatureExtractor},
    types::{AnalysisResult, CategoryLabel, ImageFeatures, ReportResult},
};

/// The photo and report analysis stages wired together
pub struct Pipeline {
    feature_extractor: Box<dyn FeatureExtractor>,
    classifier: Box<dyn CategoryClassifier>,
    selector: Box<dyn DiseaseSelector>,
    report_classifier: ReportTextClassifier,
    symptom_count: usize,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    pub fn new(
        feature_extractor: Box<dyn FeatureExtractor>,
        classifier: Box<dyn CategoryClassifier>,
        selector: Box<dyn DiseaseSelector>,
        report_classifier: ReportTextClassifier,
        symptom_count: usize,
    ) -> Self {
        Self {
            feature_extractor,
            classifier,
            selector,
            report_classifier,
            symptom_count,
        }
    }

    /// Summary features of a decoded image
    pub fn features(&self, image: &RgbaImage) -> Result<ImageFeatures> {
        self.feature_extractor.extract(image)
    }

    /// Category from the filename when it is conclusive, otherwise from the image
    pub fn resolve_category(
        &self,
        features: &ImageFeatures,
        filename: Option<&str>,
        rng: &mut dyn RandomSource,
    ) -> CategoryLabel {
        match filename.map(filename_hint) {
            Some(FilenameHint::Category(category)) => {
                info!("🏷️ Filename suggests {}", category);
                category
            }
            Some(FilenameHint::AnalyzeContent) => {
                info!("Filename suggests an internal organ, analysing image content");
                self.classifier.classify(features, rng)
            }
            Some(FilenameHint::NoHint) | None => self.classifier.classify(features, rng),
        }
    }

    /// Category, disease, confidence, symptoms and severity, drawn in that order
    pub fn analyze_features(
        &self,
        features: &ImageFeatures,
        filename: Option<&str>,
        rng: &mut dyn RandomSource,
    ) -> AnalysisResult {
        let category = self.resolve_category(features, filename, rng);
        let disease = self.selector.select(category, features, rng);
        let confidence = confidence_score(disease, rng);

        let profile = profile_for(category);
        let symptoms = sample_symptoms(profile.symptoms, self.symptom_count, rng);
        let severity = estimate_severity(disease, rng);

        info!(
            "🩺 {} photo: {} ({:.0}% confidence, severity {})",
            category,
            disease,
            confidence * 100.0,
            severity
        );

        AnalysisResult {
            category,
            primary_disease: disease,
            confidence,
            symptoms,
            severity,
            recommendations: profile.recommendations.iter().map(|r| r.to_string()).collect(),
        }
    }

    /// Full photo path on an already decoded image
    pub fn analyze_photo(
        &self,
        image: &RgbaImage,
        filename: Option<&str>,
        rng: &mut dyn RandomSource,
    ) -> Result<AnalysisResult> {
        let features = self.features(image)?;
        Ok(self.analyze_features(&features, filename, rng))
    }

    /// Classify already extracted report text
    pub fn analyze_report(&self, text: &str, rng: &mut dyn RandomSource) -> ReportResult {
        self.report_classifier.classify(text, rng)
    }

    /// Extract text from a report document and classify it; unreadable
    /// documents yield the general result.
    pub fn analyze_report_bytes(
        &self,
        bytes: &[u8],
        name: impl AsRef<Path>,
        rng: &mut dyn RandomSource,
    ) -> ReportResult {
        let extractor = extractor_for_name(name);
        let text = extract_text_or_degraded(extractor.as_ref(), bytes);
        self.analyze_report(&text, rng)
    }

    pub fn symptom_count(&self) -> usize {
        self.symptom_count
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "Pipeline: feature extraction, category classification, disease selection, {} symptoms, report preview {} chars",
            self.symptom_count, self.report_classifier.preview_chars
        )
    }
}
