use crate::{
    algorithms::{
        DEFAULT_EDGE_THRESHOLD, DEFAULT_SAMPLE_STRIDE, HeuristicCategoryClassifier,
        StridedFeatureExtractor, WeightedDiseaseSelector,
    },
    config::PipelineSettings,
    pipeline::Pipeline,
    report::{DEFAULT_PREVIEW_CHARS, ReportTextClassifier},
    traits::{CategoryClassifier, DiseaseSelector, FeatureExtractor},
};

const DEFAULT_SYMPTOM_COUNT: usize = 3;

/// Builder for creating analysis pipelines with a fluent API
pub struct PipelineBuilder {
    feature_extractor: Option<Box<dyn FeatureExtractor>>,
    classifier: Option<Box<dyn CategoryClassifier>>,
    selector: Option<Box<dyn DiseaseSelector>>,
    sample_stride: usize,
    edge_threshold: u32,
    preview_chars: usize,
    symptom_count: usize,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            feature_extractor: None,
            classifier: None,
            selector: None,
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            symptom_count: DEFAULT_SYMPTOM_COUNT,
        }
    }

    /// Builder preloaded with the values from `settings`
    pub fn from_settings(settings: &PipelineSettings) -> Self {
        Self::new()
            .with_sample_stride(settings.sample_stride)
            .with_edge_threshold(settings.edge_threshold)
            .with_preview_chars(settings.preview_chars)
            .with_symptom_count(settings.symptom_count)
    }

    /// Set the feature extractor (replaces the strided default)
    pub fn set_feature_extractor<E>(mut self, extractor: E) -> Self
    where
        E: FeatureExtractor + 'static,
    {
        self.feature_extractor = Some(Box::new(extractor));
        self
    }

    /// Set the category classifier (replaces any existing one)
    pub fn set_classifier<C>(mut self, classifier: C) -> Self
    where
        C: CategoryClassifier + 'static,
    {
        self.classifier = Some(Box::new(classifier));
        self
    }

    /// Set the disease selector (replaces any existing one)
    pub fn set_selector<S>(mut self, selector: S) -> Self
    where
        S: DiseaseSelector + 'static,
    {
        self.selector = Some(Box::new(selector));
        self
    }

    /// Sampling stride of the default feature extractor
    pub fn with_sample_stride(mut self, stride: usize) -> Self {
        self.sample_stride = stride;
        self
    }

    /// Edge threshold of the default feature extractor
    pub fn with_edge_threshold(mut self, threshold: u32) -> Self {
        self.edge_threshold = threshold;
        self
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    pub fn with_symptom_count(mut self, count: usize) -> Self {
        self.symptom_count = count;
        self
    }

    /// Build the pipeline with default components if not specified
    pub fn build(self) -> Pipeline {
        let feature_extractor = self.feature_extractor.unwrap_or_else(|| {
            Box::new(StridedFeatureExtractor {
                stride: self.sample_stride,
                edge_threshold: self.edge_threshold,
            })
        });

        let classifier = self
            .classifier
            .unwrap_or_else(|| Box::new(HeuristicCategoryClassifier));

        let selector = self
            .selector
            .unwrap_or_else(|| Box::new(WeightedDiseaseSelector));

        Pipeline::new(
            feature_extractor,
            classifier,
            selector,
            ReportTextClassifier::new(self.preview_chars),
            self.symptom_count,
        )
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
