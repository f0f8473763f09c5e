use image::RgbaImage;
use crate::{
    error::Result,
    random::RandomSource,
    types::{CategoryLabel, Disease, ImageFeatures},
};

/// Trait for turning a decoded image into summary features
pub trait FeatureExtractor: Send + Sync {
    /// Compute the feature record for an RGBA image
    fn extract(&self, image: &RgbaImage) -> Result<ImageFeatures>;
}

/// Trait for category classification algorithms
pub trait CategoryClassifier: Send + Sync {
    /// Assign the image to one category, drawing from `rng` when undecided
    fn classify(&self, features: &ImageFeatures, rng: &mut dyn RandomSource) -> CategoryLabel;
}

/// Trait for picking a disease within a category
pub trait DiseaseSelector: Send + Sync {
    /// Select one disease from the category's catalog
    fn select(
        &self,
        category: CategoryLabel,
        features: &ImageFeatures,
        rng: &mut dyn RandomSource,
    ) -> Disease;
}

/// Trait for document text extraction services
pub trait TextExtractor: Send + Sync {
    /// Extract readable text from raw document bytes
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}
