use tracing::{debug, info};
use crate::{
    catalog::{
        CHEST_FILENAME_KEYWORDS, DENTAL_FILENAME_KEYWORDS, ORGAN_FILENAME_KEYWORDS,
        SKIN_FILENAME_KEYWORDS,
    },
    random::RandomSource,
    traits::CategoryClassifier,
    types::{CategoryLabel, ImageFeatures},
};

/// Probability above which a category is chosen without a draw
pub const DECISIVE_PROBABILITY: f64 = 0.6;

/// Result of inspecting an upload's filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameHint {
    /// The name settles the category
    Category(CategoryLabel),
    /// Internal-organ keyword: let the image decide
    AnalyzeContent,
    NoHint,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Case-insensitive keyword scan, dental before chest before organ before skin
pub fn filename_hint(name: &str) -> FilenameHint {
    let name = name.to_lowercase();
    if contains_any(&name, DENTAL_FILENAME_KEYWORDS) {
        FilenameHint::Category(CategoryLabel::Dental)
    } else if contains_any(&name, CHEST_FILENAME_KEYWORDS) {
        FilenameHint::Category(CategoryLabel::Chest)
    } else if contains_any(&name, ORGAN_FILENAME_KEYWORDS) {
        FilenameHint::AnalyzeContent
    } else if contains_any(&name, SKIN_FILENAME_KEYWORDS) {
        FilenameHint::Category(CategoryLabel::Skin)
    } else {
        FilenameHint::NoHint
    }
}

/// Raw integer evidence per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryScores {
    pub skin: i32,
    pub dental: i32,
    pub chest: i32,
}

impl CategoryScores {
    pub fn total(&self) -> i32 {
        self.skin + self.dental + self.chest
    }

    /// Normalised `(chest, dental, skin)` probabilities, `None` when there is
    /// no usable evidence. A negative total still normalises, so a lone
    /// penalty can flip a probability past the decisive threshold.
    pub fn probabilities(&self) -> Option<(f64, f64, f64)> {
        let total = self.total();
        if total == 0 || (self.skin == 0 && self.dental == 0 && self.chest == 0) {
            return None;
        }
        let total = total as f64;
        Some((
            self.chest as f64 / total,
            self.dental as f64 / total,
            self.skin as f64 / total,
        ))
    }
}

fn between(value: f64, low: f64, high: f64) -> bool {
    value > low && value < high
}

/// Score the three categories from image features
pub fn score_categories(f: &ImageFeatures) -> CategoryScores {
    let mut scores = CategoryScores::default();

    // Radiograph-like: grey and dark
    let grayscale = f.avg_saturation < 0.25;
    let dark_background = f.dark_ratio > 0.3 && f.brightness < 120.0;
    if grayscale && dark_background {
        scores.chest += 60;
    }
    if f.avg_saturation < 0.2 {
        scores.chest += 50;
    }
    if f.brightness < 100.0 {
        scores.chest += 40;
    }
    if between(f.dark_ratio, 0.4, 0.7) {
        scores.chest += 35;
    }
    if f.contrast < 50.0 {
        scores.chest += 25;
    }
    if f.color_variance < 800.0 {
        scores.chest += 20;
    }
    if !f.is_portrait && f.is_square {
        scores.chest += 15;
    }
    if grayscale {
        scores.skin -= 30;
        scores.dental -= 30;
    }

    // Teeth and gums
    let white_teeth = between(f.white_ratio, 0.15, 0.5);
    let pink_gums = between(f.pink_ratio, 0.12, 0.35);
    let high_contrast = between(f.contrast, 60.0, 150.0);
    let red_gums = between(f.red_ratio, 0.15, 0.4);
    if white_teeth && (pink_gums || red_gums) {
        scores.dental += 50;
    }
    if white_teeth {
        scores.dental += 35;
    }
    if pink_gums {
        scores.dental += 30;
    }
    if red_gums {
        scores.dental += 25;
    }
    if high_contrast {
        scores.dental += 25;
    }
    if between(f.color_variance, 1000.0, 5000.0) {
        scores.dental += 20;
    }
    if f.is_portrait {
        scores.dental += 15;
    }
    if between(f.edge_density, 0.15, 0.5) {
        scores.dental += 10;
    }
    let band_difference = (f.top_region.avg_brightness - f.middle_region.avg_brightness).abs();
    if between(band_difference, 30.0, 150.0) {
        scores.dental += 15;
    }
    if f.avg_saturation > 0.3 {
        scores.dental += 10;
    }

    if !grayscale && !white_teeth {
        let flesh_tone = (0.0..=60.0).contains(&f.avg_hue)
            && between(f.avg_saturation, 0.2, 0.7)
            && between(f.avg_value, 0.4, 0.9);
        if flesh_tone {
            scores.skin += 30;
        }
        if between(f.brightness, 80.0, 220.0) {
            scores.skin += 15;
        }
        if between(f.contrast, 40.0, 100.0) {
            scores.skin += 15;
        }
        if between(f.color_variance, 500.0, 3000.0) {
            scores.skin += 10;
        }
        if between(f.red_ratio, 0.1, 0.4) {
            scores.skin += 20;
        }
        if between(f.pink_ratio, 0.08, 0.3) {
            scores.skin += 15;
        }
        if between(f.brown_ratio, 0.15, 0.5) {
            scores.skin += 20;
        }
        if between(f.edge_density, 0.1, 0.4) {
            scores.skin += 10;
        }
        if f.is_portrait || f.is_square {
            scores.skin += 5;
        }
        if f.white_ratio < 0.2 {
            scores.skin += 10;
        }
    }

    if grayscale {
        scores.skin = (scores.skin - 40).max(0);
    }
    if white_teeth && pink_gums {
        scores.skin = (scores.skin - 30).max(0);
    }

    scores
}

/// Prior used when the image gives no evidence: 70% skin, 15% dental, 15% chest
pub fn weighted_random_category(rng: &mut dyn RandomSource) -> CategoryLabel {
    let r = rng.next_f64();
    if r < 0.7 {
        CategoryLabel::Skin
    } else if r < 0.85 {
        CategoryLabel::Dental
    } else {
        CategoryLabel::Chest
    }
}

/// Turn scores into a label. Draws at most once.
pub fn decide_category(scores: &CategoryScores, rng: &mut dyn RandomSource) -> CategoryLabel {
    let Some((chest, dental, skin)) = scores.probabilities() else {
        let category = weighted_random_category(rng);
        info!("🎲 No category evidence, weighted random pick: {}", category);
        return category;
    };

    if chest > DECISIVE_PROBABILITY {
        return CategoryLabel::Chest;
    }
    if dental > DECISIVE_PROBABILITY {
        return CategoryLabel::Dental;
    }
    if skin > DECISIVE_PROBABILITY {
        return CategoryLabel::Skin;
    }

    let r = rng.next_f64();
    if r < chest {
        CategoryLabel::Chest
    } else if r < chest + dental {
        CategoryLabel::Dental
    } else {
        CategoryLabel::Skin
    }
}

/// Rule-based classifier over the colour and texture heuristics
#[derive(Debug, Clone, Default)]
pub struct HeuristicCategoryClassifier;

impl CategoryClassifier for HeuristicCategoryClassifier {
    fn classify(&self, features: &ImageFeatures, rng: &mut dyn RandomSource) -> CategoryLabel {
        let scores = score_categories(features);
        debug!(skin = scores.skin, dental = scores.dental, chest = scores.chest, "Category scores");
        let category = decide_category(&scores, rng);
        info!("🏷️ Classified image as {}", category);
        category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    #[test]
    fn test_filename_hint_order() {
        assert_eq!(filename_hint("tooth_image.png"), FilenameHint::Category(CategoryLabel::Dental));
        assert_eq!(filename_hint("Chest-XRAY.jpg"), FilenameHint::Category(CategoryLabel::Chest));
        assert_eq!(filename_hint("kidney_scan.png"), FilenameHint::AnalyzeContent);
        assert_eq!(filename_hint("mole_left_arm.jpg"), FilenameHint::Category(CategoryLabel::Skin));
        assert_eq!(filename_hint("IMG_0042.jpg"), FilenameHint::NoHint);
        // Dental keywords win over chest ones
        assert_eq!(filename_hint("oral_lung.png"), FilenameHint::Category(CategoryLabel::Dental));
    }

    #[test]
    fn test_black_image_scores() {
        let features = ImageFeatures {
            width: 10,
            height: 10,
            aspect_ratio: 1.0,
            is_square: true,
            dark_ratio: 1.0,
            ..ImageFeatures::default()
        };
        let scores = score_categories(&features);
        assert_eq!(scores, CategoryScores { skin: 0, dental: -30, chest: 210 });

        let mut rng = ScriptedRandom::constant(0.99);
        assert_eq!(decide_category(&scores, &mut rng), CategoryLabel::Chest);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_zero_scores_use_weighted_prior() {
        let scores = CategoryScores::default();
        let pick = |r: f64| decide_category(&scores, &mut ScriptedRandom::constant(r));
        assert_eq!(pick(0.1), CategoryLabel::Skin);
        assert_eq!(pick(0.75), CategoryLabel::Dental);
        assert_eq!(pick(0.9), CategoryLabel::Chest);
    }

    #[test]
    fn test_negative_total_still_normalises() {
        // Bright grey square: chest evidence plus the grayscale penalty
        let features = ImageFeatures {
            width: 10,
            height: 10,
            aspect_ratio: 1.0,
            is_square: true,
            avg_saturation: 0.22,
            brightness: 150.0,
            contrast: 55.0,
            color_variance: 900.0,
            ..ImageFeatures::default()
        };
        let scores = score_categories(&features);
        assert_eq!(scores, CategoryScores { skin: 0, dental: -30, chest: 15 });

        let (chest, dental, _) = scores.probabilities().unwrap();
        assert!((chest + 1.0).abs() < 1e-12);
        assert!((dental - 2.0).abs() < 1e-12);

        for r in [0.1, 0.5, 0.9] {
            let mut rng = ScriptedRandom::constant(r);
            assert_eq!(decide_category(&scores, &mut rng), CategoryLabel::Dental);
            assert_eq!(rng.draws(), 0);
        }
    }

    #[test]
    fn test_cancelling_scores_use_weighted_prior() {
        let scores = CategoryScores { skin: 0, dental: -30, chest: 30 };
        assert_eq!(scores.probabilities(), None);
        let mut rng = ScriptedRandom::constant(0.5);
        assert_eq!(decide_category(&scores, &mut rng), CategoryLabel::Skin);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_undecided_scores_draw_cumulatively() {
        let scores = CategoryScores { skin: 40, dental: 30, chest: 30 };
        let pick = |r: f64| decide_category(&scores, &mut ScriptedRandom::constant(r));
        assert_eq!(pick(0.1), CategoryLabel::Chest);
        assert_eq!(pick(0.5), CategoryLabel::Dental);
        assert_eq!(pick(0.65), CategoryLabel::Skin);
    }

    #[test]
    fn test_dental_features_score_dental() {
        let features = ImageFeatures {
            brightness: 150.0,
            avg_hue: 20.0,
            avg_saturation: 0.35,
            avg_value: 0.7,
            white_ratio: 0.3,
            pink_ratio: 0.2,
            red_ratio: 0.25,
            contrast: 90.0,
            color_variance: 2000.0,
            edge_density: 0.3,
            is_portrait: true,
            aspect_ratio: 0.75,
            ..ImageFeatures::default()
        };
        let scores = score_categories(&features);
        // White teeth suppress skin scoring entirely
        assert_eq!(scores.skin, 0);
        assert!(scores.dental > scores.chest);
        let mut rng = ScriptedRandom::constant(0.0);
        assert_eq!(HeuristicCategoryClassifier.classify(&features, &mut rng), CategoryLabel::Dental);
    }
}
