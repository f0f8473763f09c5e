use tracing::debug;
use crate::{
    catalog::diseases_for,
    random::{RandomSource, pick_index},
    traits::DiseaseSelector,
    types::{CategoryLabel, Disease, ImageFeatures},
};

/// Normalised probability per disease, in catalog order
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseDistribution {
    entries: Vec<(Disease, f64)>,
}

fn feature_multiplier(category: CategoryLabel, disease: Disease, f: &ImageFeatures) -> f64 {
    let mut multiplier = 1.0;
    let mut boost = |condition: bool, factor: f64| {
        if condition {
            multiplier *= factor;
        }
    };

    match (category, disease) {
        (
            CategoryLabel::Skin,
            Disease::Melanoma | Disease::BasalCellCarcinoma | Disease::SquamousCellCarcinoma,
        ) => {
            boost(f.dark_ratio > 0.15, 1.5);
            boost(f.brown_ratio > 0.2, 1.3);
        }
        (CategoryLabel::Skin, Disease::VascularLesion) => {
            boost(f.red_ratio > 0.2, 1.6);
            boost(f.pink_ratio > 0.15, 1.4);
        }
        (CategoryLabel::Skin, Disease::ActinicKeratosis | Disease::SeborrheicKeratosis) => {
            boost(f.contrast > 60.0, 1.4);
            boost(f.brown_ratio > 0.15, 1.2);
        }
        (CategoryLabel::Skin, Disease::Normal) => {
            boost(f.brightness > 100.0 && f.brightness < 180.0, 1.3);
            boost(f.red_ratio < 0.1 && f.contrast < 40.0, 1.2);
        }
        (CategoryLabel::Dental, Disease::BleedingGums | Disease::GumSwelling) => {
            boost(f.red_ratio > 0.2, 1.6);
            boost(f.pink_ratio > 0.15, 1.4);
        }
        (CategoryLabel::Dental, Disease::PusDischarge) => {
            boost(f.bright_ratio > 0.3, 1.5);
            boost(f.brightness > 180.0, 1.3);
        }
        (CategoryLabel::Dental, Disease::Normal) => {
            boost(f.pink_ratio > 0.1 && f.pink_ratio < 0.2, 1.3);
        }
        (CategoryLabel::Chest, Disease::Pneumonia) => {
            boost(f.bright_ratio > 0.3, 1.5);
            boost(f.contrast < 30.0, 1.3);
        }
        (CategoryLabel::Chest, Disease::Normal) => {
            boost(f.dark_ratio > 0.4, 1.3);
        }
        _ => {}
    }

    multiplier
}

impl DiseaseDistribution {
    /// Uniform base weights adjusted by feature multipliers, then normalised
    pub fn build(category: CategoryLabel, diseases: &[Disease], features: &ImageFeatures) -> Self {
        if diseases.is_empty() {
            return Self { entries: Vec::new() };
        }

        let base = 1.0 / diseases.len() as f64;
        let mut entries: Vec<(Disease, f64)> = diseases
            .iter()
            .map(|&disease| (disease, base * feature_multiplier(category, disease, features)))
            .collect();

        let total: f64 = entries.iter().map(|(_, weight)| weight).sum();
        for (_, weight) in entries.iter_mut() {
            *weight /= total;
        }

        Self { entries }
    }

    /// Distribution over the full catalog of a category
    pub fn for_category(category: CategoryLabel, features: &ImageFeatures) -> Self {
        Self::build(category, diseases_for(category), features)
    }

    pub fn entries(&self) -> &[(Disease, f64)] {
        &self.entries
    }

    pub fn probability(&self, disease: Disease) -> f64 {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == disease)
            .map(|(_, probability)| *probability)
            .unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, probability)| probability).sum()
    }

    /// Cumulative walk with one draw; `None` when rounding leaves `r` past
    /// the last bucket.
    pub fn sample(&self, rng: &mut dyn RandomSource) -> Option<Disease> {
        let r = rng.next_f64();
        let mut cumulative = 0.0;
        for (disease, probability) in &self.entries {
            cumulative += probability;
            if r <= cumulative {
                return Some(*disease);
            }
        }
        None
    }
}

/// Feature-weighted random pick within a category's catalog
#[derive(Debug, Clone, Default)]
pub struct WeightedDiseaseSelector;

impl DiseaseSelector for WeightedDiseaseSelector {
    fn select(
        &self,
        category: CategoryLabel,
        features: &ImageFeatures,
        rng: &mut dyn RandomSource,
    ) -> Disease {
        let distribution = DiseaseDistribution::for_category(category, features);
        debug!(?category, entries = ?distribution.entries(), "Disease distribution");

        match distribution.sample(rng) {
            Some(disease) => disease,
            None => {
                let diseases = diseases_for(category);
                diseases[pick_index(rng, diseases.len())]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;
    use strum::IntoEnumIterator;

    fn sample_features() -> ImageFeatures {
        ImageFeatures {
            brightness: 140.0,
            dark_ratio: 0.2,
            brown_ratio: 0.25,
            red_ratio: 0.3,
            pink_ratio: 0.2,
            bright_ratio: 0.4,
            contrast: 70.0,
            ..ImageFeatures::default()
        }
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let features = sample_features();
        for category in CategoryLabel::iter() {
            let distribution = DiseaseDistribution::for_category(category, &features);
            assert!((distribution.total() - 1.0).abs() < 1e-9);
            assert_eq!(distribution.entries().len(), diseases_for(category).len());
        }
    }

    #[test]
    fn test_chest_multipliers() {
        let features = ImageFeatures {
            bright_ratio: 0.5,
            contrast: 10.0,
            ..ImageFeatures::default()
        };
        let distribution = DiseaseDistribution::for_category(CategoryLabel::Chest, &features);
        // 0.5 * 1.5 * 1.3 against 0.5
        let expected = 1.95 / 2.95;
        assert!((distribution.probability(Disease::Pneumonia) - expected).abs() < 1e-9);
        assert_eq!(distribution.probability(Disease::Melanoma), 0.0);
    }

    #[test]
    fn test_uniform_without_matching_features() {
        let distribution =
            DiseaseDistribution::for_category(CategoryLabel::Dental, &ImageFeatures::default());
        for (_, probability) in distribution.entries() {
            assert!((probability - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sample_walks_in_catalog_order() {
        let distribution =
            DiseaseDistribution::for_category(CategoryLabel::Dental, &ImageFeatures::default());
        let pick = |r: f64| distribution.sample(&mut ScriptedRandom::constant(r));
        assert_eq!(pick(0.0), Some(Disease::GumSwelling));
        assert_eq!(pick(0.25), Some(Disease::GumSwelling));
        assert_eq!(pick(0.3), Some(Disease::BleedingGums));
        assert_eq!(pick(0.99), Some(Disease::Normal));
    }

    #[test]
    fn test_empty_distribution_has_no_sample() {
        let distribution = DiseaseDistribution::build(CategoryLabel::Skin, &[], &sample_features());
        assert_eq!(distribution.sample(&mut ScriptedRandom::constant(0.5)), None);
    }

    #[test]
    fn test_missed_walk_falls_back_to_uniform_index() {
        let features = ImageFeatures::default();
        // First value lands past every cumulative bucket
        let mut rng = ScriptedRandom::new(vec![1.5, 0.35]);
        let disease = WeightedDiseaseSelector.select(CategoryLabel::Dental, &features, &mut rng);

        let diseases = diseases_for(CategoryLabel::Dental);
        assert_eq!(disease, diseases[(0.35 * diseases.len() as f64).floor() as usize]);
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn test_hit_walk_draws_once() {
        let mut rng = ScriptedRandom::new(vec![0.1, 0.9]);
        let disease =
            WeightedDiseaseSelector.select(CategoryLabel::Dental, &ImageFeatures::default(), &mut rng);
        assert_eq!(disease, Disease::GumSwelling);
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn test_selection_is_deterministic_for_a_sequence() {
        let features = sample_features();
        let selector = WeightedDiseaseSelector;
        let script = vec![0.12, 0.57, 0.91, 0.33];
        for category in CategoryLabel::iter() {
            let a = selector.select(category, &features, &mut ScriptedRandom::new(script.clone()));
            let b = selector.select(category, &features, &mut ScriptedRandom::new(script.clone()));
            assert_eq!(a, b);
            assert!(diseases_for(category).contains(&a));
        }
    }
}
