use crate::{
    catalog::{MODERATE_DISEASES, SEVERE_DISEASES},
    random::{RandomSource, pick_index},
    types::{Disease, Severity},
};

pub const MAX_CONFIDENCE: f64 = 0.95;
const BASE_CONFIDENCE: f64 = 0.65;
const FINDING_BONUS: f64 = 0.15;
const CONFIDENCE_JITTER: f64 = 0.2;

/// `min(0.95, 0.65 + 0.15 for a finding + U[0, 0.2))`
pub fn confidence_score(disease: Disease, rng: &mut dyn RandomSource) -> f64 {
    let bonus = if disease.is_normal() { 0.0 } else { FINDING_BONUS };
    (BASE_CONFIDENCE + bonus + rng.next_f64() * CONFIDENCE_JITTER).min(MAX_CONFIDENCE)
}

/// Severity lean per disease; draws once unless the disease is `normal`
pub fn estimate_severity(disease: Disease, rng: &mut dyn RandomSource) -> Severity {
    if disease.is_normal() {
        return Severity::None;
    }

    if SEVERE_DISEASES.contains(&disease) {
        if rng.next_f64() > 0.3 { Severity::Severe } else { Severity::Moderate }
    } else if MODERATE_DISEASES.contains(&disease) {
        if rng.next_f64() > 0.5 { Severity::Moderate } else { Severity::Mild }
    } else {
        [Severity::Mild, Severity::Moderate][pick_index(rng, 2)]
    }
}

/// Up to `count` distinct entries of `pool`, one draw per pick
pub fn sample_symptoms(pool: &[&str], count: usize, rng: &mut dyn RandomSource) -> Vec<String> {
    let mut remaining: Vec<&str> = pool.to_vec();
    let mut picked = Vec::with_capacity(count.min(pool.len()));
    while picked.len() < count && !remaining.is_empty() {
        let index = pick_index(rng, remaining.len());
        picked.push(remaining.swap_remove(index).to_string());
    }
    picked
}
