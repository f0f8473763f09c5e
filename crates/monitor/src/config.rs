use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::{
    algorithms::{DEFAULT_EDGE_THRESHOLD, DEFAULT_SAMPLE_STRIDE},
    error::{MonitorError, Result},
    random::{RandomSource, SeededRandom, ThreadRandom},
    report::DEFAULT_PREVIEW_CHARS,
};

/// Tunable knobs of the analysis pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PipelineSettings {
    /// Distance between samples in buffer order
    #[schemars(range(min = 1))]
    pub sample_stride: usize,
    /// Edge strength above which a sample pair counts as an edge
    pub edge_threshold: u32,
    /// Characters of report text kept in the preview
    pub preview_chars: usize,
    /// Symptoms listed per photo analysis
    pub symptom_count: usize,
    /// Fixed seed for reproducible runs; thread randomness when absent
    pub seed: Option<u64>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            symptom_count: 3,
            seed: None,
        }
    }
}

impl PipelineSettings {
    pub fn validate(&self) -> Result<()> {
        if self.sample_stride == 0 {
            return Err(MonitorError::InvalidParameter {
                parameter: "sample_stride".to_string(),
                value: self.sample_stride.to_string(),
            });
        }
        Ok(())
    }

    /// Random source matching the seed setting
    pub fn random_source(&self) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => Box::new(SeededRandom::new(seed)),
            None => Box::new(ThreadRandom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: PipelineSettings = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(settings.sample_stride, 5);
        assert_eq!(settings.edge_threshold, 50);
        assert_eq!(settings.preview_chars, 300);
        assert_eq!(settings.seed, Some(7));
    }

    #[test]
    fn test_seeded_sources_agree() {
        let settings = PipelineSettings { seed: Some(11), ..Default::default() };
        let mut a = settings.random_source();
        let mut b = settings.random_source();
        assert_eq!(a.next_f64(), b.next_f64());
    }

    #[test]
    fn test_zero_stride_is_rejected() {
        let settings = PipelineSettings { sample_stride: 0, ..Default::default() };
        assert!(matches!(settings.validate(), Err(MonitorError::InvalidParameter { .. })));
    }
}
