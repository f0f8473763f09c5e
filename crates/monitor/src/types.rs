use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use ts_rs::TS;

/// Anatomical domain an uploaded photo is assigned to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, TS,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[ts(export)]
pub enum CategoryLabel {
    Skin,
    Dental,
    Chest,
}

/// Every condition the photo path can report. `Normal` is shared by all categories.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, TS,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[ts(export)]
pub enum Disease {
    #[serde(rename = "Actinic Keratosis")]
    #[strum(serialize = "Actinic Keratosis")]
    ActinicKeratosis,
    #[serde(rename = "Basal Cell Carcinoma")]
    #[strum(serialize = "Basal Cell Carcinoma")]
    BasalCellCarcinoma,
    #[serde(rename = "Dermatofibroma")]
    #[strum(serialize = "Dermatofibroma")]
    Dermatofibroma,
    #[serde(rename = "Melanoma")]
    #[strum(serialize = "Melanoma")]
    Melanoma,
    #[serde(rename = "Nevus")]
    #[strum(serialize = "Nevus")]
    Nevus,
    #[serde(rename = "Pigmented Benign Keratosis")]
    #[strum(serialize = "Pigmented Benign Keratosis")]
    PigmentedBenignKeratosis,
    #[serde(rename = "Seborrheic Keratosis")]
    #[strum(serialize = "Seborrheic Keratosis")]
    SeborrheicKeratosis,
    #[serde(rename = "Squamous Cell Carcinoma")]
    #[strum(serialize = "Squamous Cell Carcinoma")]
    SquamousCellCarcinoma,
    #[serde(rename = "Vascular Lesion")]
    #[strum(serialize = "Vascular Lesion")]
    VascularLesion,
    #[serde(rename = "Gum Swelling")]
    #[strum(serialize = "Gum Swelling")]
    GumSwelling,
    #[serde(rename = "Bleeding Gums")]
    #[strum(serialize = "Bleeding Gums")]
    BleedingGums,
    #[serde(rename = "Pus Discharge")]
    #[strum(serialize = "Pus Discharge")]
    PusDischarge,
    #[serde(rename = "PNEUMONIA")]
    #[strum(serialize = "PNEUMONIA")]
    Pneumonia,
    #[serde(rename = "normal")]
    #[strum(serialize = "normal")]
    Normal,
}

impl Disease {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn is_normal(self) -> bool {
        self == Disease::Normal
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize, TS,
    Display, EnumString, IntoStaticStr,
)]
#[ts(export)]
pub enum Severity {
    None,
    Mild,
    Moderate,
    Severe,
    /// Only produced by the report fallback when nothing matched
    Unknown,
}

/// Per-band aggregate for one third of the image
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub avg_brightness: f64,
    pub avg_hue: f64,
    pub red_ratio: f64,
}

/// Summary statistics of one image, computed once per upload.
///
/// Every ratio is a fraction of the retained samples (strided, non-transparent),
/// never of the raw pixel count.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFeatures {
    pub avg_red: f64,
    pub avg_green: f64,
    pub avg_blue: f64,
    pub brightness: f64,

    pub avg_hue: f64,
    pub avg_saturation: f64,
    pub avg_value: f64,

    pub red_ratio: f64,
    pub pink_ratio: f64,
    pub brown_ratio: f64,
    pub white_ratio: f64,

    pub dark_ratio: f64,
    pub bright_ratio: f64,
    pub mid_ratio: f64,

    /// Mean edge strength between consecutive retained samples
    pub contrast: f64,
    /// Variance of per-sample brightness
    pub color_variance: f64,
    pub edge_density: f64,

    pub aspect_ratio: f64,
    pub is_portrait: bool,
    pub is_square: bool,

    pub top_region: RegionSummary,
    pub middle_region: RegionSummary,
    pub bottom_region: RegionSummary,
    pub left_region: RegionSummary,
    pub center_region: RegionSummary,
    pub right_region: RegionSummary,

    pub width: u32,
    pub height: u32,
    pub total_pixels: u64,
    pub sampled_pixels: u64,
}

impl ImageFeatures {
    /// The seven colour/brightness ratios in declaration order
    pub fn ratios(&self) -> [f64; 7] {
        [
            self.red_ratio,
            self.pink_ratio,
            self.brown_ratio,
            self.white_ratio,
            self.dark_ratio,
            self.bright_ratio,
            self.mid_ratio,
        ]
    }
}

/// Outcome of the photo path handed to presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AnalysisResult {
    pub category: CategoryLabel,
    pub primary_disease: Disease,
    pub confidence: f64,
    pub symptoms: Vec<String>,
    pub severity: Severity,
    pub recommendations: Vec<String>,
}

/// Outcome of the report (PDF / free text) path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReportResult {
    pub primary_condition: String,
    pub confidence: f64,
    pub suspected_pathogen: String,
    pub severity: Severity,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub extracted_text_preview: String,
}

/// Name, size and media type of an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FileDescriptor {
    pub name: String,
    #[ts(type = "number")]
    pub size: u64,
    #[serde(rename = "type")]
    pub mime: String,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .to_string();
        Self { name, size, mime }
    }
}

/// An analysis together with the files it was computed from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission<T> {
    pub files: Vec<FileDescriptor>,
    pub analysis: T,
}
