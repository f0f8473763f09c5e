//! Process-wide constant tables: disease lists, per-category symptom and
//! recommendation pools, the report keyword catalog and the keyword hints
//! used by the filename fast path and the email scanner.

use crate::types::{CategoryLabel, Disease, Severity};

const SKIN_DISEASES: &[Disease] = &[
    Disease::ActinicKeratosis,
    Disease::BasalCellCarcinoma,
    Disease::Dermatofibroma,
    Disease::Melanoma,
    Disease::Nevus,
    Disease::PigmentedBenignKeratosis,
    Disease::SeborrheicKeratosis,
    Disease::SquamousCellCarcinoma,
    Disease::VascularLesion,
    Disease::Normal,
];

const DENTAL_DISEASES: &[Disease] = &[
    Disease::GumSwelling,
    Disease::BleedingGums,
    Disease::PusDischarge,
    Disease::Normal,
];

const CHEST_DISEASES: &[Disease] = &[Disease::Pneumonia, Disease::Normal];

/// Ordered disease list for a category. Order drives the cumulative draw.
pub fn diseases_for(category: CategoryLabel) -> &'static [Disease] {
    match category {
        CategoryLabel::Skin => SKIN_DISEASES,
        CategoryLabel::Dental => DENTAL_DISEASES,
        CategoryLabel::Chest => CHEST_DISEASES,
    }
}

/// Diseases that lean towards a `Severe` rating
pub const SEVERE_DISEASES: &[Disease] = &[
    Disease::Melanoma,
    Disease::BasalCellCarcinoma,
    Disease::SquamousCellCarcinoma,
    Disease::Pneumonia,
];

/// Diseases that lean towards a `Moderate` rating
pub const MODERATE_DISEASES: &[Disease] = &[
    Disease::ActinicKeratosis,
    Disease::VascularLesion,
    Disease::PusDischarge,
];

/// Symptom pool and fixed advice for one category
#[derive(Debug)]
pub struct CategoryProfile {
    pub symptoms: &'static [&'static str],
    pub recommendations: &'static [&'static str],
}

static SKIN_PROFILE: CategoryProfile = CategoryProfile {
    symptoms: &[
        "Redness", "Swelling", "Itching", "Pain", "Blisters",
        "Scaling", "Crusting", "Oozing", "Dryness", "Warmth",
    ],
    recommendations: &[
        "Consult a dermatologist for proper diagnosis",
        "Avoid scratching the affected area",
        "Keep the area clean and dry",
        "Consider over-the-counter treatments",
        "Monitor for any changes in size or color",
    ],
};

static DENTAL_PROFILE: CategoryProfile = CategoryProfile {
    symptoms: &[
        "Gum inflammation", "Bleeding", "Pain", "Swelling",
        "Bad breath", "Tooth sensitivity", "Loose teeth",
    ],
    recommendations: &[
        "Consult a dentist for proper diagnosis",
        "Maintain good oral hygiene",
        "Use antiseptic mouthwash",
        "Avoid hard foods",
        "Schedule regular dental checkups",
    ],
};

static CHEST_PROFILE: CategoryProfile = CategoryProfile {
    symptoms: &[
        "Cough", "Fever", "Shortness of breath", "Chest pain",
        "Fatigue", "Sweating", "Chills", "Rapid breathing",
    ],
    recommendations: &[
        "Consult a healthcare professional immediately",
        "Get plenty of rest",
        "Stay hydrated",
        "Take prescribed medications",
        "Monitor symptoms closely",
    ],
};

pub fn profile_for(category: CategoryLabel) -> &'static CategoryProfile {
    match category {
        CategoryLabel::Skin => &SKIN_PROFILE,
        CategoryLabel::Dental => &DENTAL_PROFILE,
        CategoryLabel::Chest => &CHEST_PROFILE,
    }
}

// Filename fast path, checked in this order.
pub const DENTAL_FILENAME_KEYWORDS: &[&str] = &["tooth", "gum", "dental", "mouth", "oral", "teeth"];
pub const CHEST_FILENAME_KEYWORDS: &[&str] = &["chest", "lung", "xray", "x-ray", "pneumonia", "thorax"];
pub const ORGAN_FILENAME_KEYWORDS: &[&str] = &["kidney", "renal", "abdomen", "organ", "internal"];
pub const SKIN_FILENAME_KEYWORDS: &[&str] = &["skin", "dermat", "lesion", "rash", "mole"];

/// One known condition in the report keyword catalog
#[derive(Debug)]
pub struct ReportKeywordEntry {
    pub condition: &'static str,
    /// Lowercase phrases, matched as plain substrings in order
    pub keywords: &'static [&'static str],
    pub pathogen: &'static str,
    pub severity: Severity,
    pub risk_factors: &'static [&'static str],
    pub recommendations: &'static [&'static str],
}

/// Declaration order is match priority.
pub static REPORT_CATALOG: [ReportKeywordEntry; 7] = [
    ReportKeywordEntry {
        condition: "Urinary Tract Infection",
        keywords: &[
            "urinary tract infection", "uti", "bladder infection", "cystitis",
            "pyelonephritis", "dysuria", "urinary", "urine infection",
        ],
        pathogen: "Escherichia coli",
        severity: Severity::Moderate,
        risk_factors: &[
            "Female anatomy",
            "Sexual activity",
            "Urinary catheter use",
            "Weakened immune system",
        ],
        recommendations: &[
            "Complete full course of prescribed antibiotics",
            "Drink plenty of water",
            "Urinate frequently",
            "Avoid irritating feminine products",
            "Follow up with healthcare provider",
        ],
    },
    ReportKeywordEntry {
        condition: "Ear Infection",
        keywords: &[
            "ear infection", "otitis media", "otitis externa", "earache",
            "ear pain", "middle ear", "outer ear",
        ],
        pathogen: "Streptococcus pneumoniae",
        severity: Severity::Mild,
        risk_factors: &[
            "Age (more common in children)",
            "Recent cold or flu",
            "Allergies",
            "Exposure to cigarette smoke",
        ],
        recommendations: &[
            "Take prescribed antibiotics if bacterial",
            "Use pain relievers as directed",
            "Apply warm compress to ear",
            "Keep ear dry",
            "Follow up if symptoms worsen",
        ],
    },
    ReportKeywordEntry {
        condition: "Gastroenteritis",
        keywords: &[
            "gastroenteritis", "stomach flu", "gastro", "diarrhea", "vomiting",
            "nausea", "abdominal pain", "stomach infection",
        ],
        pathogen: "Norovirus",
        severity: Severity::Moderate,
        risk_factors: &[
            "Contaminated food or water",
            "Close contact with infected person",
            "Poor hand hygiene",
            "Weakened immune system",
        ],
        recommendations: &[
            "Stay hydrated - drink plenty of fluids",
            "Rest as much as possible",
            "Eat bland foods when able",
            "Practice good hand hygiene",
            "Seek medical attention if severe dehydration",
        ],
    },
    ReportKeywordEntry {
        condition: "Upper Respiratory Infection",
        keywords: &[
            "upper respiratory", "respiratory infection", "common cold", "bronchitis",
            "sinusitis", "pharyngitis", "throat infection",
        ],
        pathogen: "Rhinovirus",
        severity: Severity::Mild,
        risk_factors: &[
            "Seasonal changes",
            "Weakened immune system",
            "Close contact with infected persons",
            "Smoking or secondhand smoke",
        ],
        recommendations: &[
            "Get plenty of rest",
            "Stay hydrated",
            "Use humidifier",
            "Gargle with salt water",
            "Take over-the-counter pain relievers if needed",
        ],
    },
    ReportKeywordEntry {
        condition: "Skin Infection",
        keywords: &[
            "skin infection", "cellulitis", "abscess", "impetigo", "folliculitis",
            "dermatitis", "skin wound",
        ],
        pathogen: "Staphylococcus aureus",
        severity: Severity::Moderate,
        risk_factors: &[
            "Cuts or wounds",
            "Weakened immune system",
            "Poor hygiene",
            "Chronic skin conditions",
        ],
        recommendations: &[
            "Keep affected area clean and dry",
            "Take prescribed antibiotics",
            "Apply topical medications as directed",
            "Avoid scratching or touching",
            "Monitor for spreading or worsening",
        ],
    },
    ReportKeywordEntry {
        condition: "Pneumonia",
        keywords: &[
            "pneumonia", "lung infection", "chest infection", "pulmonary",
            "respiratory distress",
        ],
        pathogen: "Streptococcus pneumoniae",
        severity: Severity::Severe,
        risk_factors: &[
            "Age (young children or elderly)",
            "Weakened immune system",
            "Chronic lung diseases",
            "Smoking",
        ],
        recommendations: &[
            "Complete full course of antibiotics",
            "Get plenty of rest",
            "Stay hydrated",
            "Use prescribed inhalers if needed",
            "Seek immediate care if breathing worsens",
        ],
    },
    ReportKeywordEntry {
        condition: "Dental Infection",
        keywords: &[
            "dental infection", "tooth abscess", "gum infection", "periodontal",
            "dental decay", "tooth infection",
        ],
        pathogen: "Streptococcus mutans",
        severity: Severity::Moderate,
        risk_factors: &[
            "Poor dental hygiene",
            "Untreated cavities",
            "Gum disease",
            "Weakened immune system",
        ],
        recommendations: &[
            "Visit dentist immediately",
            "Take prescribed antibiotics",
            "Rinse with warm salt water",
            "Use pain relievers as directed",
            "Maintain good oral hygiene",
        ],
    },
];

pub const FALLBACK_CONDITION: &str = "General Medical Condition";
pub const FALLBACK_PATHOGEN: &str = "Unknown";
pub const FALLBACK_RISK_FACTORS: &[&str] = &["Medical evaluation needed"];
pub const FALLBACK_RECOMMENDATIONS: &[&str] = &["Consult healthcare provider for proper diagnosis"];

/// Disease mentions scanned in email text, per category, in order
pub const EMAIL_DISEASE_MENTIONS: &[(CategoryLabel, &[&str])] = &[
    (
        CategoryLabel::Skin,
        &[
            "actinic keratosis", "basal cell carcinoma", "dermatofibroma", "melanoma", "nevus",
            "pigmented benign keratosis", "seborrheic keratosis", "squamous cell carcinoma",
            "vascular lesion",
        ],
    ),
    (
        CategoryLabel::Dental,
        &["gum swelling", "bleeding gums", "pus discharge", "gum", "dental", "tooth"],
    ),
    (CategoryLabel::Chest, &["pneumonia", "lung", "chest", "respiratory"]),
];

/// Looser category words used when no disease is mentioned
pub const EMAIL_CATEGORY_HINTS: &[(CategoryLabel, &[&str])] = &[
    (CategoryLabel::Skin, &["skin", "dermat", "rash", "lesion"]),
    (CategoryLabel::Dental, &["gum", "tooth", "dental", "oral"]),
    (CategoryLabel::Chest, &["chest", "lung", "x-ray", "xray"]),
];

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_catalog_sizes() {
        assert_eq!(diseases_for(CategoryLabel::Skin).len(), 10);
        assert_eq!(diseases_for(CategoryLabel::Dental).len(), 4);
        assert_eq!(diseases_for(CategoryLabel::Chest).len(), 2);
    }

    #[test]
    fn test_every_category_ends_with_normal() {
        for category in CategoryLabel::iter() {
            assert_eq!(diseases_for(category).last(), Some(&Disease::Normal));
            assert!(profile_for(category).symptoms.len() >= 3);
        }
    }

    #[test]
    fn test_report_keywords_are_lowercase() {
        for entry in REPORT_CATALOG.iter() {
            for keyword in entry.keywords {
                assert_eq!(*keyword, keyword.to_lowercase(), "{} in {}", keyword, entry.condition);
            }
        }
    }
}
