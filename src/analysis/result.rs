//! Display-ready analysis result and the mapping from the backend payload.
//!
//! The backend supplies a label, a malignancy probability and optionally a
//! risk score and an image path. Every other field shown on the results
//! dashboard is a fixed placeholder; none of them are estimated locally.

use std::fmt;

use serde::Serialize;

use super::wire::{NoduleLabel, PredictResponse};

/// Placeholder for text fields the backend does not provide.
pub const PLACEHOLDER_TEXT: &str = "-";
/// Placeholder for `segmentation.shape_irregularity`.
pub const PLACEHOLDER_SHAPE_IRREGULARITY: f64 = 0.0;
/// Placeholder for `segmentation.unet_confidence`.
pub const PLACEHOLDER_UNET_CONFIDENCE: f64 = 1.0;
/// Risk score used when the backend omits one.
pub const DEFAULT_RISK_SCORE: f64 = 0.0;

/// Predicted class shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Prediction {
    /// Label `0`.
    Benign,
    /// Label `1`.
    Malignant,
}

impl Prediction {
    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Benign => "Benign",
            Self::Malignant => "Malignant",
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<NoduleLabel> for Prediction {
    fn from(label: NoduleLabel) -> Self {
        match label {
            NoduleLabel::Benign => Self::Benign,
            NoduleLabel::Malignant => Self::Malignant,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Classification {
    pub prediction: Prediction,
    pub confidence: f64,
    pub risk_score: f64,
    pub uncertainty: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Segmentation {
    pub nodule_volume: String,
    pub diameter: String,
    pub density: String,
    pub shape_irregularity: f64,
    pub unet_confidence: f64,
}

impl Segmentation {
    /// Segmentation block with every field set to its placeholder.
    pub fn placeholder() -> Self {
        Self {
            nodule_volume: PLACEHOLDER_TEXT.to_string(),
            diameter: PLACEHOLDER_TEXT.to_string(),
            density: PLACEHOLDER_TEXT.to_string(),
            shape_irregularity: PLACEHOLDER_SHAPE_IRREGULARITY,
            unet_confidence: PLACEHOLDER_UNET_CONFIDENCE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClinicalInsights {
    pub stage_prediction: String,
    pub metastasis_risk: String,
    pub growth_velocity: String,
    pub recommended_action: String,
}

impl ClinicalInsights {
    /// Clinical block with every field set to [`PLACEHOLDER_TEXT`].
    pub fn placeholder() -> Self {
        Self {
            stage_prediction: PLACEHOLDER_TEXT.to_string(),
            metastasis_risk: PLACEHOLDER_TEXT.to_string(),
            growth_velocity: PLACEHOLDER_TEXT.to_string(),
            recommended_action: PLACEHOLDER_TEXT.to_string(),
        }
    }
}

/// Fuzzy-set membership degrees. They are not normalized and need not sum to 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MembershipScores {
    pub benign: f64,
    pub malignant: f64,
    pub uncertain: f64,
}

impl MembershipScores {
    /// Derive memberships from a malignancy probability `p`.
    pub fn from_probability(p: f64) -> Self {
        Self {
            benign: 1.0 - p,
            malignant: p,
            uncertain: 1.0 - (0.5 - p).abs() * 2.0,
        }
    }

    /// Named scores in display order.
    pub fn entries(&self) -> [(&'static str, f64); 3] {
        [
            ("benign", self.benign),
            ("malignant", self.malignant),
            ("uncertain", self.uncertain),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskFactor {
    pub factor: String,
    pub score: f64,
    pub weight: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FuzzyAnalysis {
    pub membership_scores: MembershipScores,
    pub risk_factors: Vec<RiskFactor>,
}

/// Everything the results view renders.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub classification: Classification,
    pub segmentation: Segmentation,
    pub clinical: ClinicalInsights,
    pub fuzzy_analysis: FuzzyAnalysis,
    /// Server-relative image path; resolved against the backend origin.
    pub segmentation_image_url: Option<String>,
}

impl AnalysisResult {
    /// Map a validated backend payload.
    pub fn from_prediction(response: PredictResponse) -> Self {
        let p = response.malignancy_probability;
        let risk_score = response
            .risk_score
            .filter(|score| score.is_finite())
            .map(|score| score.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_RISK_SCORE);
        Self {
            classification: Classification {
                prediction: response.label.into(),
                confidence: p,
                risk_score,
                uncertainty: 1.0 - p,
            },
            segmentation: Segmentation::placeholder(),
            clinical: ClinicalInsights::placeholder(),
            fuzzy_analysis: FuzzyAnalysis {
                membership_scores: MembershipScores::from_probability(p),
                risk_factors: Vec::new(),
            },
            segmentation_image_url: response.segmentation_image_url,
        }
    }
}
