//! JSON contract of the inference backend's `/predict/` endpoint.

use serde::Deserialize;

use super::AnalysisError;

/// Binary label returned by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoduleLabel {
    /// `0`
    Benign,
    /// `1`
    Malignant,
}

/// Validated backend payload.
#[derive(Clone, Debug, PartialEq)]
pub struct PredictResponse {
    /// Binary classification.
    pub label: NoduleLabel,
    /// Malignancy probability in `[0, 1]`.
    pub malignancy_probability: f64,
    /// Optional model risk score, unvalidated.
    pub risk_score: Option<f64>,
    /// Optional server-relative path of the rendered segmentation slice.
    pub segmentation_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PredictResponseWire {
    label: Option<i64>,
    malignancy_probability: Option<f64>,
    risk_score: Option<f64>,
    segmentation_image_url: Option<String>,
}

/// Parse and validate a response body.
///
/// Missing or out-of-range required fields fail the whole response; nothing
/// is partially rendered.
pub fn parse_predict_response(body: &[u8]) -> Result<PredictResponse, AnalysisError> {
    let text = std::str::from_utf8(body).map_err(|err| AnalysisError::Json(err.to_string()))?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::Json("Empty response body".to_string()));
    }
    let wire: PredictResponseWire =
        serde_json::from_str(trimmed).map_err(|err| AnalysisError::Json(err.to_string()))?;

    let label = match wire.label {
        None => return Err(AnalysisError::MissingField("label")),
        Some(0) => NoduleLabel::Benign,
        Some(1) => NoduleLabel::Malignant,
        Some(other) => {
            return Err(AnalysisError::InvalidField {
                field: "label",
                detail: format!("expected 0 or 1, got {other}"),
            });
        }
    };
    let probability = wire
        .malignancy_probability
        .ok_or(AnalysisError::MissingField("malignancy_probability"))?;
    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        return Err(AnalysisError::InvalidField {
            field: "malignancy_probability",
            detail: format!("expected a value in [0, 1], got {probability}"),
        });
    }
    let segmentation_image_url = wire
        .segmentation_image_url
        .filter(|path| !path.trim().is_empty());

    Ok(PredictResponse {
        label,
        malignancy_probability: probability,
        risk_score: wire.risk_score,
        segmentation_image_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_backend_payload() {
        let body = br#"{
            "label": 1,
            "malignancy_probability": 0.82,
            "risk_score": 0.64,
            "segmentation_image_url": "/r1.png"
        }"#;
        let parsed = parse_predict_response(body).unwrap();
        assert_eq!(parsed.label, NoduleLabel::Malignant);
        assert_eq!(parsed.malignancy_probability, 0.82);
        assert_eq!(parsed.risk_score, Some(0.64));
        assert_eq!(parsed.segmentation_image_url.as_deref(), Some("/r1.png"));
    }

    #[test]
    fn optional_fields_may_be_absent_and_extras_are_ignored() {
        let body = br#"{"label":0,"malignancy_probability":0.1,"model":"unet3d"}"#;
        let parsed = parse_predict_response(body).unwrap();
        assert_eq!(parsed.label, NoduleLabel::Benign);
        assert_eq!(parsed.risk_score, None);
        assert_eq!(parsed.segmentation_image_url, None);
    }

    #[test]
    fn blank_image_path_counts_as_absent() {
        let body = br#"{"label":0,"malignancy_probability":0.3,"segmentation_image_url":"  "}"#;
        assert_eq!(parse_predict_response(body).unwrap().segmentation_image_url, None);
    }

    #[test]
    fn missing_label_fails_closed() {
        let err = parse_predict_response(br#"{"malignancy_probability":0.4}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingField("label")));
    }

    #[test]
    fn null_probability_counts_as_missing() {
        let err =
            parse_predict_response(br#"{"label":1,"malignancy_probability":null}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingField("malignancy_probability")));
    }

    #[test]
    fn rejects_labels_outside_binary_range() {
        let err =
            parse_predict_response(br#"{"label":2,"malignancy_probability":0.4}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidField { field: "label", .. }));
    }

    #[test]
    fn rejects_probability_outside_unit_interval() {
        let err =
            parse_predict_response(br#"{"label":1,"malignancy_probability":1.5}"#).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InvalidField {
                field: "malignancy_probability",
                ..
            }
        ));
    }

    #[test]
    fn malformed_and_empty_bodies_are_json_errors() {
        assert!(matches!(
            parse_predict_response(b"<html>502</html>"),
            Err(AnalysisError::Json(_))
        ));
        assert!(matches!(parse_predict_response(b"  "), Err(AnalysisError::Json(_))));
        assert!(matches!(
            parse_predict_response(br#"{"label":"1","malignancy_probability":0.5}"#),
            Err(AnalysisError::Json(_))
        ));
    }
}
