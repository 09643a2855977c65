//! QR payload printed on student ID cards, and classification of raw scans.
//!
//! The payload is plain JSON with no version, signature or expiry: anything
//! able to produce matching JSON produces a valid scan.

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    pub student_name: String,
    pub id_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_address: Option<String>,
}

impl QrPayload {
    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string(self).map_err(|e| AppError::InvalidQrPayload(e.to_string()))
    }
}

/// What a scanning station captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanInput {
    /// A student card (QR) or a typed student ID.
    Student { id_number: String, name: Option<String> },
    /// Data that is not a student card; shown to the operator as-is.
    Opaque(String),
}

impl ScanInput {
    /// Classify one raw scan.
    ///
    /// `manual` input is a typed student ID. QR input must be a JSON object
    /// carrying non-empty `idNumber` and `studentName`; everything else is
    /// returned as [`ScanInput::Opaque`].
    pub fn parse(raw: &str, manual: bool) -> AppResult<Self> {
        let data = raw.trim();

        if manual {
            if data.is_empty() {
                return Err(AppError::EmptyInput);
            }
            return Ok(ScanInput::Student {
                id_number: data.to_string(),
                name: None,
            });
        }

        match serde_json::from_str::<QrPayload>(data) {
            Ok(p) if !p.id_number.trim().is_empty() && !p.student_name.trim().is_empty() => {
                Ok(ScanInput::Student {
                    id_number: p.id_number.trim().to_string(),
                    name: Some(p.student_name),
                })
            }
            _ => Ok(ScanInput::Opaque(data.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_payload_resolves_to_student() {
        let raw = r#"{"studentName":"Ana Rossi","idNumber":"STD001","studentClass":"3A"}"#;
        assert_eq!(
            ScanInput::parse(raw, false).unwrap(),
            ScanInput::Student {
                id_number: "STD001".into(),
                name: Some("Ana Rossi".into()),
            }
        );
    }

    #[test]
    fn json_without_student_fields_is_opaque() {
        let raw = r#"{"idNumber":"STD001"}"#;
        assert_eq!(
            ScanInput::parse(raw, false).unwrap(),
            ScanInput::Opaque(raw.into())
        );
    }

    #[test]
    fn urls_and_garbage_are_opaque() {
        assert!(matches!(
            ScanInput::parse("https://example.org", false).unwrap(),
            ScanInput::Opaque(_)
        ));
        assert!(matches!(
            ScanInput::parse("{not json", false).unwrap(),
            ScanInput::Opaque(_)
        ));
    }

    #[test]
    fn manual_entry_is_trimmed() {
        assert_eq!(
            ScanInput::parse("  STD002 \n", true).unwrap(),
            ScanInput::Student {
                id_number: "STD002".into(),
                name: None,
            }
        );
        assert!(matches!(
            ScanInput::parse("   ", true),
            Err(AppError::EmptyInput)
        ));
    }

    #[test]
    fn payload_serializes_with_card_field_names() {
        let p = QrPayload {
            student_name: "Ana".into(),
            id_number: "STD001".into(),
            student_class: None,
            parent_name: Some("Marco".into()),
            parent_contact: None,
            parent_address: None,
        };
        let json = p.to_json().unwrap();
        assert!(json.contains(r#""idNumber":"STD001""#));
        assert!(json.contains(r#""parentName":"Marco""#));
        assert!(!json.contains("studentClass"));
    }
}
