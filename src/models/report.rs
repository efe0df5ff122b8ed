// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Medical report model.

use crate::models::lenient::stored_instant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scanned medical report, stored in the `medical_reports` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalReport {
    pub uid: String,
    /// When the report was scanned
    #[serde(default, with = "stored_instant")]
    pub timestamp: DateTime<Utc>,
    /// Blob store download URL of the original image
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    /// Text recognized in the image
    #[serde(rename = "extractedText", alias = "text", default)]
    pub extracted_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::parse_timestamp;

    #[test]
    fn test_report_reads_exported_timestamp() {
        let json = r#"{
            "uid": "u1",
            "timestamp": {"seconds": 1791018000, "nanoseconds": 0},
            "imageUrl": "https://example.com/r.jpg",
            "text": "Glucose 92 mg/dL"
        }"#;
        let report: MedicalReport = serde_json::from_str(json).unwrap();
        assert_eq!(
            report.timestamp,
            parse_timestamp("2026-10-03T09:00:00Z").unwrap()
        );
        assert_eq!(report.extracted_text, "Glucose 92 mg/dL");
    }

    #[test]
    fn test_report_without_timestamp_still_reads() {
        let json = r#"{"uid": "u1", "imageUrl": "https://example.com/r.jpg"}"#;
        let report: MedicalReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.timestamp, DateTime::<Utc>::default());
        assert_eq!(report.extracted_text, "");
    }
}
