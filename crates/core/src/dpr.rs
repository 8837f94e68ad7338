//! Daily progress report capture.
//!
//! Pure data capture: one record per submission, append-only. Corrections
//! are new submissions; there is no update-in-place and no state machine.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{RecordId, Timestamp};

/// Maximum number of photos attachable to one DPR submission.
pub const MAX_PHOTOS: usize = 5;

/// Per-category labour count. Category names are free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabourEntry {
    pub category: String,
    pub count: u32,
}

/// Material consumed during the reported day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialConsumption {
    pub material: String,
    pub quantity: f64,
    pub unit: String,
}

/// A planned-vs-executed activity line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub description: String,
    pub planned_qty: f64,
    pub executed_qty: f64,
}

impl ActivityEntry {
    /// Raw completion percentage, unclamped. May exceed 100.
    ///
    /// Stored as-is so over-execution stays detectable; clamping happens
    /// only at display time via [`display_percent`](Self::display_percent).
    pub fn percent_complete(&self) -> f64 {
        if self.planned_qty <= 0.0 {
            return 0.0;
        }
        self.executed_qty / self.planned_qty * 100.0
    }

    /// Display percentage, clamped to [0, 100].
    pub fn display_percent(&self) -> f64 {
        self.percent_complete().clamp(0.0, 100.0)
    }

    /// True when executed exceeds planned. Flagged, not clamped away.
    pub fn is_over(&self) -> bool {
        self.percent_complete() > 100.0
    }
}

/// One daily progress report submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DprRecord {
    pub id: RecordId,
    pub project_name: String,
    /// Calendar date the report covers, `YYYY-MM-DD`.
    pub report_date: chrono::NaiveDate,
    pub reported_by: String,
    pub labour: Vec<LabourEntry>,
    pub materials: Vec<MaterialConsumption>,
    pub activities: Vec<ActivityEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machinery_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_observations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    pub submitted_at: Timestamp,
}

/// DTO for submitting a new DPR (`POST /dpr`).
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitDpr {
    pub project_name: String,
    pub report_date: chrono::NaiveDate,
    #[serde(default)]
    pub labour: Vec<LabourEntry>,
    #[serde(default)]
    pub materials: Vec<MaterialConsumption>,
    #[serde(default)]
    pub activities: Vec<ActivityEntry>,
    #[serde(default)]
    pub machinery_notes: Option<String>,
    #[serde(default)]
    pub safety_observations: Option<String>,
    #[serde(default)]
    pub risk_notes: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

impl SubmitDpr {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.project_name.trim().is_empty() {
            return Err(CoreError::Validation("project_name must not be empty".into()));
        }
        if self.photos.len() > MAX_PHOTOS {
            return Err(CoreError::Validation(format!(
                "at most {MAX_PHOTOS} photos per report (got {})",
                self.photos.len()
            )));
        }
        for activity in &self.activities {
            if activity.description.trim().is_empty() {
                return Err(CoreError::Validation(
                    "activity description must not be empty".into(),
                ));
            }
            if activity.planned_qty < 0.0 || activity.executed_qty < 0.0 {
                return Err(CoreError::Validation(
                    "activity quantities must not be negative".into(),
                ));
            }
        }
        for mat in &self.materials {
            if mat.quantity < 0.0 {
                return Err(CoreError::Validation(
                    "material quantity must not be negative".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn into_record(self, reported_by: String) -> Result<DprRecord, CoreError> {
        self.validate()?;
        Ok(DprRecord {
            id: uuid::Uuid::new_v4(),
            project_name: self.project_name,
            report_date: self.report_date,
            reported_by,
            labour: self.labour,
            materials: self.materials,
            activities: self.activities,
            machinery_notes: self.machinery_notes,
            safety_observations: self.safety_observations,
            risk_notes: self.risk_notes,
            photos: self.photos,
            submitted_at: chrono::Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn activity(planned: f64, executed: f64) -> ActivityEntry {
        ActivityEntry {
            description: "slab casting".into(),
            planned_qty: planned,
            executed_qty: executed,
        }
    }

    #[test]
    fn percent_is_unclamped_in_storage_form() {
        let a = activity(100.0, 130.0);
        assert_eq!(a.percent_complete(), 130.0);
        assert!(a.is_over());
    }

    #[test]
    fn display_percent_is_clamped() {
        assert_eq!(activity(100.0, 130.0).display_percent(), 100.0);
        assert_eq!(activity(100.0, 40.0).display_percent(), 40.0);
    }

    #[test]
    fn zero_plan_yields_zero_percent() {
        let a = activity(0.0, 10.0);
        assert_eq!(a.percent_complete(), 0.0);
        assert!(!a.is_over());
    }

    #[test]
    fn photo_limit_enforced() {
        let submit = SubmitDpr {
            project_name: "Tower A".into(),
            report_date: chrono::NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
            labour: vec![],
            materials: vec![],
            activities: vec![],
            machinery_notes: None,
            safety_observations: None,
            risk_notes: None,
            photos: (0..6).map(|i| format!("uploads/p{i}.jpg")).collect(),
        };
        assert_matches!(submit.validate(), Err(CoreError::Validation(_)));
    }
}
