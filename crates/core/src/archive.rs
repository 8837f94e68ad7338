//! Drive-sync archival manifest.
//!
//! Already-uploaded blobs are relocated to long-term archival storage by an
//! external collaborator. The core only defines the manifest shape; delivery
//! is fire-and-forget from the workflow's perspective.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Manifest handed to the drive-sync collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncManifest {
    pub project_code: String,
    pub uploader_id: String,
    /// Kind of upload, e.g. `"quote"`, `"dpr_photo"`, `"receipt"`.
    pub upload_type: String,
    pub purpose: String,
    pub file_names: Vec<String>,
}

impl SyncManifest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.project_code.trim().is_empty() {
            return Err(CoreError::Validation("project_code must not be empty".into()));
        }
        if self.file_names.is_empty() {
            return Err(CoreError::Validation(
                "a sync manifest must name at least one file".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_requires_files() {
        let manifest = SyncManifest {
            project_code: "TWR-A".into(),
            uploader_id: "ravi".into(),
            upload_type: "quote".into(),
            purpose: "vendor quotes for indent".into(),
            file_names: vec![],
        };
        assert!(manifest.validate().is_err());
    }
}
