//! The unit-of-work model: one [`JobRequest`] drives one [`Job`], which
//! owns the derived storage paths for the duration of a migration run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_true() -> bool {
    true
}

fn default_schemas_suffix() -> String {
    "_SCHEMA.txt".to_string()
}

fn default_data_suffix() -> String {
    "_DATA.txt".to_string()
}

fn default_set_suffix() -> String {
    ".txt".to_string()
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

/// The JSON trigger payload, matching the recognized fields and
/// defaults from the external interface contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub base_path: String,
    pub cobol_copybook_out_path: String,

    #[serde(default = "default_true")]
    pub upload_to_s3: bool,

    #[serde(default = "default_schemas_suffix")]
    pub schemas_suffix: String,

    #[serde(default = "default_data_suffix")]
    pub data_suffix: String,

    #[serde(default = "default_set_suffix")]
    pub set_suffix: String,

    #[serde(default)]
    pub migrate_fks: bool,

    #[serde(default)]
    pub cobol_copybook_ext: String,

    #[serde(default = "default_encoding")]
    pub encoding: String,
}

/// A single migration run. Owns its derived key prefixes; the Catalog
/// it accumulates must not outlive the job.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: Uuid,
    pub request: JobRequest,
}

impl Job {
    pub fn new(request: JobRequest) -> Self {
        Job {
            id: Uuid::new_v4(),
            request,
        }
    }

    pub fn schemas_prefix(&self) -> String {
        format!("inputs/{}/schemas", self.request.base_path)
    }

    pub fn data_prefix(&self) -> String {
        format!("inputs/{}/data", self.request.base_path)
    }

    pub fn sets_prefix(&self) -> String {
        format!("inputs/{}/sets", self.request.base_path)
    }

    pub fn sql_output_key(&self) -> String {
        format!("outputs/{}/idms_migration.sql", self.request.base_path)
    }

    pub fn copybook_out_prefix(&self) -> String {
        format!("inputs/{}", self.request.cobol_copybook_out_path)
    }

    /// Derives a data filename from a schema filename by substituting
    /// `schemas_suffix` with `data_suffix`, exactly once.
    pub fn data_filename_for_schema(&self, schema_filename: &str) -> String {
        match schema_filename.find(&self.request.schemas_suffix) {
            Some(idx) => {
                let mut out = schema_filename.to_string();
                out.replace_range(idx..idx + self.request.schemas_suffix.len(), &self.request.data_suffix);
                out
            }
            None => schema_filename.to_string(),
        }
    }

    /// Derives the schema's base name (used as the copybook filename and
    /// in the copybook `01 <name>.` header) by stripping `schemas_suffix`
    /// from the schema filename.
    pub fn schema_base_name(&self, schema_filename: &str) -> String {
        schema_filename.replacen(&self.request.schemas_suffix, "", 1)
    }
}

impl Default for JobRequest {
    fn default() -> Self {
        JobRequest {
            base_path: String::new(),
            cobol_copybook_out_path: String::new(),
            upload_to_s3: default_true(),
            schemas_suffix: default_schemas_suffix(),
            data_suffix: default_data_suffix(),
            set_suffix: default_set_suffix(),
            migrate_fks: false,
            cobol_copybook_ext: String::new(),
            encoding: default_encoding(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let req: JobRequest =
            serde_json::from_str(r#"{"base_path":"batch1","cobol_copybook_out_path":"copybooks"}"#).unwrap();
        assert!(req.upload_to_s3);
        assert_eq!(req.schemas_suffix, "_SCHEMA.txt");
        assert_eq!(req.data_suffix, "_DATA.txt");
        assert_eq!(req.set_suffix, ".txt");
        assert!(!req.migrate_fks);
        assert_eq!(req.encoding, "utf-8");
    }

    #[test]
    fn test_derived_paths() {
        let req = JobRequest {
            base_path: "batch1".to_string(),
            cobol_copybook_out_path: "copybooks".to_string(),
            ..Default::default()
        };
        let job = Job::new(req);
        assert_eq!(job.schemas_prefix(), "inputs/batch1/schemas");
        assert_eq!(job.sql_output_key(), "outputs/batch1/idms_migration.sql");
    }

    #[test]
    fn test_data_filename_substitution() {
        let req = JobRequest::default();
        let job = Job::new(req);
        assert_eq!(
            job.data_filename_for_schema("CUSTOMER_SCHEMA.txt"),
            "CUSTOMER_DATA.txt"
        );
    }

    #[test]
    fn test_schema_base_name() {
        let req = JobRequest::default();
        let job = Job::new(req);
        assert_eq!(job.schema_base_name("CUSTOMER_SCHEMA.txt"), "CUSTOMER");
    }
}
