//! Drives schemas-then-sets through the pipeline for one job and
//! finalizes the SQL script and copybook outputs.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::data_parser;
use crate::job::Job;
use crate::name::to_snake;
use crate::schema_parser;
use crate::set_parser::{self, SetMode};
use crate::storage::BlobStore;
use crate::table::Catalog;
use common::err::{CResult, ReError};

/// Returned to the trigger's caller: where the outputs live.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationResult {
    pub primary_bucket: String,
    pub secondary_bucket: String,
    pub sql_file_path: String,
    pub copybook_paths: Vec<String>,
}

struct CopybookFile {
    local_path: PathBuf,
    basename: String,
}

fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Runs the full schemas -> sets -> finalize pipeline for `job`,
/// reading from and writing to `primary`/`secondary` blob stores whose
/// display names are `primary_bucket_name`/`secondary_bucket_name`.
/// `temp_dir` is a scratch directory owned by this job; the caller is
/// responsible for its lifetime.
pub fn run_migration(
    job: &Job,
    primary: &dyn BlobStore,
    secondary: &dyn BlobStore,
    primary_bucket_name: &str,
    secondary_bucket_name: &str,
    temp_dir: &Path,
) -> CResult<MigrationResult> {
    let temp_in = temp_dir.join("in");
    let temp_out = temp_dir.join("out");
    fs::create_dir_all(&temp_in)?;
    fs::create_dir_all(&temp_out)?;

    let encoding = Encoding::for_label(job.request.encoding.as_bytes()).unwrap_or(encoding_rs::UTF_8);

    let sql_path = temp_out.join("idms_migration.sql");
    let mut sql_out = File::create(&sql_path)?;

    let mut catalog = Catalog::new();
    let mut copybooks: Vec<CopybookFile> = Vec::new();

    for schema_key in primary.list(&job.schemas_prefix())? {
        let schema_filename = basename(&schema_key).to_string();
        if schema_filename.trim().is_empty() {
            continue;
        }

        debug!(key = %schema_key, "downloading schema");
        let local_schema_path = temp_in.join(&schema_filename);
        primary.download(&schema_key, &local_schema_path)?;
        let content = fs::read_to_string(&local_schema_path)?;

        let schema_base = job.schema_base_name(&schema_filename);
        let copybook_path = temp_out.join(format!("{}.txt", schema_base));
        let mut copybook_out = File::create(&copybook_path)?;
        write!(copybook_out, "{}01 {}.\n", " ".repeat(7), schema_base)?;

        debug!(key = %schema_key, "migrating schema");
        let record_name = schema_parser::parse_record_name(&content)?;
        let table_name = to_snake(&record_name);
        let table = schema_parser::build_table(&table_name, &content)?;

        sql_out.write_all(table.create_table_sql().as_bytes())?;
        copybook_out.write_all(schema_parser::build_copybook_body(&content).as_bytes())?;
        drop(copybook_out);

        // `cobol_copybook_ext` is accepted on the request but reserved —
        // not yet applied to the emitted filename, matching the source
        // contract.
        copybooks.push(CopybookFile {
            local_path: copybook_path,
            basename: format!("{}.txt", schema_base),
        });

        let data_filename = job.data_filename_for_schema(&schema_filename);
        let data_key = format!("{}/{}", job.data_prefix(), data_filename);
        let local_data_path = temp_in.join(&data_filename);

        debug!(key = %data_key, "downloading data");
        match primary.download(&data_key, &local_data_path) {
            Ok(()) => {
                debug!(key = %data_key, "migrating data");
                let bytes = fs::read(&local_data_path)?;
                if let Some(insert_sql) = data_parser::build_insert(&bytes, &table, encoding) {
                    sql_out.write_all(insert_sql.as_bytes())?;
                }
            }
            Err(_) => {
                warn!(schema = %schema_key, "no data found for IDMS schema");
            }
        }

        catalog.insert(table_name, table);
    }

    for set_key in primary.list(&job.sets_prefix())? {
        let set_filename = basename(&set_key).to_string();
        if set_filename.trim().is_empty() {
            continue;
        }

        debug!(key = %set_key, "downloading set");
        let local_set_path = temp_in.join(&set_filename);
        primary.download(&set_key, &local_set_path)?;
        let content = fs::read_to_string(&local_set_path)?;

        debug!(key = %set_key, "migrating set");
        let header = match set_parser::parse_header(&content) {
            Ok(h) => h,
            Err(_) => {
                error!(key = %set_key, "no header found for IDMS set");
                continue;
            }
        };

        let sql = match header.mode {
            SetMode::Chain => set_parser::migrate_chain_set(&header.name, &content, &catalog, job.request.migrate_fks),
            SetMode::Index => set_parser::migrate_index_set(&header.name, &content, &catalog),
        };
        sql_out.write_all(sql.as_bytes())?;
    }

    sql_out.flush()?;
    drop(sql_out);

    let mut copybook_paths = Vec::new();

    if job.request.upload_to_s3 {
        debug!("uploading output files");
        primary.upload(&sql_path, &job.sql_output_key())?;

        let copybook_out_prefix = job.copybook_out_prefix();
        for copybook in &copybooks {
            let key = format!("{}/{}", copybook_out_prefix, copybook.basename);
            secondary.upload(&copybook.local_path, &key)?;
            copybook_paths.push(key);
        }
    }

    Ok(MigrationResult {
        primary_bucket: primary_bucket_name.to_string(),
        secondary_bucket: secondary_bucket_name.to_string(),
        sql_file_path: job.sql_output_key(),
        copybook_paths,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::job::JobRequest;
    use crate::storage::LocalFsBlobStore;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_end_to_end_schema_and_data() {
        let bucket_dir = tempdir().unwrap();
        let bucket = LocalFsBlobStore::new(bucket_dir.path());

        write(
            &bucket_dir.path().join("inputs/batch1/schemas/CUSTOMER_SCHEMA.txt"),
            "RECORD NAME.... CUSTOMER-RECORD\n05  CUST-ID    PIC  X(9)      1   9\n",
        );
        write(
            &bucket_dir.path().join("inputs/batch1/data/CUSTOMER_DATA.txt"),
            "000000001JANE     \n",
        );

        let job = Job::new(JobRequest {
            base_path: "batch1".to_string(),
            cobol_copybook_out_path: "copybooks".to_string(),
            ..Default::default()
        });

        let temp = tempdir().unwrap();
        let result = run_migration(&job, &bucket, &bucket, "eve", "theory", temp.path()).unwrap();

        assert_eq!(result.primary_bucket, "eve");
        assert_eq!(result.secondary_bucket, "theory");
        assert_eq!(result.sql_file_path, "outputs/batch1/idms_migration.sql");
        assert_eq!(result.copybook_paths, vec!["inputs/copybooks/CUSTOMER.txt".to_string()]);

        let sql = fs::read_to_string(bucket_dir.path().join("outputs/batch1/idms_migration.sql")).unwrap();
        assert!(sql.contains("CREATE TABLE customer_record("));
        assert!(sql.contains("INSERT INTO customer_record("));
        assert!(sql.contains("('000000001', 'JANE     ')"));

        let copybook = fs::read_to_string(bucket_dir.path().join("inputs/copybooks/CUSTOMER.txt")).unwrap();
        assert!(copybook.starts_with("       01 CUSTOMER.\n"));
    }

    #[test]
    fn test_missing_data_is_warning_not_error() {
        let bucket_dir = tempdir().unwrap();
        let bucket = LocalFsBlobStore::new(bucket_dir.path());
        write(
            &bucket_dir.path().join("inputs/batch1/schemas/CUSTOMER_SCHEMA.txt"),
            "RECORD NAME.... CUSTOMER-RECORD\n05  CUST-ID    PIC  X(9)      1   9\n",
        );

        let job = Job::new(JobRequest {
            base_path: "batch1".to_string(),
            cobol_copybook_out_path: "copybooks".to_string(),
            upload_to_s3: false,
            ..Default::default()
        });

        let temp = tempdir().unwrap();
        let result = run_migration(&job, &bucket, &bucket, "eve", "theory", temp.path()).unwrap();
        assert!(result.copybook_paths.is_empty());
    }

    #[test]
    fn test_missing_record_name_is_fatal() {
        let bucket_dir = tempdir().unwrap();
        let bucket = LocalFsBlobStore::new(bucket_dir.path());
        write(
            &bucket_dir.path().join("inputs/batch1/schemas/BAD_SCHEMA.txt"),
            "nothing useful here\n",
        );

        let job = Job::new(JobRequest {
            base_path: "batch1".to_string(),
            cobol_copybook_out_path: "copybooks".to_string(),
            ..Default::default()
        });

        let temp = tempdir().unwrap();
        let result = run_migration(&job, &bucket, &bucket, "eve", "theory", temp.path());
        assert!(matches!(result, Err(ReError::RecordNameNotFound(_))));
    }
}
