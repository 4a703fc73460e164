use std::path::PathBuf;

use actix_web::{post, web, HttpResponse};
use tracing::error;

use idms_core::job::{Job, JobRequest};
use idms_core::orchestrator::run_migration;
use idms_core::storage::LocalFsBlobStore;

use crate::api::result::R;
use crate::config::constant::CFG;
use crate::web_error::{WResult, WebError};

/// Triggers one migration job. Accepts the JSON request body described
/// by the external interface contract and runs schemas-then-sets to
/// completion before responding.
#[post("/migrate/idms/mysql")]
pub async fn migrate_idms_mysql(body: web::Json<JobRequest>) -> WResult<HttpResponse> {
    let request = body.into_inner();
    if request.base_path.trim().is_empty() {
        return Err(WebError::BadRequest("base_path must not be empty".to_string()));
    }
    if request.cobol_copybook_out_path.trim().is_empty() {
        return Err(WebError::BadRequest(
            "cobol_copybook_out_path must not be empty".to_string(),
        ));
    }

    let job = Job::new(request);
    let storage = &CFG.storage;

    let local_root = storage
        .local_root
        .clone()
        .unwrap_or_else(|| "/tmp/idms_migration/blobs".to_string());
    let primary_root = PathBuf::from(&local_root).join(&storage.primary_bucket);
    let secondary_root = PathBuf::from(&local_root).join(&storage.secondary_bucket);
    let temp_dir = PathBuf::from(&local_root).join("tmp").join(job.id.to_string());

    let primary_bucket = storage.primary_bucket.clone();
    let secondary_bucket = storage.secondary_bucket.clone();

    let outcome = web::block(move || {
        let primary = LocalFsBlobStore::new(primary_root);
        let secondary = LocalFsBlobStore::new(secondary_root);
        run_migration(&job, &primary, &secondary, &primary_bucket, &secondary_bucket, &temp_dir)
    })
    .await;

    match outcome {
        Ok(Ok(result)) => Ok(HttpResponse::Ok().json(R::success(result))),
        Ok(Err(migration_err)) => {
            error!(error = %migration_err, "migration job failed");
            Err(WebError::from(migration_err))
        }
        Err(blocking_err) => {
            error!(error = %blocking_err, "migration task panicked");
            Err(WebError::Migration(blocking_err.to_string()))
        }
    }
}

#[cfg(test)]
mod test {
    use actix_web::{test, App};

    use super::*;

    #[actix_web::test]
    async fn test_missing_base_path_is_bad_request() {
        let app = test::init_service(App::new().service(migrate_idms_mysql)).await;
        let req = test::TestRequest::post()
            .uri("/migrate/idms/mysql")
            .set_json(&serde_json::json!({ "upload_to_s3": false }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }
}
