use crate::configuration::MailmanSettings;
use crate::errors::ApiError;
use crate::list_lookup::ListHandle;
use crate::mailman::ListManager;
use crate::routes::run_backend;
use crate::utils::{parse_boolean, success};
use actix_web::{HttpResponse, delete, web};
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Deserialize)]
pub struct DeleteListParams {
    delete_archives: Option<String>,
}

#[delete("/{listname}")]
#[tracing::instrument(name = "Deleting a mailing list", skip_all, fields(listname = %path))]
pub async fn delete(
    manager: web::Data<dyn ListManager>,
    settings: web::Data<MailmanSettings>,
    path: web::Path<String>,
    form: Option<web::Form<DeleteListParams>>,
) -> Result<HttpResponse, ApiError> {
    let delete_archives = form
        .as_ref()
        .is_some_and(|form| parse_boolean(form.delete_archives.as_deref()));
    let manager = manager.into_inner();
    let settings = settings.into_inner();
    let listname = path.into_inner();

    run_backend(move || {
        let list = ListHandle::resolve(&manager, &listname, true)?;

        let mut paths = vec![settings.list_dir(&list.name)];
        if delete_archives {
            paths.extend(settings.archive_paths(&list.name));
        }
        for path in &paths {
            remove_path(path)?;
        }
        tracing::info!(listname = %list.name, delete_archives, "Deleted mailing list.");
        Ok(())
    })
    .await?;

    Ok(success())
}

/// Unlinks symlinks, removes directories recursively and plain files
/// directly. A path that is already gone counts as removed.
fn remove_path(path: &Path) -> Result<(), anyhow::Error> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to remove {}", path.display()));
        }
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.with_context(|| format!("Failed to remove {}", path.display()))
}
