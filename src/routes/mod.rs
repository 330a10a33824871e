pub mod index;
pub mod lists;

use crate::errors::ApiError;
use crate::telemetry::spawn_blocking_with_tracing;
use crate::utils::ResponseMessage;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};
use anyhow::Context;

/// Every endpoint of the API, mounted at the root.
pub fn api(cfg: &mut web::ServiceConfig) {
    cfg.service(index::get)
        .service(lists::members::get)
        .service(lists::members::put)
        .service(lists::members::delete)
        .service(lists::get)
        .service(lists::create::put)
        .service(lists::delete::delete);
}

/// Answers every request no route matches.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type(ContentType::json())
        .json(ResponseMessage::from("Not found"))
}

/// Backend calls touch the filesystem and may wait on a list lock, so they
/// run on the blocking pool.
pub(crate) async fn run_backend<F, R>(task: F) -> Result<R, ApiError>
where
    F: FnOnce() -> Result<R, ApiError> + Send + 'static,
    R: Send + 'static,
{
    spawn_blocking_with_tracing(task)
        .await
        .context("Failed to run the list backend task.")?
}
