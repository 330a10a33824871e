use crate::errors::ApiError;
use crate::list_lookup::ListHandle;
use crate::mailman::ListManager;
use crate::models::ListDetails;
use crate::routes::run_backend;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};

#[get("/{listname}")]
#[tracing::instrument(name = "Retrieving list attributes", skip_all, fields(listname = %path))]
pub async fn get(
    manager: web::Data<dyn ListManager>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let manager = manager.into_inner();
    let listname = path.into_inner();

    let details = run_backend(move || {
        let list = ListHandle::resolve(&manager, &listname, false)?;
        Ok(ListDetails::from(&*list))
    })
    .await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(vec![details]))
}
