use crate::configuration::MailmanSettings;
use crate::errors::ApiError;
use crate::mailman::{ListManager, MailmanError};
use crate::models::ListSummary;
use crate::routes::run_backend;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ListsQuery {
    address: Option<String>,
}

#[get("/")]
#[tracing::instrument(name = "Listing mailing lists", skip_all, fields(address = ?query.address))]
pub async fn get(
    manager: web::Data<dyn ListManager>,
    settings: web::Data<MailmanSettings>,
    query: web::Query<ListsQuery>,
) -> Result<HttpResponse, ApiError> {
    let manager = manager.into_inner();
    let site_list = settings.site_list.clone();
    let address = query.into_inner().address.filter(|a| !a.is_empty());

    let lists = run_backend(move || {
        let mut lists = Vec::new();
        for name in manager.list_names()? {
            if name == site_list {
                continue;
            }
            let list = match manager.load(&name) {
                Ok(list) => list,
                // Deleted between listing and loading.
                Err(MailmanError::UnknownList(_)) => continue,
                Err(e) => return Err(e.into()),
            };
            if address.as_deref().is_some_and(|a| !list.is_member(a)) {
                continue;
            }
            lists.push(ListSummary::from(&list));
        }
        Ok(lists)
    })
    .await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(lists))
}
