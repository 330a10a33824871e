use crate::domain::Subscriber;
use crate::errors::{ApiError, ErrorKind};
use crate::list_lookup::ListHandle;
use crate::mailman::ListManager;
use crate::models::MemberDetails;
use crate::routes::run_backend;
use crate::utils::{parse_boolean, success};
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, delete, get, put, web};
use anyhow::Context;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct MembersQuery {
    address: Option<String>,
}

#[derive(Deserialize)]
pub struct SubscribeParams {
    address: Option<String>,
    fullname: Option<String>,
    digest: Option<String>,
}

#[derive(Deserialize)]
pub struct UnsubscribeParams {
    address: Option<String>,
}

fn required_address(address: Option<String>) -> Result<String, ApiError> {
    address.ok_or_else(|| ApiError::domain(ErrorKind::MissingInformation, "address"))
}

#[get("/{listname}/members")]
#[tracing::instrument(
    name = "Listing list members",
    skip_all,
    fields(listname = %path, address = ?query.address)
)]
pub async fn get(
    manager: web::Data<dyn ListManager>,
    path: web::Path<String>,
    query: web::Query<MembersQuery>,
) -> Result<HttpResponse, ApiError> {
    let manager = manager.into_inner();
    let listname = path.into_inner();
    let address = query.into_inner().address.filter(|a| !a.is_empty());

    let body = run_backend(move || {
        let list = ListHandle::resolve(&manager, &listname, false)?;
        let body = match address {
            None => serde_json::to_value(list.members()),
            Some(address) => {
                let key = list.member_key(&address)?;
                let fullname = list.member_name(&key).map(String::from);
                serde_json::to_value(vec![MemberDetails {
                    address: key,
                    fullname,
                }])
            }
        };
        Ok(body.context("Failed to serialize list members.")?)
    })
    .await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(body))
}

#[put("/{listname}/members")]
#[tracing::instrument(
    name = "Subscribing a list member",
    skip_all,
    fields(listname = %path, address = ?form.address)
)]
pub async fn put(
    manager: web::Data<dyn ListManager>,
    path: web::Path<String>,
    form: web::Form<SubscribeParams>,
) -> Result<HttpResponse, ApiError> {
    let params = form.into_inner();
    let address = required_address(params.address)?;
    let fullname = params.fullname.filter(|name| !name.is_empty());
    let subscriber = Subscriber::new(address, fullname, parse_boolean(params.digest.as_deref()));
    let manager = manager.into_inner();
    let listname = path.into_inner();

    run_backend(move || {
        let mut list = ListHandle::resolve(&manager, &listname, true)?;
        let outcome = list.add_member(subscriber);
        // Pending and held requests are recorded even when the subscription
        // itself is refused.
        list.save()?;
        Ok(outcome?)
    })
    .await?;

    Ok(success())
}

#[delete("/{listname}/members")]
#[tracing::instrument(
    name = "Unsubscribing a list member",
    skip_all,
    fields(listname = %path, address = ?form.address)
)]
pub async fn delete(
    manager: web::Data<dyn ListManager>,
    path: web::Path<String>,
    form: web::Form<UnsubscribeParams>,
) -> Result<HttpResponse, ApiError> {
    let address = required_address(form.into_inner().address)?;
    let manager = manager.into_inner();
    let listname = path.into_inner();

    run_backend(move || {
        let mut list = ListHandle::resolve(&manager, &listname, true)?;
        let outcome = list.approved_delete_member(&address, false, true);
        list.save()?;
        Ok(outcome?)
    })
    .await?;

    Ok(success())
}
