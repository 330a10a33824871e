use crate::domain::{ListOptions, ListPassword};
use crate::email_client::EmailClient;
use crate::errors::{ApiError, ErrorKind};
use crate::list_lookup::ListHandle;
use crate::mailman::{ListManager, MailingList, NewList};
use crate::routes::run_backend;
use crate::utils::success;
use actix_web::{HttpResponse, route, web};
use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateListParams {
    admin: Option<String>,
    password: Option<Secret<String>>,
    subscribe_policy: Option<String>,
    archive_private: Option<String>,
    emailhost: Option<String>,
    urlhost: Option<String>,
    notification_email: Option<String>,
    quiet: Option<String>,
}

#[route("/{listname}", method = "PUT", method = "POST")]
#[tracing::instrument(
    name = "Creating a mailing list",
    skip_all,
    fields(listname = %path, admin = ?form.admin)
)]
pub async fn put(
    manager: web::Data<dyn ListManager>,
    email_client: web::Data<EmailClient>,
    path: web::Path<String>,
    form: web::Form<CreateListParams>,
) -> Result<HttpResponse, ApiError> {
    let params = form.into_inner();
    let options = ListOptions::parse(
        params.subscribe_policy.as_deref(),
        params.archive_private.as_deref(),
        params.quiet.as_deref(),
    )
    .map_err(|e| ApiError::domain(ErrorKind::InvalidParams, e))?;
    let password = ListPassword::parse(params.password)
        .map_err(|_| ApiError::from_kind(ErrorKind::InvalidPassword))?;
    let admin = params
        .admin
        .ok_or_else(|| ApiError::domain(ErrorKind::MissingInformation, "admin"))?;

    let new_list_password = password.clone();
    let new_list_admin = admin.clone();
    let manager = manager.into_inner();
    let listname = path.into_inner();
    let list = run_backend(move || {
        let new_list = NewList {
            name: listname,
            owner: new_list_admin,
            password_hash: new_list_password.hash()?,
            email_host: params.emailhost,
            url_host: params.urlhost,
        };
        let mut list = ListHandle::create(&manager, &new_list)?;
        list.subscribe_policy = options.subscribe_policy;
        list.archive_private = options.archive_private;
        list.save()?;
        Ok(list.unlock())
    })
    .await?;
    tracing::info!(listname = %list.name, "Created mailing list.");

    if !options.quiet {
        let recipient = params.notification_email.unwrap_or(admin);
        // The list exists at this point; a lost notification must not undo that.
        if let Err(e) = send_new_list_email(&email_client, &recipient, &list, &password).await {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to send the new list notification."
            );
        }
    }

    Ok(success())
}

#[tracing::instrument(name = "Sending the new list notification", skip_all, fields(recipient = %recipient))]
pub async fn send_new_list_email(
    email_client: &EmailClient,
    recipient: &str,
    list: &MailingList,
    password: &ListPassword,
) -> Result<(), reqwest::Error> {
    let subject = format!("Your new mailing list: {}", list.name);
    let plain_body = format!(
        "The mailing list `{name}' has just been created for you.\n\n\
         Your list password is: {password}\n\n\
         You need the password to configure your list, which you can do at:\n\n\
         {admin_url}\n\n\
         The web page for users of your list is:\n\n\
         {listinfo_url}\n\n\
         Send subscription administration commands to {request_address}.\n",
        name = list.name,
        password = password.expose_secret(),
        admin_url = list.admin_url(),
        listinfo_url = list.listinfo_url(),
        request_address = list.request_address(),
    );
    let html_body = format!(
        "<p>The mailing list <strong>{name}</strong> has just been created for you.</p>\
         <p>Your list password is: <code>{password}</code></p>\
         <p>Configure your list at <a href=\"{admin_url}\">{admin_url}</a>.</p>\
         <p>The web page for users of your list is \
         <a href=\"{listinfo_url}\">{listinfo_url}</a>.</p>\
         <p>Send subscription administration commands to {request_address}.</p>",
        name = list.name,
        password = password.expose_secret(),
        admin_url = list.admin_url(),
        listinfo_url = list.listinfo_url(),
        request_address = list.request_address(),
    );

    email_client
        .send_email(recipient, &subject, &html_body, &plain_body)
        .await
}
