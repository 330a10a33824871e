use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use serde::{Deserialize, Serialize};

/// Body of every message-style response, success or failure.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ResponseMessage {
    pub message: String,
}

impl From<&str> for ResponseMessage {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

pub fn success() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::json())
        .json(ResponseMessage::from("Success"))
}

/// Only a case-insensitive `true` counts as true.
pub fn parse_boolean(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;

    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}
