use crate::mailman::MailmanError;
use crate::utils::{ResponseMessage, error_chain_fmt};
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};

/// Every failure the API knows how to name, with its status code and the
/// message shown to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SubscribeNeedsConfirmation,
    NeedApproval,
    AlreadyAMember,
    MembershipIsBanned,
    BadEmail,
    HostileAddress,
    NotAMember,
    MissingInformation,
    BadListName,
    Assertion,
    InvalidPassword,
    UnknownList,
    ListAlreadyExists,
    InvalidParams,
    Unknown,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::SubscribeNeedsConfirmation => StatusCode::NOT_ACCEPTABLE,
            ErrorKind::NeedApproval => StatusCode::UNAUTHORIZED,
            ErrorKind::AlreadyAMember => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::MembershipIsBanned => StatusCode::FORBIDDEN,
            ErrorKind::BadEmail => StatusCode::BAD_REQUEST,
            ErrorKind::HostileAddress => StatusCode::FORBIDDEN,
            ErrorKind::NotAMember => StatusCode::NOT_FOUND,
            ErrorKind::MissingInformation => StatusCode::BAD_REQUEST,
            ErrorKind::BadListName => StatusCode::NOT_FOUND,
            ErrorKind::Assertion => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::InvalidPassword => StatusCode::BAD_REQUEST,
            ErrorKind::UnknownList => StatusCode::NOT_FOUND,
            ErrorKind::ListAlreadyExists => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidParams => StatusCode::BAD_REQUEST,
            ErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::SubscribeNeedsConfirmation => "Subscribe needs confirmation",
            ErrorKind::NeedApproval => "Need approval",
            ErrorKind::AlreadyAMember => "Already a member",
            ErrorKind::MembershipIsBanned => "Membership is banned",
            ErrorKind::BadEmail => "Bad email",
            ErrorKind::HostileAddress => "Hostile address",
            ErrorKind::NotAMember => "Not a member",
            ErrorKind::MissingInformation => "Missing information",
            ErrorKind::BadListName => "Bad list name",
            ErrorKind::Assertion => "Assertion",
            ErrorKind::InvalidPassword => "Invalid password",
            ErrorKind::UnknownList => "Unknown list",
            ErrorKind::ListAlreadyExists => "List already exists",
            ErrorKind::InvalidParams => "Invalid parameters",
            ErrorKind::Unknown => "Error",
        }
    }
}

impl From<&MailmanError> for ErrorKind {
    fn from(error: &MailmanError) -> Self {
        match error {
            MailmanError::SubscribeNeedsConfirmation => ErrorKind::SubscribeNeedsConfirmation,
            MailmanError::NeedApproval(_) => ErrorKind::NeedApproval,
            MailmanError::AlreadyAMember(_) => ErrorKind::AlreadyAMember,
            MailmanError::MembershipIsBanned(_) => ErrorKind::MembershipIsBanned,
            MailmanError::BadEmail(_) => ErrorKind::BadEmail,
            MailmanError::HostileAddress(_) => ErrorKind::HostileAddress,
            MailmanError::NotAMember(_) => ErrorKind::NotAMember,
            MailmanError::BadListName(_) => ErrorKind::BadListName,
            MailmanError::ListAlreadyExists(_) => ErrorKind::ListAlreadyExists,
            MailmanError::UnknownList(_) => ErrorKind::UnknownList,
            MailmanError::Assertion(_) => ErrorKind::Assertion,
            MailmanError::LockTimeout(_)
            | MailmanError::Storage(_)
            | MailmanError::Corrupt(_) => ErrorKind::Unknown,
        }
    }
}

#[derive(thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Domain { kind: ErrorKind, message: String },
    #[error("{0:#}")]
    UnexpectedError(#[from] anyhow::Error),
}

impl ApiError {
    /// `"<kind message>: <detail>"`, or the bare kind message when there is
    /// no detail to show.
    pub fn domain(kind: ErrorKind, detail: impl AsRef<str>) -> Self {
        let detail = detail.as_ref();
        let message = if detail.is_empty() {
            kind.message().to_string()
        } else {
            format!("{}: {}", kind.message(), detail)
        };
        ApiError::Domain { kind, message }
    }

    pub fn from_kind(kind: ErrorKind) -> Self {
        ApiError::Domain {
            kind,
            message: kind.message().to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Domain { kind, .. } => *kind,
            ApiError::UnexpectedError(_) => ErrorKind::Unknown,
        }
    }
}

impl From<MailmanError> for ApiError {
    fn from(error: MailmanError) -> Self {
        let kind = ErrorKind::from(&error);
        match error {
            // Confirmation is a normal step of the workflow; there is nothing
            // more to say about it.
            MailmanError::SubscribeNeedsConfirmation => ApiError::from_kind(kind),
            other => ApiError::domain(kind, other.to_string()),
        }
    }
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .content_type(ContentType::json())
            .json(ResponseMessage {
                message: self.to_string(),
            })
    }
}
