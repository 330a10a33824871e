/// Failures raised by the list backend. The payload is the detail shown
/// after the kind's message, usually the offending address or list name.
#[derive(thiserror::Error, Debug)]
pub enum MailmanError {
    #[error("")]
    SubscribeNeedsConfirmation,
    #[error("{0}")]
    NeedApproval(String),
    #[error("{0}")]
    AlreadyAMember(String),
    #[error("{0}")]
    MembershipIsBanned(String),
    #[error("{0}")]
    BadEmail(String),
    #[error("{0}")]
    HostileAddress(String),
    #[error("{0}")]
    NotAMember(String),
    #[error("{0}")]
    BadListName(String),
    #[error("{0}")]
    ListAlreadyExists(String),
    #[error("{0}")]
    UnknownList(String),
    #[error("{0}")]
    Assertion(String),
    #[error("Timed out waiting for the lock on list {0}")]
    LockTimeout(String),
    #[error("List storage failure: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Malformed list configuration: {0}")]
    Corrupt(#[from] serde_json::Error),
}
