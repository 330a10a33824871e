//! The list-management backend.
//!
//! Handlers only see [`ListManager`]; [`FileListStore`] is the adapter used
//! by the binary and the tests. Membership rules live on [`MailingList`]
//! itself, so any store that can load and save a list gets them for free.

mod address;
mod errors;
mod list;
pub(crate) mod store;

pub use address::{is_acceptable_list_name, validate_email};
pub use errors::MailmanError;
pub use list::{MailingList, Member, NewList};
pub use store::FileListStore;

use uuid::Uuid;

/// Proof of ownership of a list lock, required to release it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockToken(String);

impl LockToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub trait ListManager: Send + Sync {
    /// Names of every list, in sorted order.
    fn list_names(&self) -> Result<Vec<String>, MailmanError>;

    /// Fails with [`MailmanError::UnknownList`] when the list does not exist.
    fn load(&self, name: &str) -> Result<MailingList, MailmanError>;

    /// Blocks until the exclusive lock is ours or the lock timeout elapses.
    fn lock(&self, name: &str) -> Result<LockToken, MailmanError>;

    fn unlock(&self, name: &str, token: &LockToken) -> Result<(), MailmanError>;

    fn save(&self, list: &MailingList) -> Result<(), MailmanError>;

    /// Validates the request and returns the new list, unsaved and locked.
    fn create(&self, new_list: &NewList) -> Result<(MailingList, LockToken), MailmanError>;
}
