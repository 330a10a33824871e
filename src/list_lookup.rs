use crate::mailman::{ListManager, LockToken, MailingList, MailmanError, NewList};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// An exclusive lock on one list, released when dropped.
pub struct ListLock {
    manager: Arc<dyn ListManager>,
    name: String,
    token: LockToken,
}

impl ListLock {
    pub fn acquire(manager: &Arc<dyn ListManager>, name: &str) -> Result<Self, MailmanError> {
        let token = manager.lock(name)?;
        Ok(Self::held(manager, name, token))
    }

    fn held(manager: &Arc<dyn ListManager>, name: &str, token: LockToken) -> Self {
        Self {
            manager: Arc::clone(manager),
            name: name.to_string(),
            token,
        }
    }
}

impl Drop for ListLock {
    fn drop(&mut self) {
        if let Err(e) = self.manager.unlock(&self.name, &self.token) {
            tracing::error!(error.cause_chain = ?e, list = %self.name, "Failed to release list lock.");
        }
    }
}

/// A list loaded for the duration of one request, optionally holding its
/// exclusive lock.
pub struct ListHandle {
    list: MailingList,
    lock: Option<ListLock>,
    manager: Arc<dyn ListManager>,
}

impl ListHandle {
    /// With `exclusive_lock` the lock is taken before loading, so the state
    /// read is the state that will be saved. A failed load releases it again.
    pub fn resolve(
        manager: &Arc<dyn ListManager>,
        name: &str,
        exclusive_lock: bool,
    ) -> Result<Self, MailmanError> {
        let lock = if exclusive_lock {
            Some(ListLock::acquire(manager, name)?)
        } else {
            None
        };
        let list = manager.load(name)?;

        Ok(Self {
            list,
            lock,
            manager: Arc::clone(manager),
        })
    }

    /// A brand new list comes back locked and not yet saved.
    pub fn create(manager: &Arc<dyn ListManager>, new_list: &NewList) -> Result<Self, MailmanError> {
        let (list, token) = manager.create(new_list)?;
        let lock = ListLock::held(manager, &list.name, token);

        Ok(Self {
            list,
            lock: Some(lock),
            manager: Arc::clone(manager),
        })
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    pub fn save(&self) -> Result<(), MailmanError> {
        if !self.is_locked() {
            return Err(MailmanError::Assertion(format!(
                "List {} must be locked before it is saved.",
                self.list.name
            )));
        }
        self.manager.save(&self.list)
    }

    /// Release the lock now rather than at the end of the scope.
    pub fn unlock(self) -> MailingList {
        self.list
    }
}

impl std::fmt::Debug for ListHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListHandle")
            .field("list", &self.list.name)
            .field("locked", &self.is_locked())
            .finish()
    }
}

impl Deref for ListHandle {
    type Target = MailingList;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl DerefMut for ListHandle {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.list
    }
}
