use crate::configuration::MailmanSettings;
use crate::mailman::address::{is_acceptable_list_name, is_safe_storage_name, validate_email};
use crate::mailman::{ListManager, LockToken, MailingList, MailmanError, NewList};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const CONFIG_FILE: &str = "config.json";
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Keeps every list as a JSON document under `<var_prefix>/lists/<name>/`
/// and serialises writers with one lock file per list.
pub struct FileListStore {
    settings: MailmanSettings,
}

impl FileListStore {
    pub fn new(settings: MailmanSettings) -> Self {
        Self { settings }
    }

    fn config_path(&self, name: &str) -> PathBuf {
        self.settings.list_dir(name).join(CONFIG_FILE)
    }

    fn list_exists(&self, name: &str) -> bool {
        self.config_path(name).is_file()
    }
}

impl ListManager for FileListStore {
    fn list_names(&self) -> Result<Vec<String>, MailmanError> {
        let entries = match fs::read_dir(self.settings.lists_dir()) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                if self.list_exists(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn load(&self, name: &str) -> Result<MailingList, MailmanError> {
        if !is_safe_storage_name(name) {
            return Err(MailmanError::UnknownList(name.to_string()));
        }
        let raw = match fs::read(self.config_path(name)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(MailmanError::UnknownList(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_slice(&raw)?)
    }

    fn lock(&self, name: &str) -> Result<LockToken, MailmanError> {
        if !is_safe_storage_name(name) {
            return Err(MailmanError::UnknownList(name.to_string()));
        }
        fs::create_dir_all(self.settings.locks_dir())?;
        let path = self.settings.lock_file(name);
        let token = LockToken::generate();
        let deadline = Instant::now() + self.settings.lock_timeout();

        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    if let Err(e) = file.write_all(token.as_str().as_bytes()) {
                        let _ = fs::remove_file(&path);
                        return Err(e.into());
                    }
                    tracing::debug!(list = %name, "Acquired list lock.");
                    return Ok(token);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if Instant::now() >= deadline {
                        return Err(MailmanError::LockTimeout(name.to_string()));
                    }
                    std::thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn unlock(&self, name: &str, token: &LockToken) -> Result<(), MailmanError> {
        let path = self.settings.lock_file(name);
        match fs::read_to_string(&path) {
            Ok(owner) if owner == token.as_str() => {
                fs::remove_file(&path)?;
                tracing::debug!(list = %name, "Released list lock.");
            }
            Ok(_) => {
                tracing::warn!(list = %name, "List lock is owned by someone else, leaving it in place.");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn save(&self, list: &MailingList) -> Result<(), MailmanError> {
        if !is_safe_storage_name(&list.name) {
            return Err(MailmanError::BadListName(list.name.clone()));
        }
        let list_dir = self.settings.list_dir(&list.name);
        fs::create_dir_all(&list_dir)?;

        // Write aside and rename so readers never observe a partial record.
        let temporary = list_dir.join(format!("{}.tmp", CONFIG_FILE));
        fs::write(&temporary, serde_json::to_vec_pretty(list)?)?;
        fs::rename(&temporary, self.config_path(&list.name))?;
        Ok(())
    }

    fn create(&self, new_list: &NewList) -> Result<(MailingList, LockToken), MailmanError> {
        let name = new_list.name.as_str();
        if name.to_lowercase() != name {
            return Err(MailmanError::Assertion(
                "List name must be all lower case.".to_string(),
            ));
        }
        if self.list_exists(name) {
            return Err(MailmanError::ListAlreadyExists(name.to_string()));
        }
        if !is_acceptable_list_name(name) {
            return Err(MailmanError::BadListName(name.to_string()));
        }
        let email_host = new_list
            .email_host
            .as_deref()
            .unwrap_or(&self.settings.default_email_host);
        let url_host = new_list
            .url_host
            .as_deref()
            .unwrap_or(&self.settings.default_url_host);
        let posting_address = format!("{}@{}", name, email_host);
        if validate_email(&posting_address).is_err() {
            return Err(MailmanError::BadListName(posting_address));
        }
        validate_email(&new_list.owner)?;

        let token = self.lock(name)?;
        // Another creator may have won the race while we waited.
        if self.list_exists(name) {
            self.unlock(name, &token)?;
            return Err(MailmanError::ListAlreadyExists(name.to_string()));
        }

        Ok((MailingList::new(new_list, email_host, url_host), token))
    }
}
