use crate::mailman::MailingList;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the list index.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ListSummary {
    pub listname: String,
    pub archive_private: u8,
    pub real_name: String,
    pub description: String,
}

impl From<&MailingList> for ListSummary {
    fn from(list: &MailingList) -> Self {
        Self {
            listname: list.name.clone(),
            archive_private: u8::from(list.archive_private),
            real_name: list.real_name.clone(),
            description: list.description.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ListDetails {
    pub listname: String,
    pub archive_private: u8,
    pub real_name: String,
    pub description: String,
    pub member_count: usize,
    pub created: DateTime<Utc>,
    pub owner: Vec<String>,
}

impl From<&MailingList> for ListDetails {
    fn from(list: &MailingList) -> Self {
        Self {
            listname: list.name.clone(),
            archive_private: u8::from(list.archive_private),
            real_name: list.real_name.clone(),
            description: list.description.clone(),
            member_count: list.member_count(),
            created: list.created_at,
            owner: list.owner.clone(),
        }
    }
}
