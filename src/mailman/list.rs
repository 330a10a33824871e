use crate::domain::{SubscribePolicy, Subscriber};
use crate::mailman::MailmanError;
use crate::mailman::address::validate_email;
use chrono::{DateTime, Utc};
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the backend needs to bring a list into existence.
#[derive(Debug, Clone)]
pub struct NewList {
    pub name: String,
    pub owner: String,
    pub password_hash: String,
    pub email_host: Option<String>,
    pub url_host: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub address: String,
    pub fullname: Option<String>,
    pub digest: bool,
}

impl From<Subscriber> for Member {
    fn from(subscriber: Subscriber) -> Self {
        Self {
            address: subscriber.address,
            fullname: subscriber.fullname,
            digest: subscriber.digest,
        }
    }
}

/// Persisted state of one mailing list together with its membership rules.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MailingList {
    pub name: String,
    pub real_name: String,
    pub description: String,
    pub owner: Vec<String>,
    pub password_hash: String,
    pub host_name: String,
    pub web_page_url: String,
    pub subscribe_policy: SubscribePolicy,
    pub archive_private: bool,
    pub created_at: DateTime<Utc>,
    // Keyed by the lower-cased address.
    #[serde(default)]
    members: BTreeMap<String, Member>,
    #[serde(default)]
    pub ban_list: Vec<String>,
    #[serde(default)]
    pub pending_confirmations: Vec<Member>,
    #[serde(default)]
    pub held_subscriptions: Vec<Member>,
}

impl MailingList {
    pub fn new(new_list: &NewList, email_host: &str, url_host: &str) -> Self {
        Self {
            name: new_list.name.clone(),
            real_name: capitalize(&new_list.name),
            description: String::new(),
            owner: vec![new_list.owner.clone()],
            password_hash: new_list.password_hash.clone(),
            host_name: email_host.to_string(),
            web_page_url: format!("http://{}/mailman/", url_host),
            subscribe_policy: SubscribePolicy::default(),
            archive_private: false,
            created_at: Utc::now(),
            members: BTreeMap::new(),
            ban_list: Vec::new(),
            pending_confirmations: Vec::new(),
            held_subscriptions: Vec::new(),
        }
    }

    pub fn posting_address(&self) -> String {
        format!("{}@{}", self.name, self.host_name)
    }

    pub fn request_address(&self) -> String {
        format!("{}-request@{}", self.name, self.host_name)
    }

    pub fn admin_url(&self) -> String {
        format!("{}admin/{}", self.web_page_url, self.name)
    }

    pub fn listinfo_url(&self) -> String {
        format!("{}listinfo/{}", self.web_page_url, self.name)
    }

    /// Member keys in sorted order.
    pub fn members(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_member(&self, address: &str) -> bool {
        self.members.contains_key(&address.to_lowercase())
    }

    pub fn member_key(&self, address: &str) -> Result<String, MailmanError> {
        let key = address.to_lowercase();
        if self.members.contains_key(&key) {
            Ok(key)
        } else {
            Err(MailmanError::NotAMember(address.to_string()))
        }
    }

    pub fn member_name(&self, key: &str) -> Option<&str> {
        self.members
            .get(key)
            .and_then(|member| member.fullname.as_deref())
    }

    pub fn member(&self, key: &str) -> Option<&Member> {
        self.members.get(key)
    }

    /// The ban entry matching `address`. Entries starting with `^` are
    /// case-insensitive regular expressions, the rest exact addresses.
    pub fn banned_pattern(&self, address: &str) -> Option<&str> {
        self.ban_list
            .iter()
            .find(|pattern| {
                if pattern.starts_with('^') {
                    match RegexBuilder::new(pattern).case_insensitive(true).build() {
                        Ok(regex) => regex.is_match(address),
                        Err(e) => {
                            tracing::warn!(list = %self.name, %pattern, error = %e, "Skipping malformed ban pattern.");
                            false
                        }
                    }
                } else {
                    pattern.eq_ignore_ascii_case(address)
                }
            })
            .map(String::as_str)
    }

    /// Subscription as requested by the subscriber; moderation applies.
    pub fn add_member(&mut self, subscriber: Subscriber) -> Result<(), MailmanError> {
        validate_email(&subscriber.address)?;
        if self.is_member(&subscriber.address) {
            return Err(MailmanError::AlreadyAMember(subscriber.address));
        }
        if subscriber
            .address
            .eq_ignore_ascii_case(&self.posting_address())
        {
            return Err(MailmanError::BadEmail(subscriber.address));
        }
        if let Some(pattern) = self.banned_pattern(&subscriber.address) {
            return Err(MailmanError::MembershipIsBanned(pattern.to_string()));
        }

        match self.subscribe_policy {
            SubscribePolicy::Open => self.approved_add_member(subscriber),
            SubscribePolicy::Confirm | SubscribePolicy::ConfirmAndApproval => {
                let member = Member::from(subscriber);
                remove_request(&mut self.pending_confirmations, &member.address);
                self.pending_confirmations.push(member);
                Err(MailmanError::SubscribeNeedsConfirmation)
            }
            SubscribePolicy::Approval => {
                let member = Member::from(subscriber);
                remove_request(&mut self.held_subscriptions, &member.address);
                self.held_subscriptions.push(member);
                Err(MailmanError::NeedApproval(format!(
                    "subscriptions to {} require moderator approval",
                    self.real_name
                )))
            }
        }
    }

    /// Subscription that has already cleared moderation.
    pub fn approved_add_member(&mut self, subscriber: Subscriber) -> Result<(), MailmanError> {
        validate_email(&subscriber.address)?;
        let key = subscriber.address.to_lowercase();
        if self.members.contains_key(&key) {
            return Err(MailmanError::AlreadyAMember(subscriber.address));
        }
        if let Some(pattern) = self.banned_pattern(&subscriber.address) {
            return Err(MailmanError::MembershipIsBanned(pattern.to_string()));
        }

        remove_request(&mut self.pending_confirmations, &subscriber.address);
        remove_request(&mut self.held_subscriptions, &subscriber.address);
        self.members.insert(key, Member::from(subscriber));
        Ok(())
    }

    pub fn approved_delete_member(
        &mut self,
        address: &str,
        admin_notif: bool,
        userack: bool,
    ) -> Result<(), MailmanError> {
        let key = self.member_key(address)?;
        self.members.remove(&key);
        tracing::info!(
            list = %self.name,
            member = %key,
            admin_notif,
            userack,
            "Removed list member."
        );
        Ok(())
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn remove_request(requests: &mut Vec<Member>, address: &str) {
    requests.retain(|request| !request.address.eq_ignore_ascii_case(address));
}
