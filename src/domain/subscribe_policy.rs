use serde::{Deserialize, Serialize};

/// Moderation applied to new subscriptions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SubscribePolicy {
    Open,
    #[default]
    Confirm,
    Approval,
    ConfirmAndApproval,
}

impl SubscribePolicy {
    /// Lists created through the API are always moderated; anything outside
    /// 1..=3 falls back to `Confirm`.
    pub fn from_requested(value: i64) -> Self {
        match value {
            2 => Self::Approval,
            3 => Self::ConfirmAndApproval,
            _ => Self::Confirm,
        }
    }
}

impl From<SubscribePolicy> for u8 {
    fn from(policy: SubscribePolicy) -> Self {
        match policy {
            SubscribePolicy::Open => 0,
            SubscribePolicy::Confirm => 1,
            SubscribePolicy::Approval => 2,
            SubscribePolicy::ConfirmAndApproval => 3,
        }
    }
}

impl TryFrom<u8> for SubscribePolicy {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Open),
            1 => Ok(Self::Confirm),
            2 => Ok(Self::Approval),
            3 => Ok(Self::ConfirmAndApproval),
            other => Err(format!("{} is not a valid subscribe policy.", other)),
        }
    }
}
