use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct MemberDetails {
    pub address: String,
    pub fullname: Option<String>,
}
