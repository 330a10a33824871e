/// The subscription request handed to a list: who, under what name, and
/// whether they want digests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscriber {
    pub address: String,
    pub fullname: Option<String>,
    pub digest: bool,
}

impl Subscriber {
    pub fn new(address: impl Into<String>, fullname: Option<String>, digest: bool) -> Self {
        Self {
            address: address.into(),
            fullname,
            digest,
        }
    }
}
