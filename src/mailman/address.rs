use crate::mailman::MailmanError;
use regex::Regex;
use std::sync::LazyLock;

static BAD_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\[\]()<>|:;^,\\"\x00-\x1f]|[^\x00-\x7e]"#).unwrap());
static DOMAIN_PART: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9]+$").unwrap());
static LIST_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-+_.=a-z0-9]+$").unwrap());

/// Reject addresses that are malformed (`BadEmail`) or that carry characters
/// which could be abused once handed to an MTA or a shell (`HostileAddress`).
pub fn validate_email(address: &str) -> Result<(), MailmanError> {
    if address.is_empty() || address.contains(' ') {
        return Err(MailmanError::BadEmail(address.to_string()));
    }
    if BAD_CHARACTERS.is_match(address) || address.starts_with('-') {
        return Err(MailmanError::HostileAddress(address.to_string()));
    }
    // Unqualified local addresses are not accepted.
    let domain = match address.find('@') {
        Some(at_sign) if at_sign > 0 => &address[at_sign + 1..],
        _ => return Err(MailmanError::BadEmail(address.to_string())),
    };
    let domain_parts: Vec<&str> = domain.split('.').collect();
    if domain_parts.len() < 2 {
        return Err(MailmanError::BadEmail(address.to_string()));
    }
    for part in domain_parts {
        if !DOMAIN_PART.is_match(part) || part.starts_with('-') {
            return Err(MailmanError::HostileAddress(address.to_string()));
        }
    }

    Ok(())
}

/// Characters an MTA alias can safely carry, and never a bare `.` or `..`.
pub fn is_acceptable_list_name(name: &str) -> bool {
    LIST_NAME.is_match(name) && name != "." && name != ".."
}

/// Whether a name can be used as a path component at all.
pub(crate) fn is_safe_storage_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}
