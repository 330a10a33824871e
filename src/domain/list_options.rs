use crate::domain::SubscribePolicy;
use std::num::IntErrorKind;

/// Numeric options accepted when creating a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub subscribe_policy: SubscribePolicy,
    pub archive_private: bool,
    pub quiet: bool,
}

impl ListOptions {
    /// Every present value must be an integer. Values outside their range
    /// are silently replaced by the default rather than rejected.
    pub fn parse(
        subscribe_policy: Option<&str>,
        archive_private: Option<&str>,
        quiet: Option<&str>,
    ) -> Result<ListOptions, String> {
        let subscribe_policy = parse_integer(subscribe_policy, 1)?;
        let archive_private = parse_integer(archive_private, 0)?;
        let quiet = parse_integer(quiet, 0)?;

        Ok(Self {
            subscribe_policy: SubscribePolicy::from_requested(subscribe_policy),
            archive_private: archive_private == 1,
            quiet: quiet == 1,
        })
    }
}

fn parse_integer(value: Option<&str>, default: i64) -> Result<i64, String> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(number) => Ok(number),
        // Still an integer, just out of any accepted range.
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            Ok(default)
        }
        Err(e) => Err(format!("{} for value '{}'", e, raw)),
    }
}
