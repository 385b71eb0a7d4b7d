//! Caller-supplied parameter shapes for each remote operation.
//!
//! These types carry values straight onto the wire. Nothing here validates
//! input beyond what the types themselves express: an empty reason, an
//! unusual duration token or a nonexistent user are all passed through and
//! left for the wiki to judge.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{UserId, Username};

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

/// How long a ban or block lasts.
///
/// MediaWiki accepts a number of seconds, a relative duration written in
/// English (`"2 weeks"`, `"1 day"`), the keyword `infinite`, or an absolute
/// timestamp. Every variant is rendered verbatim into the outgoing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expiry {
    /// A number of seconds from now.
    Seconds(u64),
    /// A raw wiki duration token, sent untouched.
    Token(String),
    /// Never expires.
    Infinite,
    /// Expires at an absolute UTC time, rendered as RFC 3339.
    At(DateTime<Utc>),
}

impl std::fmt::Display for Expiry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expiry::Seconds(secs) => write!(f, "{secs}"),
            Expiry::Token(token) => f.write_str(token),
            Expiry::Infinite => f.write_str("infinite"),
            Expiry::At(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl std::str::FromStr for Expiry {
    type Err = std::convert::Infallible;

    /// Keeps user input exactly as typed, as an [`Expiry::Token`]. The wiki
    /// parses durations itself, so `"+5"`, `"007"` or a timestamp with an
    /// offset reach it unchanged.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Expiry::Token(s.to_owned()))
    }
}

impl From<u64> for Expiry {
    fn from(secs: u64) -> Self {
        Expiry::Seconds(secs)
    }
}

impl From<&str> for Expiry {
    fn from(token: &str) -> Self {
        Expiry::Token(token.to_owned())
    }
}

impl From<DateTime<Utc>> for Expiry {
    fn from(at: DateTime<Utc>) -> Self {
        Expiry::At(at)
    }
}

// ---------------------------------------------------------------------------
// Operation parameters
// ---------------------------------------------------------------------------

/// Input for banning a user from the wiki's chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanParams {
    /// Account to ban, by numeric id (see the user-ID lookup).
    pub user_id: UserId,
    /// Length of the ban.
    pub duration: Expiry,
    /// Free-text reason shown in the chat log. Sent as an empty `reason=` when `None`.
    pub reason: Option<String>,
}

impl BanParams {
    /// Creates ban parameters with no reason.
    pub fn new(user_id: UserId, duration: impl Into<Expiry>) -> Self {
        Self {
            user_id,
            duration: duration.into(),
            reason: None,
        }
    }

    /// Sets the reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

// ---------------------------------------------------------------------------

/// Input for blocking a user from editing the wiki.
///
/// Both `allow_*` switches default to `true`, which leaves the corresponding
/// marker off the request. Turning one off appends the bare `nocreate` or
/// `autoblock` marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockParams {
    /// Account (or IP address) to block.
    pub username: Username,
    /// Length of the block.
    pub duration: Expiry,
    /// Free-text reason recorded in the block log. Sent empty when `None`.
    pub reason: Option<String>,
    /// When `false`, the request carries `nocreate`.
    pub allow_account_creation: bool,
    /// When `false`, the request carries `autoblock`.
    pub allow_autoblock_exemption: bool,
}

impl BlockParams {
    /// Creates block parameters with no reason and both switches left at their defaults.
    pub fn new(username: Username, duration: impl Into<Expiry>) -> Self {
        Self {
            username,
            duration: duration.into(),
            reason: None,
            allow_account_creation: true,
            allow_autoblock_exemption: true,
        }
    }

    /// Sets the reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Stops the blocked user from registering new accounts.
    #[must_use]
    pub fn prevent_account_creation(mut self) -> Self {
        self.allow_account_creation = false;
        self
    }

    /// Also blocks the last IP address the user edited from.
    #[must_use]
    pub fn with_autoblock(mut self) -> Self {
        self.allow_autoblock_exemption = false;
        self
    }
}

// ---------------------------------------------------------------------------

/// Input for looking up a user's numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdLookupParams {
    /// Account name to resolve.
    pub username: Username,
}

impl UserIdLookupParams {
    pub fn new(username: Username) -> Self {
        Self { username }
    }
}

impl From<Username> for UserIdLookupParams {
    fn from(username: Username) -> Self {
        Self::new(username)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn expiry_renders_verbatim() {
        assert_eq!(Expiry::Seconds(86400).to_string(), "86400");
        assert_eq!(Expiry::from("2 weeks").to_string(), "2 weeks");
        assert_eq!(Expiry::Infinite.to_string(), "infinite");

        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(Expiry::from(at).to_string(), "2026-01-02T03:04:05Z");
    }

    #[test]
    fn expiry_keeps_sub_second_precision() {
        let at = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(750);
        assert_eq!(Expiry::from(at).to_string(), "2026-01-02T03:04:05.750Z");
    }

    #[test]
    fn parsed_expiry_is_sent_as_typed() {
        for input in [
            "+5",
            "007",
            "3600",
            "infinite",
            "2 weeks",
            "2026-01-02T04:04:05+01:00",
            "2026-01-02T03:04:05.750Z",
        ] {
            let expiry: Expiry = input.parse().unwrap();
            assert_eq!(expiry, Expiry::Token(input.to_owned()));
            assert_eq!(expiry.to_string(), input);
        }
    }

    #[test]
    fn block_params_default_to_no_markers() {
        let params = BlockParams::new(Username::new("Vandal").unwrap(), Expiry::Infinite);
        assert!(params.allow_account_creation);
        assert!(params.allow_autoblock_exemption);
        assert_eq!(params.reason, None);

        let params = params.prevent_account_creation().with_autoblock();
        assert!(!params.allow_account_creation);
        assert!(!params.allow_autoblock_exemption);
    }
}
