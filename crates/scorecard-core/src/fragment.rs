//! URL fragment handling for share links.
//!
//! The current format is `#s=<token>`. Older builds produced `#v4=` and
//! `#v5=` links; those are recognised so they can be reported, but not
//! decoded.

use crate::codec::{self, SharedReport};

/// Prefix of the current share-link format.
pub const SHARE_PREFIX: &str = "s=";

const LEGACY_PREFIXES: [&str; 2] = ["v4=", "v5="];

/// What a URL fragment holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'a> {
    /// A current-format token.
    Share(&'a str),
    /// A token from an older, unsupported format.
    Legacy { version: &'a str, token: &'a str },
    /// No fragment, or one that is not a share link.
    Unrelated,
}

impl Fragment<'_> {
    /// Whether the fragment puts the app into shared mode.
    pub fn is_share_link(&self) -> bool {
        !matches!(self, Fragment::Unrelated)
    }
}

/// Classify a fragment.
///
/// Accepts a bare fragment (`#s=...` or `s=...`) or a whole URL, in which
/// case everything up to the first `#` is ignored.
pub fn parse_fragment(input: &str) -> Fragment<'_> {
    let input = input.trim();
    let fragment = match input.find('#') {
        Some(i) => &input[i + 1..],
        None => input,
    };

    if let Some(token) = fragment.strip_prefix(SHARE_PREFIX) {
        return Fragment::Share(token);
    }
    for prefix in LEGACY_PREFIXES {
        if let Some(token) = fragment.strip_prefix(prefix) {
            return Fragment::Legacy {
                version: &prefix[..prefix.len() - 1],
                token,
            };
        }
    }
    Fragment::Unrelated
}

/// Decode the share link in a fragment or URL, if it holds one.
///
/// Legacy and malformed links are logged and yield `None`.
pub fn decode_fragment(input: &str) -> Option<SharedReport> {
    match parse_fragment(input) {
        Fragment::Share(token) => codec::try_decode(token),
        Fragment::Legacy { version, .. } => {
            tracing::warn!("{version} share links are no longer supported");
            None
        }
        Fragment::Unrelated => None,
    }
}

/// Build a share URL from a page address and a token.
///
/// Any fragment already on `base` is replaced.
pub fn share_url(base: &str, token: &str) -> String {
    let base = base.split('#').next().unwrap_or(base);
    format!("{base}#{SHARE_PREFIX}{token}")
}
