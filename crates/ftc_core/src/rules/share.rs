//! Shared-link rule payloads.
//!
//! A rule set travels as its camelCase JSON object encoded with URL-safe
//! base64 (no padding), so it can sit in a link fragment such as
//! `#rules=eyJncmlkU2l6ZSI6Nn0`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use tracing::warn;

use super::{RuleSet, RuleSetDraft};
use crate::error::ShareError;

const FRAGMENT_KEY: &str = "rules=";

/// Encode a rule set as a URL-safe payload (without the `#rules=` prefix).
pub fn encode(rules: &RuleSet) -> String {
    // RuleSet serializes to a flat object of integers; this cannot fail.
    let json = serde_json::to_string(&rules.to_draft()).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json.as_bytes())
}

/// Link fragment form, e.g. `#rules=...`.
pub fn encode_fragment(rules: &RuleSet) -> String {
    format!("#{FRAGMENT_KEY}{}", encode(rules))
}

/// Decode a payload or fragment, reporting why it could not be read.
///
/// Accepts a bare payload, `rules=<payload>`, `#rules=<payload>`, a full link
/// ending in that fragment and padded base64. Missing keys take defaults and out-of-range values are clamped.
pub fn try_decode(fragment: &str) -> Result<RuleSet, ShareError> {
    let payload = strip_fragment(fragment);
    if payload.is_empty() {
        return Err(ShareError::Empty);
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let json = String::from_utf8(bytes)?;
    let draft: RuleSetDraft = serde_json::from_str(&json)?;
    Ok(RuleSet::new(draft))
}

/// Decode a payload, substituting the default rule set when it is unreadable.
pub fn decode_or_default(fragment: &str) -> RuleSet {
    match try_decode(fragment) {
        Ok(rules) => rules,
        Err(e) => {
            warn!(error = %e, "malformed shared rule link; using defaults");
            RuleSet::default()
        }
    }
}

fn strip_fragment(fragment: &str) -> &str {
    let trimmed = fragment.trim();
    // Full links carry the payload after the last '#'.
    let trimmed = trimmed.rsplit_once('#').map_or(trimmed, |(_, tail)| tail);
    trimmed.strip_prefix(FRAGMENT_KEY).unwrap_or(trimmed)
}
