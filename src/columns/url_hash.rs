//! The `#hidden=` URL fragment.
//!
//! A shared link like `https://portal/files/#hidden=lab,award` hides the
//! listed columns for whoever opens it.

use url::{ParseError, Url};

use crate::error::Result;

/// Fragment prefix naming the hidden columns
pub const HIDDEN_FRAGMENT_PREFIX: &str = "hidden=";

// Only used to read fragments off relative URLs such as "/files/#hidden=a".
const RELATIVE_BASE: &str = "http://localhost/";

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '@'
}

fn parse_lenient(url: &str) -> Option<Url> {
    match Url::parse(url) {
        Ok(parsed) => Some(parsed),
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
            .and_then(|base| base.join(url))
            .ok(),
        Err(err) => {
            log::debug!("ignoring unparseable url {url:?}: {err}");
            None
        }
    }
}

/// Column ids named by the URL's `#hidden=` fragment.
///
/// `None` when the URL has no such fragment, an empty list when the fragment
/// names nothing. Ids are the runs of `[A-Za-z0-9_@]` characters; anything
/// else separates them.
pub fn extract_hidden_column_ids(url: &str) -> Option<Vec<String>> {
    let parsed = parse_lenient(url)?;
    let list = parsed.fragment()?.strip_prefix(HIDDEN_FRAGMENT_PREFIX)?;
    Some(
        list.split(|c: char| !is_token_char(c))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// `url` with its fragment set to `#hidden=` plus the ids, or with no
/// fragment at all when `hidden` is empty.
pub fn generate_hidden_columns_url(url: &str, hidden: &[String]) -> Result<String> {
    let mut parsed = Url::parse(url)?;
    if hidden.is_empty() {
        parsed.set_fragment(None);
    } else {
        let fragment = format!("{HIDDEN_FRAGMENT_PREFIX}{}", hidden.join(","));
        parsed.set_fragment(Some(&fragment));
    }
    Ok(parsed.into())
}

/// `url` without any fragment.
pub fn clear_hidden_columns_from_url(url: &str) -> Result<String> {
    generate_hidden_columns_url(url, &[])
}
