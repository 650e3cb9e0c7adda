/**
 * Scoped styles
 *
 * Rewrites a component's style text so its `:host` selectors target the
 * component's own element id.
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\*[\s\S]*?\*/").unwrap());

/// `:host` optionally followed by a parenthesized compound selector.
static COLON_HOST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":host(?:\(\s*([^)]*?)\s*\))?").unwrap());

/// Scope `css_text` to the element whose id is `host_id`.
///
/// `:host` becomes `#host_id` and `:host(.active)` becomes
/// `#host_id.active`. Comments are removed.
pub fn scope_style(css_text: &str, host_id: &str) -> String {
    let without_comments = COMMENT_RE.replace_all(css_text, "");
    let host = format!("#{}", host_id);
    COLON_HOST_RE
        .replace_all(&without_comments, |caps: &Captures| match caps.get(1) {
            Some(selector) => format!("{}{}", host, selector.as_str()),
            None => host.clone(),
        })
        .into_owned()
}
