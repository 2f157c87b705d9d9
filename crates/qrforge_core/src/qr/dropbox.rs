//! Dropbox share-link rewriting.

use once_cell::sync::Lazy;
use regex::Regex;

static DROPBOX_PREVIEW_FLAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"dl=0$").expect("valid dropbox flag regex"));

/// Rewrites a Dropbox share link into a direct-download link.
///
/// Only links containing `dropbox.com` are touched, and only a trailing
/// `dl=0` is replaced by `dl=1`.
pub fn modify_dropbox_link(link: &str) -> String {
    if link.contains("dropbox.com") {
        DROPBOX_PREVIEW_FLAG_RE.replace(link, "dl=1").into_owned()
    } else {
        link.to_string()
    }
}
