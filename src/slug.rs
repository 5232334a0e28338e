//! Name to slug normalization.
//!
//! Every category and platform name becomes a file name and a link target, so
//! the mapping must be stable across runs: `"Wikis"` is always `wikis` and
//! `"Communication - Email - Mail Transfer Agents"` is always
//! `communication-email-mail-transfer-agents`.

/// Normalizes a display name into a lowercase, hyphen-separated slug.
///
/// Alphanumeric characters are lowercased and kept. Lowercasing can expand a
/// letter into several characters (`'İ'` becomes `i` plus a combining dot);
/// only the alphanumeric ones survive. Any run of other characters
/// (whitespace, punctuation, symbols) collapses into a single hyphen, and
/// leading/trailing hyphens are dropped. Apostrophes are removed
/// without introducing a separator, so `"Don't"` becomes `dont`.
///
/// The function is idempotent: `normalize(&normalize(n)) == normalize(n)`.
#[must_use]
pub fn normalize(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.extend(ch.to_lowercase().filter(|c| c.is_alphanumeric()));
            pending_dash = false;
        } else if ch == '\'' || ch == '\u{2019}' {
            continue;
        } else {
            pending_dash = true;
        }
    }

    slug
}
