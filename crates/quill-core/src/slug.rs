//! Slug generation for posts and categories.
//!
//! A slug is lowercase ASCII word characters (`a-z`, `0-9`, `_`) joined by
//! single hyphens. Uniqueness is resolved against a caller-supplied set of
//! slugs already in use by appending `-1`, `-2`, ... to the base.

use std::collections::HashSet;

/// Normalize `title` into a slug. May return an empty string when the title
/// has no word characters at all.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch == '-' || ch.is_whitespace() {
            pending_dash = true;
        }
        // Anything else is dropped without acting as a separator.
    }

    slug
}

/// Produce a slug for `title` that is not contained in `taken`.
///
/// Titles that normalize to nothing use `fallback` as the base instead.
pub fn unique_slug(title: &str, fallback: &str, taken: &HashSet<String>) -> String {
    let mut base = slugify(title);
    if base.is_empty() {
        base = slugify(fallback);
    }

    if !taken.contains(&base) {
        return base;
    }

    (1u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

/// `true` when `value` is already a normalized, non-empty slug.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty() && slugify(value) == value
}
