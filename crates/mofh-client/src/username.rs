//! Local username suggestions.

use rand::Rng;

/// Longest username the provider accepts as a suggestion.
pub const MAX_USERNAME_LENGTH: usize = 8;

/// Suggests a username for an account on `domain`.
///
/// The provider assigns its own username at creation, so this is only a
/// hint: lowercase letters and digits, at most eight characters, ending in a
/// random digit.
#[must_use]
pub fn generate_username(domain: &str) -> String {
    generate_username_with(domain, &mut rand::thread_rng())
}

/// [`generate_username`] with a caller-provided random source.
pub fn generate_username_with<R: Rng + ?Sized>(domain: &str, rng: &mut R) -> String {
    let mut base: String = domain
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if let Some(rest) = base.strip_prefix("test") {
        base = format!("a{}", rest);
    }
    if base.chars().next().map_or(true, |c| c.is_ascii_digit()) {
        base.insert(0, 'a');
    }

    // ASCII only, so byte truncation is safe.
    base.truncate(MAX_USERNAME_LENGTH - 1);
    base.push(char::from(b'0' + rng.gen_range(0..10u8)));
    base
}
