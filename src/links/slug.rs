//! Slug format rules and candidate generation.

use rand::RngExt;

/// Symbols used for generated slugs.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_LENGTH: usize = 6;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

pub const MIN_SLUG_LEN: usize = 2;
pub const MAX_SLUG_LEN: usize = 50;

/// Whether `slug` matches `[A-Za-z0-9_-]{2,50}`.
pub fn is_valid_slug(slug: &str) -> bool {
    (MIN_SLUG_LEN..=MAX_SLUG_LEN).contains(&slug.len())
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Draw `length` symbols uniformly from `alphabet`.
pub fn generate_candidate<R: RngExt>(rng: &mut R, alphabet: &[u8], length: usize) -> String {
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// Supplies candidate slugs to the allocator.
pub trait SlugSource: Send + Sync {
    fn candidate(&self) -> String;
}

/// Thread-local RNG over [`ALPHABET`] at a fixed length.
#[derive(Debug, Clone)]
pub struct RandomSlugs {
    length: usize,
}

impl RandomSlugs {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_SLUG_LEN, MAX_SLUG_LEN),
        }
    }
}

impl Default for RandomSlugs {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

impl SlugSource for RandomSlugs {
    fn candidate(&self) -> String {
        generate_candidate(&mut rand::rng(), ALPHABET, self.length)
    }
}
