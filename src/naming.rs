use rand::Rng;

/// Character set for randomized resource names. Lowercase letters only, the
/// strictest common denominator across Azure resource-name rules (storage
/// accounts reject uppercase and most punctuation).
pub const NAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Length used by the mutator when no override is given.
pub const DEFAULT_NAME_LENGTH: usize = 10;

/// Draws a fixed-length random name from [`NAME_ALPHABET`].
///
/// Collision resistance is best-effort: 26^10 names make clashes between
/// concurrent test runs unlikely, but nothing checks against names already
/// live in the cloud.
pub fn random_name<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| NAME_ALPHABET[rng.random_range(0..NAME_ALPHABET.len())] as char)
        .collect()
}

/// [`random_name`] over the thread-local generator.
pub fn fresh_name(length: usize) -> String {
    random_name(&mut rand::rng(), length)
}
