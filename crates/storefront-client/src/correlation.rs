//! Outbound correlation identifiers.
//!
//! Each attempt carries a fresh `{timestamp_ms}-{suffix}` id so server logs for
//! retried calls can be told apart.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

const SUFFIX_LEN: usize = 9;
const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a correlation id such as `1718000000000-k3j9x0a1b`.
///
/// # Examples
/// ```
/// let id = storefront_client::generate_correlation_id();
/// let (millis, suffix) = id.split_once('-').expect("two parts");
/// assert!(millis.parse::<u128>().is_ok());
/// assert_eq!(suffix.len(), 9);
/// ```
#[must_use]
pub fn generate_correlation_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .filter_map(|_| ALPHABET.get(rng.random_range(0..ALPHABET.len())))
        .map(|byte| char::from(*byte))
        .collect();
    format!("{millis}-{suffix}")
}
