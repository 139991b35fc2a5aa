//! Human-facing booking reference codes.

use rand::Rng;
use rand::distributions::Alphanumeric;

const PREFIX: &str = "CH-";
const LENGTH: usize = 8;

/// A fresh `CH-` reference with eight uppercase alphanumerics.
pub fn generate_reference() -> String {
    let code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(LENGTH)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect();
    format!("{PREFIX}{code}")
}
