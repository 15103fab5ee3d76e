//! # Code Generation
//!
//! Produces the human-readable identifying codes printed on parking
//! tickets and wash-order slips.
//!
//! ## Format
//! ```text
//! PK 2603011430 X7Q9
//! │  │          │
//! │  │          └── 4-char random suffix (uppercase, no lookalikes)
//! │  └── compact timestamp, minute granularity (%y%m%d%H%M)
//! └── prefix: PK for sessions, WS for orders
//! ```
//!
//! Codes are **practically unique, not cryptographically unique**: no
//! external state is consulted. Global uniqueness is enforced by the
//! persistence layer's unique constraint; a collision surfaces as a
//! creation conflict and the caller retries with a freshly generated
//! code.

use chrono::Utc;
use rand::Rng;

/// Length of the random suffix.
const SUFFIX_LEN: usize = 4;

/// Suffix alphabet. Excludes 0/O, 1/I/L so codes survive being read
/// aloud or typed from a faded thermal print.
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Generates a code with the given prefix.
///
/// ## Example
/// ```rust
/// use parkwash_core::codegen::generate;
/// use parkwash_core::SESSION_CODE_PREFIX;
///
/// let code = generate(SESSION_CODE_PREFIX);
/// assert!(code.starts_with("PK"));
/// assert_eq!(code.len(), 2 + 10 + 4);
/// ```
pub fn generate(prefix: &str) -> String {
    let stamp = Utc::now().format("%y%m%d%H%M");
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..SUFFIX_ALPHABET.len());
            SUFFIX_ALPHABET[idx] as char
        })
        .collect();
    format!("{}{}{}", prefix, stamp, suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================
