//! # NEAR Account Ids
//!
//! NEAR has two disjoint kinds of account id:
//!
//! - **Implicit**: 64 lowercase hex characters, the hex of an Ed25519 public
//!   key. Self-certifying: nobody has to create it, so nobody has to check it
//!   exists.
//! - **Named**: `bowen.google.com`-style ids, 2 to 64 characters, dot
//!   separated labels of `[a-z0-9]` with single interior `-` or `_`. Someone
//!   has to register these, so a send to one is only legal once the network
//!   confirms it exists.
//!
//! Every implicit id also matches the named grammar. Classification therefore
//! checks implicit first; the other order would quietly accept implicit ids as
//! unverified named accounts.

use tracing::debug;

use super::AddressError;
use crate::config::{
    NEAR_IMPLICIT_ACCOUNT_LENGTH, NEAR_MAX_ACCOUNT_LENGTH, NEAR_MIN_ACCOUNT_LENGTH,
    NEAR_RESERVED_ACCOUNT_IDS,
};
use crate::crypto::Ed25519PublicKey;
use crate::network::NearNetworkProvider;

/// Which of the two account schemes an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountClass {
    Implicit,
    Named,
    Invalid,
}

/// Exactly 64 characters of `[0-9a-f]`.
pub fn is_implicit_account(account_id: &str) -> bool {
    account_id.len() == NEAR_IMPLICIT_ACCOUNT_LENGTH
        && account_id
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Length in `[2, 64]`, named grammar, not reserved.
pub fn is_valid_named_account(account_id: &str) -> bool {
    let len = account_id.len();
    if !(NEAR_MIN_ACCOUNT_LENGTH..=NEAR_MAX_ACCOUNT_LENGTH).contains(&len) {
        return false;
    }
    if NEAR_RESERVED_ACCOUNT_IDS.contains(&account_id) {
        return false;
    }
    account_id.split('.').all(is_valid_label)
}

/// One dot-separated label: alphanumeric runs joined by a single `-` or `_`.
fn is_valid_label(label: &str) -> bool {
    let mut previous_was_separator = true;
    for b in label.bytes() {
        match b {
            b'a'..=b'z' | b'0'..=b'9' => previous_was_separator = false,
            b'-' | b'_' if !previous_was_separator => previous_was_separator = true,
            _ => return false,
        }
    }
    // Empty labels and trailing separators both end here with the flag set.
    !previous_was_separator
}

/// Classify an id, checking the implicit scheme first.
pub fn classify(account_id: &str) -> AccountClass {
    if is_implicit_account(account_id) {
        AccountClass::Implicit
    } else if is_valid_named_account(account_id) {
        AccountClass::Named
    } else {
        AccountClass::Invalid
    }
}

/// Only named accounts need a network round-trip before they can be used.
pub fn requires_existence_check(account_id: &str) -> bool {
    classify(account_id) == AccountClass::Named
}

/// The implicit account id owned by `key`.
pub fn implicit_account_id(key: &Ed25519PublicKey) -> String {
    key.to_hex()
}

/// Turn a user-entered id into a confirmed send target.
///
/// Implicit ids resolve to themselves without touching the network. Named
/// ids must exist on chain. A missing account and a failed lookup are both
/// reported as [`AddressError::AccountNotFound`].
pub async fn resolve<P>(account_id: &str, provider: &P) -> Result<String, AddressError>
where
    P: NearNetworkProvider + ?Sized,
{
    match classify(account_id) {
        AccountClass::Implicit => Ok(account_id.to_string()),
        AccountClass::Invalid => Err(AddressError::InvalidAccountId(account_id.to_string())),
        AccountClass::Named => match provider.fetch_account_info(account_id).await {
            Ok(info) if info.exists => Ok(account_id.to_string()),
            Ok(_) => Err(AddressError::AccountNotFound(account_id.to_string())),
            Err(e) => {
                debug!(account_id, error = %e, "named account lookup failed");
                Err(AddressError::AccountNotFound(account_id.to_string()))
            }
        },
    }
}
