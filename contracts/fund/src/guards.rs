//! # Guards
//!
//! Pre-mutation checks shared by every public entry point. Each guard either
//! returns or panics with the matching [`Error`](crate::Error) code; none of
//! them writes storage.

use soroban_sdk::{log, panic_with_error, Address, Env, String, Symbol};

use crate::{storage, Error};

/// Fails with `AlreadyInitialized` if the platform record exists.
pub fn require_uninitialized(env: &Env) {
    if storage::has_fund(env) {
        panic_with_error!(env, Error::AlreadyInitialized);
    }
}

/// Fails with `NotInitialized` if the platform record does not exist.
pub fn require_initialized(env: &Env) {
    if !storage::has_fund(env) {
        panic_with_error!(env, Error::NotInitialized);
    }
}

/// Fails with `InsufficientDeposit` unless `attached >= threshold`.
pub fn require_min_stake(env: &Env, attached: i128, threshold: i128) {
    if attached < threshold {
        panic_with_error!(env, Error::InsufficientDeposit);
    }
}

/// Fails with `Unauthorized` unless `caller` is the expected account.
pub fn require_caller_is(env: &Env, caller: &Address, expected: &Address) {
    if caller != expected {
        panic_with_error!(env, Error::Unauthorized);
    }
}

/// Fails with `InvalidField` unless `value` is 1-64 chars of `[a-z0-9_-]`.
///
/// The identifier is the deploy-salt preimage: every campaign address is
/// derived from it, so the charset is locked down the way ledger account
/// names are.
pub fn require_identifier(env: &Env, value: &String) {
    let len = value.len() as usize;
    let mut buf = [0u8; crate::MAX_IDENTIFIER_LENGTH as usize];
    if len == 0 || len > buf.len() {
        log!(env, "invalid field (bad identifier): {}", Symbol::new(env, "identifier"));
        panic_with_error!(env, Error::InvalidField);
    }
    value.copy_into_slice(&mut buf[..len]);
    for byte in buf[..len].iter() {
        let ok =
            byte.is_ascii_lowercase() || byte.is_ascii_digit() || *byte == b'-' || *byte == b'_';
        if !ok {
            log!(env, "invalid field (bad identifier): {}", Symbol::new(env, "identifier"));
            panic_with_error!(env, Error::InvalidField);
        }
    }
}
