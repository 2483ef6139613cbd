//! # Guards
//!
//! Pre-mutation checks shared by every public entry point. Each guard either
//! returns or panics with the matching [`Error`](crate::Error) code; none of
//! them writes storage. Field validators name the offending field on the
//! diagnostic log stream before panicking, since contract errors cannot
//! carry payloads.

use soroban_sdk::{log, panic_with_error, Address, Env, String, Symbol};

use crate::{storage, Error};

/// Fails with `AlreadyInitialized` if the campaign record exists.
pub fn require_uninitialized(env: &Env) {
    if storage::has_project(env) {
        panic_with_error!(env, Error::AlreadyInitialized);
    }
}

/// Fails with `NotInitialized` if the campaign record does not exist.
pub fn require_initialized(env: &Env) {
    if !storage::has_project(env) {
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

/// Require that `caller` authorized this invocation *and* is an ordinary
/// account, not a contract.
///
/// Auth alone is not enough here: a contract address satisfies
/// `require_auth` whenever that contract is the invoker, which would let a
/// third program act as a donor/liker/commenter. Rejecting contract (`C...`)
/// addresses keeps these entry points human-only.
pub fn require_direct_call(env: &Env, caller: &Address) {
    caller.require_auth();
    if is_contract_address(caller) {
        panic_with_error!(env, Error::IndirectCallNotAllowed);
    }
}

/// Strkey inspection: contract addresses render with a `C` prefix, account
/// addresses with `G`.
fn is_contract_address(addr: &Address) -> bool {
    let strkey = addr.to_string();
    let len = strkey.len() as usize;
    let mut buf = [0u8; 64];
    if len == 0 || len > buf.len() {
        return false;
    }
    strkey.copy_into_slice(&mut buf[..len]);
    buf[0] == b'C'
}

/// Fails with `InvalidField` if `value` is empty.
pub fn require_non_blank(env: &Env, value: &String, field: Symbol) {
    if value.len() == 0 {
        log!(env, "invalid field (blank): {}", field);
        panic_with_error!(env, Error::InvalidField);
    }
}

/// Fails with `InvalidField` if `value` is longer than `max` bytes.
pub fn require_max_length(env: &Env, value: &String, max: u32, field: Symbol) {
    if value.len() > max {
        log!(env, "invalid field (too long): {}", field);
        panic_with_error!(env, Error::InvalidField);
    }
}

/// Fails with `InvalidField` unless `value` starts with `https://`.
pub fn require_url_scheme(env: &Env, value: &String, field: Symbol) {
    const SCHEME: &[u8] = b"https://";
    let len = value.len() as usize;
    let mut buf = [0u8; crate::MAX_URL_LENGTH as usize];
    if len < SCHEME.len() || len > buf.len() {
        log!(env, "invalid field (bad url): {}", field);
        panic_with_error!(env, Error::InvalidField);
    }
    value.copy_into_slice(&mut buf[..len]);
    if &buf[..SCHEME.len()] != SCHEME {
        log!(env, "invalid field (bad url): {}", field);
        panic_with_error!(env, Error::InvalidField);
    }
}

/// Fails with `InvalidField` unless `value` is 1-64 chars of `[a-z0-9_-]`.
///
/// The identifier doubles as the deterministic deploy-salt preimage in the
/// registry, so the charset is locked down the way ledger account names are.
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
