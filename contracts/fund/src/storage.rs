//! # Storage
//!
//! Typed helpers over the registry's storage tiers.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key      | Type         | Description                          |
//! |----------|--------------|--------------------------------------|
//! | `Fund`   | `Fund`       | Singleton platform record            |
//! | `Config` | `FundConfig` | Token + campaign code hash           |
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key            | Type                               | Description     |
//! |----------------|------------------------------------|-----------------|
//! | `Index`        | `Map<BytesN<32>, ProjectIndexEntry>` | Project index |
//! | `Pending(key)` | `PendingProject`                   | Creation record |
//!
//! The index is keyed — and therefore iterated — by `sha256(identifier)`.
//! Paginated listing walks that key order, which bears no relation to
//! insertion or creation time; callers must not read it as chronology.

use soroban_sdk::{contracttype, Bytes, BytesN, Env, Map, String, Vec};

use crate::types::{Fund, FundConfig, PendingProject, ProjectIndexEntry};
use crate::{MAX_IDENTIFIER_LENGTH, PAGE_SIZE};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// All registry storage keys.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Singleton platform record (Instance).
    Fund,
    /// Platform configuration (Instance).
    Config,
    /// Project index map (Persistent).
    Index,
    /// Creation continuation record keyed by identifier hash (Persistent).
    Pending(BytesN<32>),
}

// ── Key hashing ──────────────────────────────────────────────────────

/// Deterministic fixed-width storage key for a human identifier.
///
/// Doubles as the deploy salt, so a given identifier always maps to the
/// same campaign contract address under this registry.
pub fn identifier_key(env: &Env, identifier: &String) -> BytesN<32> {
    let len = identifier.len() as usize;
    let mut buf = [0u8; MAX_IDENTIFIER_LENGTH as usize];
    identifier.copy_into_slice(&mut buf[..len]);
    let preimage = Bytes::from_slice(env, &buf[..len]);
    let digest: BytesN<32> = env.crypto().sha256(&preimage).into();
    digest
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// `true` once `initialize` has written the platform record.
pub fn has_fund(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Fund)
}

pub fn save_fund(env: &Env, fund: &Fund, config: &FundConfig) {
    env.storage().instance().set(&DataKey::Fund, fund);
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

/// Load the platform record. Panics if the registry was never initialized.
pub fn load_fund(env: &Env) -> Fund {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Fund)
        .expect("fund not initialized")
}

pub fn load_config(env: &Env) -> FundConfig {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("fund not initialized")
}

// ── Project index ────────────────────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn load_index(env: &Env) -> Map<BytesN<32>, ProjectIndexEntry> {
    env.storage()
        .persistent()
        .get(&DataKey::Index)
        .unwrap_or_else(|| Map::new(env))
}

fn save_index(env: &Env, index: &Map<BytesN<32>, ProjectIndexEntry>) {
    env.storage().persistent().set(&DataKey::Index, index);
    bump_persistent(env, &DataKey::Index);
}

/// Insert a registry entry. Reached only from the creation protocol's
/// settlement step, never from a public entry point.
pub fn insert_project(env: &Env, key: &BytesN<32>, entry: &ProjectIndexEntry) {
    let mut index = load_index(env);
    index.set(key.clone(), entry.clone());
    save_index(env, &index);
}

/// Remove a registry entry. Reached only from the settlement protocol.
pub fn remove_project(env: &Env, key: &BytesN<32>) {
    let mut index = load_index(env);
    index.remove(key.clone());
    save_index(env, &index);
}

pub fn get_project(env: &Env, key: &BytesN<32>) -> Option<ProjectIndexEntry> {
    load_index(env).get(key.clone())
}

pub fn has_project(env: &Env, key: &BytesN<32>) -> bool {
    load_index(env).contains_key(key.clone())
}

pub fn project_count(env: &Env) -> u32 {
    load_index(env).len()
}

/// A window of the index in storage key order (identifier hash order).
pub fn project_list(env: &Env, offset: u32, limit: u32) -> Vec<ProjectIndexEntry> {
    let limit = if limit == 0 { PAGE_SIZE } else { limit };
    let values = load_index(env).values();
    let start = offset.min(values.len());
    let end = offset.saturating_add(limit).min(values.len());
    values.slice(start..end)
}

// ── Pending creations ────────────────────────────────────────────────

pub fn save_pending(env: &Env, key: &BytesN<32>, pending: &PendingProject) {
    let key = DataKey::Pending(key.clone());
    env.storage().persistent().set(&key, pending);
    bump_persistent(env, &key);
}

pub fn load_pending(env: &Env, key: &BytesN<32>) -> Option<PendingProject> {
    env.storage()
        .persistent()
        .get(&DataKey::Pending(key.clone()))
}

pub fn remove_pending(env: &Env, key: &BytesN<32>) {
    env.storage()
        .persistent()
        .remove(&DataKey::Pending(key.clone()));
}
