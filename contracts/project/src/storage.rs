//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key             | Type            | Description                        |
//! |-----------------|-----------------|------------------------------------|
//! | `Config`        | `ProjectConfig` | Immutable campaign configuration   |
//! | `State`         | `ProjectState`  | Mutable campaign state             |
//! | `DonationCount` | `u64`           | Next donation sequence number      |
//! | `CommentCount`  | `u64`           | Next comment sequence number       |
//! | `LikeCount`     | `u32`           | Cardinality of the like set        |
//! | `Settlement`    | `Settlement`    | Release continuation record        |
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key            | Type       | Description                             |
//! |----------------|------------|-----------------------------------------|
//! | `Donation(n)`  | `Donation` | Append-only donation log, seq-keyed     |
//! | `Comment(n)`   | `Comment`  | Append-only comment log, seq-keyed      |
//! | `Liked(addr)`  | `bool`     | Like-set membership flag                |
//!
//! Donations and comments are keyed by a monotonic sequence counter, so the
//! paginated readers walk them in chronological order and the counter doubles
//! as the collection length.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{Comment, Donation, ProjectConfig, ProjectState, Settlement};
use crate::PAGE_SIZE;

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

/// All contract storage keys. Each collection lives under its own variant so
/// the sub-ledgers cannot collide.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Immutable campaign configuration (Instance).
    Config,
    /// Mutable campaign state (Instance).
    State,
    /// Donation sequence counter (Instance).
    DonationCount,
    /// Comment sequence counter (Instance).
    CommentCount,
    /// Like-set cardinality (Instance).
    LikeCount,
    /// Release continuation record (Instance).
    Settlement,
    /// One donation, keyed by sequence number (Persistent).
    Donation(u64),
    /// One comment, keyed by sequence number (Persistent).
    Comment(u64),
    /// Like-set membership, keyed by account (Persistent).
    Liked(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// `true` once `initialize` has written the campaign record.
pub fn has_project(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

/// Save both the immutable config and the initial mutable state.
pub fn save_project(env: &Env, config: &ProjectConfig, state: &ProjectState) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

/// Load only the immutable campaign configuration.
/// Panics if the campaign was never initialized.
pub fn load_config(env: &Env) -> ProjectConfig {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("project not initialized")
}

/// Load only the mutable campaign state.
pub fn load_state(env: &Env) -> ProjectState {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .expect("project not initialized")
}

/// Save only the mutable campaign state (the donation/settlement hot path).
pub fn save_state(env: &Env, state: &ProjectState) {
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

pub fn save_settlement(env: &Env, settlement: &Settlement) {
    env.storage().instance().set(&DataKey::Settlement, settlement);
    bump_instance(env);
}

pub fn load_settlement(env: &Env) -> Option<Settlement> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Settlement)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Append a donation to the sequence-keyed log. Returns its sequence number.
pub fn append_donation(env: &Env, donation: &Donation) -> u64 {
    let seq = donation_count(env);
    let key = DataKey::Donation(seq);
    env.storage().persistent().set(&key, donation);
    bump_persistent(env, &key);
    env.storage()
        .instance()
        .set(&DataKey::DonationCount, &(seq + 1));
    seq
}

pub fn donation_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::DonationCount)
        .unwrap_or(0)
}

/// Read a window of the donation log in chronological order.
pub fn donation_list(env: &Env, offset: u32, limit: u32) -> Vec<Donation> {
    let mut out = Vec::new(env);
    for seq in page(offset, limit, donation_count(env)) {
        let key = DataKey::Donation(seq);
        let donation: Donation = env
            .storage()
            .persistent()
            .get(&key)
            .expect("donation log entry missing");
        bump_persistent(env, &key);
        out.push_back(donation);
    }
    out
}

/// Append a comment to the sequence-keyed log. Returns its sequence number.
pub fn append_comment(env: &Env, comment: &Comment) -> u64 {
    let seq = comment_count(env);
    let key = DataKey::Comment(seq);
    env.storage().persistent().set(&key, comment);
    bump_persistent(env, &key);
    env.storage()
        .instance()
        .set(&DataKey::CommentCount, &(seq + 1));
    seq
}

pub fn comment_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::CommentCount)
        .unwrap_or(0)
}

/// Read a window of the comment log in chronological order.
pub fn comment_list(env: &Env, offset: u32, limit: u32) -> Vec<Comment> {
    let mut out = Vec::new(env);
    for seq in page(offset, limit, comment_count(env)) {
        let key = DataKey::Comment(seq);
        let comment: Comment = env
            .storage()
            .persistent()
            .get(&key)
            .expect("comment log entry missing");
        bump_persistent(env, &key);
        out.push_back(comment);
    }
    out
}

pub fn has_liked(env: &Env, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Liked(account.clone()))
}

/// Add `account` to the like set. The caller is responsible for the
/// idempotence check via [`has_liked`].
pub fn add_like(env: &Env, account: &Address) {
    let key = DataKey::Liked(account.clone());
    env.storage().persistent().set(&key, &true);
    bump_persistent(env, &key);
    let count = like_count(env);
    env.storage().instance().set(&DataKey::LikeCount, &(count + 1));
}

pub fn like_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::LikeCount)
        .unwrap_or(0)
}

// ── Pagination ───────────────────────────────────────────────────────

/// Clamp an offset/limit window against a log of `total` entries.
///
/// A zero `limit` selects the default page size. An offset at or past the
/// end yields an empty range rather than an error.
fn page(offset: u32, limit: u32, total: u64) -> core::ops::Range<u64> {
    let limit = if limit == 0 { PAGE_SIZE } else { limit };
    let start = (offset as u64).min(total);
    let end = start.saturating_add(limit as u64).min(total);
    start..end
}
