//! # Types
//!
//! Shared data structures of one campaign contract.
//!
//! ## Config / State split
//!
//! A campaign is stored as two separate ledger entries:
//!
//! - [`ProjectConfig`] — written once at initialization; never mutated.
//! - [`ProjectState`] — written on every donation and on settlement.
//!
//! Donations are high-frequency writes; keeping the mutable entry down to a
//! balance and a flag keeps those writes cheap. The public API exposes the
//! reconstructed [`Project`] struct.
//!
//! ## Funding as a one-way flag
//!
//! `ProjectState::funding` starts `true` and transitions to `false` exactly
//! once, in the settlement callback. There is no transition back:
//!
//! ```text
//! funding=true ──(release settled)──► funding=false
//! ```
//!
//! `total_donations` only grows while `funding` is `true` and is zeroed in the
//! same write that clears the flag.

use soroban_sdk::{contracttype, Address, String};

/// Immutable campaign configuration, written once at initialization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    /// Account that created the campaign and receives released donations.
    pub owner: Address,
    /// Address that initialized this contract — the Fund registry. Settlement
    /// entry points are only reachable through it.
    pub contract_owner: Address,
    /// Token used for all value transfer (the native SAC).
    pub token: Address,
    /// Short name the registry knows this campaign by.
    pub identifier: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Ledger timestamp at initialization.
    pub created_at: u64,
}

/// Mutable campaign state, updated on donations and settlement.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    /// Running total of all donations received while funding.
    pub total_donations: i128,
    /// `true` while the campaign accepts donations.
    pub funding: bool,
}

/// Full campaign record; reconstructed from the split config + state entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    pub owner: Address,
    pub contract_owner: Address,
    pub token: Address,
    pub identifier: String,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub created_at: u64,
    pub total_donations: i128,
    pub funding: bool,
}

/// A single recorded donation. Immutable once written.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Donation {
    pub created_at: u64,
    pub donor: Address,
    pub amount: i128,
}

/// A single recorded comment. Immutable once written.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Comment {
    pub created_at: u64,
    pub author: Address,
    pub text: String,
}

/// Lifecycle of one release request.
///
/// `Requested` is transient within the settlement execution; only `Settled`
/// and `TransferFailed` are terminal. `TransferFailed` has no retry path —
/// the record stays readable so the stuck state is observable.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SettlementStatus {
    Requested,
    Settled,
    TransferFailed,
}

/// Continuation record of the release protocol, persisted before the
/// transfer leg is issued and updated once its outcome is known.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    /// Donation total captured when the release was requested.
    pub amount: i128,
    pub requested_at: u64,
    pub status: SettlementStatus,
}
