//! # Types
//!
//! Records owned by the Fund registry. The registry never holds campaign
//! state by reference — each campaign lives in its own contract and is
//! reached only by cross-contract messages.

use soroban_sdk::{contracttype, Address, String};

/// The singleton platform record, written once by `initialize` and never
/// deleted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fund {
    /// Ledger timestamp at initialization.
    pub created_at: u64,
    /// First caller; recorded for the event stream.
    pub operator: Address,
}

/// Immutable platform configuration, written alongside [`Fund`].
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundConfig {
    /// Token used for all value transfer (the native SAC).
    pub token: Address,
    /// Uploaded campaign contract code the creation protocol instantiates.
    pub project_wasm_hash: soroban_sdk::BytesN<32>,
}

/// One registry entry, keyed by `sha256(identifier)`. Present only for
/// campaigns whose creation protocol completed successfully.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectIndexEntry {
    /// Account that created the campaign.
    pub owner: Address,
    pub identifier: String,
    /// Deployed campaign contract.
    pub project: Address,
}

/// Lifecycle of one creation request.
///
/// `Requested` and `Initializing` are transient within the creation
/// execution; `Orphaned` is terminal — the campaign contract exists and
/// holds the creator's stake, but it never initialized and was never
/// indexed. There is no reconciliation path; the record stays readable.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CreationStatus {
    Requested,
    Initializing,
    Orphaned,
}

/// Continuation record of the creation protocol, persisted before the
/// asynchronous legs are issued. Removed on successful registration.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingProject {
    pub owner: Address,
    pub identifier: String,
    /// Stake forwarded to the new campaign contract.
    pub deposit: i128,
    pub requested_at: u64,
    /// Deployed contract address, set once the deploy leg committed.
    pub project: Option<Address>,
    pub status: CreationStatus,
}

/// Settlement outcome reported back by a campaign contract. Mirrors the
/// campaign crate's enum variant-for-variant so values cross the contract
/// boundary unchanged.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SettlementStatus {
    Requested,
    Settled,
    TransferFailed,
}
