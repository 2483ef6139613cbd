//! # Events
//!
//! Typed payloads published for every committed registry change. Campaign
//! events carry the identifier as their second topic so the indexer can
//! group a campaign's history without decoding payloads.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

/// `fund_init` — the platform record was written.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundInitialized {
    pub operator: Address,
    pub deposit: i128,
}

/// `requested` — a creation request passed its gates; protocol legs issued.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectRequested {
    pub owner: Address,
    pub identifier: String,
    pub deposit: i128,
}

/// `created` — the campaign initialized and is now indexed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectRegistered {
    pub owner: Address,
    pub identifier: String,
    pub project: Address,
}

/// `orphaned` — the campaign contract exists and holds the stake but never
/// initialized; it will never be indexed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectOrphaned {
    pub owner: Address,
    pub identifier: String,
    pub project: Option<Address>,
}

/// `removed` — the campaign settled and left the index.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectRemoved {
    pub owner: Address,
    pub identifier: String,
}

pub fn fund_initialized(env: &Env, data: FundInitialized) {
    env.events().publish((symbol_short!("fund_init"),), data);
}

pub fn project_requested(env: &Env, data: ProjectRequested) {
    env.events()
        .publish((symbol_short!("requested"), data.identifier.clone()), data);
}

pub fn project_registered(env: &Env, data: ProjectRegistered) {
    env.events()
        .publish((symbol_short!("created"), data.identifier.clone()), data);
}

pub fn project_orphaned(env: &Env, data: ProjectOrphaned) {
    env.events()
        .publish((symbol_short!("orphaned"), data.identifier.clone()), data);
}

pub fn project_removed(env: &Env, data: ProjectRemoved) {
    env.events()
        .publish((symbol_short!("removed"), data.identifier.clone()), data);
}
