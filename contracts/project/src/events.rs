//! # Events
//!
//! Typed payloads published for every committed state change, consumed by
//! the off-chain indexer. Topics are short symbols; payloads are structs so
//! new fields can be added without re-ordering positional tuples.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

/// `init` — the campaign record was written.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectInitialized {
    pub owner: Address,
    pub identifier: String,
    pub attached: i128,
}

/// `donated` — a donation was recorded.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationReceived {
    pub donor: Address,
    pub amount: i128,
    pub seq: u64,
}

/// `commented` — a comment was recorded.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentAdded {
    pub author: Address,
    pub seq: u64,
}

/// `liked` — a new account joined the like set.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectLiked {
    pub account: Address,
    pub like_count: u32,
}

/// `settling` — a release request passed its gates; transfer leg issued.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleaseRequested {
    pub amount: i128,
}

/// `released` — the settlement committed; funding is closed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationsReleased {
    pub owner: Address,
    pub amount: i128,
}

/// `failed` — the transfer leg failed; the settlement is stuck.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleaseFailed {
    pub owner: Address,
    pub amount: i128,
}

pub fn initialized(env: &Env, data: ProjectInitialized) {
    env.events().publish((symbol_short!("init"),), data);
}

pub fn donated(env: &Env, data: DonationReceived) {
    env.events().publish((symbol_short!("donated"),), data);
}

pub fn commented(env: &Env, data: CommentAdded) {
    env.events().publish((symbol_short!("commented"),), data);
}

pub fn liked(env: &Env, data: ProjectLiked) {
    env.events().publish((symbol_short!("liked"),), data);
}

pub fn release_requested(env: &Env, data: ReleaseRequested) {
    env.events().publish((symbol_short!("settling"),), data);
}

pub fn released(env: &Env, data: DonationsReleased) {
    env.events().publish((symbol_short!("released"),), data);
}

pub fn release_failed(env: &Env, data: ReleaseFailed) {
    env.events().publish((symbol_short!("failed"),), data);
}
