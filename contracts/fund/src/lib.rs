//! # Crowdfund Fund Contract
//!
//! The platform's single entry point: a registry that creates one campaign
//! contract per project, indexes the campaigns that initialized
//! successfully, and relays settlement requests back to them.
//!
//! | Phase       | Entry point(s)                                      |
//! |-------------|-----------------------------------------------------|
//! | Bootstrap   | [`FundContract::initialize`]                        |
//! | Creation    | [`FundContract::add_project`]                       |
//! | Settlement  | [`FundContract::release_donations`]                 |
//! | Queries     | `get`, `get_project_list`, `get_project_count`, `project_exists`, `get_project_address`, `get_pending` |
//!
//! ## Architecture
//!
//! Validation is delegated to [`guards`], persistence to [`storage`], and
//! every cross-contract interaction to [`protocol`]. This file contains
//! only the public entry points and event emissions.
//!
//! The registry and a campaign contract never share state; after a partial
//! creation failure the two ledgers disagree (a funded, unindexed campaign
//! contract) and stay that way — see [`protocol`] for why that is accepted
//! rather than repaired.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, panic_with_error, token, Address, BytesN, Env, String,
    Vec,
};

mod events;
mod guards;
pub mod protocol;
mod storage;
mod types;

#[cfg(test)]
mod test_protocol;

pub use types::{CreationStatus, Fund, FundConfig, PendingProject, ProjectIndexEntry, SettlementStatus};

/// One whole token in stroop-scale units (7 decimals).
pub const ONE_TOKEN: i128 = 10_000_000;

/// Stake required to initialize the platform or create a campaign.
pub const MIN_ATTACHED_DEPOSIT: i128 = 10 * ONE_TOKEN;

/// Default page size for the list readers (selected by `limit = 0`).
pub const PAGE_SIZE: u32 = 10;

/// Identifiers are capped at this many bytes.
pub const MAX_IDENTIFIER_LENGTH: u32 = 64;

/// Error taxonomy shared with the campaign contract — codes are numbered
/// identically in both so they survive the cross-contract boundary.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized     = 1,
    NotInitialized         = 2,
    InsufficientDeposit    = 3,
    InvalidField           = 4,
    DuplicateIdentifier    = 5,
    Unauthorized           = 6,
    IndirectCallNotAllowed = 7,
    ProjectNotFunding      = 8,
    ReleaseThresholdNotMet = 9,
    AsyncLegFailed         = 10,
    ProjectNotFound        = 11,
}

#[contract]
pub struct FundContract;

#[contractimpl]
impl FundContract {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Initialize the platform. The first caller becomes the de facto
    /// operator; the deposit (at least [`MIN_ATTACHED_DEPOSIT`]) stays on
    /// the registry as its storage stake.
    ///
    /// - `token` is the asset every stake, donation and settlement uses.
    /// - `project_wasm_hash` is the uploaded campaign contract code the
    ///   creation protocol instantiates.
    ///
    /// Subsequent calls always fail with `Error::AlreadyInitialized`.
    pub fn initialize(
        env: Env,
        operator: Address,
        token: Address,
        project_wasm_hash: BytesN<32>,
        deposit: i128,
    ) {
        guards::require_uninitialized(&env);
        operator.require_auth();
        guards::require_min_stake(&env, deposit, MIN_ATTACHED_DEPOSIT);

        token::Client::new(&env, &token).transfer(
            &operator,
            &env.current_contract_address(),
            &deposit,
        );

        let fund = Fund {
            created_at: env.ledger().timestamp(),
            operator: operator.clone(),
        };
        let config = FundConfig {
            token,
            project_wasm_hash,
        };
        storage::save_fund(&env, &fund, &config);

        events::fund_initialized(&env, events::FundInitialized { operator, deposit });
    }

    /// The platform record.
    pub fn get(env: Env) -> Fund {
        guards::require_initialized(&env);
        storage::load_fund(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Creation
    // ─────────────────────────────────────────────────────────

    /// Create a new campaign.
    ///
    /// Takes the caller's deposit (at least [`MIN_ATTACHED_DEPOSIT`]) into
    /// the registry, then drives the creation chain: deploy the campaign
    /// contract at the address derived from `identifier`, forward the
    /// deposit as its funding, initialize it, and interpret the outcome.
    /// The caller gets a synchronous rejection for anything the gates can
    /// check here; the initialize leg's failure is only observable later
    /// through [`FundContract::get_pending`].
    ///
    /// `title`, `description` and `image_url` are validated by the campaign
    /// contract itself — a rejection there strands the request in the
    /// `Orphaned` state rather than failing this call.
    pub fn add_project(
        env: Env,
        caller: Address,
        identifier: String,
        title: String,
        description: String,
        image_url: String,
        deposit: i128,
    ) {
        guards::require_initialized(&env);
        caller.require_auth();
        guards::require_min_stake(&env, deposit, MIN_ATTACHED_DEPOSIT);
        guards::require_identifier(&env, &identifier);

        let key = storage::identifier_key(&env, &identifier);
        if storage::has_project(&env, &key) || storage::load_pending(&env, &key).is_some() {
            panic_with_error!(&env, Error::DuplicateIdentifier);
        }

        let config = storage::load_config(&env);
        token::Client::new(&env, &config.token).transfer(
            &caller,
            &env.current_contract_address(),
            &deposit,
        );

        protocol::create_project(
            &env,
            &key,
            &caller,
            &identifier,
            &title,
            &description,
            &image_url,
            deposit,
        );
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Release a campaign's accumulated donations to its owner.
    ///
    /// Only the recorded owner may ask. The campaign's own gates (release
    /// threshold, ownership) run un-caught, so their rejections surface
    /// synchronously here. On a settled transfer the campaign leaves the
    /// index; on a failed transfer the entry is kept and the stuck state
    /// lives in the campaign's settlement record.
    pub fn release_donations(env: Env, caller: Address, identifier: String) {
        guards::require_initialized(&env);
        caller.require_auth();
        guards::require_identifier(&env, &identifier);

        let key = storage::identifier_key(&env, &identifier);
        let entry = match storage::get_project(&env, &key) {
            Some(entry) => entry,
            None => panic_with_error!(&env, Error::ProjectNotFound),
        };
        guards::require_caller_is(&env, &caller, &entry.owner);

        let status = protocol::ProjectClient::new(&env, &entry.project).request_release(&caller);
        protocol::settle_release(&env, &key, entry, status);
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// `true` if `identifier` is registered (pending creations excluded).
    pub fn project_exists(env: Env, identifier: String) -> bool {
        guards::require_initialized(&env);
        guards::require_identifier(&env, &identifier);
        storage::has_project(&env, &storage::identifier_key(&env, &identifier))
    }

    /// A window of the index. Entries come back in storage key order — the
    /// identifier hash — which bears no relation to creation time.
    /// `limit = 0` selects [`PAGE_SIZE`].
    pub fn get_project_list(env: Env, offset: u32, limit: u32) -> Vec<ProjectIndexEntry> {
        guards::require_initialized(&env);
        storage::project_list(&env, offset, limit)
    }

    pub fn get_project_count(env: Env) -> u32 {
        guards::require_initialized(&env);
        storage::project_count(&env)
    }

    /// Deployed contract address of a registered campaign.
    pub fn get_project_address(env: Env, identifier: String) -> Option<Address> {
        guards::require_initialized(&env);
        guards::require_identifier(&env, &identifier);
        storage::get_project(&env, &storage::identifier_key(&env, &identifier))
            .map(|entry| entry.project)
    }

    /// Creation continuation record, if one exists. A terminal `Orphaned`
    /// status here is the stuck state of a failed creation — the contract
    /// was deployed and funded but never initialized, and nothing will
    /// repair that automatically.
    pub fn get_pending(env: Env, identifier: String) -> Option<PendingProject> {
        guards::require_initialized(&env);
        guards::require_identifier(&env, &identifier);
        storage::load_pending(&env, &storage::identifier_key(&env, &identifier))
    }
}
