//! # Crowdfund Project Contract
//!
//! One instance of this contract is deployed per campaign by the Fund
//! registry's creation protocol. It owns the campaign record and three
//! sub-ledgers (donations, comments, likes), and settles accumulated
//! donations to the campaign owner on request.
//!
//! | Phase      | Entry point(s)                                        |
//! |------------|-------------------------------------------------------|
//! | Bootstrap  | [`ProjectContract::initialize`]                       |
//! | Funding    | [`ProjectContract::donate`]                           |
//! | Social     | `add_comment`, `like`                                 |
//! | Settlement | [`ProjectContract::request_release`], [`ProjectContract::on_release_settled`] |
//! | Queries    | `get`, `get_donation_list`, `get_comment_list`, `get_like_count`, `get_settlement`, … |
//!
//! ## Architecture
//!
//! Validation is fully delegated to [`guards`], persistence to [`storage`].
//! This file contains only the public entry points, the settlement outcome
//! interpreter, and event emissions.
//!
//! ## Settlement protocol
//!
//! `request_release` never mutates `funding`/`total_donations` itself. It
//! persists a [`Settlement`] continuation record, issues the transfer leg,
//! and interprets the outcome: only a successful transfer reaches
//! [`ProjectContract::on_release_settled`], which commits the closure. A
//! failed transfer leaves the campaign untouched and the settlement record
//! in the terminal `TransferFailed` state — there is no retry and no
//! rollback of the gates already passed; the stuck state is observable via
//! `get_settlement`.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, log, panic_with_error, symbol_short, token, Address,
    Env, String, Symbol, Vec,
};

mod events;
mod guards;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_social;

pub use types::{Comment, Donation, Project, ProjectConfig, ProjectState, Settlement, SettlementStatus};

/// One whole token in stroop-scale units (7 decimals).
pub const ONE_TOKEN: i128 = 10_000_000;

/// Stake required to initialize a campaign contract.
pub const MIN_ATTACHED_DEPOSIT: i128 = 10 * ONE_TOKEN;

/// Donation total that unlocks release on its own.
pub const MIN_RELEASED_DONATION: i128 = 100 * ONE_TOKEN;

/// Like count that unlocks release regardless of the donation total.
pub const MIN_RELEASED_LIKES: u32 = 10;

/// Default page size for the list readers (selected by `limit = 0`).
pub const PAGE_SIZE: u32 = 10;

/// Comments must be shorter than this many bytes.
pub const MAX_COMMENT_LENGTH: u32 = 500;

/// Descriptions are capped at this many bytes.
pub const MAX_DESCRIPTION_LENGTH: u32 = 2_000;

/// Image URLs are capped at this many bytes.
pub const MAX_URL_LENGTH: u32 = 256;

/// Identifiers are capped at this many bytes.
pub const MAX_IDENTIFIER_LENGTH: u32 = 64;

/// Error taxonomy shared with the Fund contract — codes are numbered
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
pub struct ProjectContract;

#[contractimpl]
impl ProjectContract {
    // ─────────────────────────────────────────────────────────
    // Bootstrap
    // ─────────────────────────────────────────────────────────

    /// Initialize the campaign. Invoked by the Fund registry as the second
    /// leg of its creation protocol, immediately after deploying this
    /// contract and forwarding the creator's stake to it.
    ///
    /// - `contract_owner` must authorize; for the Fund that authorization is
    ///   implicit as the direct invoker. It is recorded and gates the
    ///   settlement entry points for the life of the campaign.
    /// - The attached stake is the contract's `token` balance at this point
    ///   and must be at least [`MIN_ATTACHED_DEPOSIT`].
    ///
    /// Subsequent calls panic with `Error::AlreadyInitialized` — a failed
    /// initialization is never retried.
    pub fn initialize(
        env: Env,
        contract_owner: Address,
        owner: Address,
        identifier: String,
        title: String,
        description: String,
        image_url: String,
        token: Address,
    ) {
        guards::require_uninitialized(&env);
        contract_owner.require_auth();
        guards::require_identifier(&env, &identifier);
        guards::require_non_blank(&env, &title, symbol_short!("title"));
        guards::require_max_length(
            &env,
            &description,
            MAX_DESCRIPTION_LENGTH,
            Symbol::new(&env, "description"),
        );
        guards::require_url_scheme(&env, &image_url, symbol_short!("image_url"));

        let attached = token::Client::new(&env, &token).balance(&env.current_contract_address());
        guards::require_min_stake(&env, attached, MIN_ATTACHED_DEPOSIT);

        let config = types::ProjectConfig {
            owner: owner.clone(),
            contract_owner,
            token,
            identifier: identifier.clone(),
            title,
            description,
            image_url,
            created_at: env.ledger().timestamp(),
        };
        let state = types::ProjectState {
            total_donations: 0,
            funding: true,
        };
        storage::save_project(&env, &config, &state);

        events::initialized(
            &env,
            events::ProjectInitialized {
                owner,
                identifier,
                attached,
            },
        );
    }

    /// Full campaign record.
    pub fn get(env: Env) -> Project {
        guards::require_initialized(&env);
        let config = storage::load_config(&env);
        let state = storage::load_state(&env);
        Project {
            owner: config.owner,
            contract_owner: config.contract_owner,
            token: config.token,
            identifier: config.identifier,
            title: config.title,
            description: config.description,
            image_url: config.image_url,
            created_at: config.created_at,
            total_donations: state.total_donations,
            funding: state.funding,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Donations
    // ─────────────────────────────────────────────────────────

    /// Donate `amount` to the campaign.
    ///
    /// The donor must call directly (no relaying contract) and the campaign
    /// must still be funding. The transfer and the ledger append happen in
    /// the same invocation, so `total_donations` is always the sum of the
    /// recorded donations.
    pub fn donate(env: Env, donor: Address, amount: i128) {
        guards::require_initialized(&env);
        guards::require_direct_call(&env, &donor);
        if amount <= 0 {
            panic_with_error!(&env, Error::InsufficientDeposit);
        }
        let mut state = storage::load_state(&env);
        if !state.funding {
            panic_with_error!(&env, Error::ProjectNotFunding);
        }

        let config = storage::load_config(&env);
        token::Client::new(&env, &config.token).transfer(
            &donor,
            &env.current_contract_address(),
            &amount,
        );

        let donation = Donation {
            created_at: env.ledger().timestamp(),
            donor: donor.clone(),
            amount,
        };
        let seq = storage::append_donation(&env, &donation);
        state.total_donations += amount;
        storage::save_state(&env, &state);

        events::donated(&env, events::DonationReceived { donor, amount, seq });
    }

    /// Donations in chronological order. `limit = 0` selects [`PAGE_SIZE`].
    pub fn get_donation_list(env: Env, offset: u32, limit: u32) -> Vec<Donation> {
        guards::require_initialized(&env);
        storage::donation_list(&env, offset, limit)
    }

    pub fn get_donation_count(env: Env) -> u64 {
        guards::require_initialized(&env);
        storage::donation_count(&env)
    }

    pub fn get_total_donations(env: Env) -> i128 {
        guards::require_initialized(&env);
        storage::load_state(&env).total_donations
    }

    // ─────────────────────────────────────────────────────────
    // Comments
    // ─────────────────────────────────────────────────────────

    /// Record a comment (1-499 bytes), newest last.
    pub fn add_comment(env: Env, author: Address, text: String) {
        guards::require_initialized(&env);
        guards::require_direct_call(&env, &author);
        guards::require_non_blank(&env, &text, symbol_short!("comment"));
        guards::require_max_length(&env, &text, MAX_COMMENT_LENGTH - 1, symbol_short!("comment"));

        let comment = Comment {
            created_at: env.ledger().timestamp(),
            author: author.clone(),
            text,
        };
        let seq = storage::append_comment(&env, &comment);

        events::commented(&env, events::CommentAdded { author, seq });
    }

    /// Comments in chronological order. `limit = 0` selects [`PAGE_SIZE`].
    pub fn get_comment_list(env: Env, offset: u32, limit: u32) -> Vec<Comment> {
        guards::require_initialized(&env);
        storage::comment_list(&env, offset, limit)
    }

    pub fn get_comment_count(env: Env) -> u64 {
        guards::require_initialized(&env);
        storage::comment_count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Likes
    // ─────────────────────────────────────────────────────────

    /// Add the caller to the like set. Re-liking is a no-op.
    pub fn like(env: Env, account: Address) {
        guards::require_initialized(&env);
        guards::require_direct_call(&env, &account);
        if storage::has_liked(&env, &account) {
            return;
        }
        storage::add_like(&env, &account);

        events::liked(
            &env,
            events::ProjectLiked {
                account,
                like_count: storage::like_count(&env),
            },
        );
    }

    pub fn get_like_count(env: Env) -> u32 {
        guards::require_initialized(&env);
        storage::like_count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Settlement
    // ─────────────────────────────────────────────────────────

    /// Request the release of accumulated donations to the campaign owner.
    ///
    /// Reachable only through the Fund registry: `caller` must be the
    /// campaign owner, and the recorded `contract_owner` must authorize —
    /// which it does implicitly as the direct invoker. Gate rejections
    /// (ownership, threshold) surface synchronously to the original caller.
    ///
    /// The transfer leg is issued with its failure contained: a failed
    /// transfer marks the settlement `TransferFailed` and leaves the
    /// campaign state untouched. Only a confirmed transfer reaches
    /// [`ProjectContract::on_release_settled`].
    pub fn request_release(env: Env, caller: Address) -> SettlementStatus {
        guards::require_initialized(&env);
        let config = storage::load_config(&env);
        guards::require_caller_is(&env, &caller, &config.owner);
        caller.require_auth();
        config.contract_owner.require_auth();

        let state = storage::load_state(&env);
        if state.total_donations < MIN_RELEASED_DONATION
            && storage::like_count(&env) < MIN_RELEASED_LIKES
        {
            panic_with_error!(&env, Error::ReleaseThresholdNotMet);
        }

        let mut settlement = Settlement {
            amount: state.total_donations,
            requested_at: env.ledger().timestamp(),
            status: SettlementStatus::Requested,
        };
        storage::save_settlement(&env, &settlement);
        events::release_requested(
            &env,
            events::ReleaseRequested {
                amount: settlement.amount,
            },
        );

        let transfer = token::Client::new(&env, &config.token).try_transfer(
            &env.current_contract_address(),
            &config.owner,
            &settlement.amount,
        );
        // The host only reports resolved outcomes here; an unresolved leg
        // cannot be observed. Anything but a clean success is a failure.
        match transfer {
            Ok(Ok(())) => {
                Self::on_release_settled(env);
                SettlementStatus::Settled
            }
            _ => {
                settlement.status = SettlementStatus::TransferFailed;
                storage::save_settlement(&env, &settlement);
                log!(&env, "release transfer failed, settlement stuck");
                events::release_failed(
                    &env,
                    events::ReleaseFailed {
                        owner: config.owner,
                        amount: settlement.amount,
                    },
                );
                SettlementStatus::TransferFailed
            }
        }
    }

    /// Settlement callback: commit the funding closure.
    ///
    /// Only the recorded `contract_owner` can authorize this entry point, so
    /// it is reachable solely as the continuation of the campaign's own
    /// settlement (or from the Fund itself) — never as an ordinary external
    /// message. Re-invocation after funding has closed is a no-op.
    pub fn on_release_settled(env: Env) {
        guards::require_initialized(&env);
        let config = storage::load_config(&env);
        config.contract_owner.require_auth();

        let mut state = storage::load_state(&env);
        if !state.funding {
            log!(&env, "settlement callback after funding closed, ignoring");
            return;
        }
        let released = state.total_donations;
        state.total_donations = 0;
        state.funding = false;
        storage::save_state(&env, &state);

        if let Some(mut settlement) = storage::load_settlement(&env) {
            settlement.status = SettlementStatus::Settled;
            storage::save_settlement(&env, &settlement);
        }

        events::released(
            &env,
            events::DonationsReleased {
                owner: config.owner,
                amount: released,
            },
        );
    }

    /// Settlement continuation record, if a release was ever requested.
    /// A terminal `TransferFailed` status here is the stuck state — there is
    /// no retry path.
    pub fn get_settlement(env: Env) -> Option<Settlement> {
        guards::require_initialized(&env);
        storage::load_settlement(&env)
    }
}
