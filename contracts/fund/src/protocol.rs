//! # Cross-contract call protocol
//!
//! The registry cannot reach into a campaign contract's state — every
//! interaction is a message whose outcome is only known once the remote
//! execution has resolved. This module builds the two call chains and owns
//! the interpreter that turns their opaque outcomes into registry state.
//!
//! ## Creation
//!
//! ```text
//! Requested ──► deploy + fund (one atomic batch) ──► Initializing
//!                                                        │ initialize(...)
//!                                  ┌─────────────────────┴──────────────┐
//!                               Success                              Failure
//!                                  │                                    │
//!                        index entry inserted,                 status = Orphaned,
//!                        pending record dropped                record kept forever
//! ```
//!
//! A trap in the deploy/fund batch aborts the whole request — cheap
//! rejection, no state. A failure in the initialize leg is contained: the
//! deploy and the stake transfer have already committed, so the campaign
//! contract exists, holds the stake, and is unreachable through the index.
//! That `Orphaned` state has no reconciliation path; it is exposed through
//! `get_pending` and otherwise left alone.
//!
//! ## Settlement
//!
//! The request leg (`request_release`) runs un-caught so its gate
//! rejections surface synchronously to the caller who asked for the
//! release. Its return value is the outcome of the transfer leg the
//! campaign issued: only `Settled` removes the index entry.
//!
//! The interpreter acts on `Success` alone. An unresolved outcome cannot
//! reach it here — the host reports only resolved legs — so `Pending` is
//! treated as a contradiction: logged, nothing mutated.

use soroban_sdk::{contractclient, log, token, Address, BytesN, Env, String};

use crate::storage;
use crate::types::{CreationStatus, PendingProject, ProjectIndexEntry, SettlementStatus};
use crate::events;

/// Client-side view of the campaign contract, limited to the two entry
/// points the protocol drives.
#[contractclient(name = "ProjectClient")]
pub trait ProjectInterface {
    /// Second leg of the creation chain.
    fn initialize(
        env: Env,
        contract_owner: Address,
        owner: Address,
        identifier: String,
        title: String,
        description: String,
        image_url: String,
        token: Address,
    );

    /// Request leg of the settlement chain.
    fn request_release(env: Env, caller: Address) -> SettlementStatus;
}

/// Classification of one asynchronous leg's outcome.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The leg has not resolved. Callbacks only run after resolution, so
    /// observing this is a contradiction — it is logged and ignored.
    Pending,
    Success,
    Failure,
}

/// Map a contained cross-contract call result onto an [`Outcome`].
///
/// Anything but a cleanly decoded success — a contract error, a host
/// error, an undecodable return value — is a failure.
pub fn classify<T, C, E, I>(result: &Result<Result<T, C>, Result<E, I>>) -> Outcome {
    match result {
        Ok(Ok(_)) => Outcome::Success,
        _ => Outcome::Failure,
    }
}

/// Drive the creation chain for a validated, funded request.
///
/// The caller (`add_project`) has already taken the deposit into the
/// registry; from here on the registry's own state changes only through
/// [`settle_creation`].
pub fn create_project(
    env: &Env,
    key: &BytesN<32>,
    owner: &Address,
    identifier: &String,
    title: &String,
    description: &String,
    image_url: &String,
    deposit: i128,
) {
    let config = storage::load_config(env);

    let mut pending = PendingProject {
        owner: owner.clone(),
        identifier: identifier.clone(),
        deposit,
        requested_at: env.ledger().timestamp(),
        project: None,
        status: CreationStatus::Requested,
    };
    storage::save_pending(env, key, &pending);
    events::project_requested(
        env,
        events::ProjectRequested {
            owner: owner.clone(),
            identifier: identifier.clone(),
            deposit,
        },
    );

    // Account creation, code deployment and stake forwarding commit as one
    // batch. The salt is the identifier hash, so one identifier maps to one
    // campaign address under this registry, forever.
    let project = env
        .deployer()
        .with_current_contract(key.clone())
        .deploy_v2(config.project_wasm_hash.clone(), ());
    token::Client::new(env, &config.token).transfer(
        &env.current_contract_address(),
        &project,
        &deposit,
    );

    pending.project = Some(project.clone());
    pending.status = CreationStatus::Initializing;
    storage::save_pending(env, key, &pending);

    // The initialize leg is contained: its failure must not unwind the
    // deploy that already committed.
    let init = ProjectClient::new(env, &project).try_initialize(
        &env.current_contract_address(),
        owner,
        identifier,
        title,
        description,
        image_url,
        &config.token,
    );
    settle_creation(env, key, pending, classify(&init));
}

/// Creation interpreter: commit or strand one pending creation.
pub fn settle_creation(env: &Env, key: &BytesN<32>, mut pending: PendingProject, outcome: Outcome) {
    match outcome {
        Outcome::Success => {
            let entry = ProjectIndexEntry {
                owner: pending.owner.clone(),
                identifier: pending.identifier.clone(),
                project: pending
                    .project
                    .clone()
                    .expect("initialized campaign has no recorded address"),
            };
            storage::insert_project(env, key, &entry);
            storage::remove_pending(env, key);
            events::project_registered(
                env,
                events::ProjectRegistered {
                    owner: entry.owner,
                    identifier: entry.identifier,
                    project: entry.project,
                },
            );
        }
        Outcome::Failure => {
            pending.status = CreationStatus::Orphaned;
            storage::save_pending(env, key, &pending);
            log!(env, "campaign initialize leg failed, contract orphaned");
            events::project_orphaned(
                env,
                events::ProjectOrphaned {
                    owner: pending.owner,
                    identifier: pending.identifier,
                    project: pending.project,
                },
            );
        }
        Outcome::Pending => {
            log!(env, "creation leg reported unresolved, ignoring");
        }
    }
}

/// Settlement interpreter: deregister on success, keep the entry otherwise.
pub fn settle_release(
    env: &Env,
    key: &BytesN<32>,
    entry: ProjectIndexEntry,
    status: SettlementStatus,
) {
    match status {
        SettlementStatus::Settled => {
            storage::remove_project(env, key);
            events::project_removed(
                env,
                events::ProjectRemoved {
                    owner: entry.owner,
                    identifier: entry.identifier,
                },
            );
        }
        SettlementStatus::TransferFailed => {
            // The campaign records the stuck settlement on its side; the
            // registry keeps the entry so the campaign stays reachable.
            log!(env, "settlement transfer leg failed, entry kept");
        }
        SettlementStatus::Requested => {
            log!(env, "settlement reported unresolved, ignoring");
        }
    }
}
