extern crate std;

use soroban_sdk::{
    contract, contractimpl, panic_with_error, symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, BytesN, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{ProjectOrphaned, ProjectRegistered};
use crate::protocol::{self, Outcome};
use crate::types::{CreationStatus, PendingProject};
use crate::{
    storage, Error, FundContract, FundContractClient, ProjectIndexEntry, SettlementStatus,
    MIN_ATTACHED_DEPOSIT,
};

// ─────────────────────────────────────────────────────────
// Campaign stand-ins for the settlement legs
// ─────────────────────────────────────────────────────────

/// Settles cleanly.
mod settling_project {
    use super::*;
    #[contract]
    pub struct SettlingProject;

    #[contractimpl]
    impl SettlingProject {
        pub fn request_release(_env: Env, _caller: Address) -> SettlementStatus {
            SettlementStatus::Settled
        }
    }
}
use settling_project::SettlingProject;

/// Passes its gates but reports a failed transfer leg.
mod stuck_project {
    use super::*;
    #[contract]
    pub struct StuckProject;

    #[contractimpl]
    impl StuckProject {
        pub fn request_release(_env: Env, _caller: Address) -> SettlementStatus {
            SettlementStatus::TransferFailed
        }
    }
}
use stuck_project::StuckProject;

/// Rejects the request leg at the threshold gate.
mod gated_project {
    use super::*;
    #[contract]
    pub struct GatedProject;

    #[contractimpl]
    impl GatedProject {
        pub fn request_release(env: Env, _caller: Address) -> SettlementStatus {
            panic_with_error!(&env, Error::ReleaseThresholdNotMet);
        }
    }
}
use gated_project::GatedProject;

// ─────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────

struct Setup<'a> {
    env: Env,
    client: FundContractClient<'a>,
    token_sac: token::StellarAssetClient<'a>,
    operator: Address,
}

fn setup() -> Setup<'static> {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(FundContract, ());
    let client = FundContractClient::new(&env, &contract_id);
    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin);
    let token = token::Client::new(&env, &sac.address());
    let token_sac = token::StellarAssetClient::new(&env, &sac.address());
    let operator = Address::generate(&env);

    token_sac.mint(&operator, &MIN_ATTACHED_DEPOSIT);
    client.initialize(
        &operator,
        &token.address,
        &BytesN::from_array(&env, &[7u8; 32]),
        &MIN_ATTACHED_DEPOSIT,
    );
    Setup {
        env,
        client,
        token_sac,
        operator,
    }
}

fn identifier(s: &Setup) -> String {
    String::from_str(&s.env, "defi-campaign")
}

fn key_for(s: &Setup, id: &String) -> BytesN<32> {
    s.env
        .as_contract(&s.client.address, || storage::identifier_key(&s.env, id))
}

fn pending_for(s: &Setup, owner: &Address, id: &String, project: Option<Address>) -> PendingProject {
    PendingProject {
        owner: owner.clone(),
        identifier: id.clone(),
        deposit: MIN_ATTACHED_DEPOSIT,
        requested_at: s.env.ledger().timestamp(),
        project,
        status: CreationStatus::Initializing,
    }
}

fn plant_pending(s: &Setup, key: &BytesN<32>, pending: &PendingProject) {
    s.env.as_contract(&s.client.address, || {
        storage::save_pending(&s.env, key, pending);
    });
}

fn plant_entry(s: &Setup, owner: &Address, id: &String, project: &Address) {
    let entry = ProjectIndexEntry {
        owner: owner.clone(),
        identifier: id.clone(),
        project: project.clone(),
    };
    s.env.as_contract(&s.client.address, || {
        let key = storage::identifier_key(&s.env, id);
        storage::insert_project(&s.env, &key, &entry);
    });
}

// ─────────────────────────────────────────────────────────
// Outcome classification
// ─────────────────────────────────────────────────────────

#[test]
fn classify_buckets_outcomes() {
    let success: Result<Result<(), u32>, Result<u32, u32>> = Ok(Ok(()));
    assert_eq!(protocol::classify(&success), Outcome::Success);

    let contract_error: Result<Result<(), u32>, Result<u32, u32>> = Err(Ok(9));
    assert_eq!(protocol::classify(&contract_error), Outcome::Failure);

    let invoke_error: Result<Result<(), u32>, Result<u32, u32>> = Err(Err(0));
    assert_eq!(protocol::classify(&invoke_error), Outcome::Failure);

    let undecodable: Result<Result<(), u32>, Result<u32, u32>> = Ok(Err(1));
    assert_eq!(protocol::classify(&undecodable), Outcome::Failure);
}

// ─────────────────────────────────────────────────────────
// Creation interpreter
// ─────────────────────────────────────────────────────────

#[test]
fn creation_success_registers_project() {
    let s = setup();
    let owner = Address::generate(&s.env);
    let project = Address::generate(&s.env);
    let id = identifier(&s);
    let key = key_for(&s, &id);
    let pending = pending_for(&s, &owner, &id, Some(project.clone()));
    plant_pending(&s, &key, &pending);

    s.env.as_contract(&s.client.address, || {
        protocol::settle_creation(&s.env, &key, pending.clone(), Outcome::Success);
    });

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("no events");
    assert_eq!(last_event.0, s.client.address);
    assert_eq!(
        last_event.1,
        vec![
            &s.env,
            symbol_short!("created").into_val(&s.env),
            id.clone().into_val(&s.env),
        ]
    );
    let data: ProjectRegistered = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        data,
        ProjectRegistered {
            owner,
            identifier: id.clone(),
            project: project.clone(),
        }
    );

    assert!(s.client.project_exists(&id));
    assert_eq!(s.client.get_project_address(&id), Some(project));
    assert_eq!(s.client.get_pending(&id), None);
}

#[test]
fn creation_failure_orphans_project() {
    let s = setup();
    let owner = Address::generate(&s.env);
    let project = Address::generate(&s.env);
    let id = identifier(&s);
    let key = key_for(&s, &id);
    let pending = pending_for(&s, &owner, &id, Some(project.clone()));
    plant_pending(&s, &key, &pending);

    s.env.as_contract(&s.client.address, || {
        protocol::settle_creation(&s.env, &key, pending.clone(), Outcome::Failure);
    });

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("no events");
    let data: ProjectOrphaned = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(data.project, Some(project.clone()));

    // Deployed and funded but never indexed; the record is the only trace.
    assert!(!s.client.project_exists(&id));
    let stuck = s.client.get_pending(&id).expect("pending record dropped");
    assert_eq!(stuck.status, CreationStatus::Orphaned);
    assert_eq!(stuck.project, Some(project));
    assert_eq!(stuck.deposit, MIN_ATTACHED_DEPOSIT);
}

#[test]
fn creation_pending_outcome_is_ignored() {
    let s = setup();
    let owner = Address::generate(&s.env);
    let id = identifier(&s);
    let key = key_for(&s, &id);
    let pending = pending_for(&s, &owner, &id, None);
    plant_pending(&s, &key, &pending);

    s.env.as_contract(&s.client.address, || {
        protocol::settle_creation(&s.env, &key, pending.clone(), Outcome::Pending);
    });

    // A contradiction is logged, nothing moves.
    assert!(!s.client.project_exists(&id));
    assert_eq!(
        s.client.get_pending(&id).unwrap().status,
        CreationStatus::Initializing
    );
}

#[test]
#[should_panic(expected = "Error(Contract, #5)")]
fn orphaned_identifier_cannot_be_retried() {
    let s = setup();
    let owner = Address::generate(&s.env);
    let id = identifier(&s);
    let key = key_for(&s, &id);
    let mut pending = pending_for(&s, &owner, &id, Some(Address::generate(&s.env)));
    pending.status = CreationStatus::Orphaned;
    plant_pending(&s, &key, &pending);

    s.token_sac.mint(&owner, &MIN_ATTACHED_DEPOSIT);
    s.client.add_project(
        &owner,
        &id,
        &String::from_str(&s.env, "Decentralized Finance"),
        &String::from_str(&s.env, "description"),
        &String::from_str(&s.env, "https://example.com/defi.png"),
        &MIN_ATTACHED_DEPOSIT,
    );
}

// ─────────────────────────────────────────────────────────
// Settlement interpreter
// ─────────────────────────────────────────────────────────

#[test]
fn settled_release_deregisters_project() {
    let s = setup();
    let owner = Address::generate(&s.env);
    let project = s.env.register(SettlingProject, ());
    let id = identifier(&s);
    plant_entry(&s, &owner, &id, &project);

    s.client.release_donations(&owner, &id);

    assert!(!s.client.project_exists(&id));
    assert_eq!(s.client.get_project_count(), 0);
}

#[test]
fn failed_transfer_keeps_registry_entry() {
    let s = setup();
    let owner = Address::generate(&s.env);
    let project = s.env.register(StuckProject, ());
    let id = identifier(&s);
    plant_entry(&s, &owner, &id, &project);

    s.client.release_donations(&owner, &id);

    // No deregistration, no retry; the campaign stays reachable.
    assert!(s.client.project_exists(&id));
    assert_eq!(s.client.get_project_address(&id), Some(project));
}

#[test]
#[should_panic(expected = "Error(Contract, #9)")]
fn request_leg_rejection_surfaces_synchronously() {
    let s = setup();
    let owner = Address::generate(&s.env);
    let project = s.env.register(GatedProject, ());
    let id = identifier(&s);
    plant_entry(&s, &owner, &id, &project);

    s.client.release_donations(&owner, &id);
}

#[test]
#[should_panic(expected = "Error(Contract, #11)")]
fn release_of_unknown_identifier_fails() {
    let s = setup();
    s.client
        .release_donations(&s.operator, &identifier(&s));
}

#[test]
#[should_panic(expected = "Error(Contract, #6)")]
fn release_by_non_owner_fails() {
    let s = setup();
    let owner = Address::generate(&s.env);
    let project = s.env.register(SettlingProject, ());
    let id = identifier(&s);
    plant_entry(&s, &owner, &id, &project);

    s.client.release_donations(&s.operator, &id);
}
