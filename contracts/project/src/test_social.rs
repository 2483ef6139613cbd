extern crate std;

use soroban_sdk::{testutils::Address as _, token, Address, Env, String};

use crate::{ProjectContract, ProjectContractClient, MIN_ATTACHED_DEPOSIT};

// Fixed ed25519 account strkeys — commenters and likers must be ordinary
// accounts to pass the direct-call gate.
const ACCOUNTS: [&str; 12] = [
    "GAAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQDZ7H",
    "GABAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEJXA",
    "GABQGAYDAMBQGAYDAMBQGAYDAMBQGAYDAMBQGAYDAMBQGAYDAMBQHGPC",
    "GACAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAJJHP",
    "GACQKBIFAUCQKBIFAUCQKBIFAUCQKBIFAUCQKBIFAUCQKBIFAUCQKG7N",
    "GADAMBQGAYDAMBQGAYDAMBQGAYDAMBQGAYDAMBQGAYDAMBQGAYDANWXK",
    "GADQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOBYHA4DQOZPI",
    "GAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEARIHQ",
    "GAEQSCIJBEEQSCIJBEEQSCIJBEEQSCIJBEEQSCIJBEEQSCIJBEEQSH7S",
    "GAFAUCQKBIFAUCQKBIFAUCQKBIFAUCQKBIFAUCQKBIFAUCQKBIFAVXXV",
    "GAFQWCYLBMFQWCYLBMFQWCYLBMFQWCYLBMFQWCYLBMFQWCYLBMFQWYPX",
    "GAGAYDAMBQGAYDAMBQGAYDAMBQGAYDAMBQGAYDAMBQGAYDAMBQGAYXH2",
];

/// Ten distinct account addresses, enough to cross the like threshold.
pub(crate) fn liker_pool(env: &Env) -> std::vec::Vec<Address> {
    ACCOUNTS[..10]
        .iter()
        .map(|s| Address::from_str(env, s))
        .collect()
}

struct Setup<'a> {
    env: Env,
    client: ProjectContractClient<'a>,
    token: token::Client<'a>,
}

fn setup() -> Setup<'static> {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(ProjectContract, ());
    let client = ProjectContractClient::new(&env, &contract_id);
    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin);
    let token = token::Client::new(&env, &sac.address());
    let token_sac = token::StellarAssetClient::new(&env, &sac.address());
    let fund = Address::generate(&env);
    let owner = Address::from_str(&env, ACCOUNTS[11]);

    token_sac.mint(&contract_id, &MIN_ATTACHED_DEPOSIT);
    client.initialize(
        &fund,
        &owner,
        &String::from_str(&env, "defi-campaign"),
        &String::from_str(&env, "Decentralized Finance"),
        &String::from_str(&env, "A campaign that funds open finance tooling."),
        &String::from_str(&env, "https://example.com/defi.png"),
        &token.address,
    );
    Setup { env, client, token }
}

fn account(env: &Env, index: usize) -> Address {
    Address::from_str(env, ACCOUNTS[index])
}

// ─────────────────────────────────────────────────────────
// Comments
// ─────────────────────────────────────────────────────────

#[test]
fn comments_append_in_order() {
    let s = setup();
    let alice = account(&s.env, 0);
    let bob = account(&s.env, 1);

    s.client.add_comment(&alice, &String::from_str(&s.env, "great cause"));
    s.client.add_comment(&bob, &String::from_str(&s.env, "donated!"));
    s.client.add_comment(&alice, &String::from_str(&s.env, "thanks all"));

    assert_eq!(s.client.get_comment_count(), 3);
    let list = s.client.get_comment_list(&0, &0);
    assert_eq!(list.len(), 3);
    assert_eq!(list.get(0).unwrap().author, alice);
    assert_eq!(list.get(0).unwrap().text, String::from_str(&s.env, "great cause"));
    assert_eq!(list.get(1).unwrap().author, bob);
    assert_eq!(list.get(2).unwrap().author, alice);
}

#[test]
fn comment_pagination_clamps() {
    let s = setup();
    let alice = account(&s.env, 0);
    for text in ["one", "two", "three", "four"] {
        s.client.add_comment(&alice, &String::from_str(&s.env, text));
    }

    let window = s.client.get_comment_list(&1, &2);
    assert_eq!(window.len(), 2);
    assert_eq!(window.get(0).unwrap().text, String::from_str(&s.env, "two"));
    assert_eq!(s.client.get_comment_list(&3, &10).len(), 1);
    assert_eq!(s.client.get_comment_list(&4, &10).len(), 0);
    assert_eq!(s.client.get_comment_list(&50, &10).len(), 0);
}

#[test]
fn comment_at_max_length_is_accepted() {
    let s = setup();
    let alice = account(&s.env, 0);
    let text = "x".repeat(499);
    s.client.add_comment(&alice, &String::from_str(&s.env, &text));
    assert_eq!(s.client.get_comment_count(), 1);
}

#[test]
#[should_panic(expected = "Error(Contract, #4)")]
fn comment_over_max_length_fails() {
    let s = setup();
    let alice = account(&s.env, 0);
    let text = "x".repeat(500);
    s.client.add_comment(&alice, &String::from_str(&s.env, &text));
}

#[test]
#[should_panic(expected = "Error(Contract, #4)")]
fn blank_comment_fails() {
    let s = setup();
    let alice = account(&s.env, 0);
    s.client.add_comment(&alice, &String::from_str(&s.env, ""));
}

#[test]
#[should_panic(expected = "Error(Contract, #7)")]
fn comment_from_contract_address_fails() {
    let s = setup();
    s.client
        .add_comment(&s.token.address, &String::from_str(&s.env, "relayed"));
}

// ─────────────────────────────────────────────────────────
// Likes
// ─────────────────────────────────────────────────────────

#[test]
fn like_is_idempotent_per_account() {
    let s = setup();
    let alice = account(&s.env, 0);

    s.client.like(&alice);
    assert_eq!(s.client.get_like_count(), 1);
    s.client.like(&alice);
    s.client.like(&alice);
    assert_eq!(s.client.get_like_count(), 1);
}

#[test]
fn like_counts_distinct_accounts() {
    let s = setup();
    for i in 0..3 {
        s.client.like(&account(&s.env, i));
    }
    // A repeat like from the first account changes nothing.
    s.client.like(&account(&s.env, 0));
    assert_eq!(s.client.get_like_count(), 3);
}

#[test]
#[should_panic(expected = "Error(Contract, #7)")]
fn like_from_contract_address_fails() {
    let s = setup();
    s.client.like(&s.token.address);
}

#[test]
#[should_panic(expected = "Error(Contract, #2)")]
fn like_before_initialize_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(ProjectContract, ());
    let client = ProjectContractClient::new(&env, &contract_id);
    client.like(&Address::from_str(&env, ACCOUNTS[0]));
}
