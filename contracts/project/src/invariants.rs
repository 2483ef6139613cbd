#![allow(dead_code)]

extern crate std;

use crate::types::Project;

/// Funding closure: a campaign that stopped funding holds no donation total.
pub fn assert_funding_closure(project: &Project) {
    if !project.funding {
        assert_eq!(
            project.total_donations, 0,
            "closed campaign still carries a donation total of {}",
            project.total_donations
        );
    }
}

/// The donation total can never go negative.
pub fn assert_total_non_negative(project: &Project) {
    assert!(
        project.total_donations >= 0,
        "donation total went negative: {}",
        project.total_donations
    );
}

/// While funding, the donation total only grows.
pub fn assert_total_monotonic(before: i128, after: i128) {
    assert!(
        after >= before,
        "donation total decreased while funding: {} -> {}",
        before,
        after
    );
}

/// Immutable config fields stay put across state transitions.
pub fn assert_config_immutable(original: &Project, current: &Project) {
    assert_eq!(original.owner, current.owner, "owner changed");
    assert_eq!(
        original.contract_owner, current.contract_owner,
        "contract_owner changed"
    );
    assert_eq!(original.identifier, current.identifier, "identifier changed");
    assert_eq!(original.title, current.title, "title changed");
    assert_eq!(original.created_at, current.created_at, "created_at changed");
}

/// Run every stateless campaign invariant.
pub fn assert_all(project: &Project) {
    assert_funding_closure(project);
    assert_total_non_negative(project);
}
