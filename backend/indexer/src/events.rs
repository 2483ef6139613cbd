//! Canonical event types emitted by the Crowdfund contracts.
//!
//! Two contracts publish here: the Fund registry (`fund_init`, `requested`,
//! `created`, `orphaned`, `removed`) and every campaign contract (`init`,
//! `donated`, `commented`, `liked`, `settling`, `released`, `failed`).
//! Topic symbols are disjoint between the two, so one classifier covers
//! both streams.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the Fund and Project contracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Fund: platform initialized (`fund_init` topic).
    FundInitialized,
    /// Fund: creation request accepted, protocol legs issued (`requested`).
    ProjectRequested,
    /// Fund: campaign initialized and indexed (`created`).
    ProjectRegistered,
    /// Fund: campaign deployed but never initialized (`orphaned`).
    ProjectOrphaned,
    /// Fund: campaign settled and left the index (`removed`).
    ProjectRemoved,
    /// Project: campaign record written (`init`).
    ProjectInitialized,
    /// Project: donation recorded (`donated`).
    DonationReceived,
    /// Project: comment recorded (`commented`).
    CommentAdded,
    /// Project: new account joined the like set (`liked`).
    ProjectLiked,
    /// Project: release request accepted, transfer leg issued (`settling`).
    ReleaseRequested,
    /// Project: settlement committed, funding closed (`released`).
    DonationsReleased,
    /// Project: transfer leg failed, settlement stuck (`failed`).
    ReleaseFailed,
    /// An event from a watched contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "fund_init" => Self::FundInitialized,
            "requested" => Self::ProjectRequested,
            "created" => Self::ProjectRegistered,
            "orphaned" => Self::ProjectOrphaned,
            "removed" => Self::ProjectRemoved,
            "init" => Self::ProjectInitialized,
            "donated" => Self::DonationReceived,
            "commented" => Self::CommentAdded,
            "liked" => Self::ProjectLiked,
            "settling" => Self::ReleaseRequested,
            "released" => Self::DonationsReleased,
            "failed" => Self::ReleaseFailed,
            _ => Self::Unknown,
        }
    }

    /// `true` for events published by the Fund registry; their second topic
    /// is the campaign identifier.
    pub fn is_fund_event(&self) -> bool {
        matches!(
            self,
            Self::FundInitialized
                | Self::ProjectRequested
                | Self::ProjectRegistered
                | Self::ProjectOrphaned
                | Self::ProjectRemoved
        )
    }

    /// Short identifier string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FundInitialized => "fund_initialized",
            Self::ProjectRequested => "project_requested",
            Self::ProjectRegistered => "project_registered",
            Self::ProjectOrphaned => "project_orphaned",
            Self::ProjectRemoved => "project_removed",
            Self::ProjectInitialized => "project_initialized",
            Self::DonationReceived => "donation_received",
            Self::CommentAdded => "comment_added",
            Self::ProjectLiked => "project_liked",
            Self::ReleaseRequested => "release_requested",
            Self::DonationsReleased => "donations_released",
            Self::ReleaseFailed => "release_failed",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded Crowdfund event, ready to be stored in the database.
///
/// `project` is the campaign identifier for Fund events and the campaign
/// contract address for Project events (a campaign's own stream does not
/// repeat the identifier; the `project_registered` event ties the two).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdfundEvent {
    pub event_type: String,
    pub project: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub project: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
