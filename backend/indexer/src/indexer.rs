//! Long-running background task that polls the Soroban RPC and writes
//! decoded Crowdfund events to the database.
//!
//! The watch set grows at runtime: every `created` event names the campaign
//! contract the Fund just registered, and from the next poll onwards that
//! contract's own stream (donations, comments, likes, settlement) is
//! indexed too.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Run the indexer loop until `shutdown` fires.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!(
        "Indexer starting — fund contract: {}",
        state.config.fund_contract_id
    );

    // Seed the watch set with the statically configured campaigns.
    for contract_id in &state.config.project_contract_ids {
        if let Err(e) = db::track_contract(&state.pool, contract_id).await {
            error!("Failed to track configured contract {contract_id}: {e}");
        }
    }

    let last_ledger = db::get_last_ledger(&state.pool).await.unwrap_or(0);
    let mut current_ledger = if last_ledger > 0 {
        last_ledger as u32
    } else {
        state.config.start_ledger
    };

    info!("Resuming from ledger {current_ledger}");

    loop {
        match poll_once(&state.pool, &state.client, &state.config, current_ledger).await {
            Ok(next_ledger) => current_ledger = next_ledger,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Indexer shutting down");
                return;
            }
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }
}

/// Perform a single poll iteration over the whole watch set.
///
/// Returns the next start ledger. Re-polling an already-seen range is safe:
/// inserts are idempotent.
async fn poll_once(
    pool: &SqlitePool,
    client: &Client,
    config: &Config,
    start_ledger: u32,
) -> crate::errors::Result<u32> {
    let mut watched = vec![config.fund_contract_id.clone()];
    watched.extend(db::get_tracked_contracts(pool).await?);

    let mut next_ledger = start_ledger;

    // getEvents caps contract ids per filter, so large watch sets are
    // polled in chunks.
    for chunk in watched.chunks(rpc::MAX_CONTRACTS_PER_FILTER) {
        let (raw_events, latest_ledger) = rpc::fetch_events(
            client,
            &config.rpc_url,
            chunk,
            start_ledger,
            config.events_per_page,
        )
        .await?;

        if !raw_events.is_empty() {
            let (decoded, discovered) = rpc::decode_events(&raw_events);
            let inserted = db::insert_events(pool, &decoded).await?;
            info!(
                "Polled {} raw events → {} new records stored",
                raw_events.len(),
                inserted
            );

            for contract_id in discovered {
                info!("Discovered campaign contract {contract_id}");
                db::track_contract(pool, &contract_id).await?;
            }
        }

        if let Some(latest) = latest_ledger {
            next_ledger = next_ledger.max(latest as u32);
        }
    }

    db::save_last_ledger(pool, next_ledger as i64).await?;
    Ok(next_ledger)
}
