//! Settlement Gateway.
//!
//! Consumes one attested result claim, distributes the event's escrow and
//! completes the event. At most one settlement per claim id.

use soroban_sdk::{Address, BytesN, Env, Vec};

use crate::access;
use crate::distribution;
use crate::errors::Error;
use crate::events;
use crate::interfaces;
use crate::ledger;
use crate::lifecycle;
use crate::storage;
use crate::types::{
    Asset, AssetPayout, DataKey, DistributionConfig, EventStatus, ProtocolConfig, ResultClaim,
    SettlementRecord,
};
use crate::yield_overlay;

pub fn is_processed(env: &Env, claim_id: &BytesN<32>) -> bool {
    storage::has(env, &DataKey::Claim(claim_id.clone()))
}

fn plan(
    env: &Env,
    pooled: i128,
    distribution: &DistributionConfig,
    winner_count: u32,
    weights: &Vec<u32>,
) -> Result<AssetPayout, Error> {
    if pooled <= 0 {
        return Ok(AssetPayout::empty(env));
    }
    distribution::split(env, pooled, distribution, winner_count, weights)
}

fn execute(
    env: &Env,
    token: &Address,
    payout: &AssetPayout,
    winners: &Vec<Address>,
    organizer: &Address,
    charity: &Address,
    platform: &Address,
) -> Result<(), Error> {
    for (recipient, amount) in winners.iter().zip(payout.per_winner.iter()) {
        if amount > 0 {
            interfaces::pay(env, token, &recipient, amount)?;
        }
    }
    if payout.organizer > 0 {
        interfaces::pay(env, token, organizer, payout.organizer)?;
    }
    if payout.charity > 0 {
        interfaces::pay(env, token, charity, payout.charity)?;
    }
    if payout.platform > 0 {
        interfaces::pay(env, token, platform, payout.platform)?;
    }
    Ok(())
}

pub fn settle(
    env: &Env,
    config: &ProtocolConfig,
    relay: &Address,
    claim_id: BytesN<32>,
    claim: ResultClaim,
) -> Result<SettlementRecord, Error> {
    if is_processed(env, &claim_id) {
        return Err(Error::ClaimAlreadyProcessed);
    }
    access::require_oracle(config, relay)?;

    let mut event = lifecycle::load(env, claim.event_id)?;
    if event.status != EventStatus::Started {
        return Err(Error::EventNotStarted);
    }
    let now = env.ledger().timestamp();
    if now < event.end {
        return Err(Error::TooEarly);
    }
    if claim.attester != event.referee {
        return Err(Error::AttesterMismatch);
    }

    let distribution: DistributionConfig = storage::get(env, &DataKey::Distribution(event.id))
        .ok_or(Error::DistributionUnset)?;
    if distribution.athletes_bp == 0 {
        return Err(Error::DistributionUnset);
    }

    if claim.winners.is_empty() {
        return Err(Error::InvalidWinners);
    }
    for (i, winner) in claim.winners.iter().enumerate() {
        if !lifecycle::is_registered(env, event.id, winner) {
            return Err(Error::WinnerNotRegistered);
        }
        if claim.winners.first_index_of(winner) != Some(i as u32) {
            return Err(Error::InvalidWinners);
        }
    }

    let weights: Vec<u32> =
        storage::get(env, &DataKey::Positions(event.id)).unwrap_or(Vec::new(env));
    if claim.winners.len() > weights.len() {
        return Err(Error::TooManyWinners);
    }

    let mut winner_addresses: Vec<Address> = Vec::new(env);
    for winner in claim.winners.iter() {
        winner_addresses.push_back(interfaces::owner_of(env, &config.registry, winner)?);
    }

    // principal + realized yield back into escrow; the pool is rebased on it
    yield_overlay::unwind_all(env, config, event.id, true)?;

    let winner_count = claim.winners.len();
    let mut pool = ledger::pool(env, event.id);
    let stable = plan(env, pool.stable, &distribution, winner_count, &weights)?;
    let native = plan(env, pool.native, &distribution, winner_count, &weights)?;

    // effects before any payout leaves the contract
    storage::set(env, &DataKey::Claim(claim_id.clone()), &true);
    event.status = EventStatus::Completed;
    lifecycle::save(env, &event);

    pool.stable -= stable.distributed();
    pool.native -= native.distributed();
    ledger::save_pool(env, event.id, &pool);
    ledger::save_treasury(env, event.id, &Default::default());

    let record = SettlementRecord {
        event_id: event.id,
        claim_id,
        winners: claim.winners.clone(),
        stable,
        native,
        settled_at: now,
    };
    storage::set(env, &DataKey::Settlement(event.id), &record);

    for (asset, payout) in [(Asset::Stable, &record.stable), (Asset::Native, &record.native)] {
        execute(
            env,
            config.token(asset),
            payout,
            &winner_addresses,
            &event.creator,
            &distribution.charity,
            &config.platform,
        )?;
    }

    soroban_sdk::log!(env, "event settled", event.id, record.stable.total, record.native.total);
    events::settled(env, &record);
    Ok(record)
}
