//! Event State Machine.
//!
//! Created -> Started -> Completed
//! Created -> Started -> Canceled
//! Created -> Canceled
//!
//! Completed and Canceled are terminal. Every other module reads events
//! through `load` and writes them back through `save`.

use soroban_sdk::{Address, Env, Vec};

use crate::access;
use crate::distribution;
use crate::errors::Error;
use crate::events;
use crate::interfaces;
use crate::ledger;
use crate::refund;
use crate::storage;
use crate::types::{
    Asset, CancelReason, DataKey, DistributionConfig, Event, EventParams, EventStatus,
    ProtocolConfig, TicketTier,
};
use crate::yield_overlay;

pub fn load(env: &Env, event_id: u64) -> Result<Event, Error> {
    storage::get(env, &DataKey::Event(event_id)).ok_or(Error::EventNotFound)
}

pub fn save(env: &Env, event: &Event) {
    storage::set(env, &DataKey::Event(event.id), event);
}

pub fn participants(env: &Env, event_id: u64) -> Vec<u32> {
    storage::get(env, &DataKey::Participants(event_id)).unwrap_or(Vec::new(env))
}

pub fn is_registered(env: &Env, event_id: u64, participant_id: u32) -> bool {
    storage::has(env, &DataKey::Registered(event_id, participant_id))
}

impl Event {
    pub fn fee(&self, asset: Asset) -> i128 {
        match asset {
            Asset::Stable => self.fee_stable,
            Asset::Native => self.fee_native,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self.status, EventStatus::Completed | EventStatus::Canceled)
    }

    /// Created or Started.
    pub fn require_open(&self) -> Result<(), Error> {
        if self.is_final() {
            return Err(Error::EventFinalized);
        }
        Ok(())
    }
}

fn validate_params(env: &Env, params: &EventParams) -> Result<(), Error> {
    if params.registration_start > params.registration_end
        || params.registration_end > params.start
        || params.start >= params.end
        || params.start <= env.ledger().timestamp()
    {
        return Err(Error::InvalidTimeRange);
    }
    if params.max_participants == 0 {
        return Err(Error::ZeroMaxParticipants);
    }
    if params.fee_stable < 0 || params.fee_native < 0 {
        return Err(Error::InvalidAmount);
    }
    if params.fee_stable == 0 && params.fee_native == 0 {
        return Err(Error::NoFeeConfigured);
    }
    if params.tier_prices.len() != params.tier_supplies.len() {
        return Err(Error::TierLengthMismatch);
    }
    for price in params.tier_prices.iter() {
        if price <= 0 {
            return Err(Error::InvalidAmount);
        }
    }
    Ok(())
}

pub fn create(
    env: &Env,
    creator: Address,
    params: EventParams,
    distribution: DistributionConfig,
    weights: Vec<u32>,
) -> Result<u64, Error> {
    creator.require_auth();

    validate_params(env, &params)?;
    distribution::validate(&distribution, &weights)?;

    let id: u64 = storage::instance_get(env, &DataKey::NextEventId).unwrap_or(1);
    storage::instance_set(env, &DataKey::NextEventId, &(id + 1));

    let event = Event {
        id,
        creator: creator.clone(),
        referee: params.referee,
        registration_start: params.registration_start,
        registration_end: params.registration_end,
        start: params.start,
        end: params.end,
        max_participants: params.max_participants,
        participant_count: 0,
        fee_stable: params.fee_stable,
        fee_native: params.fee_native,
        yield_enabled: params.yield_enabled,
        status: EventStatus::Created,
        cancel_reason: CancelReason::NotCanceled,
    };
    save(env, &event);

    let mut tiers: Vec<TicketTier> = Vec::new(env);
    for (price, supply) in params.tier_prices.iter().zip(params.tier_supplies.iter()) {
        tiers.push_back(TicketTier { price, supply, sold: 0 });
    }
    storage::set(env, &DataKey::Tiers(id), &tiers);
    storage::set(env, &DataKey::Distribution(id), &distribution);
    storage::set(env, &DataKey::Positions(id), &weights);

    events::event_created(env, id, &creator, event.start, event.end);
    Ok(id)
}

pub fn update_distribution(
    env: &Env,
    caller: &Address,
    event_id: u64,
    distribution: DistributionConfig,
    weights: Vec<u32>,
) -> Result<(), Error> {
    let event = load(env, event_id)?;
    access::require_creator(&event, caller)?;
    event.require_open()?;

    distribution::validate(&distribution, &weights)?;
    storage::set(env, &DataKey::Distribution(event_id), &distribution);
    storage::set(env, &DataKey::Positions(event_id), &weights);

    events::distribution_updated(env, event_id);
    Ok(())
}

pub fn register(
    env: &Env,
    config: &ProtocolConfig,
    owner: &Address,
    event_id: u64,
    participant_id: u32,
    asset: Asset,
) -> Result<(), Error> {
    owner.require_auth();

    let mut event = load(env, event_id)?;
    if event.status != EventStatus::Created {
        return Err(Error::EventNotOpen);
    }

    let now = env.ledger().timestamp();
    if now >= event.start || now >= event.registration_end {
        return Err(Error::RegistrationClosed);
    }
    if now < event.registration_start {
        return Err(Error::RegistrationNotOpen);
    }
    if is_registered(env, event_id, participant_id) {
        return Err(Error::AlreadyRegistered);
    }
    if event.participant_count >= event.max_participants {
        return Err(Error::EventFull);
    }

    let slot_owner = interfaces::owner_of(env, &config.registry, participant_id)?;
    if slot_owner != *owner {
        return Err(Error::NotParticipantOwner);
    }

    let fee = event.fee(asset);
    if fee <= 0 {
        return Err(Error::AssetNotAccepted);
    }

    interfaces::collect(env, config.token(asset), owner, fee)?;
    ledger::deposit(env, event_id, asset, fee)?;

    storage::set(env, &DataKey::Registered(event_id, participant_id), &true);
    let mut list = participants(env, event_id);
    list.push_back(participant_id);
    storage::set(env, &DataKey::Participants(event_id), &list);

    event.participant_count += 1;
    save(env, &event);

    // an opted-in leg starts generating as soon as registrations cover the threshold
    yield_overlay::on_registration(env, config, &event, asset, fee)?;

    events::registered(env, event_id, participant_id, asset, fee);
    Ok(())
}

pub fn buy_ticket(
    env: &Env,
    config: &ProtocolConfig,
    buyer: &Address,
    event_id: u64,
    tier_index: u32,
) -> Result<u32, Error> {
    buyer.require_auth();

    let event = load(env, event_id)?;
    event.require_open()?;
    if env.ledger().timestamp() >= event.end {
        return Err(Error::EventEnded);
    }

    let mut tiers: Vec<TicketTier> =
        storage::get(env, &DataKey::Tiers(event_id)).unwrap_or(Vec::new(env));
    let mut tier = tiers.get(tier_index).ok_or(Error::InvalidTier)?;
    if tier.sold >= tier.supply {
        return Err(Error::TierSoldOut);
    }

    interfaces::collect(env, &config.stable_token, buyer, tier.price)?;
    ledger::deposit(env, event_id, Asset::Stable, tier.price)?;

    tier.sold += 1;
    let price = tier.price;
    tiers.set(tier_index, tier);
    storage::set(env, &DataKey::Tiers(event_id), &tiers);

    let key = DataKey::Tickets(event_id, buyer.clone());
    let held: u32 = storage::get(env, &key).unwrap_or(0);
    storage::set(env, &key, &(held + 1));

    yield_overlay::forward_deposit(env, config, event_id, Asset::Stable, price)?;

    events::ticket_sold(env, event_id, buyer, tier_index, price);
    Ok(held + 1)
}

pub fn sponsor(
    env: &Env,
    config: &ProtocolConfig,
    sponsor: &Address,
    event_id: u64,
    asset: Asset,
    amount: i128,
) -> Result<(), Error> {
    sponsor.require_auth();

    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let event = load(env, event_id)?;
    event.require_open()?;

    interfaces::collect(env, config.token(asset), sponsor, amount)?;
    ledger::deposit(env, event_id, asset, amount)?;
    yield_overlay::forward_deposit(env, config, event_id, asset, amount)?;

    events::sponsored(env, event_id, sponsor, asset, amount);
    Ok(())
}

pub fn start(env: &Env, caller: &Address, event_id: u64) -> Result<(), Error> {
    let mut event = load(env, event_id)?;
    access::require_creator(&event, caller)?;

    if event.status != EventStatus::Created {
        return Err(Error::EventNotOpen);
    }
    if env.ledger().timestamp() < event.start {
        return Err(Error::TooEarly);
    }

    event.status = EventStatus::Started;
    save(env, &event);

    events::started(env, event_id);
    Ok(())
}

/// Registration closed without reaching capacity.
pub fn should_auto_cancel(env: &Env, event: &Event) -> bool {
    event.status == EventStatus::Created
        && env.ledger().timestamp() >= event.registration_end
        && event.participant_count < event.max_participants
}

/// Creator cancels a Created or Started event; anyone may trigger the
/// quorum cancellation once `should_auto_cancel` holds.
pub fn cancel(
    env: &Env,
    config: &ProtocolConfig,
    caller: &Address,
    event_id: u64,
) -> Result<CancelReason, Error> {
    caller.require_auth();

    let mut event = load(env, event_id)?;
    event.require_open()?;

    let reason = if *caller == event.creator {
        CancelReason::Organizer
    } else if should_auto_cancel(env, &event) {
        CancelReason::QuorumNotMet
    } else {
        return Err(Error::Unauthorized);
    };

    // funds must be back in escrow before they can be refunded
    yield_overlay::unwind_all(env, config, event_id, false)?;

    event.status = EventStatus::Canceled;
    event.cancel_reason = reason;
    save(env, &event);

    let refunded = refund::refund_all(env, config, &event)?;

    soroban_sdk::log!(env, "event canceled", event_id, refunded);
    events::canceled(env, event_id, reason, refunded);
    Ok(reason)
}
