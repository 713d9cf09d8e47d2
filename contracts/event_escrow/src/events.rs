use soroban_sdk::{symbol_short, Address, Env};

use crate::types::{Asset, CancelReason, SettlementRecord};

pub fn event_created(env: &Env, event_id: u64, creator: &Address, start: u64, end: u64) {
    env.events().publish(
        (symbol_short!("EV_NEW"), event_id),
        (creator.clone(), start, end),
    );
}

pub fn registered(env: &Env, event_id: u64, participant_id: u32, asset: Asset, fee: i128) {
    env.events().publish(
        (symbol_short!("EV_REG"), event_id),
        (participant_id, asset, fee),
    );
}

pub fn started(env: &Env, event_id: u64) {
    env.events()
        .publish((symbol_short!("EV_START"), event_id), env.ledger().timestamp());
}

pub fn canceled(env: &Env, event_id: u64, reason: CancelReason, participants: u32) {
    env.events().publish(
        (symbol_short!("EV_CANCEL"), event_id),
        (reason, participants),
    );
}

pub fn refunded(env: &Env, event_id: u64, participant_id: u32, asset: Asset, amount: i128) {
    env.events().publish(
        (symbol_short!("REFUND"), event_id, participant_id),
        (asset, amount),
    );
}

pub fn ticket_sold(env: &Env, event_id: u64, buyer: &Address, tier: u32, price: i128) {
    env.events().publish(
        (symbol_short!("TICKET"), event_id, buyer.clone()),
        (tier, price),
    );
}

pub fn sponsored(env: &Env, event_id: u64, sponsor: &Address, asset: Asset, amount: i128) {
    env.events().publish(
        (symbol_short!("SPONSOR"), event_id, sponsor.clone()),
        (asset, amount),
    );
}

pub fn distribution_updated(env: &Env, event_id: u64) {
    env.events()
        .publish((symbol_short!("DIST_UPD"), event_id), env.ledger().timestamp());
}

pub fn yield_staked(env: &Env, event_id: u64, asset: Asset, principal: i128) {
    env.events().publish(
        (symbol_short!("Y_STAKE"), event_id),
        (asset, principal),
    );
}

pub fn yield_withdrawn(env: &Env, event_id: u64, asset: Asset, returned: i128, realized: i128) {
    env.events().publish(
        (symbol_short!("Y_WDRAW"), event_id),
        (asset, returned, realized),
    );
}

pub fn yield_emergency(env: &Env, event_id: u64, stable: i128, native: i128) {
    env.events().publish(
        (symbol_short!("Y_EMERG"), event_id),
        (stable, native),
    );
}

pub fn settled(env: &Env, record: &SettlementRecord) {
    env.events().publish(
        (symbol_short!("SETTLED"), record.event_id),
        record.clone(),
    );
}
