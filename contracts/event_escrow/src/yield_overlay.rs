//! Yield Overlay: stakes an event's escrowed principal into the external
//! money market and reconciles what comes back with what went in.
//!
//! Per (event, asset) leg: idle -> generating -> withdrawn (idle again).
//! The escrow holds one position per asset in the pool, shared by every
//! generating event. Each leg owns shares of that position, minted at the
//! current reserve/share rate, so interest earned before a leg joined is
//! never attributed to it.

use soroban_sdk::{token, Env};

use crate::config::{self, BASE_APY_BP, BASIS_POINTS, DAYS_PER_YEAR, SECONDS_PER_DAY};
use crate::errors::Error;
use crate::events;
use crate::interfaces::YieldPoolClient;
use crate::ledger;
use crate::types::{Asset, Event, ProtocolConfig, TreasuryLeg, TreasuryState};

fn supply_to_pool(env: &Env, config: &ProtocolConfig, asset: Asset, amount: i128) -> Result<(), Error> {
    let escrow = env.current_contract_address();
    let token_addr = config.token(asset);

    let token_client = token::Client::new(env, token_addr);
    if !matches!(
        token_client.try_transfer(&escrow, &config.yield_pool, &amount),
        Ok(Ok(()))
    ) {
        return Err(Error::YieldPoolFailure);
    }

    let pool = YieldPoolClient::new(env, &config.yield_pool);
    match pool.try_supply(&escrow, token_addr, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::YieldPoolFailure),
    }
}

fn pull_from_pool(env: &Env, config: &ProtocolConfig, asset: Asset, amount: i128) -> Result<i128, Error> {
    if amount <= 0 {
        return Ok(0);
    }
    let pool = YieldPoolClient::new(env, &config.yield_pool);
    match pool.try_withdraw(&env.current_contract_address(), config.token(asset), &amount) {
        Ok(Ok(returned)) if returned >= 0 => Ok(returned),
        _ => Err(Error::YieldPoolFailure),
    }
}

fn reserve_of(env: &Env, config: &ProtocolConfig, asset: Asset) -> Option<i128> {
    let pool = YieldPoolClient::new(env, &config.yield_pool);
    match pool.try_reserve_balance(&env.current_contract_address(), config.token(asset)) {
        Ok(Ok(reserve)) => Some(reserve),
        _ => None,
    }
}

/// Shares minted for `amount` against a position worth `attributable`.
fn shares_for(amount: i128, attributable: i128, total_shares: i128) -> Result<i128, Error> {
    if total_shares <= 0 || attributable <= 0 {
        return Ok(amount);
    }
    amount
        .checked_mul(total_shares)
        .map(|v| v / attributable)
        .ok_or(Error::MathOverflow)
}

/// Part of a position worth `attributable` that `shares` redeem for.
fn value_of(shares: i128, attributable: i128, total_shares: i128) -> Result<i128, Error> {
    if total_shares <= 0 || shares <= 0 {
        return Ok(0);
    }
    shares
        .checked_mul(attributable.max(0))
        .map(|v| v / total_shares)
        .ok_or(Error::MathOverflow)
}

/// Current worth of `shares`, or `None` when the pool cannot be observed.
fn position_value(env: &Env, config: &ProtocolConfig, asset: Asset, shares: i128) -> Option<i128> {
    let reserve = reserve_of(env, config, asset)?;
    let attributable = reserve - ledger::residual(env, asset);
    value_of(shares, attributable, ledger::total_shares(env, asset)).ok()
}

/// Supplies `amount` for `leg` and credits it the matching shares.
fn stake(
    env: &Env,
    config: &ProtocolConfig,
    leg: &mut TreasuryLeg,
    asset: Asset,
    amount: i128,
) -> Result<(), Error> {
    let reserve = reserve_of(env, config, asset).ok_or(Error::YieldPoolFailure)?;
    let total = ledger::total_shares(env, asset);
    if total == 0 {
        // nobody holds a claim on what is left in the position
        ledger::set_residual(env, asset, reserve);
    }

    let attributable = reserve - ledger::residual(env, asset);
    let minted = shares_for(amount, attributable, total)?;
    leg.shares = leg.shares.checked_add(minted).ok_or(Error::MathOverflow)?;
    ledger::set_total_shares(env, asset, total.checked_add(minted).ok_or(Error::MathOverflow)?);

    supply_to_pool(env, config, asset, amount)
}

fn burn(env: &Env, asset: Asset, shares: i128) {
    let total = ledger::total_shares(env, asset) - shares;
    ledger::set_total_shares(env, asset, total.max(0));
}

fn start_generating(
    env: &Env,
    config: &ProtocolConfig,
    event_id: u64,
    treasury: &mut TreasuryState,
    asset: Asset,
) -> Result<i128, Error> {
    let leg = treasury.leg_mut(asset);
    let principal = leg.principal;
    leg.generating = true;
    leg.staking_start = env.ledger().timestamp();
    stake(env, config, leg, asset, principal)?;
    ledger::save_treasury(env, event_id, treasury);

    events::yield_staked(env, event_id, asset, principal);
    Ok(principal)
}

/// Starts generating on an event leg, supplying its whole principal.
pub fn enable(env: &Env, config: &ProtocolConfig, event: &Event, asset: Asset) -> Result<i128, Error> {
    if !event.yield_enabled {
        return Err(Error::YieldNotEnabled);
    }

    let mut treasury = ledger::treasury(env, event.id);
    let leg = treasury.leg(asset);
    if leg.generating {
        return Err(Error::YieldAlreadyActive);
    }
    if leg.principal < config::min_treasury(config.mode, asset) {
        return Err(Error::BelowYieldThreshold);
    }

    start_generating(env, config, event.id, &mut treasury, asset)
}

/// Forwards a fresh deposit straight into the pool when the leg is generating.
pub fn forward_deposit(
    env: &Env,
    config: &ProtocolConfig,
    event_id: u64,
    asset: Asset,
    amount: i128,
) -> Result<(), Error> {
    let mut treasury = ledger::treasury(env, event_id);
    if !treasury.leg(asset).generating {
        return Ok(());
    }

    stake(env, config, treasury.leg_mut(asset), asset, amount)?;
    ledger::save_treasury(env, event_id, &treasury);
    Ok(())
}

/// Registration fees of an opted-in event go to the pool: forwarded when the
/// leg already generates, or the whole leg is staked once it reaches the
/// threshold.
pub fn on_registration(
    env: &Env,
    config: &ProtocolConfig,
    event: &Event,
    asset: Asset,
    fee: i128,
) -> Result<(), Error> {
    let mut treasury = ledger::treasury(env, event.id);
    let leg = treasury.leg(asset);
    if leg.generating {
        return forward_deposit(env, config, event.id, asset, fee);
    }
    if event.yield_enabled && leg.principal >= config::min_treasury(config.mode, asset) {
        start_generating(env, config, event.id, &mut treasury, asset)?;
    }
    Ok(())
}

/// Redeems the leg's shares, bringing principal plus the leg's own interest
/// back into escrow. The staked principal inside the pooled total is replaced
/// by the amount actually recovered.
pub fn withdraw(
    env: &Env,
    config: &ProtocolConfig,
    event_id: u64,
    asset: Asset,
    enforce_lock: bool,
) -> Result<i128, Error> {
    let mut treasury = ledger::treasury(env, event_id);
    let leg = treasury.leg(asset).clone();
    if !leg.generating {
        return Err(Error::YieldNotActive);
    }

    if enforce_lock {
        let unlock_at = leg
            .staking_start
            .saturating_add(config::min_lock_period(config.mode));
        if env.ledger().timestamp() < unlock_at {
            return Err(Error::LockPeriodActive);
        }
    }

    let value = position_value(env, config, asset, leg.shares).ok_or(Error::YieldPoolFailure)?;
    burn(env, asset, leg.shares);
    let returned = pull_from_pool(env, config, asset, value)?;
    let realized = (returned - leg.principal).max(0);

    *treasury.leg_mut(asset) = TreasuryLeg {
        cumulative_yield: leg.cumulative_yield + realized,
        ..Default::default()
    };
    ledger::save_treasury(env, event_id, &treasury);

    ledger::rebase(env, event_id, asset, leg.principal, returned)?;
    let mut pool = ledger::pool(env, event_id);
    pool.add_yield(asset, realized);
    ledger::save_pool(env, event_id, &pool);

    events::yield_withdrawn(env, event_id, asset, returned, realized);
    Ok(returned)
}

/// Unwinds every generating leg of an event, used before distributing or
/// refunding. Idle legs are left alone.
pub fn unwind_all(env: &Env, config: &ProtocolConfig, event_id: u64, enforce_lock: bool) -> Result<(), Error> {
    for asset in [Asset::Stable, Asset::Native] {
        if ledger::treasury(env, event_id).leg(asset).generating {
            withdraw(env, config, event_id, asset, enforce_lock)?;
        }
    }
    Ok(())
}

/// Fault-recovery escape hatch: pulls back at most the principal of each
/// generating leg, ignoring the lock period. The leg's interest stays in the
/// pool with the remaining shareholders. Idle legs are untouched.
pub fn emergency_withdraw(env: &Env, config: &ProtocolConfig, event_id: u64) -> Result<(i128, i128), Error> {
    let mut treasury = ledger::treasury(env, event_id);
    let mut recovered = (0i128, 0i128);

    for asset in [Asset::Stable, Asset::Native] {
        let leg = treasury.leg(asset).clone();
        if !leg.generating {
            continue;
        }

        let owed = match position_value(env, config, asset, leg.shares) {
            Some(value) => value.min(leg.principal),
            None => leg.principal,
        };
        burn(env, asset, leg.shares);
        let returned = pull_from_pool(env, config, asset, owed)?;
        ledger::rebase(env, event_id, asset, leg.principal, returned)?;

        *treasury.leg_mut(asset) = TreasuryLeg {
            cumulative_yield: leg.cumulative_yield,
            ..Default::default()
        };
        match asset {
            Asset::Stable => recovered.0 = returned,
            Asset::Native => recovered.1 = returned,
        }
    }

    ledger::save_treasury(env, event_id, &treasury);
    events::yield_emergency(env, event_id, recovered.0, recovered.1);
    Ok(recovered)
}

/// Time-weighted estimate at the base APY, counted in whole days.
fn time_weighted_estimate(env: &Env, leg: &TreasuryLeg) -> i128 {
    let elapsed = env.ledger().timestamp().saturating_sub(leg.staking_start);
    let days = (elapsed / SECONDS_PER_DAY) as i128;

    leg.principal
        .checked_mul(BASE_APY_BP)
        .and_then(|v| v.checked_mul(days))
        .map(|v| v / (DAYS_PER_YEAR * BASIS_POINTS as i128))
        .unwrap_or(0)
}

/// Conservative yield estimate: the time-weighted figure, capped by the
/// interest actually observed on the leg's shares when that is readable.
pub fn estimated_yield(env: &Env, config: &ProtocolConfig, event_id: u64, asset: Asset) -> i128 {
    let treasury = ledger::treasury(env, event_id);
    let leg = treasury.leg(asset);
    if !leg.generating {
        return 0;
    }

    let estimate = time_weighted_estimate(env, leg);
    match position_value(env, config, asset, leg.shares) {
        Some(value) => estimate.min((value - leg.principal).max(0)),
        None => estimate,
    }
}
