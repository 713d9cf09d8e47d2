#![no_std]

//! Event escrow and settlement.
//!
//! Organizers create competitive events funded by registration fees, ticket
//! sales and sponsorship. Funds sit in escrow per event and asset, may earn
//! yield in an external money market, and are released only when the oracle
//! relay submits the referee's attested result (or refunded on cancellation).

use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, Vec};

mod access;
mod config;
mod distribution;
mod errors;
mod events;
mod guard;
mod interfaces;
mod ledger;
mod lifecycle;
mod refund;
mod settlement;
mod storage;
mod types;
mod yield_overlay;

#[cfg(test)]
mod mock;

pub use errors::{Error, ErrorKind};
pub use interfaces::{IdentityRegistryClient, YieldPoolClient};
pub use types::{
    Asset, AssetPayout, CancelReason, DataKey, DistributionConfig, Event, EventParams,
    EventStatus, NetworkMode, PoolBalance, ProtocolConfig, ResultClaim, SettlementRecord,
    TicketTier, TreasuryLeg, TreasuryState,
};

use guard::EventLock;

#[contract]
pub struct EventEscrow;

#[contractimpl]
impl EventEscrow {
    // ───────────── INITIALIZATION ─────────────

    /// Initialize the escrow with its collaborators and network mode.
    ///
    /// In production mode the yield pool is queried once so a misconfigured
    /// pool address fails here instead of at the first stake.
    pub fn initialize(env: Env, config: ProtocolConfig) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Config) {
            return Err(Error::AlreadyInitialized);
        }
        config.admin.require_auth();

        if config.mode == NetworkMode::Production {
            let pool = YieldPoolClient::new(&env, &config.yield_pool);
            if !matches!(
                pool.try_reserve_balance(&env.current_contract_address(), &config.stable_token),
                Ok(Ok(_))
            ) {
                return Err(Error::YieldPoolUnavailable);
            }
        }

        storage::instance_set(&env, &DataKey::Config, &config);
        storage::instance_set(&env, &DataKey::NextEventId, &1u64);
        Ok(())
    }

    // ───────────── EVENT LIFECYCLE ─────────────

    /// Create an event and return its id.
    ///
    /// # Errors
    /// - `InvalidTimeRange`: registration window, start and end out of order
    /// - `ZeroMaxParticipants`, `NoFeeConfigured`, `TierLengthMismatch`
    /// - `InvalidShareSum`: shares do not add up to 9,700 bp
    /// - `InvalidPositionWeights`: position weights do not add up to 10,000 bp
    pub fn create_event(
        env: Env,
        creator: Address,
        params: EventParams,
        distribution: DistributionConfig,
        weights: Vec<u32>,
    ) -> Result<u64, Error> {
        config::load(&env)?;
        lifecycle::create(&env, creator, params, distribution, weights)
    }

    /// Replace the distribution and position table before settlement.
    pub fn update_distribution(
        env: Env,
        caller: Address,
        event_id: u64,
        distribution: DistributionConfig,
        weights: Vec<u32>,
    ) -> Result<(), Error> {
        lifecycle::update_distribution(&env, &caller, event_id, distribution, weights)
    }

    /// Register a participant slot owned by `owner`, paying the fee in `asset`.
    pub fn register(
        env: Env,
        owner: Address,
        event_id: u64,
        participant_id: u32,
        asset: Asset,
    ) -> Result<(), Error> {
        let config = config::load(&env)?;
        let _lock = EventLock::acquire(&env, event_id)?;
        lifecycle::register(&env, &config, &owner, event_id, participant_id, asset)
    }

    /// Buy one ticket of `tier`; returns the buyer's ticket count.
    pub fn buy_ticket(env: Env, buyer: Address, event_id: u64, tier: u32) -> Result<u32, Error> {
        let config = config::load(&env)?;
        let _lock = EventLock::acquire(&env, event_id)?;
        lifecycle::buy_ticket(&env, &config, &buyer, event_id, tier)
    }

    pub fn sponsor(
        env: Env,
        sponsor: Address,
        event_id: u64,
        asset: Asset,
        amount: i128,
    ) -> Result<(), Error> {
        let config = config::load(&env)?;
        let _lock = EventLock::acquire(&env, event_id)?;
        lifecycle::sponsor(&env, &config, &sponsor, event_id, asset, amount)
    }

    pub fn start_event(env: Env, caller: Address, event_id: u64) -> Result<(), Error> {
        lifecycle::start(&env, &caller, event_id)
    }

    /// Cancel and refund. The creator may cancel any open event; anyone may
    /// cancel once registration closed below capacity.
    pub fn cancel_event(env: Env, caller: Address, event_id: u64) -> Result<CancelReason, Error> {
        let config = config::load(&env)?;
        let _lock = EventLock::acquire(&env, event_id)?;
        lifecycle::cancel(&env, &config, &caller, event_id)
    }

    // ───────────── SETTLEMENT ─────────────

    /// Settle an event from an attested result claim. Each claim id settles
    /// at most once.
    pub fn settle(
        env: Env,
        relay: Address,
        claim_id: BytesN<32>,
        claim: ResultClaim,
    ) -> Result<SettlementRecord, Error> {
        let config = config::load(&env)?;
        let _lock = EventLock::acquire(&env, claim.event_id)?;
        settlement::settle(&env, &config, &relay, claim_id, claim)
    }

    // ───────────── YIELD ─────────────

    /// Supply an event leg's principal to the yield pool.
    pub fn enable_yield(env: Env, caller: Address, event_id: u64, asset: Asset) -> Result<i128, Error> {
        let config = config::load(&env)?;
        let _lock = EventLock::acquire(&env, event_id)?;
        let event = lifecycle::load(&env, event_id)?;
        access::require_creator(&event, &caller)?;
        event.require_open()?;
        yield_overlay::enable(&env, &config, &event, asset)
    }

    /// Withdraw principal and yield once the lock period has passed.
    pub fn withdraw_yield(env: Env, caller: Address, event_id: u64, asset: Asset) -> Result<i128, Error> {
        let config = config::load(&env)?;
        let _lock = EventLock::acquire(&env, event_id)?;
        let event = lifecycle::load(&env, event_id)?;
        access::require_operator(&config, &event, &caller)?;
        yield_overlay::withdraw(&env, &config, event_id, asset, true)
    }

    /// Admin-only unwind of the generating legs regardless of lock period.
    /// Accrued yield is left in the pool.
    pub fn emergency_withdraw(env: Env, admin: Address, event_id: u64) -> Result<(i128, i128), Error> {
        let config = config::load(&env)?;
        access::require_admin(&config, &admin)?;
        let _lock = EventLock::acquire(&env, event_id)?;
        lifecycle::load(&env, event_id)?;
        yield_overlay::emergency_withdraw(&env, &config, event_id)
    }

    // ───────────── VIEW FUNCTIONS ─────────────

    pub fn get_config(env: Env) -> Result<ProtocolConfig, Error> {
        config::load(&env)
    }

    pub fn event_count(env: Env) -> u64 {
        storage::instance_get::<u64>(&env, &DataKey::NextEventId).unwrap_or(1) - 1
    }

    pub fn get_event(env: Env, event_id: u64) -> Result<Event, Error> {
        lifecycle::load(&env, event_id)
    }

    pub fn get_distribution(env: Env, event_id: u64) -> Option<DistributionConfig> {
        storage::get(&env, &DataKey::Distribution(event_id))
    }

    pub fn get_position_weights(env: Env, event_id: u64) -> Vec<u32> {
        storage::get(&env, &DataKey::Positions(event_id)).unwrap_or(Vec::new(&env))
    }

    pub fn get_tiers(env: Env, event_id: u64) -> Vec<TicketTier> {
        storage::get(&env, &DataKey::Tiers(event_id)).unwrap_or(Vec::new(&env))
    }

    pub fn tickets_of(env: Env, event_id: u64, holder: Address) -> u32 {
        storage::get(&env, &DataKey::Tickets(event_id, holder)).unwrap_or(0)
    }

    /// Escrowed amounts per asset: the distribution base.
    pub fn get_pool(env: Env, event_id: u64) -> PoolBalance {
        ledger::pool(&env, event_id)
    }

    pub fn get_treasury(env: Env, event_id: u64) -> Option<TreasuryState> {
        storage::get(&env, &DataKey::Treasury(event_id))
    }

    pub fn is_registered(env: Env, event_id: u64, participant_id: u32) -> bool {
        lifecycle::is_registered(&env, event_id, participant_id)
    }

    pub fn get_participants(env: Env, event_id: u64) -> Vec<u32> {
        lifecycle::participants(&env, event_id)
    }

    pub fn should_auto_cancel(env: Env, event_id: u64) -> Result<bool, Error> {
        let event = lifecycle::load(&env, event_id)?;
        Ok(lifecycle::should_auto_cancel(&env, &event))
    }

    pub fn estimated_yield(env: Env, event_id: u64, asset: Asset) -> Result<i128, Error> {
        let config = config::load(&env)?;
        Ok(yield_overlay::estimated_yield(&env, &config, event_id, asset))
    }

    pub fn is_claim_processed(env: Env, claim_id: BytesN<32>) -> bool {
        settlement::is_processed(&env, &claim_id)
    }

    pub fn get_settlement(env: Env, event_id: u64) -> Option<SettlementRecord> {
        storage::get(&env, &DataKey::Settlement(event_id))
    }
}
