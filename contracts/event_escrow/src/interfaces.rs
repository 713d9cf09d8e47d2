//! Boundaries to the contracts the escrow does not own: the participant
//! identity registry, the yield-bearing money market and the token rail.

use soroban_sdk::{contractclient, token, Address, Env};

use crate::errors::Error;

#[allow(dead_code)]
#[contractclient(name = "IdentityRegistryClient")]
pub trait IdentityRegistry {
    fn owner_of(env: Env, participant_id: u32) -> Address;
    fn total_supply(env: Env) -> u32;
}

#[allow(dead_code)]
#[contractclient(name = "YieldPoolClient")]
pub trait YieldPool {
    /// Credits `amount` of `asset` already transferred to the pool to `depositor`.
    fn supply(env: Env, depositor: Address, asset: Address, amount: i128);
    /// Sends up to `amount` back to `owner`, returning what was sent.
    fn withdraw(env: Env, owner: Address, asset: Address, amount: i128) -> i128;
    /// Principal plus accrued interest held for `owner`.
    fn reserve_balance(env: Env, owner: Address, asset: Address) -> i128;
}

/// Resolves the current owner of a participant slot. Ids need not be dense;
/// `total_supply` only tells a missing slot apart from an unreachable registry.
pub fn owner_of(env: &Env, registry: &Address, participant_id: u32) -> Result<Address, Error> {
    let client = IdentityRegistryClient::new(env, registry);
    if let Ok(Ok(owner)) = client.try_owner_of(&participant_id) {
        return Ok(owner);
    }
    match client.try_total_supply() {
        Ok(Ok(_)) => Err(Error::UnknownParticipant),
        _ => Err(Error::RegistryFailure),
    }
}

/// Payment rail: moves `amount` of `token` out of the escrow. Any failure
/// aborts the enclosing operation.
pub fn pay(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    let client = token::Client::new(env, token);
    match client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::PaymentFailed),
    }
}

/// Pulls `amount` of `token` from `from` into the escrow.
pub fn collect(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), Error> {
    let client = token::Client::new(env, token);
    match client.try_transfer(from, &env.current_contract_address(), &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::PaymentFailed),
    }
}
