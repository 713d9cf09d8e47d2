#![cfg(test)]

//! Stand-ins for the identity registry and the money market.

use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env};

#[contracttype]
pub enum RegistryKey {
    NextId,
    Supply,
    Owner(u32),
}

#[contract]
pub struct MockRegistry;

#[contractimpl]
impl MockRegistry {
    /// Mints the next participant slot to `to`, ids start at 1.
    pub fn mint(env: Env, to: Address) -> u32 {
        let storage = env.storage().instance();
        let id: u32 = storage.get(&RegistryKey::NextId).unwrap_or(0) + 1;
        let supply: u32 = storage.get(&RegistryKey::Supply).unwrap_or(0);
        storage.set(&RegistryKey::NextId, &id);
        storage.set(&RegistryKey::Supply, &(supply + 1));
        storage.set(&RegistryKey::Owner(id), &to);
        id
    }

    pub fn transfer(env: Env, participant_id: u32, to: Address) {
        env.storage().instance().set(&RegistryKey::Owner(participant_id), &to);
    }

    /// Drops a slot; later ids keep their numbers.
    pub fn burn(env: Env, participant_id: u32) {
        env.storage().instance().remove(&RegistryKey::Owner(participant_id));
        let supply: u32 = env.storage().instance().get(&RegistryKey::Supply).unwrap_or(0);
        env.storage().instance().set(&RegistryKey::Supply, &supply.saturating_sub(1));
    }

    pub fn owner_of(env: Env, participant_id: u32) -> Address {
        env.storage()
            .instance()
            .get(&RegistryKey::Owner(participant_id))
            .expect("Unknown participant")
    }

    pub fn total_supply(env: Env) -> u32 {
        env.storage().instance().get(&RegistryKey::Supply).unwrap_or(0)
    }
}

#[contracttype]
pub enum PoolKey {
    Balance(Address, Address),
    Failing,
}

#[contract]
pub struct MockYieldPool;

#[contractimpl]
impl MockYieldPool {
    pub fn supply(env: Env, depositor: Address, asset: Address, amount: i128) {
        depositor.require_auth();
        if Self::is_failing(&env) {
            panic!("Supply disabled");
        }
        let key = PoolKey::Balance(depositor, asset);
        let balance: i128 = env.storage().instance().get(&key).unwrap_or(0);
        env.storage().instance().set(&key, &(balance + amount));
    }

    pub fn withdraw(env: Env, owner: Address, asset: Address, amount: i128) -> i128 {
        owner.require_auth();
        if Self::is_failing(&env) {
            panic!("Withdraw disabled");
        }
        let key = PoolKey::Balance(owner.clone(), asset.clone());
        let balance: i128 = env.storage().instance().get(&key).unwrap_or(0);
        let out = amount.min(balance);
        env.storage().instance().set(&key, &(balance - out));

        token::Client::new(&env, &asset).transfer(&env.current_contract_address(), &owner, &out);
        out
    }

    pub fn reserve_balance(env: Env, owner: Address, asset: Address) -> i128 {
        env.storage()
            .instance()
            .get(&PoolKey::Balance(owner, asset))
            .unwrap_or(0)
    }

    /// Books interest for `owner`; the test mints the matching tokens.
    pub fn accrue(env: Env, owner: Address, asset: Address, amount: i128) {
        let key = PoolKey::Balance(owner, asset);
        let balance: i128 = env.storage().instance().get(&key).unwrap_or(0);
        env.storage().instance().set(&key, &(balance + amount));
    }

    pub fn set_failing(env: Env, failing: bool) {
        env.storage().instance().set(&PoolKey::Failing, &failing);
    }
}

impl MockYieldPool {
    fn is_failing(env: &Env) -> bool {
        env.storage().instance().get(&PoolKey::Failing).unwrap_or(false)
    }
}

pub use token_mock::{MockToken, MockTokenClient, TokenKey};

mod token_mock {
    use soroban_sdk::{contract, contractimpl, contracttype, Address, Env};

    #[contracttype]
    pub enum TokenKey {
        Balance(Address),
        Blocked(Address),
    }

    /// Token whose transfers to a blocked recipient fail.
    #[contract]
    pub struct MockToken;

    #[contractimpl]
    impl MockToken {
        pub fn mint(env: Env, to: Address, amount: i128) {
            let balance = Self::balance(env.clone(), to.clone());
            env.storage().instance().set(&TokenKey::Balance(to), &(balance + amount));
        }

        pub fn balance(env: Env, id: Address) -> i128 {
            env.storage().instance().get(&TokenKey::Balance(id)).unwrap_or(0)
        }

        pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
            from.require_auth();
            let blocked: bool = env
                .storage()
                .instance()
                .get(&TokenKey::Blocked(to.clone()))
                .unwrap_or(false);
            if blocked {
                panic!("Recipient blocked");
            }

            let from_balance = Self::balance(env.clone(), from.clone());
            if from_balance < amount {
                panic!("Insufficient balance");
            }
            let to_balance = Self::balance(env.clone(), to.clone());
            env.storage().instance().set(&TokenKey::Balance(from), &(from_balance - amount));
            env.storage().instance().set(&TokenKey::Balance(to), &(to_balance + amount));
        }

        pub fn set_blocked(env: Env, id: Address, blocked: bool) {
            env.storage().instance().set(&TokenKey::Blocked(id), &blocked);
        }
    }
}
