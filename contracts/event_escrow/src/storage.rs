use soroban_sdk::{Env, IntoVal, TryFromVal, Val};

use crate::types::DataKey;

const LEDGER_THRESHOLD_SHARED: u32 = 518_400; // ~30 days @ 5s/ledger
const LEDGER_BUMP_SHARED: u32 = 1_036_800; // ~60 days @ 5s/ledger

pub fn instance_get<V: TryFromVal<Env, Val>>(env: &Env, key: &DataKey) -> Option<V> {
    env.storage().instance().get(key)
}

pub fn instance_set<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().instance().set(key, value);
}

pub fn get<V: TryFromVal<Env, Val>>(env: &Env, key: &DataKey) -> Option<V> {
    env.storage().persistent().get(key)
}

pub fn has(env: &Env, key: &DataKey) -> bool {
    env.storage().persistent().has(key)
}

/// Writes a persistent entry and keeps it alive.
pub fn set<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    let storage = env.storage().persistent();
    storage.set(key, value);
    storage.extend_ttl(key, LEDGER_THRESHOLD_SHARED, LEDGER_BUMP_SHARED);
}

pub fn remove(env: &Env, key: &DataKey) {
    env.storage().persistent().remove(key);
}
