use soroban_sdk::Env;

use crate::errors::Error;
use crate::types::DataKey;

/// Per-event mutual exclusion held for the duration of an entry point that
/// mutates escrow state and calls out to a token, the registry or the pool.
pub struct EventLock<'a> {
    env: &'a Env,
    event_id: u64,
}

impl<'a> EventLock<'a> {
    pub fn acquire(env: &'a Env, event_id: u64) -> Result<Self, Error> {
        let key = DataKey::Lock(event_id);
        let storage = env.storage().temporary();
        if storage.has(&key) {
            return Err(Error::ReentrantCall);
        }
        storage.set(&key, &true);
        Ok(EventLock { env, event_id })
    }
}

impl Drop for EventLock<'_> {
    fn drop(&mut self) {
        self.env
            .storage()
            .temporary()
            .remove(&DataKey::Lock(self.event_id));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::EventEscrow;

    #[test]
    fn test_lock_rejects_reentry_until_dropped() {
        let env = Env::default();
        let contract_id = env.register_contract(None, EventEscrow);

        env.as_contract(&contract_id, || {
            let lock = EventLock::acquire(&env, 7).unwrap();
            assert_eq!(EventLock::acquire(&env, 7).err(), Some(Error::ReentrantCall));
            // other events are independent
            let other = EventLock::acquire(&env, 8).unwrap();
            drop(other);
            drop(lock);
            assert!(EventLock::acquire(&env, 7).is_ok());
        });
    }
}
