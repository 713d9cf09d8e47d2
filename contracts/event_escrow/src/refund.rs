//! Pro-rata refunds on cancellation.
//!
//! Each asset's pooled total is divided evenly among registered
//! participants. The division floors; the remainder stays in the pool.
//! Refunds carry no platform fee.

use soroban_sdk::{Address, Env, Vec};

use crate::errors::Error;
use crate::events;
use crate::interfaces;
use crate::ledger;
use crate::lifecycle;
use crate::types::{Asset, Event, ProtocolConfig};

pub fn refund_per_participant(pooled: i128, participant_count: u32) -> i128 {
    if participant_count == 0 || pooled <= 0 {
        return 0;
    }
    pooled / participant_count as i128
}

/// Refunds every registered participant and returns how many were paid.
pub fn refund_all(env: &Env, config: &ProtocolConfig, event: &Event) -> Result<u32, Error> {
    let ids = lifecycle::participants(env, event.id);
    let count = ids.len();
    if count == 0 {
        return Ok(0);
    }

    let mut recipients: Vec<Address> = Vec::new(env);
    for participant_id in ids.iter() {
        recipients.push_back(interfaces::owner_of(env, &config.registry, participant_id)?);
    }

    let mut pool = ledger::pool(env, event.id);
    let mut shares = [(Asset::Stable, 0i128), (Asset::Native, 0i128)];
    for (asset, share) in shares.iter_mut() {
        let pooled = pool.amount(*asset);
        *share = refund_per_participant(pooled, count);
        pool.set_amount(*asset, pooled - *share * count as i128);
    }
    ledger::save_pool(env, event.id, &pool);
    ledger::save_treasury(env, event.id, &Default::default());

    for (asset, share) in shares.iter() {
        if *share == 0 {
            continue;
        }
        for (participant_id, recipient) in ids.iter().zip(recipients.iter()) {
            interfaces::pay(env, config.token(*asset), &recipient, *share)?;
            events::refunded(env, event.id, participant_id, *asset, *share);
        }
    }

    Ok(count)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_refund_per_participant_floors() {
        assert_eq!(refund_per_participant(100, 1), 100);
        assert_eq!(refund_per_participant(100, 3), 33);
        assert_eq!(refund_per_participant(0, 3), 0);
        assert_eq!(refund_per_participant(100, 0), 0);
    }

    #[test]
    fn test_refund_conservation() {
        let mut pooled: i128 = 1;
        while pooled < 10_000_000 {
            for count in 1..=17u32 {
                let each = refund_per_participant(pooled, count);
                assert!(each * (count as i128) <= pooled);
                assert!(pooled - each * (count as i128) < (count as i128));
            }
            pooled = pooled * 7 + 3;
        }
    }
}
