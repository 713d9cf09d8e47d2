//! Distribution Calculator.
//!
//! Splits a pooled amount into athlete, organizer, charity and platform
//! portions, then splits the athlete portion across ranked winners by
//! position weight. Every division floors; the remainder stays in escrow.

use soroban_sdk::{Env, Vec};

use crate::config::{BASIS_POINTS, MAX_SHARES_BP, PLATFORM_FEE_BP};
use crate::errors::Error;
use crate::types::{AssetPayout, DistributionConfig};

/// Checks the share configuration and position table accepted at creation
/// or through an update.
pub fn validate(config: &DistributionConfig, weights: &Vec<u32>) -> Result<(), Error> {
    let shares = config
        .athletes_bp
        .checked_add(config.organizer_bp)
        .and_then(|s| s.checked_add(config.charity_bp))
        .ok_or(Error::InvalidShareSum)?;
    if shares != MAX_SHARES_BP {
        return Err(Error::InvalidShareSum);
    }

    let mut weight_sum: u32 = 0;
    for weight in weights.iter() {
        weight_sum = weight_sum
            .checked_add(weight)
            .ok_or(Error::InvalidPositionWeights)?;
    }
    if weight_sum != BASIS_POINTS {
        return Err(Error::InvalidPositionWeights);
    }

    Ok(())
}

fn portion(amount: i128, bp: u32) -> Result<i128, Error> {
    amount
        .checked_mul(bp as i128)
        .map(|v| v / BASIS_POINTS as i128)
        .ok_or(Error::MathOverflow)
}

/// Computes the payout plan for `total` among `winner_count` ranked winners.
pub fn split(
    env: &Env,
    total: i128,
    config: &DistributionConfig,
    winner_count: u32,
    weights: &Vec<u32>,
) -> Result<AssetPayout, Error> {
    if config.athletes_bp == 0 {
        return Err(Error::DistributionUnset);
    }
    if winner_count > weights.len() {
        return Err(Error::TooManyWinners);
    }
    if total < 0 {
        return Err(Error::InvalidAmount);
    }

    let athletes = portion(total, config.athletes_bp)?;
    let organizer = portion(total, config.organizer_bp)?;
    let charity = portion(total, config.charity_bp)?;
    let platform = portion(total, PLATFORM_FEE_BP)?;

    let mut per_winner = Vec::new(env);
    for i in 0..winner_count {
        let weight = weights.get(i).ok_or(Error::TooManyWinners)?;
        per_winner.push_back(portion(athletes, weight)?);
    }

    Ok(AssetPayout {
        total,
        athletes,
        organizer,
        charity,
        platform,
        per_winner,
    })
}

impl AssetPayout {
    pub fn empty(env: &Env) -> Self {
        AssetPayout {
            total: 0,
            athletes: 0,
            organizer: 0,
            charity: 0,
            platform: 0,
            per_winner: Vec::new(env),
        }
    }

    /// Sum of everything actually paid out; never exceeds `total`.
    pub fn distributed(&self) -> i128 {
        let winners: i128 = self.per_winner.iter().sum();
        winners + self.organizer + self.charity + self.platform
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{testutils::Address as _, vec, Address};

    fn config(env: &Env, athletes: u32, organizer: u32, charity: u32) -> DistributionConfig {
        DistributionConfig {
            athletes_bp: athletes,
            organizer_bp: organizer,
            charity_bp: charity,
            charity: Address::generate(env),
        }
    }

    #[test]
    fn test_split_reference_scenario() {
        let env = Env::default();
        let cfg = config(&env, 6000, 3000, 700);
        let weights = vec![&env, 10_000u32];

        let payout = split(&env, 200, &cfg, 1, &weights).unwrap();
        assert_eq!(payout.athletes, 120);
        assert_eq!(payout.organizer, 60);
        assert_eq!(payout.charity, 14);
        assert_eq!(payout.platform, 6);
        assert_eq!(payout.per_winner, vec![&env, 120i128]);
        assert_eq!(payout.distributed(), 200);
    }

    #[test]
    fn test_split_leaves_rounding_dust() {
        let env = Env::default();
        let cfg = config(&env, 6000, 3000, 700);
        let weights = vec![&env, 5_000u32, 3_000, 2_000];

        let payout = split(&env, 333, &cfg, 3, &weights).unwrap();
        // 333 * 6000 / 10000 = 199 (199.8 floored)
        assert_eq!(payout.athletes, 199);
        assert_eq!(payout.organizer, 99);
        assert_eq!(payout.charity, 23);
        assert_eq!(payout.platform, 9);
        // 99.5, 59.7, 39.8 floored
        assert_eq!(payout.per_winner, vec![&env, 99i128, 59, 39]);
        assert_eq!(payout.distributed(), 99 + 59 + 39 + 99 + 23 + 9);
        assert!(payout.distributed() < payout.total);
    }

    #[test]
    fn test_split_conserves_value() {
        let env = Env::default();
        let weights = vec![&env, 4_000u32, 3_500, 1_500, 1_000];
        let configs = [
            config(&env, 6000, 3000, 700),
            config(&env, 9700, 0, 0),
            config(&env, 1, 9698, 1),
            config(&env, 3333, 3333, 3034),
        ];

        for cfg in configs.iter() {
            let mut total: i128 = 0;
            while total < 50_000 {
                for winners in 1..=4u32 {
                    let payout = split(&env, total, cfg, winners, &weights).unwrap();
                    assert!(
                        payout.athletes + payout.organizer + payout.charity + payout.platform
                            <= total
                    );
                    assert!(payout.distributed() <= total);
                }
                total = total * 3 + 7;
            }
        }
    }

    #[test]
    fn test_split_rejects_more_winners_than_positions() {
        let env = Env::default();
        let cfg = config(&env, 6000, 3000, 700);
        let weights = vec![&env, 7_000u32, 3_000];

        assert_eq!(split(&env, 1_000, &cfg, 3, &weights), Err(Error::TooManyWinners));
    }

    #[test]
    fn test_split_requires_configured_athlete_share() {
        let env = Env::default();
        let cfg = config(&env, 0, 9000, 700);
        let weights = vec![&env, 10_000u32];

        assert_eq!(split(&env, 1_000, &cfg, 1, &weights), Err(Error::DistributionUnset));
    }

    #[test]
    fn test_validate_share_and_weight_sums() {
        let env = Env::default();
        let weights = vec![&env, 6_000u32, 4_000];

        assert_eq!(validate(&config(&env, 6000, 3000, 700), &weights), Ok(()));
        assert_eq!(
            validate(&config(&env, 6000, 3000, 1000), &weights),
            Err(Error::InvalidShareSum)
        );
        assert_eq!(
            validate(&config(&env, 6000, 3000, 600), &weights),
            Err(Error::InvalidShareSum)
        );
        assert_eq!(
            validate(&config(&env, u32::MAX, 3000, 700), &weights),
            Err(Error::InvalidShareSum)
        );
        assert_eq!(
            validate(&config(&env, 6000, 3000, 700), &vec![&env, 6_000u32, 3_999]),
            Err(Error::InvalidPositionWeights)
        );
        assert_eq!(
            validate(&config(&env, 6000, 3000, 700), &Vec::new(&env)),
            Err(Error::InvalidPositionWeights)
        );
    }
}
