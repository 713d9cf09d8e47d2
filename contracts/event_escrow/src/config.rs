use soroban_sdk::Env;

use crate::errors::Error;
use crate::storage;
use crate::types::{Asset, DataKey, NetworkMode, ProtocolConfig};

pub const BASIS_POINTS: u32 = 10_000;
pub const PLATFORM_FEE_BP: u32 = 300;
/// Shares configurable by the organizer: everything except the platform fee.
pub const MAX_SHARES_BP: u32 = BASIS_POINTS - PLATFORM_FEE_BP;

/// Time-weighted fallback APY used by the yield estimate.
pub const BASE_APY_BP: i128 = 500;
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const DAYS_PER_YEAR: i128 = 365;

const PRODUCTION_MIN_STABLE: i128 = 1_000_000_000; // 1,000 units @ 6 decimals
const PRODUCTION_MIN_NATIVE: i128 = 10_000_000_000; // 1,000 units @ 7 decimals
const PRODUCTION_LOCK_PERIOD: u64 = 7 * SECONDS_PER_DAY;

const TEST_MIN_STABLE: i128 = 100;
const TEST_MIN_NATIVE: i128 = 100;
const TEST_LOCK_PERIOD: u64 = 3_600;

pub fn min_treasury(mode: NetworkMode, asset: Asset) -> i128 {
    match (mode, asset) {
        (NetworkMode::Production, Asset::Stable) => PRODUCTION_MIN_STABLE,
        (NetworkMode::Production, Asset::Native) => PRODUCTION_MIN_NATIVE,
        (NetworkMode::Test, Asset::Stable) => TEST_MIN_STABLE,
        (NetworkMode::Test, Asset::Native) => TEST_MIN_NATIVE,
    }
}

pub fn min_lock_period(mode: NetworkMode) -> u64 {
    match mode {
        NetworkMode::Production => PRODUCTION_LOCK_PERIOD,
        NetworkMode::Test => TEST_LOCK_PERIOD,
    }
}

pub fn load(env: &Env) -> Result<ProtocolConfig, Error> {
    storage::instance_get(env, &DataKey::Config).ok_or(Error::NotInitialized)
}

impl ProtocolConfig {
    pub fn token(&self, asset: Asset) -> &soroban_sdk::Address {
        match asset {
            Asset::Stable => &self.stable_token,
            Asset::Native => &self.native_token,
        }
    }
}
