use soroban_sdk::{contracttype, Address, BytesN, String, Vec};

/// Selects thresholds, lock period and construction-time checks.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NetworkMode {
    Production,
    Test,
}

/// The two asset legs an event escrows.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Asset {
    /// Stable unit (USDC-like token)
    Stable,
    /// Tokenized native unit (Stellar asset contract)
    Native,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProtocolConfig {
    pub admin: Address,
    /// Relay allowed to submit attested result claims
    pub oracle: Address,
    /// Recipient of the platform fee
    pub platform: Address,
    pub stable_token: Address,
    pub native_token: Address,
    /// Participant identity registry (slot ownership)
    pub registry: Address,
    /// External money market used by the yield overlay
    pub yield_pool: Address,
    pub mode: NetworkMode,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EventStatus {
    Created,
    Started,
    Completed,
    Canceled,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CancelReason {
    /// Event has not been canceled
    NotCanceled,
    /// Creator canceled a Created or Started event
    Organizer,
    /// Registration closed below capacity
    QuorumNotMet,
}

/// Creation parameters. `tier_prices` and `tier_supplies` are parallel arrays.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EventParams {
    pub registration_start: u64,
    pub registration_end: u64,
    pub start: u64,
    pub end: u64,
    pub max_participants: u32,
    pub referee: Address,
    pub fee_stable: i128,
    pub fee_native: i128,
    pub yield_enabled: bool,
    pub tier_prices: Vec<i128>,
    pub tier_supplies: Vec<u32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Event {
    pub id: u64,
    pub creator: Address,
    pub referee: Address,
    pub registration_start: u64,
    pub registration_end: u64,
    pub start: u64,
    pub end: u64,
    pub max_participants: u32,
    pub participant_count: u32,
    pub fee_stable: i128,
    pub fee_native: i128,
    pub yield_enabled: bool,
    pub status: EventStatus,
    pub cancel_reason: CancelReason,
}

/// Shares in basis points. The platform fee is implicit.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributionConfig {
    pub athletes_bp: u32,
    pub organizer_bp: u32,
    pub charity_bp: u32,
    pub charity: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TicketTier {
    pub price: i128,
    pub supply: u32,
    pub sold: u32,
}

/// Escrowed amounts per event, the distribution base.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolBalance {
    pub stable: i128,
    pub native: i128,
    /// Realized yield over the event's lifetime
    pub stable_yield: i128,
    pub native_yield: i128,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TreasuryLeg {
    pub principal: i128,
    /// 0 until the leg is first supplied to the pool
    pub staking_start: u64,
    pub generating: bool,
    /// Claim on the escrow's pool position for this asset
    pub shares: i128,
    pub cumulative_yield: i128,
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TreasuryState {
    pub stable: TreasuryLeg,
    pub native: TreasuryLeg,
}

/// Attested result delivered by the oracle relay.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultClaim {
    pub event_id: u64,
    /// Ranked, first place at index 0
    pub winners: Vec<u32>,
    pub result_uri: String,
    pub timestamp: u64,
    pub attester: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetPayout {
    pub total: i128,
    pub athletes: i128,
    pub organizer: i128,
    pub charity: i128,
    pub platform: i128,
    pub per_winner: Vec<i128>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SettlementRecord {
    pub event_id: u64,
    pub claim_id: BytesN<32>,
    pub winners: Vec<u32>,
    pub stable: AssetPayout,
    pub native: AssetPayout,
    pub settled_at: u64,
}

#[contracttype]
pub enum DataKey {
    Config,
    NextEventId,
    Event(u64),
    Distribution(u64),
    Positions(u64),       // Vec<u32> weights, index 0 = first place
    Tiers(u64),           // Vec<TicketTier>
    Tickets(u64, Address), // u32
    Registered(u64, u32),
    Participants(u64),    // Vec<u32>
    Pool(u64),            // PoolBalance
    Treasury(u64),        // TreasuryState
    PoolShares(Asset),    // i128, shares issued against the escrow's pool position
    PoolResidual(Asset),  // i128, reserve no live share has a claim on
    Claim(BytesN<32>),
    Settlement(u64),
    Lock(u64),
}
