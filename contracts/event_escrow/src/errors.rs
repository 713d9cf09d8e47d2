use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Validation: malformed input, rejected before any state change
    InvalidTimeRange = 1,
    ZeroMaxParticipants = 2,
    NoFeeConfigured = 3,
    InvalidAmount = 4,
    InvalidShareSum = 5,
    InvalidPositionWeights = 6,
    TierLengthMismatch = 7,
    InvalidTier = 8,
    TooManyWinners = 9,
    InvalidWinners = 10,
    WinnerNotRegistered = 11,
    AssetNotAccepted = 12,
    UnknownParticipant = 13,
    MathOverflow = 14,

    // State: wrong lifecycle phase or time window
    NotInitialized = 20,
    AlreadyInitialized = 21,
    EventNotFound = 22,
    EventNotOpen = 23,
    EventNotStarted = 24,
    EventFinalized = 25,
    RegistrationNotOpen = 26,
    RegistrationClosed = 27,
    AlreadyRegistered = 28,
    EventFull = 29,
    TooEarly = 30,
    EventEnded = 31,
    TierSoldOut = 32,
    DistributionUnset = 33,
    YieldNotEnabled = 34,
    YieldAlreadyActive = 35,
    YieldNotActive = 36,
    BelowYieldThreshold = 37,
    LockPeriodActive = 38,
    ReentrantCall = 39,

    // Authorization
    Unauthorized = 50,
    NotParticipantOwner = 51,
    AttesterMismatch = 52,

    // Idempotency
    ClaimAlreadyProcessed = 60,

    // External dependency failures
    PaymentFailed = 70,
    YieldPoolFailure = 71,
    YieldPoolUnavailable = 72,
    RegistryFailure = 73,
}

/// Coarse error classes. Only `ExternalDependency` failures come from a
/// collaborator; everything else is decided locally before any effect.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Validation,
    State,
    Authorization,
    Idempotency,
    ExternalDependency,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match *self as u32 {
            1..=19 => ErrorKind::Validation,
            20..=49 => ErrorKind::State,
            50..=59 => ErrorKind::Authorization,
            60 => ErrorKind::Idempotency,
            _ => ErrorKind::ExternalDependency,
        }
    }
}
