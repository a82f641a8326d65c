use instrument_common::settlement::{Election, Repricing, Shortfall};
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-9)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Only the owner may settle or change the terms
    CallerNotOwner = 10,
    /// Caller is neither the owner nor a holder
    Unauthorized = 11,

    // ============================================
    // ARGUMENT ERRORS (20-29)
    // ============================================
    /// Settlement amount overflowed
    InvalidAmount = 20,
    /// Receiver is the owner, or the token is this contract or the asset
    InvalidAddress = 21,
    /// Election must pick PhysicalOnly or CashOnly
    InvalidMode = 22,
    /// Expiration must be in the future
    InvalidExpiration = 23,
    /// Strike and contract size must be positive, spot non-negative
    InvalidEconomics = 24,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// Delivery mode forbids this kind of settlement
    WrongMode = 30,
    /// Delivery mode is not electable (or was already elected)
    NotElectable = 31,
    /// No receipt signer configured
    SignerNotConfigured = 32,
    /// Standardized terms cannot be renegotiated
    StandardizedTerms = 33,
    /// Spot fixed by the first cash settlement
    SpotFrozen = 34,

    // ============================================
    // TIMING ERRORS (40-49)
    // ============================================
    /// Settlement before expiration
    FutureNotExpired = 40,
    /// Terms frozen at expiration
    FutureExpired = 41,

    // ============================================
    // ALREADY DONE ERRORS (50-59)
    // ============================================
    /// Receiver already settled
    AlreadyDelivered = 50,

    // ============================================
    // FUNDS ERRORS (60-69)
    // ============================================
    /// Paying side holds too little
    InsufficientBalance = 60,
    /// Paying side approved this contract for too little
    InsufficientAllowance = 61,

    // ============================================
    // SIGNATURE ERRORS (70-79)
    // ============================================
    /// Receipt signature not produced by the configured signer
    BadSignature = 70,

    // ============================================
    // NOT FOUND ERRORS (80-89)
    // ============================================
    /// Receiver holds no contracts
    ReceiverNotHolder = 80,
}

impl From<Shortfall> for Error {
    fn from(shortfall: Shortfall) -> Self {
        match shortfall {
            Shortfall::Balance => Error::InsufficientBalance,
            Shortfall::Allowance => Error::InsufficientAllowance,
        }
    }
}

impl From<Repricing> for Error {
    fn from(refusal: Repricing) -> Self {
        match refusal {
            Repricing::Standardized => Error::StandardizedTerms,
            Repricing::Expired => Error::FutureExpired,
            Repricing::InvalidPrice => Error::InvalidEconomics,
            Repricing::SpotFrozen => Error::SpotFrozen,
        }
    }
}

impl From<Election> for Error {
    fn from(refusal: Election) -> Self {
        match refusal {
            Election::NotElectable => Error::NotElectable,
            Election::InvalidMode => Error::InvalidMode,
            Election::NotAParty => Error::Unauthorized,
        }
    }
}
