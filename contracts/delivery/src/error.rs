use instrument_common::settlement::{Election, Shortfall};
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
    /// Caller is neither the owner nor a holder
    Unauthorized = 10,
    /// Only the owner may deliver against a signed receipt
    CallerNotOwner = 11,

    // ============================================
    // ARGUMENT ERRORS (20-29)
    // ============================================
    /// Amount must be positive
    ZeroAmount = 20,
    /// Receiver is the deliverer, or the token is this contract
    InvalidAddress = 21,
    /// Election must pick PhysicalOnly or CashOnly
    InvalidMode = 22,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// Delivery mode forbids this kind of settlement
    WrongMode = 30,
    /// Delivery mode is not electable (or was already elected)
    NotElectable = 31,
    /// No receipt signer configured
    SignerNotConfigured = 32,

    // ============================================
    // ALREADY DONE ERRORS (50-59)
    // ============================================
    /// Receiver already settled
    AlreadyDelivered = 50,

    // ============================================
    // FUNDS ERRORS (60-69)
    // ============================================
    /// Deliverer balance below amount
    InsufficientBalance = 60,
    /// Deliverer allowance to this contract below amount
    InsufficientAllowance = 61,

    // ============================================
    // SIGNATURE ERRORS (70-79)
    // ============================================
    /// Receipt signature not produced by the configured signer
    BadSignature = 70,

    // ============================================
    // NOT FOUND ERRORS (80-89)
    // ============================================
    /// Receiver holds none of the asset
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

impl From<Election> for Error {
    fn from(refusal: Election) -> Self {
        match refusal {
            Election::NotElectable => Error::NotElectable,
            Election::InvalidMode => Error::InvalidMode,
            Election::NotAParty => Error::Unauthorized,
        }
    }
}
