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
    /// Caller is not the owner
    NotOwner = 10,

    // ============================================
    // ARGUMENT ERRORS (20-29)
    // ============================================
    /// Amount or face value must be positive
    InvalidAmount = 20,
    /// Interest rate must be positive (or zero for zero-coupon)
    InvalidRate = 21,
    /// Maturity must be zero (perpetual) or in the future
    InvalidMaturity = 22,
    /// Token cannot be this contract, the asset or the payment token
    InvalidAddress = 23,
    /// Cash interest needs a receipt signer
    MissingSigner = 24,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// Payment frequency is NotPayable
    NotPayable = 30,
    /// Interest type does not support this payment path
    WrongInterestType = 31,
    /// Interest type is not Cash
    InterestTypeNotCash = 32,
    /// Token is not registered for payment in kind
    NotAllowedExchangeToken = 33,
    /// Token already registered for payment in kind
    TokenAlreadyRegistered = 34,

    // ============================================
    // TIMING ERRORS (40-49)
    // ============================================
    /// Next payable date not reached
    NotPayableYet = 40,
    /// Instrument matured, no further interest
    AlreadyMatured = 41,

    // ============================================
    // ALREADY DONE ERRORS (50-59)
    // ============================================
    /// Investor already paid for this period
    AlreadyPaid = 50,

    // ============================================
    // FUNDS ERRORS (60-69)
    // ============================================
    /// Contract balance below the payment
    InsufficientBalance = 60,
    /// Contract balance below the obligation to all holders
    InsufficientAggregateBalance = 61,

    // ============================================
    // SIGNATURE ERRORS (70-79)
    // ============================================
    /// Receipt signature not produced by the configured signer
    BadSignature = 70,

    // ============================================
    // NOT FOUND ERRORS (80-89)
    // ============================================
    /// Investor is unverified or holds nothing
    InvestorNotFound = 80,
    /// No verified holder to pay
    NoHolders = 81,
}
