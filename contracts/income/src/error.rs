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
    /// Amount or dividend out of range
    InvalidAmount = 20,
    /// Income rate must be positive
    InvalidRate = 21,
    /// Maturity must be zero (perpetual) or in the future
    InvalidMaturity = 22,
    /// Participating income needs a non-zero dividend
    MissingDividend = 23,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// Payment frequency is NotPayable
    NotPayable = 30,
    /// Income type is not cumulative
    NotCumulative = 31,

    // ============================================
    // TIMING ERRORS (40-49)
    // ============================================
    /// Next payable date not reached
    NotPayableYet = 40,
    /// Instrument matured, no further income
    AlreadyMatured = 41,
    /// Requested period has not started
    PeriodNotReached = 42,

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
    // NOT FOUND ERRORS (80-89)
    // ============================================
    /// Investor is unverified or holds nothing
    InvestorNotFound = 80,
    /// No verified holder to pay
    NoHolders = 81,
}
