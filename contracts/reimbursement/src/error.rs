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
    /// Amount, face value or dividend out of range
    InvalidAmount = 20,
    /// Interest rate must be positive
    InvalidRate = 21,
    /// Maturity must be in the future, or zero for a perpetual instrument
    InvalidMaturity = 22,
    /// Numerator or denominator zero, or inconsistent with the periodic rate
    InvalidSchedule = 23,
    /// Put window must satisfy deployment <= start < end <= maturity
    InvalidPutPeriod = 24,
    /// Amortization needs a payable frequency
    InvalidFrequency = 25,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// Instrument is not amortizable
    NotAmortizable = 30,
    /// Interest rate is not variable
    NotVariableRate = 31,
    /// Instrument has no put option
    NotPuttable = 32,
    /// Instrument cannot be called
    NotCallable = 33,
    /// Instrument has no payment at maturity
    NoMaturityPayment = 34,
    /// Amortization schedule not set
    ScheduleNotSet = 35,
    /// Put window not set
    PutPeriodNotSet = 36,

    // ============================================
    // TIMING ERRORS (40-49)
    // ============================================
    /// Next payable date not reached
    NotPayableYet = 40,
    /// Investor already received the final payment
    AlreadyMatured = 41,
    /// Maturity not reached
    NotMatured = 42,
    /// Outside the put window
    PutWindowClosed = 43,
    /// Put window must start in the future
    PutPeriodStarted = 44,
    /// Call option expired at maturity
    CallWindowClosed = 45,

    // ============================================
    // ALREADY DONE ERRORS (50-59)
    // ============================================
    /// Investor already paid
    AlreadyPaid = 50,

    // ============================================
    // FUNDS ERRORS (60-69)
    // ============================================
    /// Contract balance below the payment
    InsufficientBalance = 60,
    /// Contract balance below the obligation to all holders
    InsufficientAggregateBalance = 61,
    /// Holder owns fewer units than requested
    InsufficientHolderBalance = 62,

    // ============================================
    // NOT FOUND ERRORS (80-89)
    // ============================================
    /// Investor is unverified or holds nothing
    InvestorNotFound = 80,
    /// No verified holder to pay
    NoHolders = 81,
    /// Receiver has no verified identity
    InvestorNotVerified = 82,
}
