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
    /// Amount must be positive
    InvalidAmount = 20,
    /// Buyback date must move forward
    InvalidDate = 21,
    /// Conversion rate must be positive
    InvalidRate = 22,
    /// Token is this contract, the asset or the payment token
    InvalidAddress = 23,

    // ============================================
    // STATE ERRORS (30-39)
    // ============================================
    /// Redemption state forbids redeeming
    NotRedeemable = 30,
    /// Redemption state forbids extending the buyback date
    NotExtendible = 31,
    /// Redemption state forbids exchanging
    NotExchangeable = 32,

    // ============================================
    // TIMING ERRORS (40-49)
    // ============================================
    /// Buyback date not reached
    BuybackNotReached = 40,

    // ============================================
    // ALREADY DONE ERRORS (50-59)
    // ============================================
    /// Holder already redeemed
    AlreadyRedeemed = 50,
    /// Holder already exchanged
    AlreadyExchanged = 51,
    /// Exchange token already registered
    TokenAlreadyRegistered = 52,

    // ============================================
    // FUNDS ERRORS (60-69)
    // ============================================
    /// Contract cannot cover the payout
    InsufficientBalance = 60,
    /// Holder owns fewer units than requested
    InsufficientHolderBalance = 61,

    // ============================================
    // NOT FOUND ERRORS (80-89)
    // ============================================
    /// Address holds no units
    NotAHolder = 80,
    /// Exchange token not registered
    TokenNotRegistered = 81,
    /// Receiver has no verified identity
    InvestorNotVerified = 82,
}
