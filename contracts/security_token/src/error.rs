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
    /// Caller is neither admin nor a registered operator
    Unauthorized = 10,

    // ============================================
    // ARGUMENT ERRORS (20-29)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 20,

    // ============================================
    // IDENTITY ERRORS (30-39)
    // ============================================
    /// Receiver is not verified by the identity registry
    ReceiverNotVerified = 30,

    // ============================================
    // BALANCE ERRORS (60-69)
    // ============================================
    /// Not enough balance
    InsufficientBalance = 60,
}
