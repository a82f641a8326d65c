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
    // ARGUMENT ERRORS (20-29)
    // ============================================
    /// Expiration in the past, or start/periodicity inconsistent with it
    InvalidSchedule = 20,

    // ============================================
    // TIMING ERRORS (40-49)
    // ============================================
    /// Outside every exercise window, or past expiration
    WindowClosed = 40,

    // ============================================
    // ALREADY DONE ERRORS (50-59)
    // ============================================
    /// Investor already exercised
    AlreadyExercised = 50,

    // ============================================
    // NOT FOUND ERRORS (80-89)
    // ============================================
    /// Caller is unverified or holds none of the asset
    NotAHolder = 80,
}
