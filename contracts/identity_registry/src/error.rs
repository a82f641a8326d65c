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
    // REGISTRY ERRORS (80-89)
    // ============================================
    /// Address already has an identity
    IdentityAlreadyRegistered = 80,
    /// Address has no identity
    IdentityNotFound = 81,
}
