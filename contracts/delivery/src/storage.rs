use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Owner,
    Parameters,
    Mode,
    /// Uncompressed secp256k1 key receipts must be signed with
    Signer,
    Delivered(Address),
    Receipt(Address),
}
