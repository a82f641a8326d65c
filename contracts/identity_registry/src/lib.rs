#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{IdentityRegisteredEvent, IdentityRemovedEvent};
pub use storage::Identity;
use storage::DataKey;

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

/// Registry of verified investors. Claim topics and trusted issuers live
/// off-chain; the admin records the outcome here.
#[contract]
pub struct IdentityRegistry;

#[contractimpl]
impl IdentityRegistry {
    /// Initialize the registry
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);

        Ok(())
    }

    /// Record a verified identity
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `IdentityAlreadyRegistered`: Investor already verified
    pub fn register_identity(env: Env, investor: Address, country: u32) -> Result<(), Error> {
        Self::require_admin(&env)?;

        let key = DataKey::Identity(investor.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::IdentityAlreadyRegistered);
        }

        env.storage().persistent().set(
            &key,
            &Identity {
                country,
                registered_at: env.ledger().timestamp(),
            },
        );

        env.events().publish(
            (Symbol::new(&env, "identity_registered"), investor.clone()),
            IdentityRegisteredEvent { investor, country },
        );

        Ok(())
    }

    /// Revoke a verified identity
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `IdentityNotFound`: Investor was never verified
    pub fn remove_identity(env: Env, investor: Address) -> Result<(), Error> {
        Self::require_admin(&env)?;

        let key = DataKey::Identity(investor.clone());
        if !env.storage().persistent().has(&key) {
            return Err(Error::IdentityNotFound);
        }
        env.storage().persistent().remove(&key);

        env.events().publish(
            (Symbol::new(&env, "identity_removed"), investor.clone()),
            IdentityRemovedEvent { investor },
        );

        Ok(())
    }

    pub fn is_verified(env: Env, address: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Identity(address))
    }

    pub fn investor_country(env: Env, address: Address) -> Option<u32> {
        env.storage()
            .persistent()
            .get::<DataKey, Identity>(&DataKey::Identity(address))
            .map(|identity| identity.country)
    }

    fn require_admin(env: &Env) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{testutils::Address as _, Address, Env};

    fn setup(env: &Env) -> (IdentityRegistryClient<'_>, Address) {
        env.mock_all_auths();
        let contract_id = env.register(IdentityRegistry, ());
        let client = IdentityRegistryClient::new(env, &contract_id);
        let admin = Address::generate(env);
        client.initialize(&admin);
        (client, admin)
    }

    #[test]
    fn test_initialize_twice() {
        let env = Env::default();
        let (client, admin) = setup(&env);

        let result = client.try_initialize(&admin);
        assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
    }

    #[test]
    fn test_register_and_remove() {
        let env = Env::default();
        let (client, _) = setup(&env);
        let investor = Address::generate(&env);

        assert!(!client.is_verified(&investor));

        client.register_identity(&investor, &250);
        assert!(client.is_verified(&investor));
        assert_eq!(client.investor_country(&investor), Some(250));

        let result = client.try_register_identity(&investor, &250);
        assert_eq!(result, Err(Ok(Error::IdentityAlreadyRegistered)));

        client.remove_identity(&investor);
        assert!(!client.is_verified(&investor));
        assert_eq!(client.investor_country(&investor), None);

        let result = client.try_remove_identity(&investor);
        assert_eq!(result, Err(Ok(Error::IdentityNotFound)));
    }

    #[test]
    fn test_register_before_initialize() {
        let env = Env::default();
        env.mock_all_auths();
        let contract_id = env.register(IdentityRegistry, ());
        let client = IdentityRegistryClient::new(&env, &contract_id);

        let result = client.try_register_identity(&Address::generate(&env), &1);
        assert_eq!(result, Err(Ok(Error::NotInitialized)));
    }
}
