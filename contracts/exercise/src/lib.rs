#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::ExercisedEvent;
use storage::DataKey;

use instrument_common::{exercise_window, holders, ExerciseTerms};
use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

/// One-shot exercise of an option position under American, European or
/// Bermudan rules.
#[contract]
pub struct Exercise;

#[contractimpl]
impl Exercise {
    /// Initialize with the exercise terms
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidSchedule`: Expiration not in the future, or start/periodicity invalid
    pub fn initialize(
        env: Env,
        owner: Address,
        parameters: Address,
        terms: ExerciseTerms,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        if !exercise_window::validate_terms(&terms, env.ledger().timestamp()) {
            return Err(Error::InvalidSchedule);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Parameters, &parameters);
        env.storage().instance().set(&DataKey::Terms, &terms);

        Ok(())
    }

    /// Exercise the caller's position
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotAHolder`: Caller is unverified or holds nothing
    /// - `AlreadyExercised`: Caller already exercised
    /// - `WindowClosed`: No exercise window is open
    pub fn exercise(env: Env, holder: Address) -> Result<(), Error> {
        holder.require_auth();

        let terms = Self::get_terms(env.clone())?;
        let parameters: Address = env
            .storage()
            .instance()
            .get(&DataKey::Parameters)
            .ok_or(Error::NotInitialized)?;
        let params = holders::load_parameters(&env, &parameters);

        let balance = holders::holder_balance(&env, &params, &holder);
        if balance <= 0 {
            return Err(Error::NotAHolder);
        }

        let key = DataKey::Exercised(holder.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::AlreadyExercised);
        }

        let now = env.ledger().timestamp();
        if !exercise_window::is_open(&terms, now) {
            return Err(Error::WindowClosed);
        }

        env.storage().persistent().set(&key, &true);

        env.events().publish(
            (Symbol::new(&env, "exercised"), holder.clone()),
            ExercisedEvent {
                holder,
                balance,
                exercised_at: now,
            },
        );

        Ok(())
    }

    pub fn is_exercised(env: Env, investor: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Exercised(investor))
    }

    pub fn get_terms(env: Env) -> Result<ExerciseTerms, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Terms)
            .ok_or(Error::NotInitialized)
    }

    pub fn is_window_open(env: Env) -> Result<bool, Error> {
        let terms = Self::get_terms(env.clone())?;
        Ok(exercise_window::is_open(&terms, env.ledger().timestamp()))
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }
}
