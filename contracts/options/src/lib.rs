#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{OptionCashSettledEvent, OptionDeliveredEvent, OptionExercisedEvent, StrikeModifiedEvent};
use storage::DataKey;
pub use storage::{OptionKind, OptionTerms};

use instrument_common::settlement;
use instrument_common::{
    exercise_window, holders, receipt, DeliveryMode, DeliveryReceipt, Economics, Parameters,
};
use soroban_sdk::{contract, contractimpl, log, Address, BytesN, Env, Symbol};

/// Exercise-gated options. A holder exercises inside the window, then the
/// position settles once: physically (calls go owner to holder, puts go
/// holder to owner, the receiver paying the strike) or in cash on the
/// signed payoff.
#[contract]
pub struct Options;

/// The two sides of an exercised position
struct Legs {
    params: Parameters,
    economics: Economics,
    holder: Address,
    deliverer: Address,
    receiver: Address,
    balance: i128,
}

#[contractimpl]
impl Options {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the option terms
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidSchedule`: Exercise terms rejected
    /// - `InvalidEconomics`: Non-positive strike or size, negative spot
    pub fn initialize(
        env: Env,
        owner: Address,
        parameters: Address,
        terms: OptionTerms,
        economics: Economics,
        signer: Option<BytesN<65>>,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        if !exercise_window::validate_terms(&terms.exercise, env.ledger().timestamp()) {
            return Err(Error::InvalidSchedule);
        }
        if !economics.is_valid() {
            return Err(Error::InvalidEconomics);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Parameters, &parameters);
        env.storage().instance().set(&DataKey::Terms, &terms);
        env.storage().instance().set(&DataKey::Economics, &economics);
        if let Some(signer) = signer {
            env.storage().instance().set(&DataKey::Signer, &signer);
        }

        Ok(())
    }

    /// Renegotiate the strike of a customized option before expiration
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `CallerNotOwner`: Caller is not the owner
    /// - `StandardizedTerms`: Terms are standardized
    /// - `OptionExpired`: Expiration reached
    /// - `InvalidEconomics`: New strike <= 0
    pub fn modify_strike_price(env: Env, caller: Address, new_strike: i128) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let terms = Self::get_terms(env.clone())?;
        let mut economics = Self::get_economics(env.clone())?;
        let old_strike = settlement::reprice_strike(
            &mut economics,
            terms.standard,
            env.ledger().timestamp(),
            terms.exercise.expiration,
            new_strike,
        )?;
        env.storage().instance().set(&DataKey::Economics, &economics);

        env.events().publish(
            (Symbol::new(&env, "strike_modified"),),
            StrikeModifiedEvent {
                old_strike,
                new_strike,
            },
        );

        Ok(())
    }

    /// Publish the spot price cash settlement uses, until the first cash
    /// settlement
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `CallerNotOwner`: Caller is not the owner
    /// - `SpotFrozen`: A position already settled in cash
    /// - `InvalidEconomics`: Spot < 0
    pub fn set_spot_price(env: Env, caller: Address, spot_price: i128) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let mut economics = Self::get_economics(env.clone())?;
        let frozen = env.storage().instance().has(&DataKey::SpotFrozen);
        settlement::reprice_spot(&mut economics, frozen, spot_price)?;
        env.storage().instance().set(&DataKey::Economics, &economics);

        env.events()
            .publish((Symbol::new(&env, "spot_updated"),), spot_price);

        Ok(())
    }

    /// Fix an electable option to physical or cash settlement, once
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotElectable`: Mode is not Electable
    /// - `InvalidMode`: New mode is Electable
    /// - `Unauthorized`: Caller is neither the owner nor a holder
    pub fn elect_delivery_method(
        env: Env,
        caller: Address,
        new_mode: DeliveryMode,
    ) -> Result<(), Error> {
        caller.require_auth();

        let mut terms = Self::get_terms(env.clone())?;
        let owner = Self::owner(env.clone())?;
        let params = Self::params(&env)?;
        terms.delivery_mode = settlement::elect(terms.delivery_mode, new_mode, || {
            caller == owner || holders::holder_balance(&env, &params, &caller) > 0
        })?;
        env.storage().instance().set(&DataKey::Terms, &terms);

        env.events()
            .publish((Symbol::new(&env, "delivery_elected"), caller), new_mode);

        Ok(())
    }

    // ============================================
    // EXERCISE
    // ============================================

    /// Exercise the holder's whole position
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotAHolder`: Holder owns no options
    /// - `AlreadyExercised`: Holder already exercised
    /// - `WindowClosed`: Outside every exercise window
    pub fn exercise(env: Env, holder: Address) -> Result<(), Error> {
        holder.require_auth();

        let terms = Self::get_terms(env.clone())?;
        let params = Self::params(&env)?;

        let balance = holders::holder_balance(&env, &params, &holder);
        if balance <= 0 {
            return Err(Error::NotAHolder);
        }

        let key = DataKey::Exercised(holder.clone());
        if env.storage().persistent().has(&key) {
            return Err(Error::AlreadyExercised);
        }

        let now = env.ledger().timestamp();
        if !exercise_window::is_open(&terms.exercise, now) {
            return Err(Error::WindowClosed);
        }

        env.storage().persistent().set(&key, &true);

        env.events().publish(
            (Symbol::new(&env, "exercised"), holder.clone()),
            OptionExercisedEvent {
                holder,
                balance,
                exercised_at: now,
            },
        );

        Ok(())
    }

    // ============================================
    // SETTLEMENT
    // ============================================

    /// Record an off-chain delivery of `balance * contract_size` units for
    /// an exercised `holder` and collect the strike from the receiving side.
    /// Calls are delivered by the owner, puts by the holder; the receipt is
    /// signed over `(receipt_number, date, receiver, deliverer, units)`.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `CallerNotOwner` / `Unauthorized`: Caller is not the delivering side
    /// - `InvalidAddress`: Holder is the owner
    /// - `WrongMode`: Physical delivery not allowed
    /// - `NotAHolder`: Holder owns no options
    /// - `NotExercised`: Holder has not exercised
    /// - `AlreadyDelivered`: Position already settled
    /// - `SignerNotConfigured`: No signer to verify against
    /// - `BadSignature`: Signature does not match the receipt
    /// - `InsufficientBalance` / `InsufficientAllowance`: Receiver cannot pay the strike
    pub fn deliver_with_receipt(
        env: Env,
        caller: Address,
        receipt_number: u64,
        date: u64,
        holder: Address,
        signature: BytesN<65>,
    ) -> Result<(), Error> {
        caller.require_auth();
        let legs = Self::open_legs(&env, &caller, &holder, true)?;

        let signer: BytesN<65> = env
            .storage()
            .instance()
            .get(&DataKey::Signer)
            .ok_or(Error::SignerNotConfigured)?;

        let units = legs
            .economics
            .deliverable(legs.balance)
            .ok_or(Error::InvalidAmount)?;
        let digest = receipt::delivery_digest(
            &env,
            receipt_number,
            date,
            &legs.receiver,
            &legs.deliverer,
            units,
        );
        if !receipt::is_signed_by(&env, &digest, &signature, &signer) {
            return Err(Error::BadSignature);
        }

        let payment = legs
            .economics
            .strike_value(units)
            .ok_or(Error::InvalidAmount)?;
        let payment_token = legs.params.payment_token.clone();
        settlement::can_pull(&env, &payment_token, &legs.receiver, payment)?;

        Self::mark_delivered(&env, &legs);
        env.storage().persistent().set(
            &DataKey::Receipt(legs.holder.clone()),
            &DeliveryReceipt {
                receipt_number,
                date,
                receiver: legs.receiver.clone(),
                deliverer: legs.deliverer.clone(),
                amount: units,
                signature,
            },
        );
        settlement::pull(&env, &payment_token, &legs.receiver, &legs.deliverer, payment);

        Self::publish_delivery(&env, legs, units, payment, Some(receipt_number));

        Ok(())
    }

    /// Deliver a tokenized underlying for an exercised `holder`: the
    /// deliverer's `token` moves to the receiver and the strike payment
    /// moves back. Both sides must have approved this contract.
    ///
    /// # Errors
    /// Same gates as `deliver_with_receipt` without the signature checks,
    /// plus `InvalidAddress` when `token` is this contract or the asset.
    pub fn deliver_tokens(
        env: Env,
        caller: Address,
        token: Address,
        holder: Address,
    ) -> Result<(), Error> {
        caller.require_auth();
        let legs = Self::open_legs(&env, &caller, &holder, true)?;

        if token == env.current_contract_address() || token == legs.params.asset {
            return Err(Error::InvalidAddress);
        }

        let units = legs
            .economics
            .deliverable(legs.balance)
            .ok_or(Error::InvalidAmount)?;
        let payment = legs
            .economics
            .strike_value(units)
            .ok_or(Error::InvalidAmount)?;
        let payment_token = legs.params.payment_token.clone();
        settlement::can_pull(&env, &token, &legs.deliverer, units)?;
        settlement::can_pull(&env, &payment_token, &legs.receiver, payment)?;

        Self::mark_delivered(&env, &legs);
        settlement::pull(&env, &token, &legs.deliverer, &legs.receiver, units);
        settlement::pull(&env, &payment_token, &legs.receiver, &legs.deliverer, payment);

        Self::publish_delivery(&env, legs, units, payment, None);

        Ok(())
    }

    /// Settle an exercised position in cash: `balance * payoff` moves from
    /// the owner to the holder, or back when the option is out of the
    /// money. Fixes the spot.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `CallerNotOwner`: Caller is not the owner
    /// - `InvalidAddress`: Holder is the owner
    /// - `WrongMode`: Cash settlement not allowed
    /// - `NotAHolder`: Holder owns no options
    /// - `NotExercised`: Holder has not exercised
    /// - `AlreadyDelivered`: Position already settled
    /// - `InsufficientBalance` / `InsufficientAllowance`: Paying side cannot pay
    pub fn cash_settle(env: Env, caller: Address, holder: Address) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;
        let legs = Self::open_legs(&env, &caller, &holder, false)?;

        let payoff = Self::get_terms(env.clone())?.kind.payoff(&legs.economics);
        let (payer, payee, amount) = settlement::cash_flow(legs.balance, payoff)
            .ok_or(Error::InvalidAmount)?
            .legs(&caller, &holder);

        let payment_token = legs.params.payment_token.clone();
        settlement::can_pull(&env, &payment_token, &payer, amount)?;

        Self::mark_delivered(&env, &legs);
        env.storage().instance().set(&DataKey::SpotFrozen, &true);
        log!(&env, "cash settling {} for {} options", amount, legs.balance);
        settlement::pull(&env, &payment_token, &payer, &payee, amount);

        env.events().publish(
            (Symbol::new(&env, "cash_settled"), holder.clone()),
            OptionCashSettledEvent {
                holder,
                payer,
                payee,
                amount,
            },
        );

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn get_terms(env: Env) -> Result<OptionTerms, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Terms)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_economics(env: Env) -> Result<Economics, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Economics)
            .ok_or(Error::NotInitialized)
    }

    pub fn expiration(env: Env) -> Result<u64, Error> {
        Ok(Self::get_terms(env)?.exercise.expiration)
    }

    pub fn delivery_mode(env: Env) -> Result<DeliveryMode, Error> {
        Ok(Self::get_terms(env)?.delivery_mode)
    }

    /// Per-unit payoff to the holder at the current spot, never negative
    pub fn intrinsic_value(env: Env) -> Result<i128, Error> {
        let kind = Self::get_terms(env.clone())?.kind;
        Ok(kind.payoff(&Self::get_economics(env)?).max(0))
    }

    pub fn is_exercised(env: Env, holder: Address) -> bool {
        env.storage().persistent().has(&DataKey::Exercised(holder))
    }

    pub fn is_delivered(env: Env, holder: Address) -> Result<bool, Error> {
        let (deliverer, receiver) = Self::roles(&env, &holder)?;
        Ok(env
            .storage()
            .persistent()
            .has(&DataKey::Delivered(deliverer, receiver)))
    }

    pub fn get_receipt(env: Env, holder: Address) -> Option<DeliveryReceipt> {
        env.storage().persistent().get(&DataKey::Receipt(holder))
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn params(env: &Env) -> Result<Parameters, Error> {
        let parameters: Address = env
            .storage()
            .instance()
            .get(&DataKey::Parameters)
            .ok_or(Error::NotInitialized)?;
        Ok(holders::load_parameters(env, &parameters))
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
        caller.require_auth();
        if *caller != Self::owner(env.clone())? {
            return Err(Error::CallerNotOwner);
        }
        Ok(())
    }

    /// (deliverer, receiver) of `holder`'s position
    fn roles(env: &Env, holder: &Address) -> Result<(Address, Address), Error> {
        let owner = Self::owner(env.clone())?;
        Ok(match Self::get_terms(env.clone())?.kind {
            OptionKind::Call => (owner, holder.clone()),
            OptionKind::Put => (holder.clone(), owner),
        })
    }

    /// Gates shared by every settlement path once the caller has authorized,
    /// in order: delivering side, holder, mode, balance, exercise, already
    /// delivered.
    fn open_legs(
        env: &Env,
        caller: &Address,
        holder: &Address,
        physical: bool,
    ) -> Result<Legs, Error> {
        let owner = Self::owner(env.clone())?;
        let (deliverer, receiver) = Self::roles(env, holder)?;
        if physical && *caller != deliverer {
            return Err(if deliverer == owner {
                Error::CallerNotOwner
            } else {
                Error::Unauthorized
            });
        }
        if *holder == owner {
            return Err(Error::InvalidAddress);
        }

        let mode = Self::delivery_mode(env.clone())?;
        let allowed = if physical {
            mode.allows_physical()
        } else {
            mode.allows_cash()
        };
        if !allowed {
            return Err(Error::WrongMode);
        }

        let params = Self::params(env)?;
        let balance = holders::holder_balance(env, &params, holder);
        if balance <= 0 {
            return Err(Error::NotAHolder);
        }
        if !Self::is_exercised(env.clone(), holder.clone()) {
            return Err(Error::NotExercised);
        }
        if env
            .storage()
            .persistent()
            .has(&DataKey::Delivered(deliverer.clone(), receiver.clone()))
        {
            return Err(Error::AlreadyDelivered);
        }

        Ok(Legs {
            params,
            economics: Self::get_economics(env.clone())?,
            holder: holder.clone(),
            deliverer,
            receiver,
            balance,
        })
    }

    fn mark_delivered(env: &Env, legs: &Legs) {
        env.storage().persistent().set(
            &DataKey::Delivered(legs.deliverer.clone(), legs.receiver.clone()),
            &true,
        );
    }

    fn publish_delivery(
        env: &Env,
        legs: Legs,
        units: i128,
        payment: i128,
        receipt_number: Option<u64>,
    ) {
        env.events().publish(
            (Symbol::new(env, "delivered"), legs.holder),
            OptionDeliveredEvent {
                deliverer: legs.deliverer,
                receiver: legs.receiver,
                units,
                payment,
                receipt_number,
            },
        );
    }
}

#[cfg(test)]
mod test;
