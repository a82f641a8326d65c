#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{CashSettledEvent, FutureDeliveredEvent, StrikeModifiedEvent};
use storage::DataKey;
pub use storage::{FutureClass, FutureTerms};

use instrument_common::settlement;
use instrument_common::{holders, receipt, DeliveryMode, DeliveryReceipt, Economics, Parameters};
use soroban_sdk::{contract, contractimpl, log, Address, BytesN, Env, Symbol};

/// A futures contract settled at expiration, by the owner, against each
/// holder: physically (off-chain goods attested by a signed receipt, or a
/// tokenized underlying) or in cash on the spot/strike spread.
#[contract]
pub struct Futures;

/// A holder position cleared for settlement
struct Position {
    params: Parameters,
    economics: Economics,
    owner: Address,
    balance: i128,
}

#[contractimpl]
impl Futures {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the contract terms
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidExpiration`: Expiration not in the future
    /// - `InvalidEconomics`: Non-positive strike or size, negative spot
    pub fn initialize(
        env: Env,
        owner: Address,
        parameters: Address,
        terms: FutureTerms,
        economics: Economics,
        expiration: u64,
        signer: Option<BytesN<65>>,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        if expiration <= env.ledger().timestamp() {
            return Err(Error::InvalidExpiration);
        }
        if !economics.is_valid() {
            return Err(Error::InvalidEconomics);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Parameters, &parameters);
        env.storage().instance().set(&DataKey::Terms, &terms);
        env.storage().instance().set(&DataKey::Economics, &economics);
        env.storage().instance().set(&DataKey::Expiration, &expiration);
        if let Some(signer) = signer {
            env.storage().instance().set(&DataKey::Signer, &signer);
        }

        Ok(())
    }

    /// Renegotiate the strike of a customized contract before expiration
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `CallerNotOwner`: Caller is not the owner
    /// - `StandardizedTerms`: Terms are standardized
    /// - `FutureExpired`: Expiration reached
    /// - `InvalidEconomics`: New strike <= 0
    pub fn modify_strike_price(env: Env, caller: Address, new_strike: i128) -> Result<(), Error> {
        Self::require_owner(&env, &caller)?;

        let standard = Self::get_terms(env.clone())?.standard;
        let mut economics = Self::get_economics(env.clone())?;
        let old_strike = settlement::reprice_strike(
            &mut economics,
            standard,
            env.ledger().timestamp(),
            Self::expiration(env.clone())?,
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

    /// Publish the spot price cash settlement uses. The first cash
    /// settlement fixes it for every later one.
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

    /// Fix an electable contract to physical or cash settlement, once
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
    // SETTLEMENT
    // ============================================

    /// Record an off-chain physical delivery of `balance * contract_size`
    /// units to `receiver` and collect the strike payment from them. The
    /// receipt must be signed over `(receipt_number, date, receiver, owner, units)`.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `CallerNotOwner`: Caller is not the owner
    /// - `FutureNotExpired`: Expiration not reached
    /// - `InvalidAddress`: Receiver is the owner
    /// - `WrongMode`: Physical delivery not allowed
    /// - `ReceiverNotHolder`: Receiver holds no contracts
    /// - `AlreadyDelivered`: Receiver already settled
    /// - `SignerNotConfigured`: No signer to verify against
    /// - `BadSignature`: Signature does not match the receipt
    /// - `InsufficientBalance` / `InsufficientAllowance`: Receiver cannot pay the strike
    pub fn deliver_with_receipt(
        env: Env,
        caller: Address,
        receipt_number: u64,
        date: u64,
        receiver: Address,
        signature: BytesN<65>,
    ) -> Result<(), Error> {
        let position = Self::open_position(&env, &caller, &receiver, true)?;

        let signer: BytesN<65> = env
            .storage()
            .instance()
            .get(&DataKey::Signer)
            .ok_or(Error::SignerNotConfigured)?;

        let units = position
            .economics
            .deliverable(position.balance)
            .ok_or(Error::InvalidAmount)?;
        let digest =
            receipt::delivery_digest(&env, receipt_number, date, &receiver, &position.owner, units);
        if !receipt::is_signed_by(&env, &digest, &signature, &signer) {
            return Err(Error::BadSignature);
        }

        let payment = position
            .economics
            .strike_value(units)
            .ok_or(Error::InvalidAmount)?;
        let payment_token = position.params.payment_token.clone();
        settlement::can_pull(&env, &payment_token, &receiver, payment)?;

        Self::mark_delivered(&env, &position.owner, &receiver);
        env.storage().persistent().set(
            &DataKey::Receipt(receiver.clone()),
            &DeliveryReceipt {
                receipt_number,
                date,
                receiver: receiver.clone(),
                deliverer: position.owner.clone(),
                amount: units,
                signature,
            },
        );
        settlement::pull(&env, &payment_token, &receiver, &position.owner, payment);

        env.events().publish(
            (Symbol::new(&env, "delivered"), receiver.clone()),
            FutureDeliveredEvent {
                receiver,
                units,
                payment,
                receipt_number: Some(receipt_number),
            },
        );

        Ok(())
    }

    /// Deliver a tokenized underlying: `balance * contract_size` of `token`
    /// moves from the owner to `receiver`, and the strike payment moves
    /// back. Both sides must have approved this contract.
    ///
    /// # Errors
    /// Same gates as `deliver_with_receipt` without the signature checks,
    /// plus `InvalidAddress` when `token` is this contract or the asset.
    pub fn deliver_tokens(
        env: Env,
        caller: Address,
        token: Address,
        receiver: Address,
    ) -> Result<(), Error> {
        let position = Self::open_position(&env, &caller, &receiver, true)?;

        if token == env.current_contract_address() || token == position.params.asset {
            return Err(Error::InvalidAddress);
        }

        let units = position
            .economics
            .deliverable(position.balance)
            .ok_or(Error::InvalidAmount)?;
        let payment = position
            .economics
            .strike_value(units)
            .ok_or(Error::InvalidAmount)?;
        let payment_token = position.params.payment_token.clone();
        settlement::can_pull(&env, &token, &position.owner, units)?;
        settlement::can_pull(&env, &payment_token, &receiver, payment)?;

        Self::mark_delivered(&env, &position.owner, &receiver);
        settlement::pull(&env, &token, &position.owner, &receiver, units);
        settlement::pull(&env, &payment_token, &receiver, &position.owner, payment);

        env.events().publish(
            (Symbol::new(&env, "delivered"), receiver.clone()),
            FutureDeliveredEvent {
                receiver,
                units,
                payment,
                receipt_number: None,
            },
        );

        Ok(())
    }

    /// Settle `receiver`'s position in cash: `balance * |spot - strike|`
    /// moves from the losing side to the winning side. Fixes the spot.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `CallerNotOwner`: Caller is not the owner
    /// - `FutureNotExpired`: Expiration not reached
    /// - `InvalidAddress`: Receiver is the owner
    /// - `WrongMode`: Cash settlement not allowed
    /// - `ReceiverNotHolder`: Receiver holds no contracts
    /// - `AlreadyDelivered`: Receiver already settled
    /// - `InsufficientBalance` / `InsufficientAllowance`: Losing side cannot pay
    pub fn cash_settle(env: Env, caller: Address, receiver: Address) -> Result<(), Error> {
        let position = Self::open_position(&env, &caller, &receiver, false)?;

        let spread = position.economics.spread();
        let (payer, payee, amount) = settlement::cash_flow(position.balance, spread)
            .ok_or(Error::InvalidAmount)?
            .legs(&position.owner, &receiver);

        let payment_token = position.params.payment_token.clone();
        settlement::can_pull(&env, &payment_token, &payer, amount)?;

        Self::mark_delivered(&env, &position.owner, &receiver);
        env.storage().instance().set(&DataKey::SpotFrozen, &true);
        log!(&env, "cash settling {} at spread {}", amount, spread);
        settlement::pull(&env, &payment_token, &payer, &payee, amount);

        env.events().publish(
            (Symbol::new(&env, "cash_settled"), receiver),
            CashSettledEvent {
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

    pub fn get_terms(env: Env) -> Result<FutureTerms, Error> {
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
        env.storage()
            .instance()
            .get(&DataKey::Expiration)
            .ok_or(Error::NotInitialized)
    }

    pub fn delivery_mode(env: Env) -> Result<DeliveryMode, Error> {
        Ok(Self::get_terms(env)?.delivery_mode)
    }

    pub fn is_delivered(env: Env, receiver: Address) -> Result<bool, Error> {
        let owner = Self::owner(env.clone())?;
        Ok(env
            .storage()
            .persistent()
            .has(&DataKey::Delivered(owner, receiver)))
    }

    pub fn get_receipt(env: Env, receiver: Address) -> Option<DeliveryReceipt> {
        env.storage().persistent().get(&DataKey::Receipt(receiver))
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

    /// Gates shared by every settlement path, in order: owner, expiration,
    /// receiver, mode, holder, already delivered.
    fn open_position(
        env: &Env,
        caller: &Address,
        receiver: &Address,
        physical: bool,
    ) -> Result<Position, Error> {
        Self::require_owner(env, caller)?;

        if env.ledger().timestamp() < Self::expiration(env.clone())? {
            return Err(Error::FutureNotExpired);
        }
        if receiver == caller {
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
        let balance = holders::holder_balance(env, &params, receiver);
        if balance <= 0 {
            return Err(Error::ReceiverNotHolder);
        }
        if env
            .storage()
            .persistent()
            .has(&DataKey::Delivered(caller.clone(), receiver.clone()))
        {
            return Err(Error::AlreadyDelivered);
        }

        Ok(Position {
            params,
            economics: Self::get_economics(env.clone())?,
            owner: caller.clone(),
            balance,
        })
    }

    fn mark_delivered(env: &Env, deliverer: &Address, receiver: &Address) {
        env.storage()
            .persistent()
            .set(&DataKey::Delivered(deliverer.clone(), receiver.clone()), &true);
    }
}
