#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
use events::{DeliveredEvent, DeliveryElectedEvent, ReceiptDeliveredEvent};
use storage::DataKey;

use instrument_common::settlement;
use instrument_common::{holders, receipt, DeliveryMode, DeliveryReceipt, Parameters};
use soroban_sdk::{contract, contractimpl, log, Address, BytesN, Env, Symbol};

/// Physical or cash settlement of an obligation, once per receiver
#[contract]
pub struct Delivery;

#[contractimpl]
impl Delivery {
    /// Initialize the delivery terms
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        owner: Address,
        parameters: Address,
        mode: DeliveryMode,
        signer: Option<BytesN<65>>,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        owner.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Owner, &owner);
        env.storage().instance().set(&DataKey::Parameters, &parameters);
        env.storage().instance().set(&DataKey::Mode, &mode);
        if let Some(signer) = signer {
            env.storage().instance().set(&DataKey::Signer, &signer);
        }

        Ok(())
    }

    /// Deliver `amount` of `token` from the caller to `receiver`. The caller
    /// must have approved this contract for at least `amount`.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ZeroAmount`: Amount <= 0
    /// - `InvalidAddress`: Receiver is the caller, or token is this contract
    /// - `WrongMode`: Physical delivery not allowed
    /// - `AlreadyDelivered`: Receiver already settled
    /// - `InsufficientBalance`: Caller holds less than amount
    /// - `InsufficientAllowance`: Caller approved less than amount
    pub fn physically_deliver(
        env: Env,
        caller: Address,
        token: Address,
        amount: i128,
        receiver: Address,
    ) -> Result<(), Error> {
        caller.require_auth();

        let mode = Self::delivery_mode(env.clone())?;

        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }
        if receiver == caller || token == env.current_contract_address() {
            return Err(Error::InvalidAddress);
        }
        if !mode.allows_physical() {
            return Err(Error::WrongMode);
        }

        Self::settle(&env, &token, &caller, &receiver, amount)
    }

    /// Deliver `amount` of the payment token from the caller to `receiver`
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ZeroAmount`: Amount <= 0
    /// - `InvalidAddress`: Receiver is the caller
    /// - `WrongMode`: Cash delivery not allowed
    /// - `AlreadyDelivered`: Receiver already settled
    /// - `InsufficientBalance`: Caller holds less than amount
    /// - `InsufficientAllowance`: Caller approved less than amount
    pub fn cash_deliver(
        env: Env,
        caller: Address,
        amount: i128,
        receiver: Address,
    ) -> Result<(), Error> {
        caller.require_auth();

        let mode = Self::delivery_mode(env.clone())?;

        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }
        if receiver == caller {
            return Err(Error::InvalidAddress);
        }
        if !mode.allows_cash() {
            return Err(Error::WrongMode);
        }

        let params = Self::params(&env)?;
        Self::settle(&env, &params.payment_token, &caller, &receiver, amount)
    }

    /// Record a physical delivery attested off-chain. The receipt must be
    /// signed over `(receipt_number, date, receiver, owner, amount)`.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `CallerNotOwner`: Caller is not the owner
    /// - `ZeroAmount`: Amount <= 0
    /// - `InvalidAddress`: Receiver is the owner
    /// - `WrongMode`: Physical delivery not allowed
    /// - `ReceiverNotHolder`: Receiver holds none of the asset
    /// - `AlreadyDelivered`: Receiver already settled
    /// - `SignerNotConfigured`: No signer to verify against
    /// - `BadSignature`: Signature does not match the receipt
    pub fn physically_deliver_with_receipt(
        env: Env,
        caller: Address,
        receipt_number: u64,
        date: u64,
        receiver: Address,
        amount: i128,
        signature: BytesN<65>,
    ) -> Result<(), Error> {
        caller.require_auth();

        let owner = Self::owner(env.clone())?;
        if caller != owner {
            return Err(Error::CallerNotOwner);
        }

        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }
        if receiver == caller {
            return Err(Error::InvalidAddress);
        }

        let mode = Self::delivery_mode(env.clone())?;
        if !mode.allows_physical() {
            return Err(Error::WrongMode);
        }

        let params = Self::params(&env)?;
        if holders::holder_balance(&env, &params, &receiver) <= 0 {
            return Err(Error::ReceiverNotHolder);
        }

        let delivered_key = DataKey::Delivered(receiver.clone());
        if env.storage().persistent().has(&delivered_key) {
            return Err(Error::AlreadyDelivered);
        }

        let signer: BytesN<65> = env
            .storage()
            .instance()
            .get(&DataKey::Signer)
            .ok_or(Error::SignerNotConfigured)?;
        let digest =
            receipt::delivery_digest(&env, receipt_number, date, &receiver, &caller, amount);
        if !receipt::is_signed_by(&env, &digest, &signature, &signer) {
            return Err(Error::BadSignature);
        }

        env.storage().persistent().set(&delivered_key, &true);
        env.storage().persistent().set(
            &DataKey::Receipt(receiver.clone()),
            &DeliveryReceipt {
                receipt_number,
                date,
                receiver: receiver.clone(),
                deliverer: caller.clone(),
                amount,
                signature,
            },
        );

        env.events().publish(
            (Symbol::new(&env, "receipt_delivered"), receiver.clone()),
            ReceiptDeliveredEvent {
                receipt_number,
                deliverer: caller,
                receiver,
                amount,
            },
        );

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

        let mode = Self::delivery_mode(env.clone())?;
        let owner = Self::owner(env.clone())?;
        let params = Self::params(&env)?;
        let new_mode = settlement::elect(mode, new_mode, || {
            caller == owner || holders::holder_balance(&env, &params, &caller) > 0
        })?;

        env.storage().instance().set(&DataKey::Mode, &new_mode);

        env.events().publish(
            (Symbol::new(&env, "delivery_elected"),),
            DeliveryElectedEvent {
                elected_by: caller,
                mode: new_mode,
            },
        );

        Ok(())
    }

    pub fn delivery_mode(env: Env) -> Result<DeliveryMode, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Mode)
            .ok_or(Error::NotInitialized)
    }

    pub fn is_delivered(env: Env, receiver: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Delivered(receiver))
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

    /// Marks the receiver settled, then pulls `amount` of `token` from `from`
    fn settle(
        env: &Env,
        token: &Address,
        from: &Address,
        receiver: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        let delivered_key = DataKey::Delivered(receiver.clone());
        if env.storage().persistent().has(&delivered_key) {
            return Err(Error::AlreadyDelivered);
        }

        settlement::can_pull(env, token, from, amount)?;

        env.storage().persistent().set(&delivered_key, &true);

        log!(env, "delivering {} to {}", amount, receiver.clone());
        settlement::pull(env, token, from, receiver, amount);

        env.events().publish(
            (Symbol::new(env, "delivered"), receiver.clone()),
            DeliveredEvent {
                deliverer: from.clone(),
                receiver: receiver.clone(),
                token: token.clone(),
                amount,
            },
        );

        Ok(())
    }
}
