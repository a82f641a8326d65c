//! Test harness shared by the lifecycle contracts: deploys an identity
//! registry, a security token, a payment token and the parameters contract,
//! and signs delivery and cash receipts with a secp256k1 key.

use identity_registry::{IdentityRegistry, IdentityRegistryClient};
use libsecp256k1::{Message, PublicKey, SecretKey};
use parameters::{InstrumentParameters, InstrumentParametersClient};
use security_token::{SecurityToken, SecurityTokenClient};
use soroban_sdk::{
    crypto::Hash,
    testutils::{Address as _, Ledger},
    token::{StellarAssetClient, TokenClient},
    Address, BytesN, Env,
};

/// Ledger time every platform starts at
pub const GENESIS: u64 = 1_700_000_000;

pub struct Platform {
    pub env: Env,
    pub owner: Address,
    pub registry: Address,
    pub asset: Address,
    pub payment_token: Address,
    pub parameters: Address,
}

impl Platform {
    /// Fresh platform at `GENESIS` with all auths mocked
    pub fn new(env: &Env, price: i128, precision: i128) -> Self {
        env.mock_all_auths();
        set_time(env, GENESIS);

        let owner = Address::generate(env);

        let registry = env.register(IdentityRegistry, ());
        IdentityRegistryClient::new(env, &registry).initialize(&owner);

        let asset = env.register(SecurityToken, ());
        SecurityTokenClient::new(env, &asset).initialize(&owner, &registry);

        let payment_token = env
            .register_stellar_asset_contract_v2(owner.clone())
            .address();

        let parameters = env.register(InstrumentParameters, ());
        InstrumentParametersClient::new(env, &parameters).initialize(
            &owner,
            &price,
            &precision,
            &asset,
            &payment_token,
            &registry,
        );

        Platform {
            env: env.clone(),
            owner,
            registry,
            asset,
            payment_token,
            parameters,
        }
    }

    pub fn registry(&self) -> IdentityRegistryClient<'_> {
        IdentityRegistryClient::new(&self.env, &self.registry)
    }

    pub fn asset(&self) -> SecurityTokenClient<'_> {
        SecurityTokenClient::new(&self.env, &self.asset)
    }

    pub fn payment(&self) -> TokenClient<'_> {
        TokenClient::new(&self.env, &self.payment_token)
    }

    /// A generated address with a verified identity
    pub fn investor(&self) -> Address {
        let investor = Address::generate(&self.env);
        self.registry().register_identity(&investor, &840);
        investor
    }

    /// Verified investor already holding `amount` units
    pub fn holder(&self, amount: i128) -> Address {
        let investor = self.investor();
        self.issue(&investor, amount);
        investor
    }

    pub fn issue(&self, investor: &Address, amount: i128) {
        self.asset().mint(&self.owner, investor, &amount);
    }

    /// Lets a lifecycle contract mint and burn the asset
    pub fn add_operator(&self, contract: &Address) {
        self.asset().add_operator(contract);
    }

    pub fn fund(&self, to: &Address, amount: i128) {
        self.mint_token(&self.payment_token, to, amount);
    }

    pub fn payment_balance(&self, who: &Address) -> i128 {
        self.payment().balance(who)
    }

    /// Another standard token, administered by the owner
    pub fn new_token(&self) -> Address {
        self.env
            .register_stellar_asset_contract_v2(self.owner.clone())
            .address()
    }

    pub fn mint_token(&self, token: &Address, to: &Address, amount: i128) {
        StellarAssetClient::new(&self.env, token).mint(to, &amount);
    }

    pub fn token_balance(&self, token: &Address, who: &Address) -> i128 {
        TokenClient::new(&self.env, token).balance(who)
    }

    pub fn approve(&self, token: &Address, from: &Address, spender: &Address, amount: i128) {
        let expiration = self.env.ledger().sequence() + 10_000;
        TokenClient::new(&self.env, token).approve(from, spender, &amount, &expiration);
    }

    pub fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    pub fn advance(&self, seconds: u64) {
        set_time(&self.env, self.now() + seconds);
    }
}

pub fn set_time(env: &Env, timestamp: u64) {
    env.ledger().with_mut(|li| {
        li.timestamp = timestamp;
    });
}

/// secp256k1 key that signs receipt digests the way an off-chain issuer does
pub struct ReceiptSigner {
    secret: SecretKey,
}

impl ReceiptSigner {
    pub fn new(seed: u8) -> Self {
        let secret = SecretKey::parse(&[seed.max(1); 32]).expect("valid secret key");
        ReceiptSigner { secret }
    }

    /// Uncompressed SEC-1 public key, as the contracts store it
    pub fn public_key(&self, env: &Env) -> BytesN<65> {
        let public = PublicKey::from_secret_key(&self.secret);
        BytesN::from_array(env, &public.serialize())
    }

    /// 65-byte `r || s || v` signature with `v` in 27/28
    pub fn sign(&self, env: &Env, digest: &Hash<32>) -> BytesN<65> {
        let message = Message::parse(&digest.to_array());
        let (signature, recovery_id) = libsecp256k1::sign(&message, &self.secret);

        let mut raw = [0u8; 65];
        raw[..64].copy_from_slice(&signature.serialize());
        raw[64] = recovery_id.serialize() + 27;
        BytesN::from_array(env, &raw)
    }
}
