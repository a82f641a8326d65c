use soroban_sdk::{crypto::Hash, xdr::ToXdr, Address, Bytes, BytesN, Env};

const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Digest a signer attests to for a physical delivery
pub fn delivery_digest(
    env: &Env,
    receipt_number: u64,
    date: u64,
    receiver: &Address,
    deliverer: &Address,
    amount: i128,
) -> Hash<32> {
    let mut payload = Bytes::new(env);
    payload.extend_from_array(&receipt_number.to_be_bytes());
    payload.extend_from_array(&date.to_be_bytes());
    payload.append(&receiver.clone().to_xdr(env));
    payload.append(&deliverer.clone().to_xdr(env));
    payload.extend_from_array(&amount.to_be_bytes());
    signed_message_hash(env, &payload)
}

/// Digest a signer attests to for an off-chain cash interest payment
pub fn cash_digest(
    env: &Env,
    receipt_number: u64,
    date: u64,
    investor: &Address,
    amount: i128,
) -> Hash<32> {
    let mut payload = Bytes::new(env);
    payload.extend_from_array(&receipt_number.to_be_bytes());
    payload.extend_from_array(&date.to_be_bytes());
    payload.append(&investor.clone().to_xdr(env));
    payload.extend_from_array(&amount.to_be_bytes());
    signed_message_hash(env, &payload)
}

/// keccak256 of the payload, wrapped in the signed-message envelope
fn signed_message_hash(env: &Env, payload: &Bytes) -> Hash<32> {
    let inner = env.crypto().keccak256(payload);
    let mut message = Bytes::from_slice(env, SIGNED_MESSAGE_PREFIX);
    message.extend_from_array(&inner.to_array());
    env.crypto().keccak256(&message)
}

/// Recovers the uncompressed public key behind a 65-byte `r || s || v`
/// signature. `v` may be given as 0/1 or 27/28.
pub fn recover_signer(env: &Env, digest: &Hash<32>, signature: &BytesN<65>) -> Option<BytesN<65>> {
    let raw = signature.to_array();
    let mut rs = [0u8; 64];
    rs.copy_from_slice(&raw[..64]);

    let v = raw[64];
    let recovery_id = if v >= 27 { v - 27 } else { v };
    if recovery_id > 1 {
        return None;
    }

    let rs = BytesN::from_array(env, &rs);
    Some(
        env.crypto()
            .secp256k1_recover(digest, &rs, recovery_id as u32),
    )
}

/// True when `signature` over `digest` was produced by `signer`
pub fn is_signed_by(
    env: &Env,
    digest: &Hash<32>,
    signature: &BytesN<65>,
    signer: &BytesN<65>,
) -> bool {
    match recover_signer(env, digest, signature) {
        Some(recovered) => recovered == *signer,
        None => false,
    }
}
