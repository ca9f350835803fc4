use bech32::{ToBase32, Variant};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Api, Binary, Uint128};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tiny_keccak::{Hasher, Keccak};

/// Off-chain-produced authorization carried by every sales-engine action.
/// The relayer submits it; the end user only signs. `signature` is the
/// 64-byte r||s pair of a recoverable secp256k1 signature over the action
/// digest, `recovery_id` the v parameter.
#[cw_serde]
pub struct AuthToken {
    pub user: Addr,
    pub nonce: u64,
    /// unix seconds; checked once at entry, never revisited
    pub expiry: u64,
    pub signature: Binary,
    pub recovery_id: u8,
}

#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    #[error("Signature must be the 64-byte r || s pair")]
    MalformedSignature {},

    #[error("Signature recovery failed")]
    InvalidSignature {},

    #[error("Recovered signer {recovered} does not match declared user {declared}")]
    SignerMismatch { recovered: String, declared: String },
}

pub fn keccak_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

fn keccak_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

/// Canonical 32-byte word encodings for struct-hash fields. Dynamic-length
/// values (strings, addresses) are hashed, integers are big-endian padded.
pub fn word_u64(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

pub fn word_u128(value: Uint128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.u128().to_be_bytes());
    word
}

pub fn word_bool(value: bool) -> [u8; 32] {
    word_u64(u64::from(value))
}

pub fn word_str(value: &str) -> [u8; 32] {
    keccak_256(value.as_bytes())
}

pub fn word_addr(value: &Addr) -> [u8; 32] {
    keccak_256(value.as_bytes())
}

/// Binds protocol name, version, chain id and the verifying contract, so a
/// signature can never be replayed against another deployment.
pub fn domain_separator(name: &str, version: &str, chain_id: &str, contract: &Addr) -> [u8; 32] {
    keccak_concat(&[
        &keccak_256(name.as_bytes()),
        &keccak_256(version.as_bytes()),
        &keccak_256(chain_id.as_bytes()),
        &keccak_256(contract.as_bytes()),
    ])
}

/// Binds the action tag, nonce, expiry and the action's fields in their
/// fixed per-action order.
pub fn struct_hash(action: &str, nonce: u64, expiry: u64, fields: &[[u8; 32]]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(&keccak_256(action.as_bytes()));
    hasher.update(&word_u64(nonce));
    hasher.update(&word_u64(expiry));
    for field in fields {
        hasher.update(field);
    }
    let mut output = [0u8; 32];
    hasher.finalize(&mut output);
    output
}

pub fn auth_digest(domain_separator: &[u8; 32], struct_hash: &[u8; 32]) -> [u8; 32] {
    keccak_concat(&[domain_separator, struct_hash])
}

/// Account address of a secp256k1 public key (compressed-key sha256 then
/// ripemd160, bech32 rendered). Accepts the 65-byte uncompressed form the
/// recovery api returns, or an already-compressed 33-byte key.
pub fn pubkey_to_address(pubkey: &[u8], prefix: &str) -> Result<Addr, AuthError> {
    let compressed: Vec<u8> = match pubkey.len() {
        33 => pubkey.to_vec(),
        65 => {
            let mut key = Vec::with_capacity(33);
            key.push(if pubkey[64] & 1 == 1 { 0x03 } else { 0x02 });
            key.extend_from_slice(&pubkey[1..33]);
            key
        }
        _ => return Err(AuthError::InvalidSignature {}),
    };
    let hash = Ripemd160::digest(Sha256::digest(&compressed));
    let encoded = bech32::encode(prefix, hash.as_slice().to_base32(), Variant::Bech32)
        .map_err(|_| AuthError::InvalidSignature {})?;
    Ok(Addr::unchecked(encoded))
}

impl AuthToken {
    /// Recovers the signer of `digest` and requires it to equal the declared
    /// user exactly. Nonce and expiry checks are the caller's business; this
    /// only settles who signed.
    pub fn verify(&self, api: &dyn Api, digest: &[u8; 32], prefix: &str) -> Result<(), AuthError> {
        if self.signature.len() != 64 {
            return Err(AuthError::MalformedSignature {});
        }
        let pubkey = api
            .secp256k1_recover_pubkey(digest, self.signature.as_slice(), self.recovery_id)
            .map_err(|_| AuthError::InvalidSignature {})?;
        let recovered = pubkey_to_address(&pubkey, prefix)?;
        if recovered != self.user {
            return Err(AuthError::SignerMismatch {
                recovered: recovered.to_string(),
                declared: self.user.to_string(),
            });
        }
        Ok(())
    }
}
