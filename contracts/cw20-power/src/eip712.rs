//! EIP-712 style typed-data digests and signer recovery.
//!
//! Digests follow the EIP-712 encoding with the ethereum address
//! fields replaced by `string` fields holding bech32 addresses, so
//! that existing typed-data signers can produce them unchanged.
//! Signatures are the ethereum wire form, 65 bytes `r || s || v`
//! with `v` in `{27, 28}`.

use bech32::{ToBase32, Variant};
use cosmwasm_std::{Addr, Api, Env, Uint128, Uint64};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::error::ContractError;
use crate::state::PowerType;

pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,string chainId,string verifyingContract)";
pub const PERMIT_TYPE: &str =
    "Permit(string owner,string spender,uint256 value,uint256 nonce,uint256 deadline)";
pub const DELEGATE_TYPE: &str = "Delegate(string delegatee,uint256 nonce,uint256 expiry)";
pub const DELEGATE_BY_TYPE_TYPE: &str =
    "DelegateByType(string delegatee,uint256 powerType,uint256 nonce,uint256 expiry)";

pub const DOMAIN_VERSION: &str = "1";

/// Deadlines and expiries equal to `u64::MAX` never expire.
pub const NEVER_EXPIRES: u64 = u64::MAX;

fn keccak256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// 32 byte big-endian uint256 encoding.
fn encode_uint(value: u128) -> [u8; 32] {
    let mut out = [0; 32];
    out[16..].copy_from_slice(&value.to_be_bytes());
    out
}

pub fn domain_separator(name: &str, chain_id: &str, contract: &Addr) -> [u8; 32] {
    let mut encoded = Vec::with_capacity(160);
    encoded.extend_from_slice(&keccak256(DOMAIN_TYPE.as_bytes()));
    encoded.extend_from_slice(&keccak256(name.as_bytes()));
    encoded.extend_from_slice(&keccak256(DOMAIN_VERSION.as_bytes()));
    encoded.extend_from_slice(&keccak256(chain_id.as_bytes()));
    encoded.extend_from_slice(&keccak256(contract.as_bytes()));
    keccak256(&encoded)
}

fn typed_data_digest(domain_separator: &[u8; 32], struct_hash: &[u8; 32]) -> [u8; 32] {
    let mut encoded = Vec::with_capacity(66);
    encoded.extend_from_slice(b"\x19\x01");
    encoded.extend_from_slice(domain_separator);
    encoded.extend_from_slice(struct_hash);
    keccak256(&encoded)
}

pub fn permit_digest(
    domain_separator: &[u8; 32],
    owner: &str,
    spender: &str,
    value: Uint128,
    nonce: Uint128,
    deadline: Uint64,
) -> [u8; 32] {
    let mut encoded = Vec::with_capacity(192);
    encoded.extend_from_slice(&keccak256(PERMIT_TYPE.as_bytes()));
    encoded.extend_from_slice(&keccak256(owner.as_bytes()));
    encoded.extend_from_slice(&keccak256(spender.as_bytes()));
    encoded.extend_from_slice(&encode_uint(value.u128()));
    encoded.extend_from_slice(&encode_uint(nonce.u128()));
    encoded.extend_from_slice(&encode_uint(deadline.u64() as u128));
    typed_data_digest(domain_separator, &keccak256(&encoded))
}

pub fn delegate_digest(
    domain_separator: &[u8; 32],
    delegatee: &str,
    nonce: Uint128,
    expiry: Uint64,
) -> [u8; 32] {
    let mut encoded = Vec::with_capacity(128);
    encoded.extend_from_slice(&keccak256(DELEGATE_TYPE.as_bytes()));
    encoded.extend_from_slice(&keccak256(delegatee.as_bytes()));
    encoded.extend_from_slice(&encode_uint(nonce.u128()));
    encoded.extend_from_slice(&encode_uint(expiry.u64() as u128));
    typed_data_digest(domain_separator, &keccak256(&encoded))
}

pub fn delegate_by_type_digest(
    domain_separator: &[u8; 32],
    delegatee: &str,
    power_type: PowerType,
    nonce: Uint128,
    expiry: Uint64,
) -> [u8; 32] {
    let mut encoded = Vec::with_capacity(160);
    encoded.extend_from_slice(&keccak256(DELEGATE_BY_TYPE_TYPE.as_bytes()));
    encoded.extend_from_slice(&keccak256(delegatee.as_bytes()));
    encoded.extend_from_slice(&encode_uint(power_type.index()));
    encoded.extend_from_slice(&encode_uint(nonce.u128()));
    encoded.extend_from_slice(&encode_uint(expiry.u64() as u128));
    typed_data_digest(domain_separator, &keccak256(&encoded))
}

pub fn assert_not_expired(env: &Env, deadline: Uint64) -> Result<(), ContractError> {
    if deadline.u64() == NEVER_EXPIRES {
        return Ok(());
    }
    if deadline.is_zero() || deadline.u64() < env.block.time.seconds() {
        return Err(ContractError::InvalidExpiration {});
    }
    Ok(())
}

/// Recovers the address that signed `digest`. Any malformed
/// signature is an invalid signature, never a panic.
pub fn recover_signer(
    api: &dyn Api,
    digest: &[u8; 32],
    signature: &[u8],
    prefix: &str,
) -> Result<Addr, ContractError> {
    if signature.len() != 65 {
        return Err(ContractError::InvalidSignature {});
    }
    let v = signature[64];
    if v != 27 && v != 28 {
        return Err(ContractError::InvalidSignature {});
    }
    let pubkey = api
        .secp256k1_recover_pubkey(digest, &signature[..64], v - 27)
        .map_err(|_| ContractError::InvalidSignature {})?;
    pk_to_addr(api, &pubkey, prefix)
}

/// Derives the bech32 address controlled by a secp256k1 public key
/// in compressed or uncompressed form.
pub fn pk_to_addr(api: &dyn Api, pk: &[u8], prefix: &str) -> Result<Addr, ContractError> {
    // serialize() returns the compressed form.
    let compressed = secp256k1::PublicKey::from_slice(pk)?.serialize();
    let sha_hash = Sha256::digest(compressed);
    let rip_hash = Ripemd160::digest(sha_hash);
    let addr = bech32::encode(prefix, rip_hash.to_base32(), Variant::Bech32)?;
    Ok(api.addr_validate(&addr)?)
}
