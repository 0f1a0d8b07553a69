use cosmwasm_std::{Addr, StdError, Uint128};
use thiserror::Error;

use crate::state::PowerType;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    Cw20(#[from] cw20_base::ContractError),

    #[error(transparent)]
    Bech32(#[from] bech32::Error),

    #[error(transparent)]
    Secp256k1(#[from] secp256k1::Error),

    #[error("invalid delegatee")]
    InvalidDelegatee {},

    #[error("invalid owner")]
    InvalidOwner {},

    #[error("invalid signature")]
    InvalidSignature {},

    #[error("invalid nonce")]
    InvalidNonce {},

    #[error("invalid expiration")]
    InvalidExpiration {},

    #[error("{account} has less than {amount} delegated {power_type} power")]
    PowerUnderflow {
        account: Addr,
        amount: Uint128,
        power_type: PowerType,
    },
}
