use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_checkpoints::Checkpoints;
use cw_storage_plus::{Item, Map};

/// The two kinds of governance power a balance carries. Each is
/// delegated and checkpointed independently.
#[cw_serde]
#[derive(Copy)]
pub enum PowerType {
    Voting,
    Proposition,
}

impl PowerType {
    pub const BOTH: [PowerType; 2] = [PowerType::Voting, PowerType::Proposition];

    /// Registry of delegatees for this power type. No entry means the
    /// account is self-delegated.
    pub fn delegates(self) -> Map<'static, &'static Addr, Addr> {
        match self {
            PowerType::Voting => VOTING_DELEGATES,
            PowerType::Proposition => PROPOSITION_DELEGATES,
        }
    }

    /// Checkpointed power history for this power type.
    pub fn checkpoints(self) -> Checkpoints<'static, Addr> {
        match self {
            PowerType::Voting => VOTING_POWER,
            PowerType::Proposition => PROPOSITION_POWER,
        }
    }

    /// The uint256 value identifying this power type in typed-data
    /// struct hashes.
    pub fn index(self) -> u128 {
        match self {
            PowerType::Voting => 0,
            PowerType::Proposition => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PowerType::Voting => "voting",
            PowerType::Proposition => "proposition",
        }
    }
}

impl std::fmt::Display for PowerType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cw_serde]
pub struct Config {
    /// Bech32 prefix addresses on this chain use. Needed to derive
    /// the address controlled by a recovered signing key.
    pub bech32_prefix: String,
}

pub const CONFIG: Item<Config> = Item::new("config");

/// Sequential nonces for signed messages. One sequence per signer,
/// shared by permits and delegations.
pub const NONCES: Map<&Addr, Uint128> = Map::new("nonces");

pub const VOTING_DELEGATES: Map<&Addr, Addr> = Map::new("voting_delegates");
pub const PROPOSITION_DELEGATES: Map<&Addr, Addr> = Map::new("proposition_delegates");

pub const VOTING_POWER: Checkpoints<Addr> = Checkpoints::new("voting_power", "voting_power__count");
pub const PROPOSITION_POWER: Checkpoints<Addr> =
    Checkpoints::new("proposition_power", "proposition_power__count");
