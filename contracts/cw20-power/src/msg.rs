use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, HexBinary, Uint128, Uint64};
use cw20::{Cw20Coin, Expiration, Logo, MinterResponse};
use cw20_base::msg::InstantiateMarketingInfo;

use crate::state::PowerType;

#[cw_serde]
pub struct InstantiateMsg {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub initial_balances: Vec<Cw20Coin>,
    pub mint: Option<MinterResponse>,
    pub marketing: Option<InstantiateMarketingInfo>,
    /// Bech32 prefix addresses on this chain use, for example
    /// "juno". Used to derive the address controlled by a recovered
    /// signing key.
    pub bech32_prefix: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    Transfer {
        recipient: String,
        amount: Uint128,
    },
    Burn {
        amount: Uint128,
    },
    Send {
        contract: String,
        amount: Uint128,
        msg: Binary,
    },
    Mint {
        recipient: String,
        amount: Uint128,
    },
    UpdateMinter {
        new_minter: Option<String>,
    },
    IncreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
    DecreaseAllowance {
        spender: String,
        amount: Uint128,
        expires: Option<Expiration>,
    },
    TransferFrom {
        owner: String,
        recipient: String,
        amount: Uint128,
    },
    SendFrom {
        owner: String,
        contract: String,
        amount: Uint128,
        msg: Binary,
    },
    BurnFrom {
        owner: String,
        amount: Uint128,
    },
    UpdateMarketing {
        project: Option<String>,
        description: Option<String>,
        marketing: Option<String>,
    },
    UploadLogo(Logo),
    /// Sets `spender`'s allowance over `owner`'s tokens to exactly
    /// `value`, authorized by `owner`'s signature over a typed-data
    /// digest instead of a message sent by `owner`. The allowance
    /// never expires. `signature` is 65 bytes, `r || s || v`, over
    /// the owner's current nonce. A `deadline` of `u64::MAX` never
    /// expires; any other deadline is a unix timestamp in seconds
    /// which must not have passed.
    Permit {
        owner: String,
        spender: String,
        value: Uint128,
        deadline: Uint64,
        signature: HexBinary,
    },
    /// Delegates both of the sender's power types to `delegatee`.
    /// Delegating to yourself clears a delegation.
    Delegate {
        delegatee: String,
    },
    /// Delegates a single one of the sender's power types.
    DelegateByType {
        delegatee: String,
        power_type: PowerType,
    },
    /// `Delegate`, authorized by a signature rather than the message
    /// sender. `nonce` must equal the signer's current nonce. The
    /// expiry follows the same rules as a permit deadline.
    DelegateBySig {
        delegatee: String,
        nonce: Uint128,
        expiry: Uint64,
        signature: HexBinary,
    },
    DelegateByTypeBySig {
        delegatee: String,
        power_type: PowerType,
        nonce: Uint128,
        expiry: Uint64,
        signature: HexBinary,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// The current power of an account.
    #[returns(PowerResponse)]
    Power { address: String, power_type: PowerType },
    /// The power of an account as of the end of `height`. Errors if
    /// `height` is in the future.
    #[returns(PowerAtHeightResponse)]
    PowerAtHeight {
        address: String,
        power_type: PowerType,
        height: u64,
    },
    /// The account's delegatee for a power type. Self-delegated
    /// accounts return themselves.
    #[returns(DelegateeResponse)]
    Delegatee { address: String, power_type: PowerType },
    /// The nonce the account's next signed message must be signed
    /// over.
    #[returns(NonceResponse)]
    Nonce { address: String },
    #[returns(cw20::BalanceResponse)]
    Balance { address: String },
    #[returns(cw20::TokenInfoResponse)]
    TokenInfo {},
    #[returns(Option<cw20::MinterResponse>)]
    Minter {},
    #[returns(cw20::AllowanceResponse)]
    Allowance { owner: String, spender: String },
    #[returns(cw20::AllAllowancesResponse)]
    AllAllowances {
        owner: String,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(cw20::AllSpenderAllowancesResponse)]
    AllSpenderAllowances {
        spender: String,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(cw20::AllAccountsResponse)]
    AllAccounts {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(cw20::MarketingInfoResponse)]
    MarketingInfo {},
    #[returns(cw20::DownloadLogoResponse)]
    DownloadLogo {},
}

#[cw_serde]
pub struct PowerResponse {
    pub power: Uint128,
}

#[cw_serde]
pub struct PowerAtHeightResponse {
    pub power: Uint128,
    pub height: u64,
}

#[cw_serde]
pub struct DelegateeResponse {
    pub delegatee: Addr,
}

#[cw_serde]
pub struct NonceResponse {
    pub nonce: Uint128,
}
