#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_json_binary, Addr, Api, Binary, Deps, DepsMut, Env, HexBinary, MessageInfo, Response,
    StdError, StdResult, Storage, Uint128, Uint64,
};
use cw2::set_contract_version;
use cw20::{AllowanceResponse, Expiration, Logo};
use cw20_base::state::{ALLOWANCES, ALLOWANCES_SPENDER, TOKEN_INFO};

use crate::delegation::{delegate, delegatee_of, transfer_hook};
use crate::eip712;
use crate::error::ContractError;
use crate::msg::{
    DelegateeResponse, ExecuteMsg, InstantiateMsg, NonceResponse, PowerAtHeightResponse,
    PowerResponse, QueryMsg,
};
use crate::state::{Config, PowerType, CONFIG, NONCES};

pub(crate) const CONTRACT_NAME: &str = "crates.io:cw20-power";
pub(crate) const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    let resp = cw20_base::contract::instantiate(
        deps.branch(),
        env.clone(),
        info,
        cw20_base::msg::InstantiateMsg {
            name: msg.name,
            symbol: msg.symbol,
            decimals: msg.decimals,
            initial_balances: msg.initial_balances.clone(),
            mint: msg.mint,
            marketing: msg.marketing,
        },
    )?;
    // cw20-base set its own contract version, overwrite it.
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    CONFIG.save(
        deps.storage,
        &Config {
            bech32_prefix: msg.bech32_prefix,
        },
    )?;

    // Initial holders start self-delegated, so each gets genesis
    // checkpoints equal to its balance.
    let mut events = Vec::new();
    for coin in msg.initial_balances {
        let account = deps.api.addr_validate(&coin.address)?;
        events.extend(transfer_hook(
            deps.storage,
            env.block.height,
            None,
            Some(&account),
            coin.amount,
        )?);
    }
    Ok(resp.add_events(events))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Transfer { recipient, amount } => {
            execute_transfer(deps, env, info, recipient, amount)
        }
        ExecuteMsg::Burn { amount } => execute_burn(deps, env, info, amount),
        ExecuteMsg::Send {
            contract,
            amount,
            msg,
        } => execute_send(deps, env, info, contract, amount, msg),
        ExecuteMsg::Mint { recipient, amount } => execute_mint(deps, env, info, recipient, amount),
        ExecuteMsg::UpdateMinter { new_minter } => {
            Ok(cw20_base::contract::execute_update_minter(
                deps, env, info, new_minter,
            )?)
        }
        ExecuteMsg::IncreaseAllowance {
            spender,
            amount,
            expires,
        } => Ok(cw20_base::allowances::execute_increase_allowance(
            deps, env, info, spender, amount, expires,
        )?),
        ExecuteMsg::DecreaseAllowance {
            spender,
            amount,
            expires,
        } => Ok(cw20_base::allowances::execute_decrease_allowance(
            deps, env, info, spender, amount, expires,
        )?),
        ExecuteMsg::TransferFrom {
            owner,
            recipient,
            amount,
        } => execute_transfer_from(deps, env, info, owner, recipient, amount),
        ExecuteMsg::SendFrom {
            owner,
            contract,
            amount,
            msg,
        } => execute_send_from(deps, env, info, owner, contract, amount, msg),
        ExecuteMsg::BurnFrom { owner, amount } => execute_burn_from(deps, env, info, owner, amount),
        ExecuteMsg::UpdateMarketing {
            project,
            description,
            marketing,
        } => Ok(cw20_base::contract::execute_update_marketing(
            deps,
            env,
            info,
            project,
            description,
            marketing,
        )?),
        ExecuteMsg::UploadLogo(logo) => execute_upload_logo(deps, env, info, logo),
        ExecuteMsg::Permit {
            owner,
            spender,
            value,
            deadline,
            signature,
        } => execute_permit(deps, env, owner, spender, value, deadline, signature),
        ExecuteMsg::Delegate { delegatee } => execute_delegate(deps, env, info, delegatee),
        ExecuteMsg::DelegateByType {
            delegatee,
            power_type,
        } => execute_delegate_by_type(deps, env, info, delegatee, power_type),
        ExecuteMsg::DelegateBySig {
            delegatee,
            nonce,
            expiry,
            signature,
        } => execute_delegate_by_sig(deps, env, delegatee, nonce, expiry, signature),
        ExecuteMsg::DelegateByTypeBySig {
            delegatee,
            power_type,
            nonce,
            expiry,
            signature,
        } => execute_delegate_by_type_by_sig(
            deps, env, delegatee, power_type, nonce, expiry, signature,
        ),
    }
}

pub fn execute_transfer(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let sender = info.sender.clone();
    let recipient_addr = deps.api.addr_validate(&recipient)?;
    let resp = cw20_base::contract::execute_transfer(deps.branch(), env.clone(), info, recipient, amount)?;
    let events = transfer_hook(
        deps.storage,
        env.block.height,
        Some(&sender),
        Some(&recipient_addr),
        amount,
    )?;
    Ok(resp.add_events(events))
}

pub fn execute_burn(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let sender = info.sender.clone();
    let resp = cw20_base::contract::execute_burn(deps.branch(), env.clone(), info, amount)?;
    let events = transfer_hook(deps.storage, env.block.height, Some(&sender), None, amount)?;
    Ok(resp.add_events(events))
}

pub fn execute_send(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    contract: String,
    amount: Uint128,
    msg: Binary,
) -> Result<Response, ContractError> {
    let sender = info.sender.clone();
    let contract_addr = deps.api.addr_validate(&contract)?;
    let resp =
        cw20_base::contract::execute_send(deps.branch(), env.clone(), info, contract, amount, msg)?;
    let events = transfer_hook(
        deps.storage,
        env.block.height,
        Some(&sender),
        Some(&contract_addr),
        amount,
    )?;
    Ok(resp.add_events(events))
}

pub fn execute_mint(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let recipient_addr = deps.api.addr_validate(&recipient)?;
    let resp = cw20_base::contract::execute_mint(deps.branch(), env.clone(), info, recipient, amount)?;
    let events = transfer_hook(
        deps.storage,
        env.block.height,
        None,
        Some(&recipient_addr),
        amount,
    )?;
    Ok(resp.add_events(events))
}

pub fn execute_transfer_from(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
    recipient: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let owner_addr = deps.api.addr_validate(&owner)?;
    let recipient_addr = deps.api.addr_validate(&recipient)?;
    let resp = cw20_base::allowances::execute_transfer_from(
        deps.branch(),
        env.clone(),
        info,
        owner,
        recipient,
        amount,
    )?;
    let events = transfer_hook(
        deps.storage,
        env.block.height,
        Some(&owner_addr),
        Some(&recipient_addr),
        amount,
    )?;
    Ok(resp.add_events(events))
}

pub fn execute_send_from(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
    contract: String,
    amount: Uint128,
    msg: Binary,
) -> Result<Response, ContractError> {
    let owner_addr = deps.api.addr_validate(&owner)?;
    let contract_addr = deps.api.addr_validate(&contract)?;
    let resp = cw20_base::allowances::execute_send_from(
        deps.branch(),
        env.clone(),
        info,
        owner,
        contract,
        amount,
        msg,
    )?;
    let events = transfer_hook(
        deps.storage,
        env.block.height,
        Some(&owner_addr),
        Some(&contract_addr),
        amount,
    )?;
    Ok(resp.add_events(events))
}

pub fn execute_burn_from(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let owner_addr = deps.api.addr_validate(&owner)?;
    let resp =
        cw20_base::allowances::execute_burn_from(deps.branch(), env.clone(), info, owner, amount)?;
    let events = transfer_hook(
        deps.storage,
        env.block.height,
        Some(&owner_addr),
        None,
        amount,
    )?;
    Ok(resp.add_events(events))
}

pub fn execute_upload_logo(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    logo: Logo,
) -> Result<Response, ContractError> {
    Ok(cw20_base::contract::execute_upload_logo(deps, env, info, logo)?)
}

pub fn execute_permit(
    deps: DepsMut,
    env: Env,
    owner: String,
    spender: String,
    value: Uint128,
    deadline: Uint64,
    signature: HexBinary,
) -> Result<Response, ContractError> {
    if owner.is_empty() {
        return Err(ContractError::InvalidOwner {});
    }
    let owner_addr = deps.api.addr_validate(&owner)?;
    let spender_addr = deps.api.addr_validate(&spender)?;
    if owner_addr == spender_addr {
        return Err(cw20_base::ContractError::CannotSetOwnAccount {}.into());
    }
    eip712::assert_not_expired(&env, deadline)?;

    let nonce = NONCES.may_load(deps.storage, &owner_addr)?.unwrap_or_default();
    let digest = eip712::permit_digest(
        &domain_separator(deps.storage, &env)?,
        owner_addr.as_str(),
        spender_addr.as_str(),
        value,
        nonce,
        deadline,
    );
    let config = CONFIG.load(deps.storage)?;
    let signer = eip712::recover_signer(deps.api, &digest, &signature, &config.bech32_prefix)?;
    if signer != owner_addr {
        return Err(ContractError::InvalidSignature {});
    }
    NONCES.save(deps.storage, &owner_addr, &(nonce + Uint128::one()))?;

    // The permit replaces whatever allowance the spender had, and
    // permitted allowances never expire.
    let allowance = AllowanceResponse {
        allowance: value,
        expires: Expiration::Never {},
    };
    ALLOWANCES.save(deps.storage, (&owner_addr, &spender_addr), &allowance)?;
    ALLOWANCES_SPENDER.save(deps.storage, (&spender_addr, &owner_addr), &allowance)?;

    Ok(Response::new()
        .add_attribute("action", "permit")
        .add_attribute("owner", owner_addr)
        .add_attribute("spender", spender_addr)
        .add_attribute("amount", value))
}

pub fn execute_delegate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    delegatee: String,
) -> Result<Response, ContractError> {
    let delegatee = validate_delegatee(deps.as_ref(), &delegatee)?;
    let mut events = Vec::new();
    for power_type in PowerType::BOTH {
        events.extend(delegate(
            deps.storage,
            env.block.height,
            &info.sender,
            &delegatee,
            power_type,
        )?);
    }
    Ok(Response::new()
        .add_attribute("action", "delegate")
        .add_attribute("delegator", info.sender)
        .add_attribute("delegatee", delegatee)
        .add_events(events))
}

pub fn execute_delegate_by_type(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    delegatee: String,
    power_type: PowerType,
) -> Result<Response, ContractError> {
    let delegatee = validate_delegatee(deps.as_ref(), &delegatee)?;
    let events = delegate(
        deps.storage,
        env.block.height,
        &info.sender,
        &delegatee,
        power_type,
    )?;
    Ok(Response::new()
        .add_attribute("action", "delegate_by_type")
        .add_attribute("delegator", info.sender)
        .add_attribute("delegatee", delegatee)
        .add_attribute("power_type", power_type.as_str())
        .add_events(events))
}

pub fn execute_delegate_by_sig(
    deps: DepsMut,
    env: Env,
    delegatee: String,
    nonce: Uint128,
    expiry: Uint64,
    signature: HexBinary,
) -> Result<Response, ContractError> {
    let delegatee = validate_delegatee(deps.as_ref(), &delegatee)?;
    eip712::assert_not_expired(&env, expiry)?;

    let digest = eip712::delegate_digest(
        &domain_separator(deps.storage, &env)?,
        delegatee.as_str(),
        nonce,
        expiry,
    );
    let delegator = authorize_signed_delegation(deps.storage, deps.api, &digest, &signature, nonce)?;

    let mut events = Vec::new();
    for power_type in PowerType::BOTH {
        events.extend(delegate(
            deps.storage,
            env.block.height,
            &delegator,
            &delegatee,
            power_type,
        )?);
    }
    Ok(Response::new()
        .add_attribute("action", "delegate_by_sig")
        .add_attribute("delegator", delegator)
        .add_attribute("delegatee", delegatee)
        .add_events(events))
}

pub fn execute_delegate_by_type_by_sig(
    deps: DepsMut,
    env: Env,
    delegatee: String,
    power_type: PowerType,
    nonce: Uint128,
    expiry: Uint64,
    signature: HexBinary,
) -> Result<Response, ContractError> {
    let delegatee = validate_delegatee(deps.as_ref(), &delegatee)?;
    eip712::assert_not_expired(&env, expiry)?;

    let digest = eip712::delegate_by_type_digest(
        &domain_separator(deps.storage, &env)?,
        delegatee.as_str(),
        power_type,
        nonce,
        expiry,
    );
    let delegator = authorize_signed_delegation(deps.storage, deps.api, &digest, &signature, nonce)?;

    let events = delegate(
        deps.storage,
        env.block.height,
        &delegator,
        &delegatee,
        power_type,
    )?;
    Ok(Response::new()
        .add_attribute("action", "delegate_by_type_by_sig")
        .add_attribute("delegator", delegator)
        .add_attribute("delegatee", delegatee)
        .add_attribute("power_type", power_type.as_str())
        .add_events(events))
}

fn validate_delegatee(deps: Deps, delegatee: &str) -> Result<Addr, ContractError> {
    if delegatee.is_empty() {
        return Err(ContractError::InvalidDelegatee {});
    }
    Ok(deps.api.addr_validate(delegatee)?)
}

fn domain_separator(storage: &dyn Storage, env: &Env) -> StdResult<[u8; 32]> {
    let token_info = TOKEN_INFO.load(storage)?;
    Ok(eip712::domain_separator(
        &token_info.name,
        &env.block.chain_id,
        &env.contract.address,
    ))
}

/// Recovers the delegator behind a signed delegation and consumes
/// their nonce.
fn authorize_signed_delegation(
    storage: &mut dyn Storage,
    api: &dyn Api,
    digest: &[u8; 32],
    signature: &HexBinary,
    nonce: Uint128,
) -> Result<Addr, ContractError> {
    let config = CONFIG.load(storage)?;
    let delegator = eip712::recover_signer(api, digest, signature, &config.bech32_prefix)?;
    let expected = NONCES.may_load(storage, &delegator)?.unwrap_or_default();
    if nonce != expected {
        return Err(ContractError::InvalidNonce {});
    }
    NONCES.save(storage, &delegator, &(expected + Uint128::one()))?;
    Ok(delegator)
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Power {
            address,
            power_type,
        } => to_json_binary(&query_power(deps, address, power_type)?),
        QueryMsg::PowerAtHeight {
            address,
            power_type,
            height,
        } => to_json_binary(&query_power_at_height(deps, env, address, power_type, height)?),
        QueryMsg::Delegatee {
            address,
            power_type,
        } => to_json_binary(&query_delegatee(deps, address, power_type)?),
        QueryMsg::Nonce { address } => to_json_binary(&query_nonce(deps, address)?),
        QueryMsg::Balance { address } => {
            to_json_binary(&cw20_base::contract::query_balance(deps, address)?)
        }
        QueryMsg::TokenInfo {} => to_json_binary(&cw20_base::contract::query_token_info(deps)?),
        QueryMsg::Minter {} => to_json_binary(&cw20_base::contract::query_minter(deps)?),
        QueryMsg::Allowance { owner, spender } => to_json_binary(
            &cw20_base::allowances::query_allowance(deps, owner, spender)?,
        ),
        QueryMsg::AllAllowances {
            owner,
            start_after,
            limit,
        } => to_json_binary(&cw20_base::enumerable::query_owner_allowances(
            deps,
            owner,
            start_after,
            limit,
        )?),
        QueryMsg::AllSpenderAllowances {
            spender,
            start_after,
            limit,
        } => to_json_binary(&cw20_base::enumerable::query_spender_allowances(
            deps,
            spender,
            start_after,
            limit,
        )?),
        QueryMsg::AllAccounts { start_after, limit } => to_json_binary(
            &cw20_base::enumerable::query_all_accounts(deps, start_after, limit)?,
        ),
        QueryMsg::MarketingInfo {} => {
            to_json_binary(&cw20_base::contract::query_marketing_info(deps)?)
        }
        QueryMsg::DownloadLogo {} => {
            to_json_binary(&cw20_base::contract::query_download_logo(deps)?)
        }
    }
}

pub fn query_power(deps: Deps, address: String, power_type: PowerType) -> StdResult<PowerResponse> {
    let address = deps.api.addr_validate(&address)?;
    let power = power_type
        .checkpoints()
        .may_load(deps.storage, &address)?
        .unwrap_or_default();
    Ok(PowerResponse { power })
}

pub fn query_power_at_height(
    deps: Deps,
    env: Env,
    address: String,
    power_type: PowerType,
    height: u64,
) -> StdResult<PowerAtHeightResponse> {
    if height > env.block.height {
        return Err(StdError::generic_err(format!(
            "invalid block number: {} is after the current block ({})",
            height, env.block.height
        )));
    }
    let address = deps.api.addr_validate(&address)?;
    let power = power_type
        .checkpoints()
        .may_load_at_height(deps.storage, &address, height)?
        .unwrap_or_default();
    Ok(PowerAtHeightResponse { power, height })
}

pub fn query_delegatee(
    deps: Deps,
    address: String,
    power_type: PowerType,
) -> StdResult<DelegateeResponse> {
    let address = deps.api.addr_validate(&address)?;
    let delegatee = delegatee_of(deps.storage, &address, power_type)?;
    Ok(DelegateeResponse { delegatee })
}

pub fn query_nonce(deps: Deps, address: String) -> StdResult<NonceResponse> {
    let address = deps.api.addr_validate(&address)?;
    let nonce = NONCES.may_load(deps.storage, &address)?.unwrap_or_default();
    Ok(NonceResponse { nonce })
}
