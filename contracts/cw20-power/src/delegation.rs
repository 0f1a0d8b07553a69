//! Delegation bookkeeping. Power always sits with a delegatee, so
//! balance changes move power between the delegatees of the parties
//! involved and never need to read the parties' balances.

use cosmwasm_std::{Addr, Event, StdError, StdResult, Storage, Uint128};
use cw20_base::state::BALANCES;

use crate::error::ContractError;
use crate::state::PowerType;

/// The account's delegatee for a power type. Accounts with no
/// recorded delegation are self-delegated.
pub fn delegatee_of(storage: &dyn Storage, account: &Addr, power_type: PowerType) -> StdResult<Addr> {
    Ok(power_type
        .delegates()
        .may_load(storage, account)?
        .unwrap_or_else(|| account.clone()))
}

fn power_changed(account: &Addr, power: Uint128, power_type: PowerType) -> Event {
    Event::new("power_changed")
        .add_attribute("account", account.to_string())
        .add_attribute("power", power)
        .add_attribute("power_type", power_type.as_str())
}

/// Moves `amount` of delegated power between two accounts,
/// checkpointing both. `None` is the zero address, used when minting
/// or burning. A move from an account to itself is a no-op and
/// writes no checkpoints.
pub fn move_delegated_power(
    storage: &mut dyn Storage,
    height: u64,
    from: Option<&Addr>,
    to: Option<&Addr>,
    amount: Uint128,
    power_type: PowerType,
) -> Result<Vec<Event>, ContractError> {
    if from == to {
        return Ok(vec![]);
    }
    let checkpoints = power_type.checkpoints();
    let mut events = Vec::with_capacity(2);
    if let Some(from) = from {
        let new = checkpoints.update(storage, from, height, |power| {
            power
                .unwrap_or_default()
                .checked_sub(amount)
                .map_err(|_| ContractError::PowerUnderflow {
                    account: from.clone(),
                    amount,
                    power_type,
                })
        })?;
        events.push(power_changed(from, new, power_type));
    }
    if let Some(to) = to {
        let new = checkpoints.update(storage, to, height, |power| {
            power
                .unwrap_or_default()
                .checked_add(amount)
                .map_err(|e| ContractError::Std(StdError::overflow(e)))
        })?;
        events.push(power_changed(to, new, power_type));
    }
    Ok(events)
}

/// Records `delegator`'s new delegatee for one power type and moves
/// the delegator's full balance worth of power from the old delegatee
/// to the new one. Delegating to the current delegatee changes
/// nothing.
pub fn delegate(
    storage: &mut dyn Storage,
    height: u64,
    delegator: &Addr,
    delegatee: &Addr,
    power_type: PowerType,
) -> Result<Vec<Event>, ContractError> {
    let previous = delegatee_of(storage, delegator, power_type)?;
    power_type.delegates().save(storage, delegator, delegatee)?;

    let balance = BALANCES.may_load(storage, delegator)?.unwrap_or_default();
    let mut events = vec![Event::new("delegate_changed")
        .add_attribute("delegator", delegator.to_string())
        .add_attribute("delegatee", delegatee.to_string())
        .add_attribute("power_type", power_type.as_str())];
    events.extend(move_delegated_power(
        storage,
        height,
        Some(&previous),
        Some(delegatee),
        balance,
        power_type,
    )?);
    Ok(events)
}

/// Moves the power backing a balance change. Called after the ledger
/// has been updated; `None` for `from` on a mint and for `to` on a
/// burn.
pub fn transfer_hook(
    storage: &mut dyn Storage,
    height: u64,
    from: Option<&Addr>,
    to: Option<&Addr>,
    amount: Uint128,
) -> Result<Vec<Event>, ContractError> {
    let mut events = Vec::new();
    for power_type in PowerType::BOTH {
        let from_delegatee = from
            .map(|account| delegatee_of(storage, account, power_type))
            .transpose()?;
        let to_delegatee = to
            .map(|account| delegatee_of(storage, account, power_type))
            .transpose()?;
        events.extend(move_delegated_power(
            storage,
            height,
            from_delegatee.as_ref(),
            to_delegatee.as_ref(),
            amount,
            power_type,
        )?);
    }
    Ok(events)
}
