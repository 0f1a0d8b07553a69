use std::marker::PhantomData;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdError, StdResult, Storage, Uint128};
use cw_storage_plus::{Map, PrimaryKey};

/// A single entry in a key's history: the value that was in effect
/// from `height` until the height of the next entry.
#[cw_serde]
pub struct Checkpoint {
    pub height: u64,
    pub power: Uint128,
}

/// An append-only, per-key list of `(height, power)` checkpoints with
/// an explicit length counter.
///
/// Writing at the height of the last stored entry overwrites that
/// entry in place, so a key has at most one checkpoint per height no
/// matter how many updates land in one block. Entries for earlier
/// heights are never touched again, which makes historical reads
/// stable: `may_load_at_height` answers "what was the value as of
/// height H" with a lower-bound binary search over the stored
/// entries, in O(log n) storage reads. Appending is O(1).
///
/// # Example
///
/// ```
/// # use cosmwasm_std::{testing::mock_dependencies, Addr, Uint128};
/// # use cw_checkpoints::Checkpoints;
/// let storage = &mut mock_dependencies().storage;
/// let power: Checkpoints<Addr> = Checkpoints::new("power", "power__count");
/// let key = Addr::unchecked("ekez");
///
/// power.save(storage, &key, Uint128::new(10), 5).unwrap();
/// power.save(storage, &key, Uint128::new(7), 8).unwrap();
///
/// assert_eq!(power.may_load(storage, &key).unwrap(), Some(Uint128::new(7)));
/// // no checkpoint existed at height 4
/// assert_eq!(power.may_load_at_height(storage, &key, 4).unwrap(), None);
/// assert_eq!(
///     power.may_load_at_height(storage, &key, 6).unwrap(),
///     Some(Uint128::new(10))
/// );
/// ```
pub struct Checkpoints<'n, K> {
    entry_namespace: &'n str,
    count_namespace: &'n str,
    k: PhantomData<K>,
}

impl<'n, K> Checkpoints<'n, K> {
    /// Creates a new checkpoint list using the provided namespaces
    /// for entries and per-key counts.
    pub const fn new(entry_namespace: &'n str, count_namespace: &'n str) -> Self {
        Self {
            entry_namespace,
            count_namespace,
            k: PhantomData,
        }
    }
}

impl<'n, K> Checkpoints<'n, K>
where
    K: Clone,
    for<'a> &'a K: PrimaryKey<'a>,
    for<'a> &'a (K, u64): PrimaryKey<'a>,
{
    const fn entries<'a>(&self) -> Map<'n, &'a (K, u64), Checkpoint> {
        Map::new(self.entry_namespace)
    }

    const fn counts<'a>(&self) -> Map<'n, &'a K, u64> {
        Map::new(self.count_namespace)
    }

    /// The number of checkpoints stored for this key.
    pub fn count(&self, storage: &dyn Storage, k: &K) -> StdResult<u64> {
        Ok(self.counts().may_load(storage, k)?.unwrap_or_default())
    }

    /// Records `power` as the key's value as of `height`. If the last
    /// stored entry is at `height` it is overwritten, otherwise a new
    /// entry is appended. `height` must not be lower than the last
    /// stored entry's height.
    pub fn save(
        &self,
        storage: &mut dyn Storage,
        k: &K,
        power: Uint128,
        height: u64,
    ) -> StdResult<()> {
        let count = self.count(storage, k)?;
        if count > 0 {
            let last = self.entries().load(storage, &(k.clone(), count - 1))?;
            if last.height > height {
                return Err(StdError::generic_err(format!(
                    "checkpoint height may not decrease (last {}, got {})",
                    last.height, height
                )));
            }
            if last.height == height {
                return self
                    .entries()
                    .save(storage, &(k.clone(), count - 1), &Checkpoint { height, power });
            }
        }
        self.entries()
            .save(storage, &(k.clone(), count), &Checkpoint { height, power })?;
        self.counts().save(storage, k, &(count + 1))
    }

    /// The latest checkpointed value, or `None` if the key has no
    /// history.
    pub fn may_load(&self, storage: &dyn Storage, k: &K) -> StdResult<Option<Uint128>> {
        let count = self.count(storage, k)?;
        if count == 0 {
            return Ok(None);
        }
        let last = self.entries().load(storage, &(k.clone(), count - 1))?;
        Ok(Some(last.power))
    }

    /// The value in effect at `height`: the latest checkpoint whose
    /// height is `<= height`, or `None` if no checkpoint existed at
    /// or before that height. Callers are responsible for rejecting
    /// heights in their future; this type has no notion of "now".
    pub fn may_load_at_height(
        &self,
        storage: &dyn Storage,
        k: &K,
        height: u64,
    ) -> StdResult<Option<Uint128>> {
        let count = self.count(storage, k)?;

        // Lower-bound binary search for the first entry strictly
        // after `height`. Everything before that index is `<= height`.
        let (mut lo, mut hi) = (0, count);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let entry = self.entries().load(storage, &(k.clone(), mid))?;
            if entry.height <= height {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        if lo == 0 {
            return Ok(None);
        }
        let entry = self.entries().load(storage, &(k.clone(), lo - 1))?;
        Ok(Some(entry.power))
    }

    /// Loads the latest value (if any), applies `action`, and stores
    /// the result as a checkpoint at `height`. Returns the new value.
    pub fn update<A, E>(
        &self,
        storage: &mut dyn Storage,
        k: &K,
        height: u64,
        action: A,
    ) -> Result<Uint128, E>
    where
        A: FnOnce(Option<Uint128>) -> Result<Uint128, E>,
        E: From<StdError>,
    {
        let new = action(self.may_load(storage, k)?)?;
        self.save(storage, k, new, height)?;
        Ok(new)
    }
}
