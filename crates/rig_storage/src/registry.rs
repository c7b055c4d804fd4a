#![forbid(unsafe_code)]

//! Single-active registry: at most one record per (table, scope) is
//! active at any time.
//!
//! The swap (deactivate every same-scope row, activate the target) is
//! one mutation pass under `&mut`, so callers observe it as a single
//! atomic unit; the most recent activation wins.

use std::collections::BTreeMap;

use rig_contracts::MonotonicTimeNs;

use crate::store::StorageError;

/// A record that participates in the single-active invariant for some
/// scope partition of its table.
pub trait ActiveScoped {
    type Scope: Clone + Eq;

    fn scope(&self) -> Self::Scope;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
    fn created_at(&self) -> MonotonicTimeNs;
}

/// Marks `id` active and every other record sharing its scope
/// inactive. When `id` is absent the table is left untouched and
/// `NotFound` is reported.
pub fn activate_in<K, R>(
    table: &mut BTreeMap<K, R>,
    table_name: &'static str,
    id: K,
    key: String,
) -> Result<(), StorageError>
where
    K: Ord,
    R: ActiveScoped,
{
    let scope = match table.get(&id) {
        Some(row) => row.scope(),
        None => {
            return Err(StorageError::NotFound {
                table: table_name,
                key,
            })
        }
    };
    for (k, row) in table.iter_mut() {
        if row.scope() == scope {
            row.set_active(*k == id);
        }
    }
    Ok(())
}

/// The active record for a scope, or `None` (not an error). Should an
/// externally produced snapshot carry several active rows, the most
/// recently created one wins.
pub fn active_in<'a, K, R>(table: &'a BTreeMap<K, R>, scope: &R::Scope) -> Option<&'a R>
where
    K: Ord,
    R: ActiveScoped,
{
    table
        .values()
        .filter(|row| row.is_active() && row.scope() == *scope)
        .max_by_key(|row| row.created_at())
}

/// Clears the active marker on every record in a scope.
pub fn deactivate_scope<K, R>(table: &mut BTreeMap<K, R>, scope: &R::Scope)
where
    K: Ord,
    R: ActiveScoped,
{
    for row in table.values_mut() {
        if row.scope() == *scope {
            row.set_active(false);
        }
    }
}

/// Guard for raw upserts: a record may only claim the active marker if
/// no other record in its scope already holds it. The atomic swap is
/// the sole sanctioned way to move the marker between records.
pub fn check_activation_conflict<K, R>(
    table: &BTreeMap<K, R>,
    table_name: &'static str,
    incoming_id: &K,
    incoming: &R,
    scope_label: String,
) -> Result<(), StorageError>
where
    K: Ord,
    R: ActiveScoped,
{
    if !incoming.is_active() {
        return Ok(());
    }
    let conflicting = table
        .iter()
        .any(|(k, row)| k != incoming_id && row.is_active() && row.scope() == incoming.scope());
    if conflicting {
        return Err(StorageError::ActivationConflict {
            table: table_name,
            scope: scope_label,
        });
    }
    Ok(())
}
