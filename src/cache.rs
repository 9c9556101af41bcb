//! The process-wide template-type to formula cache.
//!
//! Single-writer-many-reader: the first render of a template type compiles
//! its formula and publishes it; once published a formula is immutable and
//! shared without locking. Concurrent first renders may compile redundantly
//! but only the first published formula is kept, so all readers observe one
//! consistent value. Compilation failures never populate the cache.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::compile;
use crate::{Formula, Result, Template};

type Shared = Arc<dyn Any + Send + Sync>;

static CACHE: OnceLock<RwLock<HashMap<TypeId, Shared>>> = OnceLock::new();

fn cache() -> &'static RwLock<HashMap<TypeId, Shared>> {
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Fetch the formula for a template type, compiling it on first use.
pub(crate) fn formula<T: Template>(template: &T) -> Result<Arc<Formula<T::Context>>> {
    let id = TypeId::of::<T>();
    if let Some(entry) = cache().read().unwrap().get(&id) {
        return Ok(downcast::<T>(Arc::clone(entry)));
    }

    // Compile outside the lock. Embedded templates re-enter this function,
    // and holding the lock across compilation would self-deadlock.
    let compiled: Shared = Arc::new(compile::formula(template)?);
    let mut map = cache().write().unwrap();
    let entry = map.entry(id).or_insert(compiled);
    Ok(downcast::<T>(Arc::clone(entry)))
}

fn downcast<T: Template>(entry: Shared) -> Arc<Formula<T::Context>> {
    // The map is only ever populated keyed by the compiled type.
    Arc::downcast(entry).unwrap_or_else(|_| unreachable!("cache entry matches its key"))
}

/// Drop every published formula, forcing recompilation on next use.
///
/// Intended for tests that need a cold cache; production code never needs
/// this, formulas stay valid for the lifetime of the process.
pub fn clear_formula_cache() {
    if let Some(lock) = CACHE.get() {
        lock.write().unwrap().clear();
    }
}
