//! Environment variable guards for tests.
//!
//! A guard holds a process-wide re-entrant lock for as long as it lives, so
//! tests touching the environment run one at a time while a single test may
//! still stack several guards.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let guard = env::set_var("WINDCFG_EXAMPLE", "value");
//! assert_eq!(std::env::var("WINDCFG_EXAMPLE").as_deref(), Ok("value"));
//! drop(guard);
//! ```

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_LOCK: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Restores a variable to its previous state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish_non_exhaustive()
    }
}

/// Set `key` to `value` until the guard drops.
pub fn set_var(key: impl Into<String>, value: impl AsRef<OsStr>) -> EnvVarGuard {
    let lock = ENV_LOCK.lock();
    let name = key.into();
    let original = std::env::var_os(&name);
    // SAFETY: every mutation in the test suite goes through `ENV_LOCK`.
    unsafe { std::env::set_var(&name, value) };
    EnvVarGuard {
        key: name,
        original,
        _lock: lock,
    }
}

/// Remove `key` until the guard drops.
pub fn remove_var(key: impl Into<String>) -> EnvVarGuard {
    let lock = ENV_LOCK.lock();
    let name = key.into();
    let original = std::env::var_os(&name);
    // SAFETY: every mutation in the test suite goes through `ENV_LOCK`.
    unsafe { std::env::remove_var(&name) };
    EnvVarGuard {
        key: name,
        original,
        _lock: lock,
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        // SAFETY: `_lock` is still held.
        match self.original.take() {
            Some(value) => unsafe { std::env::set_var(&self.key, value) },
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_guards_restore_in_reverse_order() {
        let key = "WINDCFG_TEST_HELPERS_STACKED";
        let outer = set_var(key, "outer");
        let inner = set_var(key, "inner");
        assert_eq!(std::env::var(key).as_deref(), Ok("inner"));
        drop(inner);
        assert_eq!(std::env::var(key).as_deref(), Ok("outer"));
        drop(outer);
        assert!(std::env::var_os(key).is_none());
    }

    #[test]
    fn remove_restores_previous_value() {
        let key = "WINDCFG_TEST_HELPERS_REMOVED";
        let _set = set_var(key, "kept");
        {
            let _removed = remove_var(key);
            assert!(std::env::var_os(key).is_none());
        }
        assert_eq!(std::env::var(key).as_deref(), Ok("kept"));
    }
}
