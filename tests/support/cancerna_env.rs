use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const CONFIG_HOME: &str = "CANCERNA_CONFIG_HOME";
const BACKEND_URL: &str = "CANCERNA_BACKEND_URL";

/// Holds the global env lock and restores the variables it changed on drop.
pub struct CancernaEnvGuard {
    previous: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl CancernaEnvGuard {
    pub fn set_config_home(path: impl AsRef<std::ffi::OsStr>) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let mut guard = Self {
            previous: Vec::new(),
            _lock: lock,
        };
        guard.set(CONFIG_HOME, Some(path.as_ref()));
        guard.set(BACKEND_URL, None);
        guard
    }

    pub fn with_backend_url(mut self, url: &str) -> Self {
        self.set(BACKEND_URL, Some(url.as_ref()));
        self
    }

    fn set(&mut self, key: &'static str, value: Option<&std::ffi::OsStr>) {
        if !self.previous.iter().any(|(saved, _)| *saved == key) {
            self.previous.push((key, std::env::var(key).ok()));
        }
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

impl Drop for CancernaEnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            // SAFETY: tests run under a global lock to prevent concurrent env mutations.
            unsafe {
                match value {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
