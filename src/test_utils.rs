//! Shared test utilities.
//!
//! All tests that manipulate environment variables must use the shared
//! `env_lock()` to prevent race conditions.

use anyhow::{Result, anyhow};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, OnceLock};

use crate::backend::Backend;

/// Global lock for tests that modify environment variables.
pub fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for temporarily setting an environment variable.
pub struct EnvGuard {
    key: String,
    old: Option<String>,
}

impl EnvGuard {
    pub fn set(key: &str, value: &str) -> Self {
        let old = std::env::var(key).ok();
        unsafe {
            std::env::set_var(key, value);
        }
        Self {
            key: key.to_string(),
            old,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        if let Some(val) = &self.old {
            unsafe {
                std::env::set_var(&self.key, val);
            }
        } else {
            unsafe {
                std::env::remove_var(&self.key);
            }
        }
    }
}

/// A request seen by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(String),
    Post(String, Vec<(String, String)>),
}

impl Call {
    pub fn get(path: &str) -> Self {
        Call::Get(path.to_string())
    }

    pub fn post(path: &str, form: &[(&str, &str)]) -> Self {
        Call::Post(
            path.to_string(),
            form.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// In-process backend that answers from canned bodies and records every call.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    json: HashMap<String, Value>,
    text: HashMap<String, String>,
    failing: HashSet<String>,
    calls: RefCell<Vec<Call>>,
}

impl RecordingBackend {
    pub fn with_json(mut self, path: &str, body: Value) -> Self {
        self.json.insert(path.to_string(), body);
        self
    }

    pub fn with_text(mut self, path: &str, body: &str) -> Self {
        self.text.insert(path.to_string(), body.to_string());
        self
    }

    /// Requests to `path` fail after being recorded.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn check(&self, path: &str) -> Result<()> {
        if self.failing.contains(path) {
            return Err(anyhow!("{path} failed: 500"));
        }
        Ok(())
    }
}

impl Backend for RecordingBackend {
    async fn get_json(&self, path: &str) -> Result<Value> {
        self.calls.borrow_mut().push(Call::get(path));
        self.check(path)?;
        self.json
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("{path} failed: 404"))
    }

    async fn get_text(&self, path: &str) -> Result<String> {
        self.calls.borrow_mut().push(Call::get(path));
        self.check(path)?;
        self.text
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("{path} failed: 404"))
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<()> {
        self.calls.borrow_mut().push(Call::post(path, form));
        self.check(path)
    }
}
