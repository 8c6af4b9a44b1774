//! Request/response contract of native dialog modules.

use std::fmt;
use std::rc::Rc;

use futures::future::{self, LocalBoxFuture};
use indexmap::IndexMap;

/// Action reported when the user closed a dialog without picking anything.
pub const DISMISSED_ACTION: &str = "dismissedAction";

/// Key of the action string in every response.
pub const ACTION_KEY: &str = "action";

/// Scalar value crossing the native bridge.
#[derive(Clone, Debug, PartialEq)]
pub enum NativeArg {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl From<bool> for NativeArg {
    fn from(value: bool) -> Self {
        NativeArg::Bool(value)
    }
}

impl From<i64> for NativeArg {
    fn from(value: i64) -> Self {
        NativeArg::Int(value)
    }
}

impl From<u32> for NativeArg {
    fn from(value: u32) -> Self {
        NativeArg::Int(i64::from(value))
    }
}

impl From<i32> for NativeArg {
    fn from(value: i32) -> Self {
        NativeArg::Int(i64::from(value))
    }
}

impl From<&str> for NativeArg {
    fn from(value: &str) -> Self {
        NativeArg::Text(value.to_owned())
    }
}

impl From<String> for NativeArg {
    fn from(value: String) -> Self {
        NativeArg::Text(value)
    }
}

/// Ordered key/value payload of a native call or its response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NativeMap {
    entries: IndexMap<String, NativeArg>,
}

impl NativeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<NativeArg>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<NativeArg>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&NativeArg> {
        self.entries.get(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            NativeArg::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            NativeArg::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            NativeArg::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Failure reported by the native side.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct NativeRejection {
    pub code: String,
    pub message: String,
}

impl NativeRejection {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A native module that shows a modal dialog and resolves once it closes.
pub trait NativeDialogModule {
    fn open(&self, request: NativeMap) -> LocalBoxFuture<'static, Result<NativeMap, NativeRejection>>;
}

impl<M: NativeDialogModule + ?Sized> NativeDialogModule for Rc<M> {
    fn open(&self, request: NativeMap) -> LocalBoxFuture<'static, Result<NativeMap, NativeRejection>> {
        (**self).open(request)
    }
}

impl<M: NativeDialogModule + ?Sized> NativeDialogModule for &M {
    fn open(&self, request: NativeMap) -> LocalBoxFuture<'static, Result<NativeMap, NativeRejection>> {
        (**self).open(request)
    }
}

/// Module answering synchronously from a closure.
pub struct ImmediateModule<F>(F);

impl<F> ImmediateModule<F>
where
    F: Fn(NativeMap) -> Result<NativeMap, NativeRejection>,
{
    pub fn new(respond: F) -> Self {
        Self(respond)
    }
}

impl<F> NativeDialogModule for ImmediateModule<F>
where
    F: Fn(NativeMap) -> Result<NativeMap, NativeRejection>,
{
    fn open(&self, request: NativeMap) -> LocalBoxFuture<'static, Result<NativeMap, NativeRejection>> {
        Box::pin(future::ready((self.0)(request)))
    }
}

impl<F> fmt::Debug for ImmediateModule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ImmediateModule")
    }
}
