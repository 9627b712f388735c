//! A permissive key/value option bag.
//!
//! Site models read a handful of named options (`ConserveQNs`, `SHalfEdge`,
//! `SHalfLeftEdge`, `SiteNumber`, `Verbose`) from an [`Args`]. Keys a model
//! does not know about are ignored, and a value of the wrong type falls back
//! to the caller's default.
//!
//! ```
//! use tensor_net_sites::args::Args;
//!
//! let args = Args::new()
//!     .with("ConserveQNs", false)
//!     .with("SiteNumber", 4);
//! assert!(!args.get_bool("ConserveQNs", true));
//! assert_eq!(args.get_int("SiteNumber", 0), 4);
//! assert!(!args.get_bool("Verbose", false));
//!
//! let parsed = Args::from_json(r#"{ "SHalfEdge": true, "Color": "red" }"#).unwrap();
//! assert!(parsed.get_bool("SHalfEdge", false));
//! ```

use log::warn;
use rustc_hash::FxHashMap as HashMap;
use serde::{ Serialize, Deserialize };
use crate::error::SiteResult;

/// A single option value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgVal {
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
}

macro_rules! conv_argval_int {
    ($int:ty) => {
        impl From<$int> for ArgVal {
            fn from(n: $int) -> Self { Self::Int(n as i64) }
        }
    }
}
conv_argval_int!(i32);
conv_argval_int!(i64);
conv_argval_int!(u32);
conv_argval_int!(usize);

impl From<bool> for ArgVal {
    fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<f64> for ArgVal {
    fn from(x: f64) -> Self { Self::Real(x) }
}

impl From<&str> for ArgVal {
    fn from(s: &str) -> Self { Self::Str(s.to_string()) }
}

impl From<String> for ArgVal {
    fn from(s: String) -> Self { Self::Str(s) }
}

/// Named options passed to site construction and operator building.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args {
    vals: HashMap<String, ArgVal>,
}

impl Args {
    /// Create a new, empty option bag.
    pub fn new() -> Self { Self::default() }

    /// Parse an option bag from a JSON object.
    pub fn from_json(s: &str) -> SiteResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Builder-style [`Self::set`].
    pub fn with<K, V>(mut self, key: K, val: V) -> Self
    where
        K: Into<String>,
        V: Into<ArgVal>,
    {
        self.set(key, val);
        self
    }

    /// Set an option, overwriting any previous value.
    pub fn set<K, V>(&mut self, key: K, val: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<ArgVal>,
    {
        self.vals.insert(key.into(), val.into());
        self
    }

    /// Return `true` if an option is present.
    pub fn defined(&self, key: &str) -> bool { self.vals.contains_key(key) }

    /// Return the raw value of an option.
    pub fn get(&self, key: &str) -> Option<&ArgVal> { self.vals.get(key) }

    /// Return a boolean option, or `default` if it is absent.
    ///
    /// Integer values are accepted and read as `n != 0`.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.vals.get(key) {
            None => default,
            Some(ArgVal::Bool(b)) => *b,
            Some(ArgVal::Int(n)) => *n != 0,
            Some(other) => {
                warn!("option {key} = {other:?} is not a boolean; using {default}");
                default
            },
        }
    }

    /// Return an integer option, or `default` if it is absent.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        match self.vals.get(key) {
            None => default,
            Some(ArgVal::Int(n)) => *n,
            Some(other) => {
                warn!("option {key} = {other:?} is not an integer; using {default}");
                default
            },
        }
    }

    /// Return a real option, or `default` if it is absent.
    ///
    /// Integer values are accepted.
    pub fn get_real(&self, key: &str, default: f64) -> f64 {
        match self.vals.get(key) {
            None => default,
            Some(ArgVal::Real(x)) => *x,
            Some(ArgVal::Int(n)) => *n as f64,
            Some(other) => {
                warn!("option {key} = {other:?} is not a number; using {default}");
                default
            },
        }
    }

    /// Return a string option, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.vals.get(key) {
            Some(ArgVal::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}
