//! Candidate passwords for encrypted documents.

use std::env;
use std::fmt;

/// Environment variables consulted for passwords, in the order they are tried.
pub const PASSWORD_VARS: [&str; 4] = ["PASS_CC", "PASS_BIRTH", "PASS_BIRTH2", "PASS_SURNAME"];

/// A password together with the variable it was read from.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub source: &'static str,
    secret: String,
}

impl Credential {
    pub fn new(source: &'static str, secret: impl Into<String>) -> Self {
        Credential {
            source,
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

// keep secrets out of logs and panic messages
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Ordered list of candidate passwords. The first one that unlocks the
/// document wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    list: Vec<Credential>,
}

impl Credentials {
    pub fn new(list: Vec<Credential>) -> Self {
        Credentials { list }
    }

    /// Reads [`PASSWORD_VARS`] from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the list from an arbitrary variable lookup. Unset variables
    /// are skipped; a variable set to the empty string is kept.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let list = PASSWORD_VARS
            .iter()
            .filter_map(|&name| lookup(name).map(|secret| Credential::new(name, secret)))
            .collect();
        Credentials { list }
    }

    /// Decryption is only attempted when the primary password (`PASS_CC`) is
    /// present and non-empty.
    pub fn decryption_enabled(&self) -> bool {
        self.list
            .iter()
            .any(|c| c.source == PASSWORD_VARS[0] && !c.secret.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Credential> {
        self.list.iter()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
