//! Wallet record model and the closed platform/chain enumerations.
//!
//! DESIGN
//! ======
//! Platform and chain are validated when a record is created (`NewWallet`
//! only accepts the typed enums). Rows read back from the store are not
//! revalidated: a stored value outside the enumeration is kept verbatim as
//! `Stored::Unrecognized` so one odd row never fails the whole list.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// PLATFORM
// =============================================================================

/// Exchange or wallet software that holds the address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    Binance,
    KuCoin,
    #[serde(rename = "MEXC")]
    Mexc,
    MetaMask,
    #[serde(rename = "Trust Wallet")]
    TrustWallet,
    Other,
}

impl Platform {
    /// All platforms in display order. The first entry is the form default.
    pub const ALL: [Platform; 6] = [
        Platform::Binance,
        Platform::KuCoin,
        Platform::Mexc,
        Platform::MetaMask,
        Platform::TrustWallet,
        Platform::Other,
    ];

    /// Label shown to the user and stored in the `platform` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binance => "Binance",
            Self::KuCoin => "KuCoin",
            Self::Mexc => "MEXC",
            Self::MetaMask => "MetaMask",
            Self::TrustWallet => "Trust Wallet",
            Self::Other => "Other",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = UnknownValue;

    /// Case-insensitive; spaces, dashes and underscores are ignored so
    /// `trust-wallet` and `Trust Wallet` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold(s);
        Self::ALL
            .into_iter()
            .find(|p| fold(p.as_str()) == wanted)
            .ok_or_else(|| UnknownValue(s.to_owned()))
    }
}

// =============================================================================
// CHAIN
// =============================================================================

/// Network the address lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Chain {
    Bnb,
    Trc20,
    Sui,
    Arb,
    Sol,
}

impl Chain {
    /// All chains in display order. The first entry is the form default.
    pub const ALL: [Chain; 5] = [Chain::Bnb, Chain::Trc20, Chain::Sui, Chain::Arb, Chain::Sol];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bnb => "BNB",
            Self::Trc20 => "TRC20",
            Self::Sui => "SUI",
            Self::Arb => "ARB",
            Self::Sol => "SOL",
        }
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold(s);
        Self::ALL
            .into_iter()
            .find(|c| fold(c.as_str()) == wanted)
            .ok_or_else(|| UnknownValue(s.to_owned()))
    }
}

/// A platform or chain name that is not part of its enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownValue(pub String);

fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

// =============================================================================
// STORED VALUES
// =============================================================================

/// A closed-enumeration value as read back from the store.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stored<T> {
    Known(T),
    Unrecognized(String),
}

impl<T: Copy> Stored<T> {
    /// The typed value, if the stored text was part of the enumeration.
    #[must_use]
    pub fn known(&self) -> Option<T> {
        match self {
            Self::Known(value) => Some(*value),
            Self::Unrecognized(_) => None,
        }
    }
}

impl<T> From<T> for Stored<T> {
    fn from(value: T) -> Self {
        Self::Known(value)
    }
}

impl<T: fmt::Display> fmt::Display for Stored<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => value.fmt(f),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// One tracked wallet entry as stored in the `wallets` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub name: String,
    pub platform: Stored<Platform>,
    #[serde(default)]
    pub purpose: String,
    pub chain: Stored<Chain>,
    pub address: String,
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A record about to be inserted. The store assigns `id` and `created_at`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewWallet {
    pub user_id: String,
    pub name: String,
    pub platform: Platform,
    pub purpose: String,
    pub chain: Chain,
    pub address: String,
    pub private_key: Option<String>,
    pub email: Option<String>,
}

/// Email/password pair submitted by the login command.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// PostgREST returns `id` as a string for uuid keys and as a number for
/// bigint keys; either way it is kept opaque.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}
