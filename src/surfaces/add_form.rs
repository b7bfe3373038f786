//! Add-wallet form state and validation.
//!
//! Platform and chain start at the first value of their enumerations. The
//! optional private key and email are normalized at this boundary: a blank
//! field becomes `None`, never an empty string. A present private key is
//! kept exactly as typed.

#[cfg(test)]
#[path = "add_form_test.rs"]
mod add_form_test;

use std::fmt::Write as _;
use std::str::FromStr;

use crate::model::{Chain, NewWallet, Platform};

/// Fields in the order the form asks for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddField {
    Name,
    Platform,
    Chain,
    Purpose,
    Address,
    PrivateKey,
    Email,
}

impl AddField {
    pub const ALL: [AddField; 7] = [
        AddField::Name,
        AddField::Platform,
        AddField::Chain,
        AddField::Purpose,
        AddField::Address,
        AddField::PrivateKey,
        AddField::Email,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Platform => "Platform",
            Self::Chain => "Chain",
            Self::Purpose => "Purpose",
            Self::Address => "Address",
            Self::PrivateKey => "Private Key (Optional)",
            Self::Email => "Email (Optional)",
        }
    }

    #[must_use]
    pub fn is_required(self) -> bool {
        !matches!(self, Self::PrivateKey | Self::Email)
    }
}

impl FromStr for AddField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "platform" => Ok(Self::Platform),
            "chain" => Ok(Self::Chain),
            "purpose" => Ok(Self::Purpose),
            "address" => Ok(Self::Address),
            "key" | "private_key" | "privatekey" => Ok(Self::PrivateKey),
            "email" => Ok(Self::Email),
            _ => Err(FormError::UnknownField(s.to_owned())),
        }
    }
}

/// Why a form value or submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("unknown platform '{0}' (choose one of: {list})", list = platform_list())]
    InvalidPlatform(String),
    #[error("unknown chain '{0}' (choose one of: {list})", list = chain_list())]
    InvalidChain(String),
    #[error("unknown field '{0}'")]
    UnknownField(String),
}

fn platform_list() -> String {
    Platform::ALL.map(Platform::as_str).join(", ")
}

fn chain_list() -> String {
    Chain::ALL.map(Chain::as_str).join(", ")
}

/// Raw values as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddWalletForm {
    pub name: String,
    pub platform: Platform,
    pub chain: Chain,
    pub purpose: String,
    pub address: String,
    pub private_key: String,
    pub email: String,
}

/// A validated submission still missing its owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletDraft {
    pub name: String,
    pub platform: Platform,
    pub chain: Chain,
    pub purpose: String,
    pub address: String,
    pub private_key: Option<String>,
    pub email: Option<String>,
}

impl WalletDraft {
    #[must_use]
    pub fn into_new_wallet(self, user_id: String) -> NewWallet {
        NewWallet {
            user_id,
            name: self.name,
            platform: self.platform,
            purpose: self.purpose,
            chain: self.chain,
            address: self.address,
            private_key: self.private_key,
            email: self.email,
        }
    }
}

impl AddWalletForm {
    /// Set one field. A blank platform or chain keeps the current choice.
    ///
    /// # Errors
    ///
    /// Returns an error if a platform or chain name is not in its enumeration.
    pub fn set(&mut self, field: AddField, value: &str) -> Result<(), FormError> {
        let trimmed = value.trim();
        match field {
            AddField::Name => self.name = value.to_owned(),
            AddField::Purpose => self.purpose = value.to_owned(),
            AddField::Address => self.address = value.to_owned(),
            AddField::PrivateKey => self.private_key = value.to_owned(),
            AddField::Email => self.email = value.to_owned(),
            AddField::Platform if trimmed.is_empty() => {}
            AddField::Platform => {
                self.platform = trimmed.parse().map_err(|_| FormError::InvalidPlatform(trimmed.to_owned()))?;
            }
            AddField::Chain if trimmed.is_empty() => {}
            AddField::Chain => {
                self.chain = trimmed.parse().map_err(|_| FormError::InvalidChain(trimmed.to_owned()))?;
            }
        }
        Ok(())
    }

    /// Display text for `field`. The private key is masked like a password
    /// input.
    #[must_use]
    pub fn display_value(&self, field: AddField) -> String {
        match field {
            AddField::Name => self.name.clone(),
            AddField::Platform => self.platform.to_string(),
            AddField::Chain => self.chain.to_string(),
            AddField::Purpose => self.purpose.clone(),
            AddField::Address => self.address.clone(),
            AddField::PrivateKey => "•".repeat(self.private_key.chars().count()),
            AddField::Email => self.email.clone(),
        }
    }

    /// Check required fields and normalize the optional ones.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in field order.
    pub fn validate(&self) -> Result<WalletDraft, FormError> {
        let name = required(AddField::Name, &self.name)?;
        let purpose = required(AddField::Purpose, &self.purpose)?;
        let address = required(AddField::Address, &self.address)?;
        let private_key = (!self.private_key.trim().is_empty()).then(|| self.private_key.clone());
        let email = normalize_optional(&self.email);
        if let Some(email) = &email {
            if !looks_like_email(email) {
                return Err(FormError::InvalidEmail(email.clone()));
            }
        }
        Ok(WalletDraft { name, platform: self.platform, chain: self.chain, purpose, address, private_key, email })
    }

    /// One line per field, for the form summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for field in AddField::ALL {
            let _ = writeln!(out, "  {:<24} {}", field.label(), self.display_value(field));
        }
        out
    }
}

fn required(field: AddField, value: &str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() { Err(FormError::MissingField(field.label())) } else { Ok(value.to_owned()) }
}

/// Blank input means "no value".
#[must_use]
pub fn normalize_optional(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// `local@domain` with no whitespace; the same bar a browser email input sets.
fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
