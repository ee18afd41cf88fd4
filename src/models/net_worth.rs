//! Net worth snapshots
//!
//! Each entry records one asset's value on one date. History is additive: a
//! later snapshot adds a row, and the latest row at or before a date is the
//! asset's value on that date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::NetWorthEntryId;
use super::money::Money;
use super::person::Owner;

/// Kind of asset or liability being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AssetType {
    RealEstate,
    Checking,
    Savings,
    Brokerage,
    FourOhOneK,
    RothIra,
    TraditionalIra,
    Hsa,
    FiveTwentyNine,
    Crypto,
    PreciousMetals,
    Vehicle,
    Other,
    Liability,
}

impl AssetType {
    pub const ALL: [AssetType; 14] = [
        Self::RealEstate,
        Self::Checking,
        Self::Savings,
        Self::Brokerage,
        Self::FourOhOneK,
        Self::RothIra,
        Self::TraditionalIra,
        Self::Hsa,
        Self::FiveTwentyNine,
        Self::Crypto,
        Self::PreciousMetals,
        Self::Vehicle,
        Self::Other,
        Self::Liability,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::RealEstate => "Real Estate",
            Self::Checking => "Checking Account",
            Self::Savings => "Savings Account",
            Self::Brokerage => "Brokerage Account",
            Self::FourOhOneK => "401(k)",
            Self::RothIra => "Roth IRA",
            Self::TraditionalIra => "Traditional IRA",
            Self::Hsa => "HSA",
            Self::FiveTwentyNine => "529 Plan",
            Self::Crypto => "Cryptocurrency",
            Self::PreciousMetals => "Precious Metals",
            Self::Vehicle => "Vehicle",
            Self::Other => "Other Asset",
            Self::Liability => "Debt/Liability",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AssetType {
    type Err = AssetTypeParseError;

    /// Accepts the display label or a short alias ("checking", "401k", "debt")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if let Some(found) = Self::ALL
            .iter()
            .find(|t| t.label().eq_ignore_ascii_case(&key))
        {
            return Ok(*found);
        }
        match key.as_str() {
            "realestate" | "real-estate" | "house" => Ok(Self::RealEstate),
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "brokerage" => Ok(Self::Brokerage),
            "401k" => Ok(Self::FourOhOneK),
            "roth" | "roth-ira" => Ok(Self::RothIra),
            "ira" | "traditional-ira" => Ok(Self::TraditionalIra),
            "529" => Ok(Self::FiveTwentyNine),
            "crypto" => Ok(Self::Crypto),
            "metals" | "precious-metals" => Ok(Self::PreciousMetals),
            "other" => Ok(Self::Other),
            "debt" | "liability" | "loan" => Ok(Self::Liability),
            _ => Err(AssetTypeParseError(s.trim().to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTypeParseError(pub String);

impl fmt::Display for AssetTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown asset type: {}", self.0)
    }
}

impl std::error::Error for AssetTypeParseError {}

/// Identity of an asset across snapshots
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetKey {
    pub owner: Owner,
    pub asset_type: AssetType,
    /// Lower-cased asset name
    pub name: String,
}

/// One asset's value on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetWorthEntry {
    pub id: NetWorthEntryId,

    pub owner: Owner,

    pub asset_type: AssetType,

    pub name: String,

    /// Signed value; negative is a liability
    pub value: Money,

    pub as_of: NaiveDate,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
}

impl NetWorthEntry {
    pub fn new(
        owner: Owner,
        asset_type: AssetType,
        name: impl Into<String>,
        value: Money,
        as_of: NaiveDate,
    ) -> Self {
        Self {
            id: NetWorthEntryId::new(0),
            owner,
            asset_type,
            name: name.into().trim().to_string(),
            value,
            as_of,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn key(&self) -> AssetKey {
        AssetKey {
            owner: self.owner,
            asset_type: self.asset_type,
            name: self.name.to_lowercase(),
        }
    }

    pub fn is_liability(&self) -> bool {
        self.value.is_negative()
    }

    pub fn validate(&self) -> Result<(), NetWorthValidationError> {
        if self.name.trim().is_empty() {
            return Err(NetWorthValidationError::EmptyName);
        }
        if self.name.len() > 100 {
            return Err(NetWorthValidationError::NameTooLong(self.name.len()));
        }
        if self.asset_type == AssetType::Liability && self.value.is_positive() {
            return Err(NetWorthValidationError::PositiveLiability(self.value));
        }
        Ok(())
    }
}

impl fmt::Display for NetWorthEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({}) {}",
            self.as_of, self.owner, self.name, self.asset_type, self.value
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetWorthValidationError {
    EmptyName,
    NameTooLong(usize),
    PositiveLiability(Money),
}

impl fmt::Display for NetWorthValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Asset name cannot be empty"),
            Self::NameTooLong(len) => write!(f, "Asset name too long ({} chars, max 100)", len),
            Self::PositiveLiability(value) => write!(
                f,
                "Debt/Liability entries must be entered as negative values, got {}",
                value
            ),
        }
    }
}

impl std::error::Error for NetWorthValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
    }

    #[test]
    fn test_asset_type_parsing() {
        assert_eq!("401(k)".parse::<AssetType>().unwrap(), AssetType::FourOhOneK);
        assert_eq!("401k".parse::<AssetType>().unwrap(), AssetType::FourOhOneK);
        assert_eq!("checking account".parse::<AssetType>().unwrap(), AssetType::Checking);
        assert_eq!("debt".parse::<AssetType>().unwrap(), AssetType::Liability);
        assert!("boat".parse::<AssetType>().is_err());
    }

    #[test]
    fn test_key_ignores_name_case() {
        let a = NetWorthEntry::new(
            Owner::Joint,
            AssetType::RealEstate,
            "House",
            Money::from_dollars(400_000),
            date(),
        );
        let b = NetWorthEntry::new(
            Owner::Joint,
            AssetType::RealEstate,
            "house ",
            Money::from_dollars(410_000),
            date(),
        );
        assert_eq!(a.key(), b.key());

        let c = NetWorthEntry::new(
            Owner::Jeff,
            AssetType::RealEstate,
            "House",
            Money::from_dollars(1),
            date(),
        );
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_liability_must_be_negative() {
        let loan = NetWorthEntry::new(
            Owner::Joint,
            AssetType::Liability,
            "Car Loan",
            Money::from_dollars(12_000),
            date(),
        );
        assert!(matches!(
            loan.validate(),
            Err(NetWorthValidationError::PositiveLiability(_))
        ));

        let loan = NetWorthEntry::new(
            Owner::Joint,
            AssetType::Liability,
            "Car Loan",
            Money::from_dollars(-12_000),
            date(),
        );
        assert!(loan.validate().is_ok());
        assert!(loan.is_liability());
    }
}
