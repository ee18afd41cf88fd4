//! Household members and asset owners

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two people in the household
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Person {
    Jeff,
    Vanessa,
}

impl Person {
    pub const ALL: [Person; 2] = [Person::Jeff, Person::Vanessa];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jeff => "Jeff",
            Self::Vanessa => "Vanessa",
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Person {
    type Err = OwnerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jeff" => Ok(Self::Jeff),
            "vanessa" => Ok(Self::Vanessa),
            _ => Err(OwnerParseError(s.trim().to_string())),
        }
    }
}

/// Who owns a net worth asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Owner {
    Jeff,
    Vanessa,
    Joint,
}

impl Owner {
    pub const ALL: [Owner; 3] = [Owner::Jeff, Owner::Vanessa, Owner::Joint];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jeff => "Jeff",
            Self::Vanessa => "Vanessa",
            Self::Joint => "Joint",
        }
    }
}

impl From<Person> for Owner {
    fn from(person: Person) -> Self {
        match person {
            Person::Jeff => Owner::Jeff,
            Person::Vanessa => Owner::Vanessa,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Owner {
    type Err = OwnerParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "joint" => Ok(Self::Joint),
            _ => Person::from_str(s).map(Owner::from),
        }
    }
}

/// Error for a name that is not a household member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerParseError(pub String);

impl fmt::Display for OwnerParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown household member: {}", self.0)
    }
}

impl std::error::Error for OwnerParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("jeff".parse::<Person>().unwrap(), Person::Jeff);
        assert_eq!(" VANESSA ".parse::<Person>().unwrap(), Person::Vanessa);
        assert_eq!("Joint".parse::<Owner>().unwrap(), Owner::Joint);
        assert_eq!("jeff".parse::<Owner>().unwrap(), Owner::Jeff);
    }

    #[test]
    fn test_unknown_member_rejected() {
        assert!("Bob".parse::<Person>().is_err());
        assert!("joint".parse::<Person>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Person::Vanessa.to_string(), "Vanessa");
        assert_eq!(Owner::from(Person::Jeff).to_string(), "Jeff");
    }
}
