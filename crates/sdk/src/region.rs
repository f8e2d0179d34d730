//! PingOne regions and their service domains.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A PingOne deployment region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    /// Asia-Pacific, `.asia` tenants
    Ap,
    /// Asia-Pacific, `.com.au` tenants
    Au,
    /// Canada
    Ca,
    /// Europe
    Eu,
    /// North America
    #[default]
    Na,
    /// Singapore
    Sg,
}

impl Region {
    /// Every region, in code order.
    pub const ALL: [Self; 6] = [Self::Ap, Self::Au, Self::Ca, Self::Eu, Self::Na, Self::Sg];

    /// The two-letter code, e.g. `EU`.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ap => "AP",
            Self::Au => "AU",
            Self::Ca => "CA",
            Self::Eu => "EU",
            Self::Na => "NA",
            Self::Sg => "SG",
        }
    }

    /// Top-level domain of the region's service hosts.
    #[must_use]
    pub const fn top_level_domain(self) -> &'static str {
        match self {
            Self::Ap => "asia",
            Self::Au => "com.au",
            Self::Ca => "ca",
            Self::Eu => "eu",
            Self::Na => "com",
            Self::Sg => "sg",
        }
    }

    /// Management API base URL.
    #[must_use]
    pub fn api_url(self) -> String {
        format!("https://api.pingone.{}/v1", self.top_level_domain())
    }

    /// Authorization server host for token requests.
    #[must_use]
    pub fn auth_url(self) -> String {
        format!("https://auth.pingone.{}", self.top_level_domain())
    }

    /// Comma-separated list of valid codes, for error messages.
    #[must_use]
    pub fn valid_codes() -> String {
        Self::ALL.map(Self::code).join(", ")
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Self::ALL
            .into_iter()
            .find(|region| region.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| Error::InvalidRegion { code: code.to_string() })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("eu".parse::<Region>().unwrap(), Region::Eu);
        assert_eq!(" AU ".parse::<Region>().unwrap(), Region::Au);
        assert!(matches!("XX".parse::<Region>(), Err(Error::InvalidRegion { code }) if code == "XX"));
    }

    #[test]
    fn test_service_urls() {
        assert_eq!(Region::Na.api_url(), "https://api.pingone.com/v1");
        assert_eq!(Region::Au.api_url(), "https://api.pingone.com.au/v1");
        assert_eq!(Region::Ap.auth_url(), "https://auth.pingone.asia");
    }

    #[test]
    fn test_valid_codes() {
        assert_eq!(Region::valid_codes(), "AP, AU, CA, EU, NA, SG");
    }
}
