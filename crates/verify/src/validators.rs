//! Ready-made attribute validators for PingOne value formats.

use std::net::IpAddr;
use std::sync::{Arc, LazyLock};

use pingone_framework::validator::{RegexMatches, ValidationRequest};
use pingone_framework::{Diagnostics, Validator};
use regex::Regex;

use crate::iso;
use crate::patterns;

fn pattern(regex: &LazyLock<Regex>, message: &str) -> Arc<dyn Validator> {
    Arc::new(RegexMatches::new(LazyLock::force(regex).clone(), message))
}

/// A PingOne resource UUID.
#[must_use]
pub fn p1_resource_id() -> Arc<dyn Validator> {
    pattern(
        &patterns::P1_RESOURCE_ID,
        &format!(
            "The PingOne resource ID is malformed.  Must match regex \"^{}$\"",
            patterns::P1_RESOURCE_ID_PATTERN
        ),
    )
}

/// A DaVinci resource ID.
#[must_use]
pub fn p1_davinci_resource_id() -> Arc<dyn Validator> {
    pattern(
        &patterns::P1_DAVINCI_RESOURCE_ID,
        &format!(
            "The PingOne DaVinci resource ID is malformed.  Must match regex \"^{}$\"",
            patterns::P1_DAVINCI_RESOURCE_ID_PATTERN
        ),
    )
}

/// ISO 3166-1 alpha-2 country code.
#[must_use]
pub fn country_code() -> Arc<dyn Validator> {
    pattern(&patterns::COUNTRY_CODE, "must be a valid two character country code")
}

/// `#rgb` or `#rrggbb` colour.
#[must_use]
pub fn hex_colour() -> Arc<dyn Validator> {
    pattern(&patterns::HEX_COLOUR, "must be a valid hexadecimal colour code, e.g. `#ffffff`")
}

/// `https://` URL.
#[must_use]
pub fn https_url() -> Arc<dyn Validator> {
    pattern(&patterns::HTTPS_URL, "Must be a valid HTTPS URL")
}

/// `http://` or `https://` URL.
#[must_use]
pub fn http_or_https_url() -> Arc<dyn Validator> {
    pattern(&patterns::HTTP_OR_HTTPS_URL, "Must be a valid HTTP or HTTPS URL")
}

/// A DNS domain.
#[must_use]
pub fn domain() -> Arc<dyn Validator> {
    pattern(&patterns::DOMAIN, "must be a valid domain name")
}

/// A hostname with optional path.
#[must_use]
pub fn hostname() -> Arc<dyn Validator> {
    pattern(&patterns::HOSTNAME, "must be a valid hostname")
}

/// RFC 3339 timestamp.
#[must_use]
pub fn rfc3339() -> Arc<dyn Validator> {
    pattern(&patterns::RFC3339, "must be a valid RFC 3339 date/time string")
}

/// Which language list a [`LanguageCode`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageSet {
    /// Every known code
    All,
    /// Only codes that are not reserved
    Customisable,
}

/// Membership in the ISO language list.
#[derive(Debug)]
pub struct LanguageCode(pub LanguageSet);

impl Validator for LanguageCode {
    fn description(&self) -> String {
        match self.0 {
            LanguageSet::All => "value must be a valid ISO language or locale code".to_string(),
            LanguageSet::Customisable => format!(
                "value must be a valid ISO language or locale code and must not be one of the reserved codes {}",
                iso::reserved_list_string()
            ),
        }
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Some(code) = request.known_str() else {
            return;
        };
        let accepted = iso::is_known(code) && (self.0 == LanguageSet::All || !iso::is_reserved(code));
        if !accepted {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid Attribute Value Match",
                format!("Attribute {} {}, got: \"{code}\"", request.path, self.description()),
            );
        }
    }
}

/// Any known language or locale code.
#[must_use]
pub fn locale() -> Arc<dyn Validator> {
    Arc::new(LanguageCode(LanguageSet::All))
}

/// A language code that may be customised.
#[must_use]
pub fn language_code() -> Arc<dyn Validator> {
    Arc::new(LanguageCode(LanguageSet::Customisable))
}

/// An IPv4 or IPv6 address with an optional prefix length.
#[derive(Debug)]
pub struct IpOrCidr;

impl IpOrCidr {
    fn is_valid(value: &str) -> bool {
        let (address, prefix) = match value.split_once('/') {
            Some((address, prefix)) => (address, Some(prefix)),
            None => (value, None),
        };
        let Ok(address) = address.parse::<IpAddr>() else {
            return false;
        };
        let Some(prefix) = prefix else {
            return true;
        };
        let max = if address.is_ipv4() { 32 } else { 128 };
        prefix.parse::<u8>().is_ok_and(|bits| bits <= max)
    }
}

impl Validator for IpOrCidr {
    fn description(&self) -> String {
        "value must be a valid IPv4 or IPv6 address, optionally in CIDR notation".to_string()
    }

    fn validate(&self, request: &ValidationRequest<'_>, diags: &mut Diagnostics) {
        let Some(value) = request.known_str() else {
            return;
        };
        if !Self::is_valid(value) {
            diags.add_attribute_error(
                request.path.clone(),
                "Invalid Attribute Value",
                format!("Attribute {} {}, got: \"{value}\"", request.path, self.description()),
            );
        }
    }
}

/// IPv4/IPv6 address or CIDR block.
#[must_use]
pub fn ip_or_cidr() -> Arc<dyn Validator> {
    Arc::new(IpOrCidr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pingone_framework::AttributePath;
    use serde_json::{Value as Json, json};

    fn check(validator: &Arc<dyn Validator>, value: &Json) -> Diagnostics {
        let path = AttributePath::new("field");
        let parent = json!({ "field": value });
        let mut diags = Diagnostics::new();
        validator.validate(
            &ValidationRequest {
                path: &path,
                value,
                parent: &parent,
                config: &parent,
            },
            &mut diags,
        );
        diags
    }

    #[test]
    fn test_resource_id() {
        let validator = p1_resource_id();
        assert!(check(&validator, &json!("9c052a8a-14be-44e4-8f07-2662569994ce")).is_empty());
        let diags = check(&validator, &json!("not-an-id"));
        assert!(diags.has_error());
        assert!(diags.to_string().contains("The PingOne resource ID is malformed."));
        assert!(check(&validator, &Json::Null).is_empty());
    }

    #[test]
    fn test_language_codes() {
        assert!(check(&locale(), &json!("en")).is_empty());
        assert!(check(&locale(), &json!("xx-YY")).has_error());
        assert!(check(&language_code(), &json!("en")).has_error());
        assert!(check(&language_code(), &json!("en-GB")).is_empty());
    }

    #[test]
    fn test_ip_or_cidr() {
        let validator = ip_or_cidr();
        for ok in ["10.0.0.1", "10.0.0.0/8", "2001:db8::1", "2001:db8::/32"] {
            assert!(check(&validator, &json!(ok)).is_empty(), "{ok}");
        }
        for bad in ["10.0.0.256", "10.0.0.0/33", "2001:db8::/129", "example.com", "10.0.0.0/"] {
            assert!(check(&validator, &json!(bad)).has_error(), "{bad}");
        }
    }

    #[test]
    fn test_https_url_message() {
        let diags = check(&https_url(), &json!("http://example.com"));
        assert!(diags.to_string().contains("Must be a valid HTTPS URL"));
    }
}
