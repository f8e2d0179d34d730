//! Value formats used across PingOne resources.
//!
//! [`patterns`] holds the raw regular expressions (also used to build import
//! identifier grammars), [`iso`] the language tables and [`validators`] the
//! schema validators built from both.

pub mod iso;
pub mod patterns;
pub mod validators;

pub use validators::{
    country_code, domain, hex_colour, hostname, http_or_https_url, https_url, ip_or_cidr,
    language_code, locale, p1_davinci_resource_id, p1_resource_id, rfc3339,
};
