//! Regular expressions shared across resources.
//!
//! The unanchored `*_PATTERN` strings are used to compose import identifier
//! grammars; the anchored statics validate whole values.

use std::sync::LazyLock;

use regex::Regex;

/// A PingOne resource UUID, unanchored.
pub const P1_RESOURCE_ID_PATTERN: &str = "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}";

/// A DaVinci resource ID (32 lowercase hex characters), unanchored.
pub const P1_DAVINCI_RESOURCE_ID_PATTERN: &str = "[a-f0-9]{32}";

/// Any non-empty segment without the import separator.
pub const NAME_PATTERN: &str = "[^/]+";

const URL_WITHOUT_SCHEME: &str = r"(?:(?:[\w-]+\.)+[a-z]{2,}|localhost)(?::\d+)*(?:/[\w.-]+)*(?:/[\w:.-]+)?/?(?:\?.*)?$";

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern compiles")
}

/// Whole-string PingOne resource UUID.
pub static P1_RESOURCE_ID: LazyLock<Regex> = LazyLock::new(|| compile(&format!("^{P1_RESOURCE_ID_PATTERN}$")));

/// Whole-string DaVinci resource ID.
pub static P1_DAVINCI_RESOURCE_ID: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!("^{P1_DAVINCI_RESOURCE_ID_PATTERN}$")));

/// RFC 3339 timestamp with optional fraction and offset.
pub static RFC3339: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^((?:(\d{4}-\d{2}-\d{2})T(\d{2}:\d{2}:\d{2}(?:\.\d+)?))(Z|[+-]\d{2}:\d{2})?)$")
});

/// `#rgb` or `#rrggbb`.
pub static HEX_COLOUR: LazyLock<Regex> = LazyLock::new(|| compile("^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$"));

/// A bare DNS domain such as `example.com`.
pub static DOMAIN: LazyLock<Regex> = LazyLock::new(|| compile(r"^(?:[\w-]+\.)+[a-z]{2,}$"));

/// A hostname, optionally followed by a path and query.
pub static HOSTNAME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(?:[\w-]+\.)+[a-z]{2,}(?:/[\w-]+)*(?:/[\w.-]+)?/?(?:\?.*)?$"));

/// `http://` or `https://` URL.
pub static HTTP_OR_HTTPS_URL: LazyLock<Regex> = LazyLock::new(|| compile(&format!("^https?://{URL_WITHOUT_SCHEME}")));

/// `https://` URL only.
pub static HTTPS_URL: LazyLock<Regex> = LazyLock::new(|| compile(&format!("^https://{URL_WITHOUT_SCHEME}")));

/// ISO 3166-1 alpha-2 country code.
pub static COUNTRY_CODE: LazyLock<Regex> = LazyLock::new(|| {
    compile(concat!(
        "^(A(D|E|F|G|I|L|M|N|O|R|S|T|Q|U|W|X|Z)|B(A|B|D|E|F|G|H|I|J|L|M|N|O|R|S|T|V|W|Y|Z)",
        "|C(A|C|D|F|G|H|I|K|L|M|N|O|R|U|V|X|Y|Z)|D(E|J|K|M|O|Z)|E(C|E|G|H|R|S|T)|F(I|J|K|M|O|R)",
        "|G(A|B|D|E|F|G|H|I|L|M|N|P|Q|R|S|T|U|W|Y)|H(K|M|N|R|T|U)|I(D|E|Q|L|M|N|O|R|S|T)|J(E|M|O|P)",
        "|K(E|G|H|I|M|N|P|R|W|Y|Z)|L(A|B|C|I|K|R|S|T|U|V|Y)",
        "|M(A|C|D|E|F|G|H|K|L|M|N|O|Q|P|R|S|T|U|V|W|X|Y|Z)|N(A|C|E|F|G|I|L|O|P|R|U|Z)|OM",
        "|P(A|E|F|G|H|K|L|M|N|R|S|T|W|Y)|QA|R(E|O|S|U|W)",
        "|S(A|B|C|D|E|G|H|I|J|K|L|M|N|O|R|T|V|Y|Z)|T(C|D|F|G|H|J|K|L|M|N|O|R|T|V|W|Z)",
        "|U(A|G|M|S|Y|Z)|V(A|C|E|G|I|N|U)|W(F|S)|Y(E|T)|Z(A|M|W))$",
    ))
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_ids() {
        assert!(P1_RESOURCE_ID.is_match("9c052a8a-14be-44e4-8f07-2662569994ce"));
        assert!(!P1_RESOURCE_ID.is_match("9C052A8A-14BE-44E4-8F07-2662569994CE"));
        assert!(!P1_RESOURCE_ID.is_match("prefix-9c052a8a-14be-44e4-8f07-2662569994ce"));
        assert!(P1_DAVINCI_RESOURCE_ID.is_match("0123456789abcdef0123456789abcdef"));
        assert!(!P1_DAVINCI_RESOURCE_ID.is_match("0123456789abcdef"));
    }

    #[test]
    fn test_urls() {
        assert!(HTTPS_URL.is_match("https://example.com/hook"));
        assert!(HTTPS_URL.is_match("https://localhost:8443/a/b?x=1"));
        assert!(!HTTPS_URL.is_match("http://example.com/hook"));
        assert!(HTTP_OR_HTTPS_URL.is_match("http://example.com"));
        assert!(!HTTP_OR_HTTPS_URL.is_match("ftp://example.com"));
    }

    #[test]
    fn test_domains_and_hosts() {
        assert!(DOMAIN.is_match("mail.example.com"));
        assert!(!DOMAIN.is_match("example"));
        assert!(HOSTNAME.is_match("auth.example.com/as/authorize"));
    }

    #[test]
    fn test_misc() {
        assert!(HEX_COLOUR.is_match("#fff"));
        assert!(HEX_COLOUR.is_match("#A1B2C3"));
        assert!(!HEX_COLOUR.is_match("A1B2C3"));
        assert!(COUNTRY_CODE.is_match("GB"));
        assert!(!COUNTRY_CODE.is_match("XX"));
        assert!(RFC3339.is_match("2024-05-01T10:00:00Z"));
        assert!(RFC3339.is_match("2024-05-01T10:00:00.123+01:00"));
        assert!(!RFC3339.is_match("2024-05-01 10:00:00"));
    }
}
