//! Format patterns backing the string-format type tags
//!
//! Patterns are compiled once on first use. Digit classes are spelled `[0-9]`
//! because `\d` in the `regex` crate also matches non-ASCII digits.

use regex::Regex;
use std::sync::OnceLock;

use super::predicate::TypeTag;

const DATETIME: &str =
    r"^[0-9]{4}-(?:0[0-9]|1[0-2])-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(\.[0-9]{3})?Z$";
const DATE: &str = r"^[0-9]{4}-(?:0[0-9]|1[0-2])-[0-9]{2}$";
const TIME: &str = r"^[0-9]{2}:[0-9]{2}:[0-9]{2}$";
// Local part: dot separated atoms. Domain: labels that neither start nor end
// with a hyphen, or a bracketed dotted quad.
const EMAIL: &str = concat!(
    r"^(?:[a-zA-Z0-9_!#$%&'*+\-/=?^`{|}~]+\.)*[a-zA-Z0-9_!#$%&'*+\-/=?^`{|}~]+@",
    r"(?:(?:[a-zA-Z0-9](?:[a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z0-9](?:[a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?",
    r"|\[(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\])$",
);
const IPADDRESS: &str =
    r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$";
const IPV6ADDRESS: &str = r"^\s*((([0-9A-Fa-f]{1,4}:){7}([0-9A-Fa-f]{1,4}|:))|(([0-9A-Fa-f]{1,4}:){6}(:[0-9A-Fa-f]{1,4}|((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3})|:))|(([0-9A-Fa-f]{1,4}:){5}(((:[0-9A-Fa-f]{1,4}){1,2})|:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3})|:))|(([0-9A-Fa-f]{1,4}:){4}(((:[0-9A-Fa-f]{1,4}){1,3})|((:[0-9A-Fa-f]{1,4})?:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}))|:))|(([0-9A-Fa-f]{1,4}:){3}(((:[0-9A-Fa-f]{1,4}){1,4})|((:[0-9A-Fa-f]{1,4}){0,2}:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}))|:))|(([0-9A-Fa-f]{1,4}:){2}(((:[0-9A-Fa-f]{1,4}){1,5})|((:[0-9A-Fa-f]{1,4}){0,3}:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}))|:))|(([0-9A-Fa-f]{1,4}:){1}(((:[0-9A-Fa-f]{1,4}){1,6})|((:[0-9A-Fa-f]{1,4}){0,4}:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}))|:))|(:(((:[0-9A-Fa-f]{1,4}){1,7})|((:[0-9A-Fa-f]{1,4}){0,5}:((25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])(\.(25[0-5]|2[0-4][0-9]|1[0-9][0-9]|[1-9]?[0-9])){3}))|:)))(%.+)?\s*$";
const URI: &str = r"^[a-zA-Z][a-zA-Z0-9+\-.]*:\S*$";
const HOSTNAME: &str =
    r"^(([a-zA-Z]|[a-zA-Z][a-zA-Z0-9\-]*[a-zA-Z0-9])\.)*([A-Za-z]|[A-Za-z][A-Za-z0-9\-]*[A-Za-z0-9])$";
const ALPHA: &str = r"^[a-zA-Z]+$";
const ALPHANUMERIC: &str = r"^[a-zA-Z0-9]+$";

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in format pattern is valid"))
}

/// The pattern a string must match to satisfy `tag`
///
/// `None` for tags that check shape rather than format.
pub fn pattern_for(tag: TypeTag) -> Option<&'static Regex> {
    static DATETIME_RE: OnceLock<Regex> = OnceLock::new();
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    static TIME_RE: OnceLock<Regex> = OnceLock::new();
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    static IPADDRESS_RE: OnceLock<Regex> = OnceLock::new();
    static IPV6ADDRESS_RE: OnceLock<Regex> = OnceLock::new();
    static URI_RE: OnceLock<Regex> = OnceLock::new();
    static HOSTNAME_RE: OnceLock<Regex> = OnceLock::new();
    static ALPHA_RE: OnceLock<Regex> = OnceLock::new();
    static ALPHANUMERIC_RE: OnceLock<Regex> = OnceLock::new();

    let regex = match tag {
        TypeTag::DateTime => compiled(&DATETIME_RE, DATETIME),
        TypeTag::Date => compiled(&DATE_RE, DATE),
        TypeTag::Time => compiled(&TIME_RE, TIME),
        TypeTag::Email => compiled(&EMAIL_RE, EMAIL),
        TypeTag::IPAddress => compiled(&IPADDRESS_RE, IPADDRESS),
        TypeTag::IPV6Address => compiled(&IPV6ADDRESS_RE, IPV6ADDRESS),
        TypeTag::URI => compiled(&URI_RE, URI),
        TypeTag::Hostname => compiled(&HOSTNAME_RE, HOSTNAME),
        TypeTag::Alpha => compiled(&ALPHA_RE, ALPHA),
        TypeTag::Alphanumeric => compiled(&ALPHANUMERIC_RE, ALPHANUMERIC),
        TypeTag::JsonObject
        | TypeTag::JsonArray
        | TypeTag::String
        | TypeTag::Number
        | TypeTag::Boolean
        | TypeTag::Null
        | TypeTag::Integer
        | TypeTag::Long
        | TypeTag::Double => return None,
    };
    Some(regex)
}
