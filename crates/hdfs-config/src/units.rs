//! # Setting Value Types
//!
//! String-encoded value types used by [`crate::config::HdfsSettings`]:
//! network addresses and data sizes. Durations use `humantime_serde`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigurationError;

/// Host with an optional port, e.g. `proxy.example.com:1080` or `[::1]:1080`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "HostAndPortRepr", into = "String")]
pub struct HostAndPort {
    host: String,
    port: Option<u16>,
}

impl HostAndPort {
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    fn invalid(input: &str, reason: &str) -> ConfigurationError {
        ConfigurationError::invalid_value("host_and_port", input, reason)
    }
}

impl FromStr for HostAndPort {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();

        let (host, port) = if let Some(bracketed) = input.strip_prefix('[') {
            let (host, rest) = bracketed
                .split_once(']')
                .ok_or_else(|| Self::invalid(s, "Missing closing bracket"))?;
            match rest {
                "" => (host, None),
                _ => {
                    let port = rest
                        .strip_prefix(':')
                        .ok_or_else(|| Self::invalid(s, "Unexpected text after bracketed host"))?;
                    (host, Some(port))
                }
            }
        } else {
            match input.split_once(':') {
                // more than one colon: bare IPv6 literal without a port
                Some((_, rest)) if rest.contains(':') => (input, None),
                Some((host, port)) => (host, Some(port)),
                None => (input, None),
            }
        };

        if host.is_empty() {
            return Err(Self::invalid(s, "Host cannot be empty"));
        }

        let port = port
            .map(|port| {
                port.parse::<u16>()
                    .map_err(|_| Self::invalid(s, "Port must be between 0 and 65535"))
            })
            .transpose()?;

        Ok(Self::new(host, port))
    }
}

impl fmt::Display for HostAndPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]", self.host)?;
        } else {
            f.write_str(&self.host)?;
        }
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for HostAndPort {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Accepted serialized shapes
///
/// Environment providers read a bare bracketed IPv6 host such as `[::1]` as
/// a one-element sequence.
#[derive(Deserialize)]
#[serde(untagged)]
enum HostAndPortRepr {
    Text(String),
    Bracketed([String; 1]),
}

impl TryFrom<HostAndPortRepr> for HostAndPort {
    type Error = ConfigurationError;

    fn try_from(value: HostAndPortRepr) -> Result<Self, Self::Error> {
        match value {
            HostAndPortRepr::Text(text) => text.parse(),
            HostAndPortRepr::Bracketed([host]) => format!("[{host}]").parse(),
        }
    }
}

impl From<HostAndPort> for String {
    fn from(value: HostAndPort) -> Self {
        value.to_string()
    }
}

const SIZE_UNITS: [(&str, u64); 6] = [
    ("PB", 1 << 50),
    ("TB", 1 << 40),
    ("GB", 1 << 30),
    ("MB", 1 << 20),
    ("kB", 1 << 10),
    ("B", 1),
];

/// Amount of data in bytes, written as `100MB`, `64kB`, `1.5GB` or `4096B`
///
/// Units are powers of 1024 and match case-insensitively. A bare number is
/// a byte count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DataSize(u64);

impl DataSize {
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    pub const fn from_megabytes(megabytes: u64) -> Self {
        Self(megabytes << 20)
    }

    pub const fn bytes(self) -> u64 {
        self.0
    }
}

impl FromStr for DataSize {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ConfigurationError::invalid_value("data_size", s, reason);

        let input = s.trim();
        let split = input
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(input.len());
        let (number, unit) = input.split_at(split);
        let unit = unit.trim();

        let multiplier = if unit.is_empty() {
            1
        } else {
            SIZE_UNITS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(unit))
                .map(|(_, multiplier)| *multiplier)
                .ok_or_else(|| invalid("Unknown unit. Valid units are: B, kB, MB, GB, TB, PB"))?
        };

        let value: f64 = number
            .parse()
            .map_err(|_| invalid("Expected a non-negative number followed by a unit"))?;

        let bytes = value * multiplier as f64;
        if !bytes.is_finite() || bytes > u64::MAX as f64 {
            return Err(invalid("Size is too large"));
        }

        Ok(Self(bytes as u64))
    }
}

impl fmt::Display for DataSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (unit, multiplier) = SIZE_UNITS
            .iter()
            .find(|(_, multiplier)| self.0 != 0 && self.0 % multiplier == 0)
            .copied()
            .unwrap_or(("B", 1));
        write!(f, "{}{unit}", self.0 / multiplier)
    }
}

impl Serialize for DataSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DataSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DataSizeVisitor;

        impl Visitor<'_> for DataSizeVisitor {
            type Value = DataSize;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a data size such as \"100MB\" or a byte count")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<DataSize, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<DataSize, E> {
                Ok(DataSize(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<DataSize, E> {
                u64::try_from(v)
                    .map(DataSize)
                    .map_err(|_| E::custom("data size cannot be negative"))
            }
        }

        deserializer.deserialize_any(DataSizeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_and_port_parsing() {
        let proxy: HostAndPort = "proxy.example.com:1080".parse().unwrap();
        assert_eq!(proxy.host(), "proxy.example.com");
        assert_eq!(proxy.port(), Some(1080));
        assert_eq!(proxy.to_string(), "proxy.example.com:1080");

        let bare: HostAndPort = "proxy".parse().unwrap();
        assert_eq!(bare.port(), None);
        assert_eq!(bare.to_string(), "proxy");

        let v6: HostAndPort = "[::1]:1080".parse().unwrap();
        assert_eq!(v6.host(), "::1");
        assert_eq!(v6.port(), Some(1080));
        assert_eq!(v6.to_string(), "[::1]:1080");

        let bare_v6: HostAndPort = "fe80::1".parse().unwrap();
        assert_eq!(bare_v6.port(), None);
        assert_eq!(bare_v6.to_string(), "[fe80::1]");
    }

    #[test]
    fn test_host_and_port_deserializes_bracketed_sequence() {
        let text: HostAndPort = serde_json::from_str("\"[::1]:1080\"").unwrap();
        assert_eq!(text.port(), Some(1080));

        let sequence: HostAndPort = serde_json::from_str("[\"::1\"]").unwrap();
        assert_eq!(sequence.host(), "::1");
        assert_eq!(sequence.port(), None);
        assert_eq!(sequence.to_string(), "[::1]");

        assert!(serde_json::from_str::<HostAndPort>("\"proxy:socks\"").is_err());
        assert!(serde_json::from_str::<HostAndPort>("[\"a\", \"b\"]").is_err());
    }

    #[test]
    fn test_host_and_port_rejections() {
        assert!("".parse::<HostAndPort>().is_err());
        assert!(":1080".parse::<HostAndPort>().is_err());
        assert!("proxy:70000".parse::<HostAndPort>().is_err());
        assert!("proxy:socks".parse::<HostAndPort>().is_err());
        assert!("[::1".parse::<HostAndPort>().is_err());
        assert!("[::1]1080".parse::<HostAndPort>().is_err());
    }

    #[test]
    fn test_data_size_parsing() {
        assert_eq!("100MB".parse::<DataSize>().unwrap().bytes(), 100 * 1024 * 1024);
        assert_eq!("64kB".parse::<DataSize>().unwrap().bytes(), 64 * 1024);
        assert_eq!("64KB".parse::<DataSize>().unwrap().bytes(), 64 * 1024);
        assert_eq!("1.5 GB".parse::<DataSize>().unwrap().bytes(), 3 * 512 * 1024 * 1024);
        assert_eq!("4096".parse::<DataSize>().unwrap().bytes(), 4096);
        assert_eq!("0B".parse::<DataSize>().unwrap().bytes(), 0);

        assert!("MB".parse::<DataSize>().is_err());
        assert!("10XB".parse::<DataSize>().is_err());
        assert!("-1MB".parse::<DataSize>().is_err());
        assert!("99999999999PB".parse::<DataSize>().is_err());
    }

    #[test]
    fn test_data_size_display_uses_largest_exact_unit() {
        assert_eq!(DataSize::from_megabytes(100).to_string(), "100MB");
        assert_eq!(DataSize::from_bytes(1536).to_string(), "1536B");
        assert_eq!(DataSize::from_bytes(2048).to_string(), "2kB");
        assert_eq!(DataSize::from_bytes(0).to_string(), "0B");
    }

    #[test]
    fn test_data_size_deserializes_strings_and_integers() {
        #[derive(Deserialize)]
        struct Holder {
            size: DataSize,
        }

        let text: Holder = toml::from_str("size = \"1MB\"").unwrap();
        assert_eq!(text.size.bytes(), 1 << 20);

        let number: Holder = toml::from_str("size = 512").unwrap();
        assert_eq!(number.size.bytes(), 512);

        assert!(toml::from_str::<Holder>("size = -5").is_err());
    }
}
