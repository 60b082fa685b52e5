use {
    serde::{Deserialize, Deserializer},
    std::fmt,
    thiserror::Error,
};

const ADDRESS_PREFIX: &str = "0x";
const ADDRESS_LEN: usize = 42;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidAddress {
    #[error("address must start with {ADDRESS_PREFIX}: {0:?}")]
    MissingPrefix(String),
    #[error("address must be {ADDRESS_LEN} characters, got {0}")]
    WrongLength(usize),
    #[error("address contains a non-hexadecimal character: {0:?}")]
    NotHex(String),
}

/// Canonical form of a ledger address: trimmed, lower-cased, `0x`-prefixed,
/// 42 characters total. Two addresses are equal iff their canonical forms are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self, InvalidAddress> {
        let canonical = raw.trim().to_lowercase();

        if !canonical.starts_with(ADDRESS_PREFIX) {
            return Err(InvalidAddress::MissingPrefix(canonical));
        }
        if canonical.len() != ADDRESS_LEN {
            return Err(InvalidAddress::WrongLength(canonical.len()));
        }
        if !canonical[ADDRESS_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit())
        {
            return Err(InvalidAddress::NotHex(canonical));
        }

        Ok(Address(canonical))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One historical transaction as reported by the remote index. `to` is empty
/// for contract-creation transactions. Never mutated after deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Transfer {
    pub hash: String,
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(rename = "blockNumber", deserialize_with = "u64_from_string")]
    pub block_number: u64,
    #[serde(rename = "timeStamp", deserialize_with = "u64_from_string")]
    pub timestamp: u64,
}

impl Transfer {
    /// Destination parsed to canonical form, if present and well-formed.
    pub fn destination(&self) -> Option<Address> {
        if self.to.is_empty() {
            return None;
        }
        Address::parse(&self.to).ok()
    }
}

// The API encodes every numeric field as a JSON string.
fn u64_from_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "0x742d35cc6634c0532925a3b844bc454e4438f44e";

    #[test]
    fn test_parse_valid_address() {
        let address = Address::parse(VALID).unwrap();
        assert_eq!(address.as_str(), VALID);
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let upper = "  0x742D35Cc6634C0532925a3b844Bc454e4438F44E\n";
        assert_eq!(
            Address::parse(upper).unwrap(),
            Address::parse(VALID).unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        let result = Address::parse("742d35cc6634c0532925a3b844bc454e4438f44e00");
        assert!(matches!(result, Err(InvalidAddress::MissingPrefix(_))));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert_eq!(
            Address::parse("0x742d35cc"),
            Err(InvalidAddress::WrongLength(10))
        );
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let result = Address::parse("0x742d35cc6634c0532925a3b844bc454e4438f44z");
        assert!(matches!(result, Err(InvalidAddress::NotHex(_))));
    }

    #[test]
    fn test_transfer_destination_empty_is_none() {
        let transfer = Transfer {
            hash: "0xabc".to_string(),
            from: VALID.to_string(),
            to: String::new(),
            block_number: 1,
            timestamp: 1_700_000_000,
        };
        assert!(transfer.destination().is_none());
    }

    #[test]
    fn test_transfer_deserializes_string_numbers() {
        let json = r#"{
            "hash": "0xdeadbeef",
            "from": "0x742d35cc6634c0532925a3b844bc454e4438f44e",
            "to": "0x53d284357ec70ce289d6d64134dfac8e511c8a3d",
            "blockNumber": "1234567",
            "timeStamp": "1700000000"
        }"#;
        let transfer: Transfer = serde_json::from_str(json).unwrap();
        assert_eq!(transfer.block_number, 1234567);
        assert_eq!(transfer.timestamp, 1700000000);
        assert!(transfer.destination().is_some());
    }
}
