//! EVM-style addresses and their Filecoin equivalents.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::address::{FilAddress, Network, Payload, EAM_NAMESPACE};
use crate::error::{TypesError, TypesResult};

/// Leading byte of an ID address masked into EVM form.
const MASKED_ID_PREFIX: u8 = 0xff;

/// A 20-byte EVM address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct EthAddress(pub Address);

impl EthAddress {
    /// The all-zero address, used as the "unset" value in stores.
    pub const ZERO: Self = Self(Address::ZERO);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(Address::new(bytes))
    }

    pub fn address(&self) -> Address {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == Address::ZERO
    }

    /// Whether this is an ID address in masked form (`0xff0000…<id>`).
    pub fn is_masked_id(&self) -> bool {
        self.0[0] == MASKED_ID_PREFIX && self.0[1..12].iter().all(|b| *b == 0)
    }

    /// Masked EVM form of an actor ID.
    pub fn from_id(id: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[0] = MASKED_ID_PREFIX;
        bytes[12..].copy_from_slice(&id.to_be_bytes());
        Self::from_bytes(bytes)
    }

    /// Derive an address from an uncompressed secp256k1 public key (65 bytes, 0x04 prefix).
    pub fn from_uncompressed_pubkey(pubkey: &[u8; 65]) -> Self {
        Self(Address::from_raw_public_key(&pubkey[1..]))
    }

    /// Convert a Filecoin address that has a direct EVM form.
    ///
    /// ID addresses map to their masked form; `f410` addresses map to their
    /// 20-byte sub-address. Everything else needs an ID lookup first.
    pub fn from_fil(addr: &FilAddress) -> TypesResult<Self> {
        match addr.payload() {
            Payload::Id(id) => Ok(Self::from_id(*id)),
            Payload::Delegated {
                namespace,
                subaddress,
            } if *namespace == EAM_NAMESPACE && subaddress.len() == 20 => {
                Ok(Self(Address::from_slice(subaddress)))
            }
            _ => Err(TypesError::NotEvmConvertible(addr.to_string())),
        }
    }

    /// Filecoin form: masked IDs become `f0` addresses, everything else `f410`.
    pub fn to_fil(&self, network: Network) -> FilAddress {
        if self.is_masked_id() {
            let mut id = [0u8; 8];
            id.copy_from_slice(&self.0[12..]);
            return FilAddress::new_id(network, u64::from_be_bytes(id));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(self.0.as_slice());
        FilAddress::from_eam(network, bytes)
    }

    /// Lowercase hex with `0x` prefix.
    pub fn to_lower_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.as_slice()))
    }

    /// EIP-55 mixed-case checksum form.
    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }

    /// Case-insensitive comparison against a user-supplied string.
    pub fn matches_str(&self, s: &str) -> bool {
        s.eq_ignore_ascii_case(&self.to_lower_hex())
    }
}

impl From<EthAddress> for Address {
    fn from(addr: EthAddress) -> Self {
        addr.0
    }
}

impl From<Address> for EthAddress {
    fn from(addr: Address) -> Self {
        Self(addr)
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for EthAddress {
    type Err = TypesError;

    /// Requires the `0x` prefix; the checksum case is not enforced.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| TypesError::InvalidEthAddress(s.to_string()))?;
        if digits.len() != 40 {
            return Err(TypesError::InvalidEthAddress(s.to_string()));
        }
        digits
            .parse::<Address>()
            .map(Self)
            .map_err(|_| TypesError::InvalidEthAddress(s.to_string()))
    }
}

impl Serialize for EthAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Protocol;

    #[test]
    fn test_eip55_checksum() {
        // Test vectors from EIP-55
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let addr: EthAddress = expected.parse().unwrap();
            assert_eq!(addr.to_checksum(), expected);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse::<EthAddress>().is_err());
        assert!("0x1234".parse::<EthAddress>().is_err());
        assert!("0xzzAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
            .parse::<EthAddress>()
            .is_err());
    }

    #[test]
    fn test_id_masking() {
        let addr = EthAddress::from_id(1234);
        assert!(addr.is_masked_id());
        assert_eq!(
            addr.to_lower_hex(),
            "0xff000000000000000000000000000000000004d2"
        );
        let fil = addr.to_fil(Network::Mainnet);
        assert_eq!(fil.to_string(), "f01234");
        assert_eq!(EthAddress::from_fil(&fil).unwrap(), addr);
    }

    #[test]
    fn test_delegated_conversion() {
        let eth: EthAddress = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        let fil = eth.to_fil(Network::Testnet);
        assert_eq!(fil.protocol(), Protocol::Delegated);
        assert!(fil.to_string().starts_with("t410f"));
        assert_eq!(EthAddress::from_fil(&fil).unwrap(), eth);
    }

    #[test]
    fn test_secp_not_convertible() {
        let fil = FilAddress::new_secp256k1(Network::Mainnet, [3u8; 20]);
        assert!(matches!(
            EthAddress::from_fil(&fil),
            Err(TypesError::NotEvmConvertible(_))
        ));
    }

    #[test]
    fn test_matches_str_ignores_case() {
        let addr: EthAddress = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();
        assert!(addr.matches_str("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"));
        assert!(addr.matches_str("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"));
        assert!(!addr.matches_str(""));
    }

    #[test]
    fn test_pubkey_derivation() {
        // secp256k1 generator point; private key 1
        let pubkey: [u8; 65] = hex::decode(
            "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
             483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8",
        )
        .unwrap()
        .try_into()
        .unwrap();
        assert_eq!(
            EthAddress::from_uncompressed_pubkey(&pubkey).to_checksum(),
            "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
        );
    }

    #[test]
    fn test_alloy_conversion() {
        let addr = EthAddress::from_id(42);
        let raw: Address = addr.into();
        assert_eq!(EthAddress::from(raw), addr);
        assert_eq!(addr.address(), raw);
    }

    #[test]
    fn test_zero() {
        assert!(EthAddress::ZERO.is_zero());
        assert!(!EthAddress::from_id(1).is_zero());
    }
}
