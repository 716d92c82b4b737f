//! Filecoin native addresses.
//!
//! String form: `<network><protocol><payload>`, where the network is `f`
//! (mainnet) or `t` (testnet) and the protocol is a single digit:
//!
//! ```text
//! 0  ID          f0<decimal id>
//! 1  secp256k1   f1<base32(hash20 || checksum4)>
//! 2  actor       f2<base32(hash20 || checksum4)>
//! 3  BLS         f3<base32(pubkey48 || checksum4)>
//! 4  delegated   f4<namespace>f<base32(subaddress || checksum4)>
//! ```
//!
//! The checksum is a 4-byte blake2b digest of `protocol || payload`.

use std::fmt;
use std::str::FromStr;

use blake2::digest::{Update, VariableOutput};
use blake2::Blake2bVar;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{TypesError, TypesResult};

/// Checksum length in bytes.
const CHECKSUM_LEN: usize = 4;

/// Hash payload length for secp256k1 and actor addresses.
const PAYLOAD_HASH_LEN: usize = 20;

/// BLS public key length.
const BLS_PUBKEY_LEN: usize = 48;

/// Maximum delegated sub-address length.
const MAX_SUBADDRESS_LEN: usize = 54;

/// Namespace of the Ethereum Address Manager actor.
pub const EAM_NAMESPACE: u64 = 10;

const BASE32_ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

/// Filecoin network, as encoded in the address prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// `f` prefix
    #[default]
    Mainnet,
    /// `t` prefix (calibnet and devnets)
    Testnet,
}

impl Network {
    /// Address prefix character.
    pub fn prefix(&self) -> char {
        match self {
            Self::Mainnet => 'f',
            Self::Testnet => 't',
        }
    }

    fn from_prefix(c: char) -> Option<Self> {
        match c {
            'f' => Some(Self::Mainnet),
            't' => Some(Self::Testnet),
            _ => None,
        }
    }
}

/// Address protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Protocol {
    Id = 0,
    Secp256k1 = 1,
    Actor = 2,
    Bls = 3,
    Delegated = 4,
}

impl Protocol {
    fn from_digit(c: char) -> Option<Self> {
        match c {
            '0' => Some(Self::Id),
            '1' => Some(Self::Secp256k1),
            '2' => Some(Self::Actor),
            '3' => Some(Self::Bls),
            '4' => Some(Self::Delegated),
            _ => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Id => "ID",
            Self::Secp256k1 => "secp256k1",
            Self::Actor => "actor",
            Self::Bls => "BLS",
            Self::Delegated => "delegated",
        };
        f.write_str(name)
    }
}

/// Protocol-specific address payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    Id(u64),
    Secp256k1([u8; PAYLOAD_HASH_LEN]),
    Actor([u8; PAYLOAD_HASH_LEN]),
    Bls([u8; BLS_PUBKEY_LEN]),
    Delegated { namespace: u64, subaddress: Vec<u8> },
}

/// A Filecoin native address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilAddress {
    network: Network,
    payload: Payload,
}

impl FilAddress {
    /// Create an ID address.
    pub fn new_id(network: Network, id: u64) -> Self {
        Self {
            network,
            payload: Payload::Id(id),
        }
    }

    /// Create a secp256k1 address from its 20-byte key hash.
    pub fn new_secp256k1(network: Network, hash: [u8; PAYLOAD_HASH_LEN]) -> Self {
        Self {
            network,
            payload: Payload::Secp256k1(hash),
        }
    }

    /// Create a delegated address.
    pub fn new_delegated(network: Network, namespace: u64, subaddress: &[u8]) -> TypesResult<Self> {
        if subaddress.len() > MAX_SUBADDRESS_LEN {
            return Err(TypesError::invalid_address(
                hex::encode(subaddress),
                "delegated sub-address too long",
            ));
        }
        Ok(Self {
            network,
            payload: Payload::Delegated {
                namespace,
                subaddress: subaddress.to_vec(),
            },
        })
    }

    /// Delegated address in the EAM namespace.
    pub(crate) fn from_eam(network: Network, subaddress: [u8; 20]) -> Self {
        Self {
            network,
            payload: Payload::Delegated {
                namespace: EAM_NAMESPACE,
                subaddress: subaddress.to_vec(),
            },
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn protocol(&self) -> Protocol {
        match self.payload {
            Payload::Id(_) => Protocol::Id,
            Payload::Secp256k1(_) => Protocol::Secp256k1,
            Payload::Actor(_) => Protocol::Actor,
            Payload::Bls(_) => Protocol::Bls,
            Payload::Delegated { .. } => Protocol::Delegated,
        }
    }

    /// The actor ID, for ID addresses.
    pub fn id(&self) -> Option<u64> {
        match self.payload {
            Payload::Id(id) => Some(id),
            _ => None,
        }
    }

    /// Same address rendered for a different network.
    pub fn with_network(&self, network: Network) -> Self {
        Self {
            network,
            payload: self.payload.clone(),
        }
    }

    /// Payload bytes without the protocol byte.
    fn payload_bytes(&self) -> Vec<u8> {
        match &self.payload {
            Payload::Id(id) => encode_uvarint(*id),
            Payload::Secp256k1(hash) | Payload::Actor(hash) => hash.to_vec(),
            Payload::Bls(key) => key.to_vec(),
            Payload::Delegated {
                namespace,
                subaddress,
            } => {
                let mut bytes = encode_uvarint(*namespace);
                bytes.extend_from_slice(subaddress);
                bytes
            }
        }
    }

    /// Binary form: protocol byte followed by the payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![self.protocol() as u8];
        bytes.extend(self.payload_bytes());
        bytes
    }

    fn checksum(&self) -> [u8; CHECKSUM_LEN] {
        checksum(&self.to_bytes())
    }
}

impl fmt::Display for FilAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.network.prefix(),
            self.protocol() as u8
        )?;
        match &self.payload {
            Payload::Id(id) => write!(f, "{}", id),
            Payload::Delegated {
                namespace,
                subaddress,
            } => {
                let mut raw = subaddress.clone();
                raw.extend_from_slice(&self.checksum());
                write!(f, "{}f{}", namespace, base32_encode(&raw))
            }
            Payload::Secp256k1(hash) | Payload::Actor(hash) => {
                let mut raw = hash.to_vec();
                raw.extend_from_slice(&self.checksum());
                f.write_str(&base32_encode(&raw))
            }
            Payload::Bls(key) => {
                let mut raw = key.to_vec();
                raw.extend_from_slice(&self.checksum());
                f.write_str(&base32_encode(&raw))
            }
        }
    }
}

impl FromStr for FilAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (net, proto) = match (chars.next(), chars.next()) {
            (Some(n), Some(p)) if s.len() > 2 => (n, p),
            _ => return Err(TypesError::invalid_address(s, "too short")),
        };
        let network =
            Network::from_prefix(net).ok_or_else(|| TypesError::UnknownNetwork(s.to_string()))?;
        let protocol = Protocol::from_digit(proto)
            .ok_or_else(|| TypesError::invalid_address(s, "unknown protocol"))?;
        let rest = &s[2..];

        let (payload, raw) = match protocol {
            Protocol::Id => {
                if rest.len() > 20 || !rest.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(TypesError::invalid_address(s, "ID must be decimal"));
                }
                let id = rest
                    .parse::<u64>()
                    .map_err(|_| TypesError::invalid_address(s, "ID out of range"))?;
                return Ok(Self::new_id(network, id));
            }
            Protocol::Secp256k1 | Protocol::Actor => {
                let raw = decode_with_len(s, rest, PAYLOAD_HASH_LEN)?;
                let mut hash = [0u8; PAYLOAD_HASH_LEN];
                hash.copy_from_slice(&raw[..PAYLOAD_HASH_LEN]);
                let payload = if protocol == Protocol::Secp256k1 {
                    Payload::Secp256k1(hash)
                } else {
                    Payload::Actor(hash)
                };
                (payload, raw)
            }
            Protocol::Bls => {
                let raw = decode_with_len(s, rest, BLS_PUBKEY_LEN)?;
                let mut key = [0u8; BLS_PUBKEY_LEN];
                key.copy_from_slice(&raw[..BLS_PUBKEY_LEN]);
                (Payload::Bls(key), raw)
            }
            Protocol::Delegated => {
                let (ns, encoded) = rest
                    .split_once('f')
                    .ok_or_else(|| TypesError::invalid_address(s, "missing namespace separator"))?;
                if ns.is_empty() || ns.len() > 20 || !ns.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(TypesError::invalid_address(s, "invalid namespace"));
                }
                let namespace = ns
                    .parse::<u64>()
                    .map_err(|_| TypesError::invalid_address(s, "namespace out of range"))?;
                let raw = base32_decode(encoded)
                    .ok_or_else(|| TypesError::invalid_address(s, "invalid base32 payload"))?;
                if raw.len() < CHECKSUM_LEN || raw.len() - CHECKSUM_LEN > MAX_SUBADDRESS_LEN {
                    return Err(TypesError::invalid_address(s, "invalid payload length"));
                }
                let payload = Payload::Delegated {
                    namespace,
                    subaddress: raw[..raw.len() - CHECKSUM_LEN].to_vec(),
                };
                (payload, raw)
            }
        };

        let address = Self { network, payload };
        if raw[raw.len() - CHECKSUM_LEN..] != address.checksum() {
            return Err(TypesError::Checksum(s.to_string()));
        }
        Ok(address)
    }
}

impl Serialize for FilAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FilAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

fn decode_with_len(input: &str, encoded: &str, payload_len: usize) -> TypesResult<Vec<u8>> {
    let raw = base32_decode(encoded)
        .ok_or_else(|| TypesError::invalid_address(input, "invalid base32 payload"))?;
    if raw.len() != payload_len + CHECKSUM_LEN {
        return Err(TypesError::invalid_address(input, "invalid payload length"));
    }
    Ok(raw)
}

/// 4-byte blake2b checksum.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut out = [0u8; CHECKSUM_LEN];
    // Blake2bVar accepts any output size in 1..=64.
    if let Ok(mut hasher) = Blake2bVar::new(CHECKSUM_LEN) {
        hasher.update(data);
        let _ = hasher.finalize_variable(&mut out);
    }
    out
}

/// Unsigned LEB128.
fn encode_uvarint(mut value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(10);
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// RFC 4648 base32, lowercase, no padding.
fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for &byte in data {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}

fn base32_decode(s: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0;
    for c in s.bytes() {
        let value = BASE32_ALPHABET.iter().position(|&a| a == c)? as u32;
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push(((buffer >> bits) & 0xff) as u8);
        }
    }
    // Trailing bits are padding and must be zero.
    if bits >= 5 || buffer & ((1 << bits) - 1) != 0 {
        return None;
    }
    Some(out)
}
