//! Input validation for addresses, payment ids, keys and proofs.
//!
//! Addresses are checked by shape only (length and base58 alphabet);
//! full checksum verification is left to the wallet's
//! `validate_address` call.

use crate::constants::NetworkType;
use crate::error::RpcError;
use lazy_static::lazy_static;
use regex::Regex;

const STANDARD_ADDRESS_LEN: usize = 95;
const INTEGRATED_ADDRESS_LEN: usize = 106;

lazy_static! {
    // Monero's base58 alphabet excludes 0, O, I and l.
    static ref BASE58_RE: Regex =
        Regex::new(r"^[123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz]+$")
            .expect("static regex");
    static ref HEX_16_RE: Regex = Regex::new(r"^[0-9a-fA-F]{16}$").expect("static regex");
    static ref HEX_64_RE: Regex = Regex::new(r"^[0-9a-fA-F]{64}$").expect("static regex");
}

/// Structural kind of a Monero address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Standard,
    Integrated,
    Subaddress,
    Unknown,
}

/// True when `address` has a plausible Monero address shape.
pub fn is_valid_address(address: &str) -> bool {
    (address.len() == STANDARD_ADDRESS_LEN || address.len() == INTEGRATED_ADDRESS_LEN)
        && BASE58_RE.is_match(address)
}

/// Classify an address by length and leading character.
pub fn address_type(address: &str) -> AddressType {
    if !is_valid_address(address) {
        return AddressType::Unknown;
    }
    if address.len() == INTEGRATED_ADDRESS_LEN {
        return AddressType::Integrated;
    }
    match address.chars().next() {
        Some('8') | Some('7') | Some('B') => AddressType::Subaddress,
        Some(_) => AddressType::Standard,
        None => AddressType::Unknown,
    }
}

/// Which network an address belongs to, judged by its first character.
pub fn address_network(address: &str) -> Option<NetworkType> {
    let first = address.chars().next()?;
    for network in [
        NetworkType::Mainnet,
        NetworkType::Stagenet,
        NetworkType::Testnet,
    ] {
        if network.address_first_chars().contains(&first) {
            return Some(network);
        }
    }
    None
}

/// Reject an address that does not fit `network`.
pub fn require_address(address: &str, network: NetworkType) -> Result<(), RpcError> {
    if !is_valid_address(address) {
        return Err(RpcError::InvalidInput(format!(
            "not a valid address: {}",
            mask_key(address)
        )));
    }
    match address_network(address) {
        Some(found) if found == network => Ok(()),
        Some(found) => Err(RpcError::InvalidInput(format!(
            "address belongs to {found}, expected {network}"
        ))),
        None => Err(RpcError::InvalidInput(
            "address network unrecognized".to_string(),
        )),
    }
}

/// Payment ids are 16 hex chars (short) or 64 (legacy long).
pub fn is_valid_payment_id(payment_id: &str) -> bool {
    HEX_16_RE.is_match(payment_id) || HEX_64_RE.is_match(payment_id)
}

pub fn is_valid_tx_hash(hash: &str) -> bool {
    HEX_64_RE.is_match(hash)
}

pub fn is_valid_key(key: &str) -> bool {
    HEX_64_RE.is_match(key)
}

/// Kinds of spend/ownership proof strings the wallet can verify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofType {
    Tx,
    Spend,
    Reserve,
}

impl ProofType {
    fn prefix(self) -> &'static str {
        match self {
            ProofType::Tx => "OutProofV",
            ProofType::Spend => "SpendProofV",
            ProofType::Reserve => "ReserveProofV",
        }
    }
}

/// True when `proof` carries the versioned prefix for its kind.
pub fn is_valid_proof(proof: &str, kind: ProofType) -> bool {
    let rest = match proof.strip_prefix(kind.prefix()) {
        Some(rest) => rest,
        None => return false,
    };
    rest.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Shorten secret material for log output. Counts characters, not
/// bytes, so arbitrary caller input never splits a multi-byte char.
pub fn mask_key(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 12 {
        return "***".to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{head}...{tail}")
}
