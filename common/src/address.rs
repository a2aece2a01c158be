use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;

/// Tag byte for the bounceable friendly form.
const TAG_BOUNCEABLE: u8 = 0x11;
/// Tag byte for the non-bounceable friendly form.
const TAG_NON_BOUNCEABLE: u8 = 0x51;
/// Testnet-only marker, OR-ed into the tag byte.
const FLAG_TESTNET: u8 = 0x80;

/// A TON account address: workchain plus 32-byte account hash.
///
/// Parses both wire forms the explorer API and wallets use:
/// the raw `<workchain>:<64 hex digits>` form and the 48-character
/// friendly base64 form (tag byte, workchain byte, hash, CRC16).
/// `Display` renders the non-bounceable mainnet friendly form, which is
/// the normalized sender identity used throughout the chat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TonAddress {
    pub workchain: i32,
    pub hash: [u8; 32],
}

/// Errors from address parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressError {
    /// Neither raw `wc:hex` nor 48-character friendly base64.
    UnknownFormat,
    InvalidWorkchain(String),
    InvalidHash(String),
    InvalidBase64,
    /// Friendly form did not decode to exactly 36 bytes.
    InvalidLength(usize),
    UnknownTag(u8),
    BadChecksum,
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFormat => write!(f, "unrecognized address format"),
            Self::InvalidWorkchain(s) => write!(f, "invalid workchain: {s}"),
            Self::InvalidHash(s) => write!(f, "invalid account hash: {s}"),
            Self::InvalidBase64 => write!(f, "invalid base64 in friendly address"),
            Self::InvalidLength(n) => write!(f, "friendly address is {n} bytes, expected 36"),
            Self::UnknownTag(t) => write!(f, "unknown address tag byte 0x{t:02x}"),
            Self::BadChecksum => write!(f, "address checksum mismatch"),
        }
    }
}

impl TonAddress {
    /// Parse either wire form, detected by shape.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let s = s.trim();
        if s.contains(':') {
            Self::from_raw(s)
        } else if s.len() == 48 {
            Self::from_friendly(s)
        } else {
            Err(AddressError::UnknownFormat)
        }
    }

    /// Parse the raw `<workchain>:<64 hex digits>` form.
    pub fn from_raw(s: &str) -> Result<Self, AddressError> {
        let (wc, hex) = s.split_once(':').ok_or(AddressError::UnknownFormat)?;
        let workchain: i32 = wc
            .parse()
            .map_err(|_| AddressError::InvalidWorkchain(wc.to_string()))?;
        if hex.len() != 64 {
            return Err(AddressError::InvalidHash(hex.to_string()));
        }
        let mut hash = [0u8; 32];
        for (i, byte) in hash.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16)
                .map_err(|_| AddressError::InvalidHash(hex.to_string()))?;
        }
        Ok(Self { workchain, hash })
    }

    /// Parse the 48-character friendly base64 form. Accepts both the
    /// url-safe and standard alphabets, bounceable and non-bounceable
    /// tags, and tolerates the testnet flag.
    pub fn from_friendly(s: &str) -> Result<Self, AddressError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s)
            .or_else(|_| STANDARD_NO_PAD.decode(s))
            .map_err(|_| AddressError::InvalidBase64)?;
        if bytes.len() != 36 {
            return Err(AddressError::InvalidLength(bytes.len()));
        }
        let stored = u16::from_be_bytes([bytes[34], bytes[35]]);
        if crc16_xmodem(&bytes[..34]) != stored {
            return Err(AddressError::BadChecksum);
        }
        let tag = bytes[0] & !FLAG_TESTNET;
        if tag != TAG_BOUNCEABLE && tag != TAG_NON_BOUNCEABLE {
            return Err(AddressError::UnknownTag(bytes[0]));
        }
        let workchain = bytes[1] as i8 as i32;
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&bytes[2..34]);
        Ok(Self { workchain, hash })
    }

    /// Render the raw `<workchain>:<hex>` form.
    pub fn to_raw(&self) -> String {
        let mut hex = String::with_capacity(64);
        for b in &self.hash {
            hex.push_str(&format!("{b:02x}"));
        }
        format!("{}:{}", self.workchain, hex)
    }

    /// Render the friendly mainnet base64 form.
    pub fn to_friendly(&self, bounceable: bool) -> String {
        let tag = if bounceable {
            TAG_BOUNCEABLE
        } else {
            TAG_NON_BOUNCEABLE
        };
        let mut bytes = [0u8; 36];
        bytes[0] = tag;
        bytes[1] = self.workchain as i8 as u8;
        bytes[2..34].copy_from_slice(&self.hash);
        let crc = crc16_xmodem(&bytes[..34]);
        bytes[34..36].copy_from_slice(&crc.to_be_bytes());
        URL_SAFE_NO_PAD.encode(bytes)
    }
}

impl fmt::Display for TonAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_friendly(false))
    }
}

impl FromStr for TonAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// CRC16-XMODEM (poly 0x1021, init 0), as used by the friendly form.
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &b in data {
        crc ^= (b as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAT_RAW: &str = "0:d8c1bda1e9a782b62dbb299c8b6d2e5c71ca47e51335a41077a264643d4251a8";
    const CHAT_NON_BOUNCEABLE: &str = "UQDYwb2h6aeCti27KZyLbS5cccpH5RM1pBB3omRkPUJRqFBy";
    const CHAT_BOUNCEABLE: &str = "EQDYwb2h6aeCti27KZyLbS5cccpH5RM1pBB3omRkPUJRqA23";

    #[test]
    fn raw_to_friendly() {
        let addr = TonAddress::from_raw(CHAT_RAW).unwrap();
        assert_eq!(addr.workchain, 0);
        assert_eq!(addr.to_friendly(false), CHAT_NON_BOUNCEABLE);
        assert_eq!(addr.to_friendly(true), CHAT_BOUNCEABLE);
        assert_eq!(addr.to_string(), CHAT_NON_BOUNCEABLE);
    }

    #[test]
    fn friendly_to_raw() {
        let addr = TonAddress::from_friendly(CHAT_NON_BOUNCEABLE).unwrap();
        assert_eq!(addr.to_raw(), CHAT_RAW);
        // Both tags name the same account.
        assert_eq!(TonAddress::from_friendly(CHAT_BOUNCEABLE).unwrap(), addr);
    }

    #[test]
    fn parse_detects_format() {
        let a = TonAddress::parse(CHAT_RAW).unwrap();
        let b = TonAddress::parse(CHAT_NON_BOUNCEABLE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn masterchain_roundtrip() {
        let raw = "-1:3333333333333333333333333333333333333333333333333333333333333333";
        let addr = TonAddress::from_raw(raw).unwrap();
        assert_eq!(addr.workchain, -1);
        assert_eq!(
            addr.to_friendly(false),
            "Uf8zMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMzMxYA"
        );
        assert_eq!(TonAddress::parse(&addr.to_friendly(true)).unwrap(), addr);
        assert_eq!(addr.to_raw(), raw);
    }

    #[test]
    fn testnet_flag_tolerated() {
        // Non-bounceable tag with the testnet bit set (0xd1).
        let addr =
            TonAddress::from_friendly("0QAAAQIDBAUGBwgJCgsMDQ4PEBESExQVFhcYGRobHB0eH_vs").unwrap();
        assert_eq!(
            addr.to_friendly(false),
            "UQAAAQIDBAUGBwgJCgsMDQ4PEBESExQVFhcYGRobHB0eH0Bm"
        );
    }

    #[test]
    fn rejects_bad_checksum() {
        // Last base64 char altered.
        let err = TonAddress::from_friendly("UQDYwb2h6aeCti27KZyLbS5cccpH5RM1pBB3omRkPUJRqFBz")
            .unwrap_err();
        assert_eq!(err, AddressError::BadChecksum);
    }

    #[test]
    fn rejects_unknown_tag() {
        // 36 bytes with a valid checksum but tag byte 0x00.
        let err = TonAddress::from_friendly("AAAAAQIDBAUGBwgJCgsMDQ4PEBESExQVFhcYGRobHB0eH9L_")
            .unwrap_err();
        assert_eq!(err, AddressError::UnknownTag(0x00));
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(
            TonAddress::parse("not an address").unwrap_err(),
            AddressError::UnknownFormat
        );
        assert_eq!(
            TonAddress::parse("").unwrap_err(),
            AddressError::UnknownFormat
        );
        assert!(matches!(
            TonAddress::from_raw("0:abc").unwrap_err(),
            AddressError::InvalidHash(_)
        ));
        assert!(matches!(
            TonAddress::from_raw("x:d8c1bda1e9a782b62dbb299c8b6d2e5c71ca47e51335a41077a264643d4251a8")
                .unwrap_err(),
            AddressError::InvalidWorkchain(_)
        ));
        assert!(matches!(
            // 48 chars of base64 that decode to 36 bytes of garbage.
            TonAddress::parse("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").unwrap_err(),
            AddressError::BadChecksum | AddressError::UnknownTag(_)
        ));
    }
}
