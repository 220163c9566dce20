//! NR AS security transforms used by the PDCP layer.

pub mod nea2;
pub mod nia2;

/// 128-bit AS key (K_RRCint, K_RRCenc, K_UPint or K_UPenc).
pub type SecKey128 = [u8; 16];

/// 4-byte message authentication code (MAC-I).
pub type MacTag = [u8; 4];

/// DIRECTION input to the security algorithms - TS33.401, B.1/B.2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Uplink = 0,
    Downlink = 1,
}

/// NR integrity algorithm selector - TS33.501, 5.11.1.2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegrityAlgorithm {
    Nia0,
    Nia1,
    Nia2,
    Nia3,
}

/// NR ciphering algorithm selector - TS33.501, 5.11.1.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CipheringAlgorithm {
    Nea0,
    Nea1,
    Nea2,
    Nea3,
}
