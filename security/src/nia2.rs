use crate::{Direction, MacTag, SecKey128};
use aes::Aes128;
use cmac::{Cmac, Mac};

/// 128-NIA2 message authentication code - TS33.401, B.2.3.
///
/// AES in CMAC mode over COUNT (32 bits), BEARER (5 bits), DIRECTION
/// (1 bit), 26 zero bits, then the message.  The 4 most significant bytes
/// of the CMAC output are the MAC-I.
pub fn nia2_mac(
    integrity_key: &SecKey128,
    count: u32,
    bearer_5bit: u8,
    direction: Direction,
    message: &[u8],
) -> MacTag {
    let mut mac = Cmac::<Aes128>::new_from_slice(integrity_key).unwrap();
    mac.update(&count.to_be_bytes());
    mac.update(&[(bearer_5bit << 3) | ((direction as u8) << 2), 0, 0, 0]);
    mac.update(message);
    let tag = mac.finalize().into_bytes();
    tag[0..4].try_into().unwrap()
}
