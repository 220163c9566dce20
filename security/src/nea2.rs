use crate::{Direction, SecKey128};
use aes::Aes128;
use ctr::Ctr128BE;
use ctr::cipher::{KeyIvInit, StreamCipher};

/// 128-NEA2 keystream application - TS33.401, B.1.3.
///
/// AES-128 in CTR mode.  The initial counter block is COUNT (32 bits),
/// BEARER (5 bits), DIRECTION (1 bit) and 90 zero bits; subsequent blocks
/// increment it as a big-endian 128-bit integer.  XORing the keystream is
/// its own inverse, so the same call deciphers.
pub fn nea2_apply_keystream(
    ciphering_key: &SecKey128,
    count: u32,
    bearer_5bit: u8,
    direction: Direction,
    data: &mut [u8],
) {
    let mut iv = [0u8; 16];
    iv[0..4].copy_from_slice(&count.to_be_bytes());
    iv[4] = (bearer_5bit << 3) | ((direction as u8) << 2);
    let mut cipher = Ctr128BE::<Aes128>::new(ciphering_key.into(), &iv.into());
    cipher.apply_keystream(data);
}
