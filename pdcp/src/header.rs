//! Data PDU header packing - TS38.323, 6.2.2.

use crate::config::{PdcpRbType, PdcpSnSize};

/// Append a data PDU header to `buf`.  The top bit of the first byte is the
/// D/C field on DRBs and reserved (zero) on SRBs; the SN is packed MSB
/// first into the remaining bits.  `sn` must already be truncated to the
/// configured width.
pub fn write_data_pdu_header(
    buf: &mut Vec<u8>,
    rb_type: PdcpRbType,
    sn_size: PdcpSnSize,
    sn: u32,
) {
    let dc = match rb_type {
        PdcpRbType::Drb => 0x80,
        PdcpRbType::Srb => 0x00,
    };
    match sn_size {
        PdcpSnSize::Size12Bits => {
            buf.push(dc | ((sn >> 8) & 0x0f) as u8);
            buf.push((sn & 0xff) as u8);
        }
        PdcpSnSize::Size18Bits => {
            buf.push(dc | ((sn >> 16) & 0x03) as u8);
            buf.push(((sn >> 8) & 0xff) as u8);
            buf.push((sn & 0xff) as u8);
        }
    }
}
