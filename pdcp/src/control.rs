//! Status report control PDU parsing - TS38.323, 6.2.3.1 and 6.3.{7,8,9,10}.

use anyhow::{Result, ensure};

const DC_DATA_BIT: u8 = 0x80;
const CONTROL_PDU_TYPE_STATUS_REPORT: u8 = 0;

// D/C, PDU type and reserved bits (1 byte) plus the 32-bit FMC.
const FIXED_FIELDS_LEN: usize = 5;

/// Bounded MSB-first bit cursor over a byte slice.
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    pos: usize, // in bits
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn bits_left(&self) -> usize {
        self.data.len() * 8 - self.pos
    }

    /// Read up to 32 bits, MSB first.  `None` once fewer than `width` bits
    /// remain.
    pub fn read(&mut self, width: usize) -> Option<u32> {
        debug_assert!(width <= 32);
        if self.bits_left() < width {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..width {
            let bit = (self.data[self.pos / 8] >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.pos += 1;
        }
        Some(value)
    }
}

/// A parsed status report.
pub struct StatusReport {
    /// First missing COUNT: everything below it is confirmed.
    pub fmc: u32,
    bitmap: Vec<u8>,
}

impl StatusReport {
    /// Parse a status report control PDU.  Structural violations are
    /// errors; the caller logs and drops the message.
    pub fn parse(buf: &[u8]) -> Result<Self> {
        ensure!(
            buf.len() >= FIXED_FIELDS_LEN,
            "status report too short: {}B",
            buf.len()
        );
        ensure!(
            buf[0] & DC_DATA_BIT == 0,
            "D/C field indicates a data PDU"
        );
        let cpt = (buf[0] >> 4) & 0x07;
        ensure!(
            cpt == CONTROL_PDU_TYPE_STATUS_REPORT,
            "control PDU type {cpt} is not a status report"
        );
        let reserved = buf[0] & 0x0f;
        ensure!(reserved == 0, "reserved bits set: {reserved:#x}");
        let fmc = u32::from_be_bytes(buf[1..5].try_into().unwrap());
        Ok(Self {
            fmc,
            bitmap: buf[FIXED_FIELDS_LEN..].to_vec(),
        })
    }

    /// Bits of the trailing bitmap, MSB first.  The bitmap runs to the end
    /// of the PDU; its first bit refers to COUNT = FMC + 1.
    pub fn bitmap_bits(&self) -> impl Iterator<Item = bool> + '_ {
        let mut cursor = BitReader::new(&self.bitmap);
        std::iter::from_fn(move || cursor.read(1).map(|bit| bit == 1))
    }
}
