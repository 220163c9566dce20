//! Static configuration of a PDCP transmit entity - TS38.323, 7.1 plus the
//! security parameters provided by upper layers (TS38.331).

use anyhow::{Result, ensure};
use security::{CipheringAlgorithm, Direction, IntegrityAlgorithm, SecKey128};

/// PDCP sequence number length - TS38.323, 6.3.2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PdcpSnSize {
    Size12Bits,
    Size18Bits,
}

impl PdcpSnSize {
    pub fn bits(self) -> u32 {
        match self {
            Self::Size12Bits => 12,
            Self::Size18Bits => 18,
        }
    }

    /// Mask selecting the SN part of a COUNT.
    pub fn sn_mask(self) -> u32 {
        (1 << self.bits()) - 1
    }

    /// Data PDU header length in bytes.
    pub fn header_len(self) -> usize {
        match self {
            Self::Size12Bits => 2,
            Self::Size18Bits => 3,
        }
    }
}

/// Bearer role.  SRBs carry RRC signalling, DRBs carry userplane data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PdcpRbType {
    Srb,
    Drb,
}

/// Mode of the associated RLC entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PdcpRlcMode {
    Um,
    Am,
}

/// discardTimer - TS38.331, PDCP-Config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PdcpDiscardTimer {
    NotConfigured,
    Infinity,
    Ms(u32),
}

/// COUNT ceilings.  Reaching `notify` warns the upper layer that a key
/// refresh is due; reaching `hard` stops transmission entirely, since a
/// COUNT must never be reused under the same key (TS38.331, 5.3.1.2).
#[derive(Clone, Copy, Debug)]
pub struct PdcpMaxCount {
    pub notify: u32,
    pub hard: u32,
}

impl Default for PdcpMaxCount {
    fn default() -> Self {
        Self {
            notify: 0xc000_0000,
            hard: 0xffff_ff00,
        }
    }
}

/// Security parameters of the entity - TS38.323, 5.8/5.9.
#[derive(Clone, Debug)]
pub struct PdcpSecurityConfig {
    pub integrity_enabled: bool,
    pub ciphering_enabled: bool,
    pub integrity_algorithm: IntegrityAlgorithm,
    pub ciphering_algorithm: CipheringAlgorithm,

    // Keys for SRBs.
    pub k_rrc_int: SecKey128,
    pub k_rrc_enc: SecKey128,

    // Keys for DRBs.
    pub k_up_int: SecKey128,
    pub k_up_enc: SecKey128,

    /// Direction of transmission (downlink for a gNB TX entity).
    pub direction: Direction,

    /// BEARER input to the transforms: radio bearer identity - 1 (TS38.331).
    pub bearer_id: u8,
}

#[derive(Clone, Debug)]
pub struct PdcpTxConfig {
    pub rb_type: PdcpRbType,
    pub rlc_mode: PdcpRlcMode,
    pub sn_size: PdcpSnSize,
    pub discard_timer: PdcpDiscardTimer,
    pub status_report_required: bool,
    pub max_count: PdcpMaxCount,
    pub security: PdcpSecurityConfig,
}

impl PdcpTxConfig {
    /// Check the invariants that are a caller contract rather than peer
    /// input.  Algorithm support is checked separately when the transforms
    /// are resolved.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !(self.rb_type == PdcpRbType::Srb && self.sn_size == PdcpSnSize::Size18Bits),
            "18 bit SN is invalid on an SRB"
        );
        ensure!(self.security.bearer_id < 32, "BEARER is a 5 bit field");
        ensure!(
            self.max_count.notify <= self.max_count.hard,
            "COUNT notify ceiling above hard ceiling"
        );
        Ok(())
    }
}
