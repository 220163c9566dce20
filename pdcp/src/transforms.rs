//! Algorithm selection.  The configured selectors are resolved into
//! concrete transforms once, at entity construction; per-PDU processing
//! never re-validates them.

use crate::config::{PdcpRbType, PdcpSecurityConfig};
use anyhow::{Result, bail};
use security::{CipheringAlgorithm, Direction, IntegrityAlgorithm, MacTag, SecKey128, nea2, nia2};

enum IntegrityKind {
    Null,
    Nia2,
}

pub(crate) struct IntegrityTransform {
    kind: IntegrityKind,
    key: SecKey128,
    bearer: u8,
    direction: Direction,
}

impl IntegrityTransform {
    /// Returns `None` when integrity protection is disabled.  SRBs use the
    /// RRC integrity key, DRBs the userplane one.
    pub fn resolve(sec: &PdcpSecurityConfig, rb_type: PdcpRbType) -> Result<Option<Self>> {
        if !sec.integrity_enabled {
            return Ok(None);
        }
        let kind = match sec.integrity_algorithm {
            IntegrityAlgorithm::Nia0 => IntegrityKind::Null,
            IntegrityAlgorithm::Nia2 => IntegrityKind::Nia2,
            unsupported => bail!("integrity algorithm {unsupported:?} is not implemented"),
        };
        let key = match rb_type {
            PdcpRbType::Srb => sec.k_rrc_int,
            PdcpRbType::Drb => sec.k_up_int,
        };
        Ok(Some(Self {
            kind,
            key,
            bearer: sec.bearer_id,
            direction: sec.direction,
        }))
    }

    pub fn mac(&self, count: u32, message: &[u8]) -> MacTag {
        match self.kind {
            IntegrityKind::Null => [0; 4],
            IntegrityKind::Nia2 => {
                nia2::nia2_mac(&self.key, count, self.bearer, self.direction, message)
            }
        }
    }
}

enum CipheringKind {
    Null,
    Nea2,
}

pub(crate) struct CipheringTransform {
    kind: CipheringKind,
    key: SecKey128,
    bearer: u8,
    direction: Direction,
}

impl CipheringTransform {
    /// Returns `None` when ciphering is disabled.  SRBs use the RRC
    /// ciphering key, DRBs the userplane one.
    pub fn resolve(sec: &PdcpSecurityConfig, rb_type: PdcpRbType) -> Result<Option<Self>> {
        if !sec.ciphering_enabled {
            return Ok(None);
        }
        let kind = match sec.ciphering_algorithm {
            CipheringAlgorithm::Nea0 => CipheringKind::Null,
            CipheringAlgorithm::Nea2 => CipheringKind::Nea2,
            unsupported => bail!("ciphering algorithm {unsupported:?} is not implemented"),
        };
        let key = match rb_type {
            PdcpRbType::Srb => sec.k_rrc_enc,
            PdcpRbType::Drb => sec.k_up_enc,
        };
        Ok(Some(Self {
            kind,
            key,
            bearer: sec.bearer_id,
            direction: sec.direction,
        }))
    }

    pub fn apply(&self, count: u32, data: &mut [u8]) {
        match self.kind {
            CipheringKind::Null => (),
            CipheringKind::Nea2 => {
                nea2::nea2_apply_keystream(&self.key, count, self.bearer, self.direction, data)
            }
        }
    }
}
