use crate::error::TypesError;
use std::fmt;

/// Recoverable ECDSA/secp256k1 signature: `r ‖ s ‖ v`, 65 bytes. `v` is the
/// recovery id (0 or 1) used to recover the signer's public key from the
/// signing hash without it being supplied separately.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EcdsaSignature([u8; 65]);

impl EcdsaSignature {
    pub const LEN: usize = 65;

    pub fn from_bytes(bytes: [u8; 65]) -> Self {
        Self(bytes)
    }

    pub fn from_parts(r: [u8; 32], s: [u8; 32], v: u8) -> Self {
        let mut bytes = [0u8; 65];
        bytes[..32].copy_from_slice(&r);
        bytes[32..64].copy_from_slice(&s);
        bytes[64] = v;
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, TypesError> {
        if slice.len() != 65 {
            return Err(TypesError::InvalidSignatureLength(slice.len()));
        }
        let mut bytes = [0u8; 65];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    pub fn r(&self) -> &[u8] {
        &self.0[..32]
    }

    pub fn s(&self) -> &[u8] {
        &self.0[32..64]
    }

    pub fn recovery_id(&self) -> u8 {
        self.0[64]
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl Default for EcdsaSignature {
    fn default() -> Self {
        Self([0u8; 65])
    }
}

impl fmt::Debug for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcdsaSignature(0x{}...)", &hex::encode(&self.0[..8]))
    }
}

impl fmt::LowerHex for EcdsaSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl AsRef<[u8]> for EcdsaSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for EcdsaSignature {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format!("0x{}", hex::encode(self.0)))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for EcdsaSignature {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(s).map_err(serde::de::Error::custom)?;
        Self::from_slice(&bytes).map_err(serde::de::Error::custom)
    }
}
