use crate::error::CryptoError;
use crate::hash::eth_signed_message_hash;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use settlement_types::{Address, EcdsaSignature, Hash, SignedTransaction, Transaction};
use zeroize::Zeroize;

/// secp256k1 signing key. Zeroized on drop.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        Self { signing_key: SigningKey::random(&mut OsRng) }
    }

    /// Derive a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, CryptoError> {
        if seed.len() != 32 {
            return Err(CryptoError::InvalidSeedLength(seed.len()));
        }
        let signing_key = SigningKey::from_slice(seed).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Uncompressed public key bytes (64 bytes, no `0x04` prefix).
    pub fn public_key_bytes(&self) -> [u8; 64] {
        let point = VerifyingKey::from(&self.signing_key).to_encoded_point(false);
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&point.as_bytes()[1..]);
        bytes
    }

    pub fn address(&self) -> Address {
        Address::from_public_key(&self.public_key_bytes())
    }

    /// Sign a 32-byte prehash directly, without the host message prefix.
    pub fn sign_prehash(&self, hash: &Hash) -> Result<EcdsaSignature, CryptoError> {
        let (sig, recid): (Signature, RecoveryId) =
            self.signing_key.sign_prehash_recoverable(hash.as_bytes())?;
        Ok(to_ecdsa_signature(&sig, recid))
    }

    /// Sign a transaction: applies the host's signed-message prefix over
    /// `tx.signing_hash()` before signing, matching the convention
    /// `recover_sender` expects.
    pub fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction, CryptoError> {
        let prefixed = eth_signed_message_hash(&tx.signing_hash());
        let signature = self.sign_prehash(&prefixed)?;
        Ok(SignedTransaction::new(*tx, signature))
    }
}

impl Drop for Keypair {
    fn drop(&mut self) {
        let mut bytes = self.signing_key.to_bytes();
        bytes.zeroize();
    }
}

fn to_ecdsa_signature(sig: &Signature, recid: RecoveryId) -> EcdsaSignature {
    let bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);
    EcdsaSignature::from_parts(r, s, recid.to_byte())
}

/// Recover the signer of `message_hash` (already prefixed) from a 65-byte
/// recoverable signature. Fails if the signature is malformed or the
/// recovery id is invalid.
pub fn recover_sender(message_hash: &Hash, signature: &EcdsaSignature) -> Result<Address, CryptoError> {
    let sig = Signature::from_slice(&signature.as_bytes()[..64]).map_err(|_| CryptoError::InvalidSignature)?;
    let recid = RecoveryId::from_byte(signature.recovery_id()).ok_or(CryptoError::InvalidSignature)?;

    let verifying_key = VerifyingKey::recover_from_prehash(message_hash.as_bytes(), &sig, recid)
        .map_err(|_| CryptoError::RecoveryFailed)?;

    let point = verifying_key.to_encoded_point(false);
    let mut pubkey = [0u8; 64];
    pubkey.copy_from_slice(&point.as_bytes()[1..]);
    Ok(Address::from_public_key(&pubkey))
}

/// `§4.1` signature check: recover the signer of the prefixed signing hash
/// and require it to equal `expected` and to be non-zero.
pub fn verify_sender(tx: &Transaction, signature: &EcdsaSignature, expected: Address) -> bool {
    if signature.is_zero() || expected.is_zero() {
        return false;
    }
    let prefixed = eth_signed_message_hash(&tx.signing_hash());
    match recover_sender(&prefixed, signature) {
        Ok(recovered) => recovered == expected,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use settlement_types::U256;

    #[test]
    fn test_sign_and_recover_roundtrip() {
        let kp = Keypair::generate();
        let tx = Transaction::new(kp.address(), Address::from_bytes([9u8; 20]), U256::from(1u64), 0, U256::ZERO);

        let signed = kp.sign_transaction(&tx).unwrap();
        assert!(verify_sender(&tx, &signed.signature, kp.address()));
    }

    #[test]
    fn test_recover_rejects_wrong_signer() {
        let kp = Keypair::generate();
        let other = Keypair::generate();
        let tx = Transaction::new(kp.address(), Address::from_bytes([9u8; 20]), U256::from(1u64), 0, U256::ZERO);

        let signed = kp.sign_transaction(&tx).unwrap();
        assert!(!verify_sender(&tx, &signed.signature, other.address()));
    }

    #[test]
    fn test_deterministic_address_from_seed() {
        let seed = [7u8; 32];
        let a = Keypair::from_seed(&seed).unwrap();
        let b = Keypair::from_seed(&seed).unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn test_from_seed_wrong_length() {
        assert!(Keypair::from_seed(&[1u8; 16]).is_err());
    }

    #[test]
    fn test_zero_signature_never_verifies() {
        let kp = Keypair::generate();
        let tx = Transaction::new(kp.address(), Address::from_bytes([9u8; 20]), U256::from(1u64), 0, U256::ZERO);
        let zero_sig = EcdsaSignature::default();
        assert!(!verify_sender(&tx, &zero_sig, kp.address()));
    }
}
