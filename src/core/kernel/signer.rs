use crate::core::errors::SerumError;
use base64::engine::general_purpose;
use base64::Engine;
use ed25519_dalek::{Signer as Ed25519SignerTrait, SigningKey, VerifyingKey};
use zeroize::Zeroizing;

pub const SIGNATURE_LEN: usize = 64;
pub const PUBKEY_LEN: usize = 32;

/// Version prefix bit of a versioned Solana message
const VERSIONED_MESSAGE_PREFIX: u8 = 0x80;
const MESSAGE_HEADER_LEN: usize = 3;

/// Signer trait for transactions built by the server
///
/// The server returns partially built, unsigned transactions. Signing fills
/// in the slot that belongs to the local key and leaves every other byte of
/// the transaction untouched.
pub trait TxSigner: Send + Sync {
    /// Base58-encoded public key
    fn public_key(&self) -> String;

    /// Sign a base64-encoded wire transaction and return it re-encoded
    fn sign_transaction(&self, unsigned_tx_base64: &str) -> Result<String, SerumError>;
}

/// Ed25519 signer for a Solana keypair
pub struct KeypairSigner {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl std::fmt::Debug for KeypairSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeypairSigner")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl KeypairSigner {
    /// Create a signer from a base58-encoded key
    ///
    /// Accepts either a 64-byte keypair (secret followed by public key), as
    /// exported by the Solana CLI and wallets, or a bare 32-byte secret.
    pub fn from_base58(private_key: &str) -> Result<Self, SerumError> {
        let key_bytes = Zeroizing::new(
            bs58::decode(private_key.trim())
                .into_vec()
                .map_err(|e| SerumError::Signing(format!("Invalid private key format: {}", e)))?,
        );

        let secret: &[u8; 32] = key_bytes
            .get(..32)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| SerumError::Signing("Invalid private key length".to_string()))?;

        let signer = Self::from_bytes(secret);

        match key_bytes.len() {
            32 => Ok(signer),
            64 if key_bytes[32..] == signer.verifying_key.to_bytes() => Ok(signer),
            64 => Err(SerumError::Signing(
                "Keypair public key does not match its secret".to_string(),
            )),
            _ => Err(SerumError::Signing(
                "Invalid private key length".to_string(),
            )),
        }
    }

    pub fn from_bytes(secret: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(secret);
        let verifying_key = signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
        }
    }

    pub fn public_key_bytes(&self) -> [u8; PUBKEY_LEN] {
        self.verifying_key.to_bytes()
    }
}

impl TxSigner for KeypairSigner {
    fn public_key(&self) -> String {
        bs58::encode(self.verifying_key.as_bytes()).into_string()
    }

    fn sign_transaction(&self, unsigned_tx_base64: &str) -> Result<String, SerumError> {
        let mut tx = general_purpose::STANDARD
            .decode(unsigned_tx_base64.trim())
            .map_err(|e| SerumError::Signing(format!("Invalid base64 transaction: {}", e)))?;

        let (signature_count, prefix_len) = decode_compact_u16(&tx)?;
        let message_offset = prefix_len + signature_count * SIGNATURE_LEN;
        if tx.len() <= message_offset {
            return Err(SerumError::Signing("Transaction is truncated".to_string()));
        }

        let (slot, signature) = {
            let message = &tx[message_offset..];
            let signers = required_signers(message)?;
            if signers.len() != signature_count {
                return Err(SerumError::Signing(format!(
                    "Transaction has {} signature slot(s) for {} required signer(s)",
                    signature_count,
                    signers.len()
                )));
            }

            let slot = signers
                .iter()
                .position(|key| *key == self.verifying_key.as_bytes())
                .ok_or_else(|| {
                    SerumError::Signing(format!(
                        "{} is not a required signer of this transaction",
                        self.public_key()
                    ))
                })?;

            (slot, Ed25519SignerTrait::sign(&self.signing_key, message))
        };

        let start = prefix_len + slot * SIGNATURE_LEN;
        tx[start..start + SIGNATURE_LEN].copy_from_slice(&signature.to_bytes());

        Ok(general_purpose::STANDARD.encode(tx))
    }
}

/// Decode a Solana compact-u16, returning the value and bytes consumed
fn decode_compact_u16(bytes: &[u8]) -> Result<(usize, usize), SerumError> {
    let mut value = 0usize;
    for (i, byte) in bytes.iter().take(3).enumerate() {
        value |= usize::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(SerumError::Signing(
        "Malformed compact-u16 length".to_string(),
    ))
}

/// Public keys of the required signers, in signature-slot order
fn required_signers(message: &[u8]) -> Result<Vec<&[u8]>, SerumError> {
    let mut offset = usize::from(
        message
            .first()
            .is_some_and(|b| b & VERSIONED_MESSAGE_PREFIX != 0),
    );

    let header = message
        .get(offset..offset + MESSAGE_HEADER_LEN)
        .ok_or_else(|| SerumError::Signing("Message header is truncated".to_string()))?;
    let required = usize::from(header[0]);
    offset += MESSAGE_HEADER_LEN;

    let (key_count, consumed) = decode_compact_u16(&message[offset..])?;
    offset += consumed;

    if required > key_count {
        return Err(SerumError::Signing(format!(
            "Message requires {} signer(s) but lists {} account key(s)",
            required, key_count
        )));
    }

    let keys = message
        .get(offset..offset + key_count * PUBKEY_LEN)
        .ok_or_else(|| SerumError::Signing("Account keys are truncated".to_string()))?;

    Ok(keys.chunks_exact(PUBKEY_LEN).take(required).collect())
}
