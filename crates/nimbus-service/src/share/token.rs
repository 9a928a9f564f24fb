//! Share token generation.

use rand::Rng;

/// Generates unguessable share tokens.
#[derive(Debug, Clone)]
pub struct TokenGenerator;

impl TokenGenerator {
    /// Creates a new token generator.
    pub fn new() -> Self {
        Self
    }

    /// Generates a cryptographically secure random token (256 bits, hex).
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        let bytes: [u8; 32] = rng.random();
        hex::encode(&bytes)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple hex encoding without external dependency.
mod hex {
    /// Encode bytes to hex string.
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}
