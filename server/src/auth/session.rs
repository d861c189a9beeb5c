//! Session tokens
//!
//! Opaque 256-bit random tokens backing the fallback credential path.
//! The rows live in the `session` table (see `db::repository::session`).

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ring::rand::{SecureRandom, SystemRandom};
use shared::AppError;

/// Generate an opaque session token (256 bits, base64url)
pub fn generate_session_token() -> Result<String, AppError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes)
        .map_err(|_| AppError::internal("Failed to generate session token"))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
