use super::Encoding;
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use merchant_security::SignatureEngine;

/// Compute and encode the signature of `message` under `secret`
pub fn execute(algorithm: &str, secret: &str, message: &str, encoding: Encoding) -> Result<String> {
    let signature =
        SignatureEngine::compute_signature(algorithm, message.as_bytes(), secret.as_bytes())
            .with_context(|| format!("cannot sign with '{algorithm}'"))?;

    Ok(match encoding {
        Encoding::Base64 => STANDARD.encode(signature),
        Encoding::Hex => hex::encode(signature),
    })
}
