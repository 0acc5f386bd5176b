use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// JWT codec bound to one signing secret, issuer and audience.
///
/// Uses HS256 (HMAC with SHA-256). Expiry is checked against a caller-supplied
/// timestamp rather than the system clock so the leeway is always explicit.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    audience: String,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `secret` - Shared HMAC secret
    /// * `issuer` - Value written to and required in `iss`
    /// * `audience` - Value written to and required in `aud`
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(
        secret: &[u8],
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: issuer.into(),
            audience: audience.into(),
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token.
    ///
    /// Checks, in order: structure and signature, presence of the registered
    /// claims, issuer, audience, and finally expiry against `now` with
    /// `leeway_seconds` of tolerance.
    ///
    /// # Arguments
    /// * `token` - Compact JWT string
    /// * `now` - Current Unix timestamp
    /// * `leeway_seconds` - Clock skew tolerance applied to `exp`
    ///
    /// # Errors
    /// * `BadSignature` - Signature does not match the secret
    /// * `IssuerMismatch` / `AudienceMismatch` - Claim differs from configuration
    /// * `Expired` - `now >= exp + leeway_seconds`
    /// * `Malformed` - Anything structurally wrong with the token
    pub fn decode(&self, token: &str, now: i64, leeway_seconds: u64) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["sub", "iss", "aud", "exp"]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        // Expiry is evaluated below against the supplied timestamp.
        validation.validate_exp = false;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::BadSignature,
                ErrorKind::InvalidIssuer => JwtError::IssuerMismatch,
                ErrorKind::InvalidAudience => JwtError::AudienceMismatch,
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Malformed(e.to_string()),
            },
        )?;

        let claims = token_data.claims;
        if claims.is_expired(now, leeway_seconds) {
            return Err(JwtError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::claims::TokenPurpose;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";
    const NOW: i64 = 1_700_000_000;

    fn handler() -> JwtHandler {
        JwtHandler::new(SECRET, "learning-platform", "learning-platform-clients").unwrap()
    }

    fn claims(role: &str) -> Claims {
        Claims {
            sub: "7f0c4a52-3c55-4c1b-a1a4-43e0d4e1f1b0".to_string(),
            email: "a@x.com".to_string(),
            role: Some(role.to_string()),
            purpose: TokenPurpose::Access,
            iss: "learning-platform".to_string(),
            aud: "learning-platform-clients".to_string(),
            iat: NOW,
            exp: NOW + 30 * 60,
        }
    }

    #[test]
    fn test_encode_and_decode() {
        let handler = handler();
        let claims = claims("Student");

        let token = handler.encode(&claims).expect("Failed to encode token");
        assert_eq!(token.split('.').count(), 3);

        let decoded = handler.decode(&token, NOW + 1, 0).expect("Failed to decode");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_new_rejects_empty_secret() {
        let result = JwtHandler::new(b"", "iss", "aud");
        assert!(matches!(result, Err(JwtError::MissingSecret)));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let other = JwtHandler::new(
            b"secret2_at_least_32_bytes_long_key!",
            "learning-platform",
            "learning-platform-clients",
        )
        .unwrap();

        let token = handler().encode(&claims("Admin")).unwrap();

        assert_eq!(other.decode(&token, NOW, 0), Err(JwtError::BadSignature));
    }

    #[test]
    fn test_decode_detects_swapped_payload() {
        let handler = handler();
        let student = handler.encode(&claims("Student")).unwrap();
        let admin = handler.encode(&claims("Admin")).unwrap();

        let student_parts: Vec<&str> = student.split('.').collect();
        let admin_parts: Vec<&str> = admin.split('.').collect();
        let forged = format!("{}.{}.{}", student_parts[0], admin_parts[1], student_parts[2]);

        assert_eq!(handler.decode(&forged, NOW, 0), Err(JwtError::BadSignature));
    }

    #[test]
    fn test_decode_expired_token() {
        let handler = handler();
        let mut claims = claims("Student");
        claims.exp = NOW - 1;

        let token = handler.encode(&claims).unwrap();

        assert_eq!(handler.decode(&token, NOW, 0), Err(JwtError::Expired));
    }

    #[test]
    fn test_decode_honours_configured_leeway() {
        let handler = handler();
        let mut claims = claims("Student");
        claims.exp = NOW - 10;

        let token = handler.encode(&claims).unwrap();

        assert!(handler.decode(&token, NOW, 60).is_ok());
        assert_eq!(handler.decode(&token, NOW, 0), Err(JwtError::Expired));
    }

    #[test]
    fn test_decode_issuer_mismatch() {
        let handler = handler();
        let mut claims = claims("Student");
        claims.iss = "someone-else".to_string();

        let token = handler.encode(&claims).unwrap();

        assert_eq!(handler.decode(&token, NOW, 0), Err(JwtError::IssuerMismatch));
    }

    #[test]
    fn test_decode_audience_mismatch() {
        let handler = handler();
        let mut claims = claims("Student");
        claims.aud = "another-app".to_string();

        let token = handler.encode(&claims).unwrap();

        assert_eq!(handler.decode(&token, NOW, 0), Err(JwtError::AudienceMismatch));
    }

    #[test]
    fn test_decode_invalid_token() {
        let result = handler().decode("invalid.token.here", NOW, 0);
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }
}
