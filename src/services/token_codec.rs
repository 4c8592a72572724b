// src/services/token_codec.rs

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::Claims};

/// Token recém-emitido, com o instante de expiração já convertido
/// para gravar na whitelist.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
    pub expires_at: DateTime<Utc>,
}

// ---
// Token Codec: HS256 sem estado (header.payload.assinatura em base64url)
// ---
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expirou é expirou: sem tolerância de relógio
        validation.leeway = 0;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    pub fn issue(&self, user_id: i32, role: &str) -> Result<IssuedToken, AppError> {
        let now = Utc::now();
        let expires_at = now + self.ttl;

        let claims = Claims {
            user_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Some(Uuid::new_v4().to_string()),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;

        // Grava o exp truncado em segundos, igual ao que vai dentro do token
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(expires_at);

        Ok(IssuedToken { token, claims, expires_at })
    }

    /// Formato, assinatura e expiração colapsam em `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        if token.split('.').count() != 3 {
            return Err(AppError::InvalidToken);
        }

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token rejeitado: {:?}", e.kind());
                AppError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "segredo-de-teste";

    fn codec() -> TokenCodec {
        TokenCodec::new(SECRET, Duration::hours(1))
    }

    fn flip_char(c: char) -> char {
        if c == 'A' { 'B' } else { 'A' }
    }

    #[test]
    fn issue_then_verify_round_trips_claims() {
        let codec = codec();
        let issued = codec.issue(7, "admin").unwrap();

        assert_eq!(issued.token.split('.').count(), 3);
        assert!(!issued.token.contains('='));
        assert_eq!(issued.expires_at.timestamp(), issued.claims.exp);

        let claims = codec.verify(&issued.token).unwrap();
        assert_eq!(claims, issued.claims);
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn back_to_back_tokens_are_distinct() {
        let codec = codec();
        let phone = codec.issue(5, "kasir").unwrap();
        let tablet = codec.issue(5, "kasir").unwrap();

        assert_ne!(phone.token, tablet.token);
        assert_ne!(phone.claims.jti, tablet.claims.jti);
    }

    #[test]
    fn accepts_legacy_token_without_iat_or_jti() {
        // Formato do backend PHP: só user_id, role e exp
        let exp = Utc::now().timestamp() + 3600;
        let legacy = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "user_id": 1, "role": "admin", "exp": exp }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let claims = codec().verify(&legacy).unwrap();
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp, exp);
        assert_eq!(claims.iat, 0);
        assert!(claims.jti.is_none());
    }

    #[test]
    fn rejects_expired_legacy_token() {
        let legacy = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "user_id": 1, "role": "admin", "exp": Utc::now().timestamp() - 60 }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(codec().verify(&legacy), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejects_flipped_signature() {
        let codec = codec();
        let issued = codec.issue(1, "kasir").unwrap();

        let mut parts: Vec<String> = issued.token.split('.').map(str::to_string).collect();
        let first = parts[2].chars().next().unwrap();
        parts[2] = format!("{}{}", flip_char(first), &parts[2][1..]);

        assert!(matches!(codec.verify(&parts.join(".")), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejects_expired_token() {
        let codec = TokenCodec::new(SECRET, Duration::seconds(-120));
        let issued = codec.issue(1, "kasir").unwrap();

        assert!(matches!(codec.verify(&issued.token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejects_wrong_segment_count_and_foreign_secret() {
        let codec = codec();
        assert!(codec.verify("abc.def").is_err());
        assert!(codec.verify("a.b.c.d").is_err());
        assert!(codec.verify("").is_err());

        let foreign = TokenCodec::new("outro-segredo", Duration::hours(1))
            .issue(1, "kasir")
            .unwrap();
        assert!(codec.verify(&foreign.token).is_err());
    }

    proptest! {
        #[test]
        fn round_trip_for_any_identity(user_id in 1..i32::MAX, role in "[a-z]{1,12}") {
            let codec = codec();
            let issued = codec.issue(user_id, &role).unwrap();
            prop_assert_eq!(codec.verify(&issued.token).unwrap(), issued.claims);
        }

        #[test]
        fn any_edit_to_signed_part_is_rejected(user_id in 1..10_000i32, pick in any::<prop::sample::Index>()) {
            let codec = codec();
            let issued = codec.issue(user_id, "kasir").unwrap();

            // Só mexe em header.payload (a parte assinada)
            let signed_len = issued.token.rfind('.').unwrap();
            let positions: Vec<usize> = issued.token[..signed_len]
                .char_indices()
                .filter(|(_, c)| *c != '.')
                .map(|(i, _)| i)
                .collect();
            let at = positions[pick.index(positions.len())];

            let mut tampered = issued.token.clone();
            let original = tampered.as_bytes()[at] as char;
            tampered.replace_range(at..at + 1, &flip_char(original).to_string());

            prop_assert!(codec.verify(&tampered).is_err());
        }
    }
}
