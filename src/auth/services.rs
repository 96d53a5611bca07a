use std::time::Duration;

use anyhow::Context;
use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use super::claims::{Claims, IdTokenClaims, Identity, TokenKind};
use crate::config::{IdpConfig, JwtConfig};
use crate::state::AppState;

/// Holds service-token signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::from_secs((cfg.ttl_minutes.max(1) as u64) * 60),
            refresh_ttl: Duration::from_secs((cfg.refresh_ttl_minutes.max(1) as u64) * 60),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from(&state.config.jwt)
    }
}

impl JwtKeys {
    fn sign_with_kind(&self, identity: &Identity, kind: TokenKind) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: identity.email.clone(),
            roles: identity.roles.clone(),
            rider_id: identity.rider_id,
            driver_id: identity.driver_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(email = %identity.email, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_access(&self, identity: &Identity) -> anyhow::Result<String> {
        self.sign_with_kind(identity, TokenKind::Access)
    }

    pub fn sign_refresh(&self, identity: &Identity) -> anyhow::Result<String> {
        self.sign_with_kind(identity, TokenKind::Refresh)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(email = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    pub fn verify_refresh(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if claims.kind != TokenKind::Refresh {
            anyhow::bail!("not a refresh token");
        }
        Ok(claims)
    }
}

/// Verifies RS256 ID tokens issued by the identity provider.
#[derive(Clone)]
pub struct IdTokenVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl IdTokenVerifier {
    /// `None` when no provider key is configured.
    pub fn from_config(cfg: &IdpConfig) -> anyhow::Result<Option<Self>> {
        let Some(pem) = cfg.public_key_pem.as_deref() else {
            return Ok(None);
        };
        let decoding =
            DecodingKey::from_rsa_pem(pem.as_bytes()).context("parse IDP_PUBLIC_KEY_PEM")?;
        let issuer = format!("{}/oauth2/token", cfg.base_url.trim_end_matches('/'));
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(std::slice::from_ref(&cfg.client_id));
        validation.set_issuer(&[issuer]);
        Ok(Some(Self {
            decoding,
            validation,
        }))
    }

    pub fn verify(&self, id_token: &str) -> anyhow::Result<IdTokenClaims> {
        let data = decode::<IdTokenClaims>(id_token, &self.decoding, &self.validation)?;
        debug!(sub = %data.claims.sub, "id token verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde_json::json;
    use time::OffsetDateTime;

    use crate::config::IdpConfig;

    pub const IDP_BASE: &str = "https://idp.example.test/t/rideshare";
    pub const IDP_CLIENT: &str = "spa-client";

    pub fn idp_config() -> IdpConfig {
        IdpConfig {
            base_url: IDP_BASE.into(),
            client_id: IDP_CLIENT.into(),
            public_key_pem: Some(include_str!("../../testdata/idp_public.pem").into()),
        }
    }

    /// Signs an ID token the way the identity provider would.
    pub fn id_token(extra: serde_json::Value, issuer: &str, audience: &str) -> String {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let mut claims = json!({
            "iss": issuer,
            "aud": audience,
            "iat": now,
            "exp": now + 600,
        });
        if let (Some(base), Some(extra)) = (claims.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        let key = EncodingKey::from_rsa_pem(include_bytes!("../../testdata/idp_private.pem"))
            .expect("test rsa key");
        encode(&Header::new(Algorithm::RS256), &claims, &key).expect("sign id token")
    }

    pub fn issuer() -> String {
        format!("{IDP_BASE}/oauth2/token")
    }
}

#[cfg(test)]
mod jwt_tests {
    use super::test_support::*;
    use super::*;
    use serde_json::json;

    fn keys(issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::from(&JwtConfig {
            secret: "dev-secret".into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        })
    }

    fn rider() -> Identity {
        Identity {
            email: "ann@example.com".into(),
            roles: vec!["rider".into()],
            rider_id: Some(7),
            driver_id: None,
        }
    }

    #[test]
    fn sign_and_verify_access_token() {
        let keys = keys("test-issuer", "test-aud");
        let token = keys.sign_access(&rider()).expect("sign access");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.identity(), rider());
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn verify_refresh_rejects_access_token() {
        let keys = keys("iss", "aud");
        let token = keys.sign_access(&rider()).expect("sign access");
        let err = keys.verify_refresh(&token).unwrap_err();
        assert!(err.to_string().contains("not a refresh token"));

        let refresh = keys.sign_refresh(&rider()).expect("sign refresh");
        assert_eq!(
            keys.verify_refresh(&refresh).expect("verify refresh").kind,
            TokenKind::Refresh
        );
    }

    #[test]
    fn verify_rejects_wrong_issuer_or_audience() {
        let token = keys("good-iss", "good-aud")
            .sign_access(&rider())
            .expect("sign access");
        assert!(keys("bad-iss", "good-aud").verify(&token).is_err());
        assert!(keys("good-iss", "bad-aud").verify(&token).is_err());
    }

    #[test]
    fn id_token_from_provider_is_accepted() {
        let verifier = IdTokenVerifier::from_config(&idp_config())
            .expect("valid pem")
            .expect("configured");
        let token = id_token(
            json!({"sub": "u-1", "email": "ann@example.com", "roles": ["rider"]}),
            &issuer(),
            IDP_CLIENT,
        );
        let claims = verifier.verify(&token).expect("verify id token");
        assert_eq!(claims.email(), "ann@example.com");
        assert_eq!(claims.roles(), vec!["rider"]);
    }

    #[test]
    fn id_token_for_another_client_is_rejected() {
        let verifier = IdTokenVerifier::from_config(&idp_config())
            .expect("valid pem")
            .expect("configured");
        let token = id_token(json!({"sub": "u-1"}), &issuer(), "someone-else");
        assert!(verifier.verify(&token).is_err());
        let token = id_token(json!({"sub": "u-1"}), "https://evil.test", IDP_CLIENT);
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn missing_provider_key_disables_exchange() {
        let mut cfg = idp_config();
        cfg.public_key_pem = None;
        assert!(IdTokenVerifier::from_config(&cfg).expect("ok").is_none());
        cfg.public_key_pem = Some("not a pem".into());
        assert!(IdTokenVerifier::from_config(&cfg).is_err());
    }
}
