// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::{Claims, User},
};

// Mesmo custo dos hashes já gravados em produção.
const BCRYPT_COST: u32 = 10;

#[derive(Clone)]
pub struct AuthService {
    jwt_secret: String,
}

impl AuthService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    // bcrypt é caro de propósito; roda fora do executor async.
    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_owned();
        let hashed = tokio::task::spawn_blocking(move || hash(&password, BCRYPT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    pub async fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, AppError> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        let is_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
        Ok(is_valid)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user.id,
            tenant_id: user.tenant_id,
            role: user.role.clone(),
            email: user.email.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn usuario_teste() -> User {
        User {
            id: 42,
            tenant_id: 7,
            email: "ana@imobiliaria.com.br".to_string(),
            name: Some("Ana".to_string()),
            password_hash: "irrelevante".to_string(),
            role: "admin".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn hash_e_verificacao_de_senha() {
        let service = AuthService::new("segredo-de-teste".to_string());
        let hashed = service.hash_password("senha123").await.unwrap();

        assert_ne!(hashed, "senha123");
        assert!(service.verify_password("senha123", &hashed).await.unwrap());
        assert!(!service.verify_password("senha errada", &hashed).await.unwrap());
    }

    #[test]
    fn token_carrega_a_identidade_completa() {
        let service = AuthService::new("segredo-de-teste".to_string());
        let token = service.create_token(&usuario_teste()).unwrap();

        let claims = service.decode_token(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.tenant_id, 7);
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.email, "ana@imobiliaria.com.br");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_com_segredo_errado_e_rejeitado() {
        let service = AuthService::new("segredo-de-teste".to_string());
        let token = service.create_token(&usuario_teste()).unwrap();

        let outro = AuthService::new("outro-segredo".to_string());
        assert!(matches!(
            outro.decode_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn token_adulterado_e_rejeitado() {
        let service = AuthService::new("segredo-de-teste".to_string());
        let mut token = service.create_token(&usuario_teste()).unwrap();
        token.push('x');

        assert!(matches!(
            service.decode_token(&token),
            Err(AppError::InvalidToken)
        ));
    }
}
