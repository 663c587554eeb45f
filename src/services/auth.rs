// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::UserStore,
    models::auth::{Claims, User},
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: String) -> Self {
        Self { users, jwt_secret }
    }

    pub async fn register_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        // Hashing em thread separada, o bcrypt é caro de propósito
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let new_user = self.users.create_user(email, &hashed_password).await?;
        tracing::info!(user_id = %new_user.id, "Usuário registrado");

        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.users
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::NotFound(Resource::Usuario))
    }

    pub(crate) fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
