// src/services/auth_service.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{
        Address, AddressPayload, Claims, RegisterUserPayload, UpdateProfilePayload, User, UserRole,
    },
};

// Tokens valem por 7 dias; não há lista de revogação, a expiração é o
// único limite de vida de uma sessão.
const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self {
            user_repo,
            jwt_secret,
            pool,
        }
    }

    // Auto-registro de cliente ou vendedor. Vendedor entra pendente
    // (is_approved = false) até um admin aprovar.
    pub async fn register_user(
        &self,
        payload: &RegisterUserPayload,
    ) -> Result<(User, String), AppError> {
        // O hashing é pesado; sai do executor async.
        let password = payload.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let role = UserRole::from(payload.role);
        let is_approved = role != UserRole::Seller;
        let business_address = payload
            .business_address
            .clone()
            .map(sqlx::types::Json);

        let user = self
            .user_repo
            .create_user(
                &payload.name,
                &payload.email,
                &password_hash,
                payload.phone.as_deref(),
                role,
                is_approved,
                payload.business_name.as_deref(),
                business_address,
            )
            .await?;

        let token = self.create_token(user.id)?;
        Ok((user, token))
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password = password.to_owned();
        let password_hash = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password, &password_hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Senha correta não basta: conta desativada ou vendedor pendente
        // são barrados já no login.
        ensure_can_login(&user)?;

        let token = self.create_token(user.id)?;
        Ok((user, token))
    }

    // Resolve o token para exatamente uma conta. Não olha is_active nem
    // is_approved: autenticação e autorização são etapas separadas.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_claims(token, &self.jwt_secret)?;

        // Conta apagada entre a emissão e o uso do token conta como
        // não autenticado, não como 404.
        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        encode_token(user_id, &self.jwt_secret)
    }

    // Devolve também um token novo, já que e-mail e senha podem ter mudado.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        payload: &UpdateProfilePayload,
    ) -> Result<(User, String), AppError> {
        let password_hash = match &payload.password {
            Some(password) => {
                let password = password.clone();
                let hashed =
                    tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
                        .await
                        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
                Some(hashed)
            }
            None => None,
        };

        let user = self
            .user_repo
            .update_profile(
                user_id,
                payload.name.as_deref(),
                payload.email.as_deref(),
                payload.phone.as_deref(),
                payload.profile_image.as_deref(),
                password_hash.as_deref(),
            )
            .await?
            .ok_or(AppError::UserNotFound)?;

        let token = self.create_token(user.id)?;
        Ok((user, token))
    }

    // --- Endereços de entrega ---

    pub async fn list_addresses(&self, user_id: Uuid) -> Result<Vec<Address>, AppError> {
        self.user_repo.list_addresses(user_id).await
    }

    // Definir um novo padrão zera o anterior dentro da MESMA transação;
    // o invariante "no máximo um padrão" nunca fica visível quebrado.
    pub async fn add_address(
        &self,
        user_id: Uuid,
        payload: &AddressPayload,
    ) -> Result<Vec<Address>, AppError> {
        let mut tx = self.pool.begin().await?;

        if payload.is_default {
            self.user_repo
                .clear_default_addresses(&mut *tx, user_id)
                .await?;
        }

        self.user_repo
            .insert_address(
                &mut *tx,
                user_id,
                &payload.street,
                &payload.city,
                &payload.state,
                &payload.postal_code,
                &payload.country,
                payload.is_default,
            )
            .await?;

        tx.commit().await?;

        self.user_repo.list_addresses(user_id).await
    }

    pub async fn update_address(
        &self,
        user_id: Uuid,
        address_id: Uuid,
        payload: &AddressPayload,
    ) -> Result<Vec<Address>, AppError> {
        let mut tx = self.pool.begin().await?;

        if payload.is_default {
            self.user_repo
                .clear_default_addresses(&mut *tx, user_id)
                .await?;
        }

        // Endereço de outra conta é invisível aqui: mesmo 404.
        self.user_repo
            .update_address(
                &mut *tx,
                user_id,
                address_id,
                &payload.street,
                &payload.city,
                &payload.state,
                &payload.postal_code,
                &payload.country,
                payload.is_default,
            )
            .await?
            .ok_or(AppError::AddressNotFound)?;

        tx.commit().await?;

        self.user_repo.list_addresses(user_id).await
    }

    pub async fn delete_address(&self, user_id: Uuid, address_id: Uuid) -> Result<(), AppError> {
        let removed = self.user_repo.delete_address(user_id, address_id).await?;
        if removed == 0 {
            return Err(AppError::AddressNotFound);
        }
        Ok(())
    }
}

// Conta desativada não entra, em nenhum papel. Vendedor só entra aprovado.
fn ensure_can_login(user: &User) -> Result<(), AppError> {
    if !user.is_active {
        return Err(AppError::AccountDeactivated);
    }
    if user.role == UserRole::Seller && !user.is_approved {
        return Err(AppError::SellerPendingApproval);
    }
    Ok(())
}

fn encode_token(user_id: Uuid, secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

    let claims = Claims {
        sub: user_id,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

fn decode_claims(token: &str, secret: &str) -> Result<Claims, AppError> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn account(role: UserRole, is_approved: bool, is_active: bool) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Conta de Teste".into(),
            email: "teste@example.com".into(),
            password_hash: "$2b$12$hash".into(),
            phone: None,
            role,
            is_approved,
            is_active,
            profile_image: None,
            business_name: None,
            business_address: None,
            created_at: DateTime::<Utc>::MIN_UTC,
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[test]
    fn pending_seller_cannot_login_even_with_valid_password() {
        let seller = account(UserRole::Seller, false, true);
        assert!(matches!(
            ensure_can_login(&seller),
            Err(AppError::SellerPendingApproval)
        ));
    }

    #[test]
    fn approved_seller_can_login() {
        let seller = account(UserRole::Seller, true, true);
        assert!(ensure_can_login(&seller).is_ok());
    }

    #[test]
    fn deactivated_account_cannot_login_regardless_of_role() {
        for role in [UserRole::User, UserRole::Seller, UserRole::Admin] {
            let user = account(role, true, false);
            assert!(matches!(
                ensure_can_login(&user),
                Err(AppError::AccountDeactivated)
            ));
        }
    }

    #[test]
    fn customer_and_admin_do_not_need_approval() {
        // is_approved = false só tem significado para vendedores.
        assert!(ensure_can_login(&account(UserRole::User, false, true)).is_ok());
        assert!(ensure_can_login(&account(UserRole::Admin, false, true)).is_ok());
    }

    #[test]
    fn token_roundtrip_preserves_subject() {
        let user_id = Uuid::new_v4();
        let token = encode_token(user_id, "segredo-de-teste").unwrap();
        let claims = decode_claims(&token, "segredo-de-teste").unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_with_wrong_secret_is_rejected() {
        let token = encode_token(Uuid::new_v4(), "segredo-a").unwrap();
        assert!(matches!(
            decode_claims(&token, "segredo-b"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        // Monta um token já vencido (além da folga padrão de validação).
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            exp: (now - chrono::Duration::hours(2)).timestamp() as usize,
            iat: (now - chrono::Duration::days(8)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("segredo-de-teste".as_ref()),
        )
        .unwrap();

        assert!(matches!(
            decode_claims(&token, "segredo-de-teste"),
            Err(AppError::InvalidToken)
        ));
    }
}
