// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FuncionarioRepository, UsuarioRepository},
    models::auth::{Claims, PapelUsuario, Usuario},
};

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
    funcionario_repo: FuncionarioRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        usuario_repo: UsuarioRepository,
        funcionario_repo: FuncionarioRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            usuario_repo,
            funcionario_repo,
            jwt_secret,
            pool,
        }
    }

    /// Registro inicial: só funciona com a tabela de usuários vazia e cria
    /// o primeiro MAXIMO. Depois disso, usuários nascem via criar_usuario
    /// (rota restrita ao MAXIMO).
    pub async fn registrar_bootstrap(
        &self,
        nome: &str,
        email: &str,
        cpf: &str,
        senha: &str,
    ) -> Result<String, AppError> {
        if self.usuario_repo.contar().await? > 0 {
            return Err(AppError::PapelInsuficiente);
        }

        let usuario = self
            .criar_usuario(nome, email, cpf, senha, PapelUsuario::Maximo, &[])
            .await?;
        self.create_token(usuario.id)
    }

    pub async fn criar_usuario(
        &self,
        nome: &str,
        email: &str,
        cpf: &str,
        senha: &str,
        papel: PapelUsuario,
        filiais: &[Uuid],
    ) -> Result<Usuario, AppError> {
        // O CPF não pode colidir com o diretório de funcionários.
        if self.funcionario_repo.cpf_em_uso(cpf).await? {
            return Err(AppError::CpfJaCadastrado(cpf.to_string()));
        }

        // Hashing fora da transação (não toca no banco e é pesado).
        let senha_clone = senha.to_owned();
        let senha_hash =
            tokio::task::spawn_blocking(move || hash(&senha_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;

        let usuario = self
            .usuario_repo
            .criar(&mut *tx, nome, email, cpf, &senha_hash, papel)
            .await?;

        // Só coordenadores carregam escopo de filiais.
        if papel == PapelUsuario::Coordenador && !filiais.is_empty() {
            self.usuario_repo
                .definir_filiais(&mut *tx, usuario.id, filiais)
                .await?;
        }

        tx.commit().await?;
        Ok(usuario)
    }

    pub async fn login_user(&self, email: &str, senha: &str) -> Result<String, AppError> {
        let usuario = self
            .usuario_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::CredenciaisInvalidas)?;

        if !usuario.ativo {
            return Err(AppError::CredenciaisInvalidas);
        }

        let senha_clone = senha.to_owned();
        let senha_hash_clone = usuario.senha_hash.clone();

        // Executa a verificação em um thread separado
        let senha_valida =
            tokio::task::spawn_blocking(move || verify(&senha_clone, &senha_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_valida {
            return Err(AppError::CredenciaisInvalidas);
        }

        self.create_token(usuario.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<Usuario, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::TokenInvalido)?;

        self.usuario_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UsuarioNaoEncontrado)
    }

    fn create_token(&self, usuario_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: usuario_id,
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
