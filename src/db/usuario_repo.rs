// src/db/usuario_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{PapelUsuario, Usuario},
};

// O repositório de usuários, responsável por todas as interações com a
// tabela 'usuarios' e com o vínculo usuario_filiais.
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(usuario)
    }

    pub async fn contar(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM usuarios")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    /// O CPF não pode colidir nem dentro da tabela (constraint) nem com o
    /// diretório de funcionários (checado pelo service).
    pub async fn cpf_em_uso(&self, cpf: &str) -> Result<bool, AppError> {
        let existe =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM usuarios WHERE cpf = $1)")
                .bind(cpf)
                .fetch_one(&self.pool)
                .await?;
        Ok(existe)
    }

    // Cria um novo usuário no banco de dados
    pub async fn criar<'e, E>(
        &self,
        executor: E,
        nome: &str,
        email: &str,
        cpf: &str,
        senha_hash: &str,
        papel: PapelUsuario,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (nome, email, cpf, senha_hash, papel)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(email)
        .bind(cpf)
        .bind(senha_hash)
        .bind(papel)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    let constraint = db_err.constraint().unwrap_or_default();
                    if constraint.contains("cpf") {
                        return AppError::CpfJaCadastrado(cpf.to_string());
                    }
                    return AppError::EmailJaCadastrado;
                }
            }
            e.into()
        })
    }

    /// Substitui o conjunto de filiais visíveis de um coordenador.
    pub async fn definir_filiais<'e, E>(
        &self,
        executor: E,
        usuario_id: Uuid,
        filiais: &[Uuid],
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        sqlx::query("DELETE FROM usuario_filiais WHERE usuario_id = $1")
            .bind(usuario_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO usuario_filiais (usuario_id, filial_id)
            SELECT $1, unnest($2::uuid[])
            "#,
        )
        .bind(usuario_id)
        .bind(filiais)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    // Filiais atribuídas a um usuário (escopo dos coordenadores)
    pub async fn filiais_do_usuario(&self, usuario_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let filiais = sqlx::query_scalar::<_, Uuid>(
            "SELECT filial_id FROM usuario_filiais WHERE usuario_id = $1",
        )
        .bind(usuario_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(filiais)
    }
}
