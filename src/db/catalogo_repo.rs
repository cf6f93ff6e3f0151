// src/db/catalogo_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalogo::{Cargo, Setor},
};

// Repositório dos dados de referência (setores e cargos).
#[derive(Clone)]
pub struct CatalogoRepository {
    pool: PgPool,
}

impl CatalogoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Setores
    // ---

    pub async fn criar_setor<'e, E>(
        &self,
        executor: E,
        nome_setor: &str,
        descricao_setor: Option<&str>,
    ) -> Result<Setor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Setor>(
            r#"
            INSERT INTO setores (nome_setor, descricao_setor)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(nome_setor)
        .bind(descricao_setor)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::NomeJaCadastrado(nome_setor.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn listar_setores(&self) -> Result<Vec<Setor>, AppError> {
        let setores =
            sqlx::query_as::<_, Setor>("SELECT * FROM setores ORDER BY nome_setor ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(setores)
    }

    pub async fn buscar_setor(&self, id: Uuid) -> Result<Option<Setor>, AppError> {
        let setor = sqlx::query_as::<_, Setor>("SELECT * FROM setores WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(setor)
    }

    pub async fn atualizar_setor<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nome_setor: &str,
        descricao_setor: Option<&str>,
        ativo: bool,
    ) -> Result<Setor, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Setor>(
            r#"
            UPDATE setores
            SET nome_setor = $2, descricao_setor = $3, ativo = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome_setor)
        .bind(descricao_setor)
        .bind(ativo)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Setor"))
    }

    // ---
    // Cargos
    // ---

    pub async fn criar_cargo<'e, E>(
        &self,
        executor: E,
        nome_cargo: &str,
        descricao_cargo: Option<&str>,
    ) -> Result<Cargo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Cargo>(
            r#"
            INSERT INTO cargos (nome_cargo, descricao_cargo)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(nome_cargo)
        .bind(descricao_cargo)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::NomeJaCadastrado(nome_cargo.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn listar_cargos(&self) -> Result<Vec<Cargo>, AppError> {
        let cargos = sqlx::query_as::<_, Cargo>("SELECT * FROM cargos ORDER BY nome_cargo ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(cargos)
    }

    pub async fn buscar_cargo(&self, id: Uuid) -> Result<Option<Cargo>, AppError> {
        let cargo = sqlx::query_as::<_, Cargo>("SELECT * FROM cargos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cargo)
    }

    pub async fn atualizar_cargo<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nome_cargo: &str,
        descricao_cargo: Option<&str>,
        ativo: bool,
    ) -> Result<Cargo, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Cargo>(
            r#"
            UPDATE cargos
            SET nome_cargo = $2, descricao_cargo = $3, ativo = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome_cargo)
        .bind(descricao_cargo)
        .bind(ativo)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Cargo"))
    }
}
