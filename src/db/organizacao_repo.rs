// src/db/organizacao_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::organizacao::{Deposito, Filial},
};

// Repositório das filiais e dos depósitos (a estrutura física).
#[derive(Clone)]
pub struct OrganizacaoRepository {
    pool: PgPool,
}

impl OrganizacaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Filiais
    // ---

    pub async fn criar_filial<'e, E>(
        &self,
        executor: E,
        nome: &str,
        descricao: Option<&str>,
    ) -> Result<Filial, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Filial>(
            r#"
            INSERT INTO filiais (nome, descricao)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(nome)
        .bind(descricao)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::NomeJaCadastrado(nome.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn listar_filiais(
        &self,
        filtro_filiais: Option<&[Uuid]>,
        ativo: Option<bool>,
    ) -> Result<Vec<Filial>, AppError> {
        let filiais = sqlx::query_as::<_, Filial>(
            r#"
            SELECT * FROM filiais
            WHERE ($1::uuid[] IS NULL OR id = ANY($1))
              AND ($2::boolean IS NULL OR ativo = $2)
            ORDER BY nome ASC
            "#,
        )
        .bind(filtro_filiais)
        .bind(ativo)
        .fetch_all(&self.pool)
        .await?;
        Ok(filiais)
    }

    pub async fn buscar_filial<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Filial>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let filial = sqlx::query_as::<_, Filial>("SELECT * FROM filiais WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(filial)
    }

    pub async fn atualizar_filial<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nome: &str,
        descricao: Option<&str>,
    ) -> Result<Filial, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Filial>(
            r#"
            UPDATE filiais
            SET nome = $2, descricao = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(descricao)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Filial"))
    }

    pub async fn definir_ativo_filial<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        ativo: bool,
    ) -> Result<Filial, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Filial>(
            r#"
            UPDATE filiais
            SET ativo = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(ativo)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Filial"))
    }

    // ---
    // Depósitos
    // ---

    pub async fn criar_deposito<'e, E>(
        &self,
        executor: E,
        filial_id: Uuid,
        nome: &str,
        descricao: Option<&str>,
    ) -> Result<Deposito, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Deposito>(
            r#"
            INSERT INTO depositos (filial_id, nome, descricao)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(filial_id)
        .bind(nome)
        .bind(descricao)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::NomeJaCadastrado(nome.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn listar_depositos(
        &self,
        filtro_filiais: Option<&[Uuid]>,
        filial_id: Option<Uuid>,
    ) -> Result<Vec<Deposito>, AppError> {
        let depositos = sqlx::query_as::<_, Deposito>(
            r#"
            SELECT * FROM depositos
            WHERE ($1::uuid[] IS NULL OR filial_id = ANY($1))
              AND ($2::uuid IS NULL OR filial_id = $2)
            ORDER BY nome ASC
            "#,
        )
        .bind(filtro_filiais)
        .bind(filial_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(depositos)
    }

    pub async fn buscar_deposito<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Deposito>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deposito = sqlx::query_as::<_, Deposito>("SELECT * FROM depositos WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(deposito)
    }

    pub async fn atualizar_deposito<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nome: &str,
        descricao: Option<&str>,
    ) -> Result<Deposito, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Deposito>(
            r#"
            UPDATE depositos
            SET nome = $2, descricao = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(descricao)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Depósito"))
    }

    pub async fn definir_ativo_deposito<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        ativo: bool,
    ) -> Result<Deposito, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Deposito>(
            r#"
            UPDATE depositos
            SET ativo = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(ativo)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Depósito"))
    }

    /// Passo da cascata de (des)ativação de uma filial.
    pub async fn definir_ativo_depositos_da_filial<'e, E>(
        &self,
        executor: E,
        filial_id: Uuid,
        ativo: bool,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query(
            r#"
            UPDATE depositos
            SET ativo = $2, updated_at = NOW()
            WHERE filial_id = $1 AND ativo <> $2
            "#,
        )
        .bind(filial_id)
        .bind(ativo)
        .execute(executor)
        .await?;
        Ok(resultado.rows_affected())
    }

    /// Remove todos os vínculos funcionário<->filial da filial desativada.
    pub async fn remover_vinculos_funcionarios<'e, E>(
        &self,
        executor: E,
        filial_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query("DELETE FROM funcionario_filiais WHERE filial_id = $1")
            .bind(filial_id)
            .execute(executor)
            .await?;
        Ok(resultado.rows_affected())
    }
}
