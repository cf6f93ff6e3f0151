// src/db/ferramenta_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::ferramenta::{EstadoFerramenta, Ferramenta, FerramentaBloqueante},
};

// Repositório das ferramentas. A mutação de `estado` passa sempre por
// `atualizar_estado`; a validação da transição fica no service.
#[derive(Clone)]
pub struct FerramentaRepository {
    pool: PgPool,
}

impl FerramentaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar<'e, E>(
        &self,
        executor: E,
        deposito_id: Uuid,
        nome: &str,
        numero_serie: &str,
        descricao: Option<&str>,
        data_aquisicao: NaiveDate,
    ) -> Result<Ferramenta, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Ferramenta>(
            r#"
            INSERT INTO ferramentas (deposito_id, nome, numero_serie, descricao, data_aquisicao)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(deposito_id)
        .bind(nome)
        .bind(numero_serie)
        .bind(descricao)
        .bind(data_aquisicao)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::NumeroSerieJaCadastrado(numero_serie.to_string());
                }
            }
            e.into()
        })
    }

    pub async fn listar(
        &self,
        filtro_filiais: Option<&[Uuid]>,
        estado: Option<EstadoFerramenta>,
    ) -> Result<Vec<Ferramenta>, AppError> {
        let ferramentas = sqlx::query_as::<_, Ferramenta>(
            r#"
            SELECT f.* FROM ferramentas f
            JOIN depositos d ON d.id = f.deposito_id
            WHERE ($1::uuid[] IS NULL OR d.filial_id = ANY($1))
              AND ($2::estado_ferramenta IS NULL OR f.estado = $2)
            ORDER BY f.nome ASC
            "#,
        )
        .bind(filtro_filiais)
        .bind(estado)
        .fetch_all(&self.pool)
        .await?;
        Ok(ferramentas)
    }

    pub async fn buscar<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Ferramenta>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ferramenta = sqlx::query_as::<_, Ferramenta>("SELECT * FROM ferramentas WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(ferramenta)
    }

    /// Busca com lock de linha (FOR UPDATE). Dois "abrir" concorrentes na
    /// mesma ferramenta serializam aqui; o perdedor reexamina o estado já
    /// atualizado e falha limpo.
    pub async fn buscar_para_atualizacao<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Ferramenta>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ferramenta =
            sqlx::query_as::<_, Ferramenta>("SELECT * FROM ferramentas WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(ferramenta)
    }

    /// A filial dona da ferramenta (via depósito), usada na validação de
    /// vínculo do funcionário e no recorte de escopo.
    pub async fn filial_da_ferramenta<'e, E>(
        &self,
        executor: E,
        ferramenta_id: Uuid,
    ) -> Result<Option<(Uuid, String)>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let filial = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT fl.id, fl.nome
            FROM ferramentas f
            JOIN depositos d ON d.id = f.deposito_id
            JOIN filiais fl ON fl.id = d.filial_id
            WHERE f.id = $1
            "#,
        )
        .bind(ferramenta_id)
        .fetch_optional(executor)
        .await?;
        Ok(filial)
    }

    /// Atualiza os dados cadastrais. O numero_serie é identidade imutável e
    /// fica de fora.
    pub async fn atualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nome: &str,
        descricao: Option<&str>,
        data_aquisicao: NaiveDate,
        deposito_id: Uuid,
    ) -> Result<Ferramenta, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Ferramenta>(
            r#"
            UPDATE ferramentas
            SET nome = $2, descricao = $3, data_aquisicao = $4, deposito_id = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .bind(descricao)
        .bind(data_aquisicao)
        .bind(deposito_id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Ferramenta"))
    }

    pub async fn atualizar_estado<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        estado: EstadoFerramenta,
    ) -> Result<Ferramenta, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Ferramenta>(
            r#"
            UPDATE ferramentas
            SET estado = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(estado)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Ferramenta"))
    }

    // ---
    // Apoio às desativações em cascata
    // ---

    /// Ferramentas da filial que impedem a desativação (emprestadas ou em
    /// manutenção).
    pub async fn bloqueantes_da_filial<'e, E>(
        &self,
        executor: E,
        filial_id: Uuid,
    ) -> Result<Vec<FerramentaBloqueante>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let bloqueantes = sqlx::query_as::<_, FerramentaBloqueante>(
            r#"
            SELECT f.nome, f.numero_serie, f.estado
            FROM ferramentas f
            JOIN depositos d ON d.id = f.deposito_id
            WHERE d.filial_id = $1
              AND f.estado IN ('EMPRESTADA', 'EM_MANUTENCAO')
            ORDER BY f.nome ASC
            "#,
        )
        .bind(filial_id)
        .fetch_all(executor)
        .await?;
        Ok(bloqueantes)
    }

    pub async fn bloqueantes_do_deposito<'e, E>(
        &self,
        executor: E,
        deposito_id: Uuid,
    ) -> Result<Vec<FerramentaBloqueante>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let bloqueantes = sqlx::query_as::<_, FerramentaBloqueante>(
            r#"
            SELECT nome, numero_serie, estado
            FROM ferramentas
            WHERE deposito_id = $1
              AND estado IN ('EMPRESTADA', 'EM_MANUTENCAO')
            ORDER BY nome ASC
            "#,
        )
        .bind(deposito_id)
        .fetch_all(executor)
        .await?;
        Ok(bloqueantes)
    }

    pub async fn inativar_da_filial<'e, E>(
        &self,
        executor: E,
        filial_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query(
            r#"
            UPDATE ferramentas f
            SET estado = 'INATIVA', updated_at = NOW()
            FROM depositos d
            WHERE d.id = f.deposito_id
              AND d.filial_id = $1
              AND f.estado <> 'INATIVA'
            "#,
        )
        .bind(filial_id)
        .execute(executor)
        .await?;
        Ok(resultado.rows_affected())
    }

    pub async fn inativar_do_deposito<'e, E>(
        &self,
        executor: E,
        deposito_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query(
            r#"
            UPDATE ferramentas
            SET estado = 'INATIVA', updated_at = NOW()
            WHERE deposito_id = $1 AND estado <> 'INATIVA'
            "#,
        )
        .bind(deposito_id)
        .execute(executor)
        .await?;
        Ok(resultado.rows_affected())
    }

    pub async fn reativar_da_filial<'e, E>(
        &self,
        executor: E,
        filial_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query(
            r#"
            UPDATE ferramentas f
            SET estado = 'DISPONIVEL', updated_at = NOW()
            FROM depositos d
            WHERE d.id = f.deposito_id
              AND d.filial_id = $1
              AND f.estado = 'INATIVA'
            "#,
        )
        .bind(filial_id)
        .execute(executor)
        .await?;
        Ok(resultado.rows_affected())
    }

    pub async fn reativar_do_deposito<'e, E>(
        &self,
        executor: E,
        deposito_id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query(
            r#"
            UPDATE ferramentas
            SET estado = 'DISPONIVEL', updated_at = NOW()
            WHERE deposito_id = $1 AND estado = 'INATIVA'
            "#,
        )
        .bind(deposito_id)
        .execute(executor)
        .await?;
        Ok(resultado.rows_affected())
    }
}
