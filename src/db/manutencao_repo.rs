// src/db/manutencao_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::manutencao::{Manutencao, SnapshotManutencao, TipoManutencao},
};

// Espelho unilateral do repositório de empréstimos: só a ferramenta.
#[derive(Clone)]
pub struct ManutencaoRepository {
    pool: PgPool,
}

impl ManutencaoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn criar<'e, E>(
        &self,
        executor: E,
        ferramenta_id: Uuid,
        tipo: TipoManutencao,
        data_inicio: NaiveDate,
        observacoes: Option<&str>,
    ) -> Result<Manutencao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let manutencao = sqlx::query_as::<_, Manutencao>(
            r#"
            INSERT INTO manutencoes (ferramenta_id, tipo, data_inicio, observacoes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(ferramenta_id)
        .bind(tipo)
        .bind(data_inicio)
        .bind(observacoes)
        .fetch_one(executor)
        .await?;
        Ok(manutencao)
    }

    pub async fn atualizar_nome<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        nome: &str,
    ) -> Result<Manutencao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Manutencao>(
            r#"
            UPDATE manutencoes
            SET nome = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(nome)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Manutenção"))
    }

    pub async fn listar(
        &self,
        filtro_filiais: Option<&[Uuid]>,
        ativo: Option<bool>,
    ) -> Result<Vec<Manutencao>, AppError> {
        let manutencoes = sqlx::query_as::<_, Manutencao>(
            r#"
            SELECT m.* FROM manutencoes m
            WHERE ($1::uuid[] IS NULL OR EXISTS (
                SELECT 1 FROM ferramentas f
                JOIN depositos d ON d.id = f.deposito_id
                WHERE f.id = m.ferramenta_id AND d.filial_id = ANY($1)
            ))
              AND ($2::boolean IS NULL OR m.ativo = $2)
            ORDER BY m.data_inicio DESC, m.numero DESC
            "#,
        )
        .bind(filtro_filiais)
        .bind(ativo)
        .fetch_all(&self.pool)
        .await?;
        Ok(manutencoes)
    }

    pub async fn buscar<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Manutencao>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let manutencao = sqlx::query_as::<_, Manutencao>("SELECT * FROM manutencoes WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(manutencao)
    }

    pub async fn buscar_para_atualizacao<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Manutencao>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let manutencao =
            sqlx::query_as::<_, Manutencao>("SELECT * FROM manutencoes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(manutencao)
    }

    /// O tipo não entra aqui: é gravado uma única vez na criação.
    pub async fn atualizar_aberta<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        observacoes: Option<&str>,
    ) -> Result<Manutencao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Manutencao>(
            r#"
            UPDATE manutencoes
            SET observacoes = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(observacoes)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Manutenção"))
    }

    /// Encerramento com snapshot, no mesmo formato do empréstimo.
    pub async fn encerrar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        snapshot: &SnapshotManutencao,
        data_fim: NaiveDate,
        observacoes: Option<&str>,
    ) -> Result<Manutencao, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Manutencao>(
            r#"
            UPDATE manutencoes
            SET nome_ferramenta_historico = $2,
                numero_serie_ferramenta_historico = $3,
                ferramenta_id = NULL,
                ativo = FALSE,
                data_fim = $4,
                observacoes = COALESCE($5, observacoes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&snapshot.nome_ferramenta)
        .bind(&snapshot.numero_serie_ferramenta)
        .bind(data_fim)
        .bind(observacoes)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NaoEncontrado("Manutenção"))
    }

    pub async fn excluir<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let resultado = sqlx::query("DELETE FROM manutencoes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(resultado.rows_affected())
    }
}
