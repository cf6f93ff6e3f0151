// src/db/dashboard_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::dashboard::ResumoDashboard};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Resumo geral da visão inicial, recortado pelo escopo de filiais.
    pub async fn resumo(
        &self,
        filtro_filiais: Option<&[Uuid]>,
    ) -> Result<ResumoDashboard, AppError> {
        let resumo = sqlx::query_as::<_, ResumoDashboard>(
            r#"
            SELECT
                COUNT(*) AS total_ferramentas,
                COUNT(*) FILTER (WHERE f.estado = 'DISPONIVEL') AS disponiveis,
                COUNT(*) FILTER (WHERE f.estado = 'EMPRESTADA') AS emprestadas,
                COUNT(*) FILTER (WHERE f.estado = 'EM_MANUTENCAO') AS em_manutencao,
                COUNT(*) FILTER (WHERE f.estado = 'INATIVA') AS inativas,
                (SELECT COUNT(*) FROM emprestimos e
                    JOIN ferramentas ef ON ef.id = e.ferramenta_id
                    JOIN depositos ed ON ed.id = ef.deposito_id
                    WHERE e.ativo
                      AND ($1::uuid[] IS NULL OR ed.filial_id = ANY($1))
                ) AS emprestimos_ativos,
                (SELECT COUNT(*) FROM manutencoes m
                    JOIN ferramentas mf ON mf.id = m.ferramenta_id
                    JOIN depositos md ON md.id = mf.deposito_id
                    WHERE m.ativo
                      AND ($1::uuid[] IS NULL OR md.filial_id = ANY($1))
                ) AS manutencoes_ativas
            FROM ferramentas f
            JOIN depositos d ON d.id = f.deposito_id
            WHERE $1::uuid[] IS NULL OR d.filial_id = ANY($1)
            "#,
        )
        .bind(filtro_filiais)
        .fetch_one(&self.pool)
        .await?;
        Ok(resumo)
    }
}
