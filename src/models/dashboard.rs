// src/models/dashboard.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// Resumo da visão geral: contagens por estado de ferramenta e transações
// abertas, sempre recortadas pelo escopo do usuário.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoDashboard {
    pub total_ferramentas: i64,
    pub disponiveis: i64,
    pub emprestadas: i64,
    pub em_manutencao: i64,
    pub inativas: i64,
    pub emprestimos_ativos: i64,
    pub manutencoes_ativas: i64,
}
