// src/models/funcionario.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Funcionário ---
// Uma pessoa apta a pegar ferramentas emprestadas. Pertence a uma ou mais
// filiais (N:N via funcionario_filiais).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Funcionario {
    pub id: Uuid,
    pub nome: String,
    pub matricula: String,
    pub cpf: String,
    pub setor_id: Option<Uuid>,
    pub cargo_id: Option<Uuid>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Detalhe do Funcionário ---
// Versão de leitura com os nomes do setor/cargo e as filiais vinculadas,
// montada por uma única query com JOIN + array_agg.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FuncionarioDetalhe {
    pub id: Uuid,
    pub nome: String,
    pub matricula: String,
    pub cpf: String,
    pub setor_id: Option<Uuid>,
    pub setor_nome: Option<String>,
    pub cargo_id: Option<Uuid>,
    pub cargo_nome: Option<String>,
    pub filiais: Vec<Uuid>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
