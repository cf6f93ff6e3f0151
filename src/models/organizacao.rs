// src/models/organizacao.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ferramenta::FerramentaBloqueante;

// ---
// 1. Filial
// ---
// A unidade organizacional física. Desativar uma filial cascateia para os
// depósitos, ferramentas e vínculos de funcionários dela.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Filial {
    pub id: Uuid,
    pub nome: String,
    pub descricao: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. Depósito
// ---
// Um local de armazenamento dentro de uma Filial. Toda ferramenta pertence a
// exatamente um depósito.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deposito {
    pub id: Uuid,
    pub filial_id: Uuid,
    pub nome: String,
    pub descricao: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 3. Relatório de desativação (modo simulação)
// ---
// Resultado da checagem prévia de uma desativação em cascata, sem mutação.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatorioDesativacao {
    pub pode_desativar: bool,
    pub bloqueios: Vec<FerramentaBloqueante>,
}

impl RelatorioDesativacao {
    pub fn novo(bloqueios: Vec<FerramentaBloqueante>) -> Self {
        Self { pode_desativar: bloqueios.is_empty(), bloqueios }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ferramenta::EstadoFerramenta;

    #[test]
    fn relatorio_sem_bloqueios_permite_desativar() {
        let relatorio = RelatorioDesativacao::novo(vec![]);
        assert!(relatorio.pode_desativar);
        assert!(relatorio.bloqueios.is_empty());
    }

    #[test]
    fn relatorio_com_bloqueios_nega_e_enumera() {
        let relatorio = RelatorioDesativacao::novo(vec![FerramentaBloqueante {
            nome: "Parafusadeira".into(),
            numero_serie: "SN-0010".into(),
            estado: EstadoFerramenta::Emprestada,
        }]);
        assert!(!relatorio.pode_desativar);
        assert_eq!(relatorio.bloqueios.len(), 1);
        assert_eq!(relatorio.bloqueios[0].numero_serie, "SN-0010");
    }
}
