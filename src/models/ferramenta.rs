// src/models/ferramenta.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Estado da Ferramenta ---
// O ciclo de vida é dirigido pelos empréstimos e manutenções; a tabela de
// transições abaixo é a única fonte de verdade sobre o que é permitido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "estado_ferramenta", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoFerramenta {
    Disponivel,
    Emprestada,
    EmManutencao,
    Inativa,
}

impl EstadoFerramenta {
    /// Tabela de transições do ciclo de vida.
    ///
    /// DISPONIVEL    -> EMPRESTADA | EM_MANUTENCAO | INATIVA
    /// EMPRESTADA    -> DISPONIVEL
    /// EM_MANUTENCAO -> DISPONIVEL
    /// INATIVA       -> DISPONIVEL
    pub fn transicao_valida(self, para: EstadoFerramenta) -> bool {
        use EstadoFerramenta::*;
        matches!(
            (self, para),
            (Disponivel, Emprestada)
                | (Disponivel, EmManutencao)
                | (Disponivel, Inativa)
                | (Emprestada, Disponivel)
                | (EmManutencao, Disponivel)
                | (Inativa, Disponivel)
        )
    }
}

// O Display usa o nome de fio (o mesmo do banco e do JSON), pois ele aparece
// em mensagens de erro que o frontend compara.
impl fmt::Display for EstadoFerramenta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nome = match self {
            EstadoFerramenta::Disponivel => "DISPONIVEL",
            EstadoFerramenta::Emprestada => "EMPRESTADA",
            EstadoFerramenta::EmManutencao => "EM_MANUTENCAO",
            EstadoFerramenta::Inativa => "INATIVA",
        };
        f.write_str(nome)
    }
}

// --- Ferramenta ---
// Um ativo físico rastreável. O numero_serie é a identidade imutável.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ferramenta {
    pub id: Uuid,
    pub deposito_id: Uuid,
    pub nome: String,
    pub numero_serie: String,
    pub descricao: Option<String>,
    pub data_aquisicao: NaiveDate,
    pub estado: EstadoFerramenta,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Ferramenta bloqueante ---
// Item da lista estruturada devolvida quando uma desativação em cascata é
// rejeitada por haver ferramentas emprestadas ou em manutenção.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FerramentaBloqueante {
    pub nome: String,
    pub numero_serie: String,
    pub estado: EstadoFerramenta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use EstadoFerramenta::*;

    #[test]
    fn disponivel_pode_ser_emprestada_mantida_ou_inativada() {
        assert!(Disponivel.transicao_valida(Emprestada));
        assert!(Disponivel.transicao_valida(EmManutencao));
        assert!(Disponivel.transicao_valida(Inativa));
    }

    #[test]
    fn emprestada_so_volta_para_disponivel() {
        assert!(Emprestada.transicao_valida(Disponivel));
        assert!(!Emprestada.transicao_valida(EmManutencao));
        assert!(!Emprestada.transicao_valida(Inativa));
        assert!(!Emprestada.transicao_valida(Emprestada));
    }

    #[test]
    fn em_manutencao_so_volta_para_disponivel() {
        assert!(EmManutencao.transicao_valida(Disponivel));
        assert!(!EmManutencao.transicao_valida(Emprestada));
        assert!(!EmManutencao.transicao_valida(Inativa));
    }

    #[test]
    fn inativa_so_pode_ser_reativada() {
        assert!(Inativa.transicao_valida(Disponivel));
        assert!(!Inativa.transicao_valida(Emprestada));
        assert!(!Inativa.transicao_valida(EmManutencao));
    }

    #[test]
    fn estado_nunca_transiciona_para_si_mesmo() {
        for estado in [Disponivel, Emprestada, EmManutencao, Inativa] {
            assert!(!estado.transicao_valida(estado));
        }
    }

    #[test]
    fn display_usa_o_nome_de_fio() {
        assert_eq!(EmManutencao.to_string(), "EM_MANUTENCAO");
        assert_eq!(Disponivel.to_string(), "DISPONIVEL");
    }
}
