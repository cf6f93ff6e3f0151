// src/models/emprestimo.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::{ferramenta::Ferramenta, funcionario::Funcionario};

// --- Empréstimo ---
// Uma transação de retirada de ferramenta. Enquanto `ativo`, as referências
// vivas (ferramenta_id/funcionario_id) são obrigatórias; depois do
// encerramento elas são anuladas para sempre e a identidade do registro
// passa a ser carregada pelos campos históricos.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Emprestimo {
    pub id: Uuid,
    pub numero: i32,
    pub nome: Option<String>,
    pub ferramenta_id: Option<Uuid>,
    pub funcionario_id: Option<Uuid>,
    pub data_emprestimo: NaiveDate,
    pub data_devolucao: Option<NaiveDate>,
    pub observacoes: Option<String>,
    pub ativo: bool,
    pub nome_ferramenta_historico: Option<String>,
    pub numero_serie_ferramenta_historico: Option<String>,
    pub nome_funcionario_historico: Option<String>,
    pub matricula_funcionario_historico: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Snapshot de encerramento ---
// Cópia desnormalizada dos dados de identificação da ferramenta e do
// funcionário, capturada no momento do encerramento para sobreviver à
// remoção futura das linhas referenciadas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEmprestimo {
    pub nome_ferramenta: Option<String>,
    pub numero_serie_ferramenta: Option<String>,
    pub nome_funcionario: Option<String>,
    pub matricula_funcionario: Option<String>,
}

impl SnapshotEmprestimo {
    /// Captura os campos históricos a partir das relações vivas.
    ///
    /// Referência já desanexada: a cópia correspondente é pulada em
    /// silêncio e o registro mantém o que já tinha capturado antes
    /// (ou permanece nulo, se nunca capturou).
    pub fn capturar(
        emprestimo: &Emprestimo,
        ferramenta: Option<&Ferramenta>,
        funcionario: Option<&Funcionario>,
    ) -> Self {
        let (nome_ferramenta, numero_serie_ferramenta) = match ferramenta {
            Some(f) => (Some(f.nome.clone()), Some(f.numero_serie.clone())),
            None => (
                emprestimo.nome_ferramenta_historico.clone(),
                emprestimo.numero_serie_ferramenta_historico.clone(),
            ),
        };

        let (nome_funcionario, matricula_funcionario) = match funcionario {
            Some(f) => (Some(f.nome.clone()), Some(f.matricula.clone())),
            None => (
                emprestimo.nome_funcionario_historico.clone(),
                emprestimo.matricula_funcionario_historico.clone(),
            ),
        };

        Self {
            nome_ferramenta,
            numero_serie_ferramenta,
            nome_funcionario,
            matricula_funcionario,
        }
    }
}

/// Valida as datas de um encerramento: a devolução não pode anteceder a
/// retirada.
pub fn valida_devolucao(
    data_emprestimo: NaiveDate,
    data_devolucao: NaiveDate,
) -> Result<(), AppError> {
    if data_devolucao < data_emprestimo {
        return Err(AppError::DataDevolucaoInvalida {
            data_emprestimo,
            data_devolucao,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ferramenta::EstadoFerramenta;

    fn ferramenta_exemplo() -> Ferramenta {
        Ferramenta {
            id: Uuid::new_v4(),
            deposito_id: Uuid::new_v4(),
            nome: "Furadeira Bosch".into(),
            numero_serie: "SN-0042".into(),
            descricao: None,
            data_aquisicao: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            estado: EstadoFerramenta::Emprestada,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn funcionario_exemplo() -> Funcionario {
        Funcionario {
            id: Uuid::new_v4(),
            nome: "Maria Souza".into(),
            matricula: "12345".into(),
            cpf: "390.533.447-05".into(),
            setor_id: None,
            cargo_id: None,
            ativo: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn emprestimo_aberto(ferramenta: &Ferramenta, funcionario: &Funcionario) -> Emprestimo {
        Emprestimo {
            id: Uuid::new_v4(),
            numero: 7,
            nome: Some("Empréstimo #7".into()),
            ferramenta_id: Some(ferramenta.id),
            funcionario_id: Some(funcionario.id),
            data_emprestimo: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            data_devolucao: None,
            observacoes: None,
            ativo: true,
            nome_ferramenta_historico: None,
            numero_serie_ferramenta_historico: None,
            nome_funcionario_historico: None,
            matricula_funcionario_historico: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn snapshot_copia_os_dados_vivos() {
        let ferramenta = ferramenta_exemplo();
        let funcionario = funcionario_exemplo();
        let emprestimo = emprestimo_aberto(&ferramenta, &funcionario);

        let snapshot =
            SnapshotEmprestimo::capturar(&emprestimo, Some(&ferramenta), Some(&funcionario));

        assert_eq!(snapshot.nome_ferramenta.as_deref(), Some("Furadeira Bosch"));
        assert_eq!(snapshot.numero_serie_ferramenta.as_deref(), Some("SN-0042"));
        assert_eq!(snapshot.nome_funcionario.as_deref(), Some("Maria Souza"));
        assert_eq!(snapshot.matricula_funcionario.as_deref(), Some("12345"));
    }

    #[test]
    fn snapshot_preserva_captura_anterior_quando_referencia_ja_foi_desanexada() {
        let ferramenta = ferramenta_exemplo();
        let funcionario = funcionario_exemplo();
        let mut emprestimo = emprestimo_aberto(&ferramenta, &funcionario);
        emprestimo.ferramenta_id = None;
        emprestimo.nome_ferramenta_historico = Some("Furadeira antiga".into());
        emprestimo.numero_serie_ferramenta_historico = Some("SN-0001".into());

        let snapshot = SnapshotEmprestimo::capturar(&emprestimo, None, Some(&funcionario));

        assert_eq!(snapshot.nome_ferramenta.as_deref(), Some("Furadeira antiga"));
        assert_eq!(snapshot.numero_serie_ferramenta.as_deref(), Some("SN-0001"));
        assert_eq!(snapshot.nome_funcionario.as_deref(), Some("Maria Souza"));
    }

    #[test]
    fn snapshot_fica_nulo_quando_nunca_houve_captura() {
        let ferramenta = ferramenta_exemplo();
        let funcionario = funcionario_exemplo();
        let mut emprestimo = emprestimo_aberto(&ferramenta, &funcionario);
        emprestimo.ferramenta_id = None;
        emprestimo.funcionario_id = None;

        let snapshot = SnapshotEmprestimo::capturar(&emprestimo, None, None);

        assert_eq!(snapshot.nome_ferramenta, None);
        assert_eq!(snapshot.numero_serie_ferramenta, None);
        assert_eq!(snapshot.nome_funcionario, None);
        assert_eq!(snapshot.matricula_funcionario, None);
    }

    #[test]
    fn devolucao_anterior_a_retirada_e_rejeitada() {
        let retirada = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let devolucao = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
        assert!(valida_devolucao(retirada, devolucao).is_err());
    }

    #[test]
    fn devolucao_no_mesmo_dia_ou_depois_e_aceita() {
        let retirada = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert!(valida_devolucao(retirada, retirada).is_ok());
        let depois = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        assert!(valida_devolucao(retirada, depois).is_ok());
    }
}
