// src/models/manutencao.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::ferramenta::Ferramenta;

// --- Tipo de Manutenção ---
// Fixado na criação; nenhuma mutação posterior é aceita.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_manutencao", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoManutencao {
    Preventiva,
    Corretiva,
}

// --- Manutenção ---
// O espelho unilateral do empréstimo: referencia apenas a ferramenta.
// Mesmas regras de ativo/encerrado/snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Manutencao {
    pub id: Uuid,
    pub numero: i32,
    pub nome: Option<String>,
    pub ferramenta_id: Option<Uuid>,
    pub tipo: TipoManutencao,
    pub data_inicio: NaiveDate,
    pub data_fim: Option<NaiveDate>,
    pub observacoes: Option<String>,
    pub ativo: bool,
    pub nome_ferramenta_historico: Option<String>,
    pub numero_serie_ferramenta_historico: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Snapshot de encerramento ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotManutencao {
    pub nome_ferramenta: Option<String>,
    pub numero_serie_ferramenta: Option<String>,
}

impl SnapshotManutencao {
    /// Captura os campos históricos da ferramenta. Referência já
    /// desanexada: mantém a captura anterior, se houver.
    pub fn capturar(manutencao: &Manutencao, ferramenta: Option<&Ferramenta>) -> Self {
        match ferramenta {
            Some(f) => Self {
                nome_ferramenta: Some(f.nome.clone()),
                numero_serie_ferramenta: Some(f.numero_serie.clone()),
            },
            None => Self {
                nome_ferramenta: manutencao.nome_ferramenta_historico.clone(),
                numero_serie_ferramenta: manutencao.numero_serie_ferramenta_historico.clone(),
            },
        }
    }
}

/// O tipo é gravado uma única vez; qualquer tentativa de troca é rejeitada.
pub fn valida_tipo_imutavel(
    atual: TipoManutencao,
    solicitado: Option<TipoManutencao>,
) -> Result<(), AppError> {
    match solicitado {
        Some(novo) if novo != atual => Err(AppError::TipoManutencaoImutavel),
        _ => Ok(()),
    }
}

/// O fim da manutenção não pode anteceder o início.
pub fn valida_encerramento(data_inicio: NaiveDate, data_fim: NaiveDate) -> Result<(), AppError> {
    if data_fim < data_inicio {
        return Err(AppError::DataFimInvalida {
            data_inicio,
            data_fim,
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
            nome: "Esmerilhadeira".into(),
            numero_serie: "SN-0099".into(),
            descricao: None,
            data_aquisicao: NaiveDate::from_ymd_opt(2023, 7, 15).unwrap(),
            estado: EstadoFerramenta::EmManutencao,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn manutencao_aberta(ferramenta: &Ferramenta) -> Manutencao {
        Manutencao {
            id: Uuid::new_v4(),
            numero: 3,
            nome: Some("Manutenção #3".into()),
            ferramenta_id: Some(ferramenta.id),
            tipo: TipoManutencao::Corretiva,
            data_inicio: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            data_fim: None,
            observacoes: None,
            ativo: true,
            nome_ferramenta_historico: None,
            numero_serie_ferramenta_historico: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn snapshot_copia_os_dados_da_ferramenta_viva() {
        let ferramenta = ferramenta_exemplo();
        let manutencao = manutencao_aberta(&ferramenta);

        let snapshot = SnapshotManutencao::capturar(&manutencao, Some(&ferramenta));

        assert_eq!(snapshot.nome_ferramenta.as_deref(), Some("Esmerilhadeira"));
        assert_eq!(snapshot.numero_serie_ferramenta.as_deref(), Some("SN-0099"));
    }

    #[test]
    fn snapshot_mantem_captura_anterior_sem_referencia_viva() {
        let ferramenta = ferramenta_exemplo();
        let mut manutencao = manutencao_aberta(&ferramenta);
        manutencao.ferramenta_id = None;
        manutencao.nome_ferramenta_historico = Some("Serra velha".into());
        manutencao.numero_serie_ferramenta_historico = Some("SN-0007".into());

        let snapshot = SnapshotManutencao::capturar(&manutencao, None);

        assert_eq!(snapshot.nome_ferramenta.as_deref(), Some("Serra velha"));
        assert_eq!(snapshot.numero_serie_ferramenta.as_deref(), Some("SN-0007"));
    }

    #[test]
    fn trocar_o_tipo_e_rejeitado() {
        let resultado =
            valida_tipo_imutavel(TipoManutencao::Corretiva, Some(TipoManutencao::Preventiva));
        assert!(matches!(resultado, Err(AppError::TipoManutencaoImutavel)));
    }

    #[test]
    fn reenviar_o_mesmo_tipo_ou_omitir_e_aceito() {
        assert!(
            valida_tipo_imutavel(TipoManutencao::Corretiva, Some(TipoManutencao::Corretiva))
                .is_ok()
        );
        assert!(valida_tipo_imutavel(TipoManutencao::Corretiva, None).is_ok());
    }

    #[test]
    fn fim_antes_do_inicio_e_rejeitado() {
        let inicio = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let fim = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        assert!(valida_encerramento(inicio, fim).is_err());
        assert!(valida_encerramento(inicio, inicio).is_ok());
    }
}
