use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::json;
use thiserror::Error;

use crate::models::ferramenta::{EstadoFerramenta, FerramentaBloqueante};

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Autenticação e autorização ---
    #[error("Credenciais inválidas")]
    CredenciaisInvalidas,

    #[error("Token inválido")]
    TokenInvalido,

    #[error("Usuário não encontrado")]
    UsuarioNaoEncontrado,

    #[error("Papel insuficiente para esta operação")]
    PapelInsuficiente,

    #[error("Recurso fora do escopo de filiais do usuário")]
    EscopoNegado,

    // --- Violações de integridade (unicidade) ---
    #[error("E-mail já existe")]
    EmailJaCadastrado,

    #[error("CPF já cadastrado: {0}")]
    CpfJaCadastrado(String),

    #[error("Matrícula já cadastrada: {0}")]
    MatriculaJaCadastrada(String),

    #[error("Número de série já cadastrado: {0}")]
    NumeroSerieJaCadastrado(String),

    #[error("Nome já cadastrado: {0}")]
    NomeJaCadastrado(String),

    // --- Violações de pré-condição (máquina de estados) ---
    #[error("Ferramenta '{nome}' ({numero_serie}) indisponível: estado atual {estado}")]
    FerramentaIndisponivel {
        nome: String,
        numero_serie: String,
        estado: EstadoFerramenta,
    },

    #[error("Transição de estado inválida: {de} -> {para}")]
    TransicaoEstadoInvalida {
        de: EstadoFerramenta,
        para: EstadoFerramenta,
    },

    #[error("Funcionário '{0}' está inativo")]
    FuncionarioInativo(String),

    #[error("Funcionário '{funcionario}' não pertence à filial '{filial}'")]
    FuncionarioForaDaFilial { funcionario: String, filial: String },

    #[error("Funcionário '{0}' possui empréstimos ativos")]
    FuncionarioComEmprestimos(String),

    #[error("Empréstimo #{0} já foi encerrado")]
    EmprestimoJaEncerrado(i32),

    #[error("Manutenção #{0} já foi encerrada")]
    ManutencaoJaEncerrada(i32),

    #[error("Data de devolução ({data_devolucao}) anterior à data do empréstimo ({data_emprestimo})")]
    DataDevolucaoInvalida {
        data_emprestimo: NaiveDate,
        data_devolucao: NaiveDate,
    },

    #[error("Data de fim ({data_fim}) anterior à data de início ({data_inicio})")]
    DataFimInvalida {
        data_inicio: NaiveDate,
        data_fim: NaiveDate,
    },

    #[error("O tipo de uma manutenção não pode ser alterado após a criação")]
    TipoManutencaoImutavel,

    #[error("Filial '{0}' está inativa")]
    FilialInativa(String),

    #[error("Depósito '{0}' está inativo")]
    DepositoInativo(String),

    #[error("{0} já está ativo(a)")]
    JaAtivo(String),

    #[error("Desativação de '{alvo}' bloqueada por ferramentas em uso")]
    DesativacaoBloqueada {
        alvo: String,
        bloqueios: Vec<FerramentaBloqueante>,
    },

    // --- Não encontrado ---
    #[error("{0} não encontrado(a)")]
    NaoEncontrado(&'static str),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }

            // A lista de bloqueios vai estruturada no corpo, para o frontend
            // enumerar cada ferramenta (nome, série, estado).
            AppError::DesativacaoBloqueada { alvo, bloqueios } => {
                let body = Json(json!({
                    "error": format!(
                        "Não é possível desativar '{}': existem ferramentas emprestadas ou em manutenção.",
                        alvo
                    ),
                    "details": { "bloqueios": bloqueios },
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            AppError::CredenciaisInvalidas => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.".to_string())
            }
            AppError::TokenInvalido => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::UsuarioNaoEncontrado => {
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string())
            }
            AppError::PapelInsuficiente => (
                StatusCode::FORBIDDEN,
                "Seu papel não permite realizar esta ação.".to_string(),
            ),
            AppError::EscopoNegado => (
                StatusCode::FORBIDDEN,
                "Recurso fora do escopo de filiais do seu usuário.".to_string(),
            ),

            AppError::EmailJaCadastrado => {
                (StatusCode::CONFLICT, "Este e-mail já está em uso.".to_string())
            }
            ref e @ (AppError::CpfJaCadastrado(_)
            | AppError::MatriculaJaCadastrada(_)
            | AppError::NumeroSerieJaCadastrado(_)
            | AppError::NomeJaCadastrado(_)) => (StatusCode::CONFLICT, e.to_string()),

            ref e @ (AppError::FerramentaIndisponivel { .. }
            | AppError::TransicaoEstadoInvalida { .. }
            | AppError::FuncionarioInativo(_)
            | AppError::FuncionarioForaDaFilial { .. }
            | AppError::FuncionarioComEmprestimos(_)
            | AppError::EmprestimoJaEncerrado(_)
            | AppError::ManutencaoJaEncerrada(_)
            | AppError::TipoManutencaoImutavel
            | AppError::FilialInativa(_)
            | AppError::DepositoInativo(_)
            | AppError::JaAtivo(_)) => (StatusCode::CONFLICT, e.to_string()),

            ref e @ (AppError::DataDevolucaoInvalida { .. } | AppError::DataFimInvalida { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }

            ref e @ AppError::NaoEncontrado(_) => (StatusCode::NOT_FOUND, e.to_string()),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
