// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Papel do usuário ---
// MAXIMO e ADMINISTRADOR enxergam tudo; COORDENADOR fica restrito às
// filiais atribuídas em usuario_filiais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "papel_usuario", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PapelUsuario {
    Maximo,
    Administrador,
    Coordenador,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub cpf: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub senha_hash: String,

    pub papel: PapelUsuario,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Escopo de acesso ---
// Capacidade polimórfica calculada uma vez por requisição e passada
// explicitamente a cada consulta/validação. Referências fora do escopo são
// rejeitadas na validação, nunca filtradas em silêncio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscopoAcesso {
    Global,
    RestritoAFiliais(HashSet<Uuid>),
}

impl EscopoAcesso {
    pub fn para_usuario(papel: PapelUsuario, filiais: Vec<Uuid>) -> Self {
        match papel {
            PapelUsuario::Maximo | PapelUsuario::Administrador => EscopoAcesso::Global,
            PapelUsuario::Coordenador => {
                EscopoAcesso::RestritoAFiliais(filiais.into_iter().collect())
            }
        }
    }

    pub fn permite_filial(&self, filial_id: Uuid) -> bool {
        match self {
            EscopoAcesso::Global => true,
            EscopoAcesso::RestritoAFiliais(filiais) => filiais.contains(&filial_id),
        }
    }

    /// Filtro para as queries de listagem: `None` significa sem restrição.
    pub fn filtro_filiais(&self) -> Option<Vec<Uuid>> {
        match self {
            EscopoAcesso::Global => None,
            EscopoAcesso::RestritoAFiliais(filiais) => Some(filiais.iter().copied().collect()),
        }
    }
}

// Dados para registro do primeiro usuário (bootstrap)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUsuarioPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 11, max = 14, message = "O CPF fornecido é inválido."))]
    pub cpf: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
}

// Dados para criação de usuários pelo papel MAXIMO
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUsuarioPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 11, max = 14, message = "O CPF fornecido é inválido."))]
    pub cpf: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
    pub papel: PapelUsuario,
    /// Filiais visíveis para coordenadores; ignorado nos demais papéis.
    #[serde(default)]
    pub filiais: Vec<Uuid>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUsuarioPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximo_e_administrador_tem_escopo_global() {
        let escopo = EscopoAcesso::para_usuario(PapelUsuario::Maximo, vec![]);
        assert_eq!(escopo, EscopoAcesso::Global);
        assert!(escopo.permite_filial(Uuid::new_v4()));
        assert!(escopo.filtro_filiais().is_none());

        let escopo = EscopoAcesso::para_usuario(PapelUsuario::Administrador, vec![Uuid::new_v4()]);
        assert_eq!(escopo, EscopoAcesso::Global);
    }

    #[test]
    fn coordenador_fica_restrito_as_filiais_atribuidas() {
        let minha = Uuid::new_v4();
        let outra = Uuid::new_v4();
        let escopo = EscopoAcesso::para_usuario(PapelUsuario::Coordenador, vec![minha]);

        assert!(escopo.permite_filial(minha));
        assert!(!escopo.permite_filial(outra));
        assert_eq!(escopo.filtro_filiais(), Some(vec![minha]));
    }

    #[test]
    fn coordenador_sem_filiais_nao_enxerga_nada() {
        let escopo = EscopoAcesso::para_usuario(PapelUsuario::Coordenador, vec![]);
        assert!(!escopo.permite_filial(Uuid::new_v4()));
        assert_eq!(escopo.filtro_filiais(), Some(vec![]));
    }
}
