pub mod auth;
pub mod catalogo;
pub mod dashboard;
pub mod emprestimo;
pub mod ferramenta;
pub mod funcionario;
pub mod manutencao;
pub mod organizacao;
