// src/services/dashboard_service.rs

use crate::{
    common::error::AppError, db::DashboardRepository, models::auth::EscopoAcesso,
    models::dashboard::ResumoDashboard,
};

#[derive(Clone)]
pub struct DashboardService {
    dashboard_repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(dashboard_repo: DashboardRepository) -> Self {
        Self { dashboard_repo }
    }

    pub async fn resumo(&self, escopo: &EscopoAcesso) -> Result<ResumoDashboard, AppError> {
        let filtro = escopo.filtro_filiais();
        self.dashboard_repo.resumo(filtro.as_deref()).await
    }
}
