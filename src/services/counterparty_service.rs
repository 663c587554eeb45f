// src/services/counterparty_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{AppError, Resource},
    db::CounterpartyStore,
    models::counterparty::{Counterparty, CounterpartyFilter, CounterpartyPatch, NewCounterparty},
};

#[derive(Clone)]
pub struct CounterpartyService {
    counterparties: Arc<dyn CounterpartyStore>,
}

impl CounterpartyService {
    pub fn new(counterparties: Arc<dyn CounterpartyStore>) -> Self {
        Self { counterparties }
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        filter: &CounterpartyFilter,
    ) -> Result<Vec<Counterparty>, AppError> {
        self.counterparties.list(user_id, filter).await
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<Counterparty, AppError> {
        self.counterparties
            .find(user_id, id)
            .await?
            .ok_or(AppError::NotFound(Resource::Contraparte))
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        payload: NewCounterparty,
    ) -> Result<Counterparty, AppError> {
        payload.validate()?;
        if payload.nome.trim().is_empty() {
            return Err(AppError::invalid_field("nome", "required", "O nome é obrigatório."));
        }

        let now = Utc::now();
        let counterparty = Counterparty {
            id: Uuid::new_v4(),
            user_id,
            nome: payload.nome.trim().to_string(),
            tipo: payload.tipo,
            documento: payload.documento,
            email: payload.email,
            telefone: payload.telefone,
            endereco: payload.endereco,
            observacoes: payload.observacoes,
            ativo: true,
            created_at: now,
            updated_at: now,
        };

        let created = self.counterparties.insert(&counterparty).await?;
        tracing::info!(contraparte_id = %created.id, tipo = ?created.tipo, "Cliente/fornecedor criado");
        Ok(created)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: CounterpartyPatch,
    ) -> Result<Counterparty, AppError> {
        patch.validate()?;
        let mut counterparty = self.get(user_id, id).await?;

        if let Some(nome) = patch.nome {
            if nome.trim().is_empty() {
                return Err(AppError::invalid_field("nome", "required", "O nome é obrigatório."));
            }
            counterparty.nome = nome.trim().to_string();
        }
        if let Some(tipo) = patch.tipo {
            counterparty.tipo = tipo;
        }
        if let Some(documento) = patch.documento {
            counterparty.documento = documento;
        }
        if let Some(email) = patch.email {
            counterparty.email = email;
        }
        if let Some(telefone) = patch.telefone {
            counterparty.telefone = telefone;
        }
        if let Some(endereco) = patch.endereco {
            counterparty.endereco = endereco;
        }
        if let Some(observacoes) = patch.observacoes {
            counterparty.observacoes = observacoes;
        }
        if let Some(ativo) = patch.ativo {
            counterparty.ativo = ativo;
        }

        self.counterparties
            .save(&counterparty)
            .await?
            .ok_or(AppError::NotFound(Resource::Contraparte))
    }

    /// Exclusão lógica: contas antigas continuam apontando para o registro.
    pub async fn deactivate(&self, user_id: Uuid, id: Uuid) -> Result<Counterparty, AppError> {
        let mut counterparty = self.get(user_id, id).await?;
        counterparty.ativo = false;

        let saved = self
            .counterparties
            .save(&counterparty)
            .await?
            .ok_or(AppError::NotFound(Resource::Contraparte))?;
        tracing::info!(contraparte_id = %id, "Cliente/fornecedor desativado");
        Ok(saved)
    }
}
