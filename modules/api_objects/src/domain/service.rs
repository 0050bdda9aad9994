use std::sync::Arc;

use chrono::Utc;
use query_core::Filter;
use tracing::{debug, info, instrument};

use crate::contract::model::{ApiObject, ApiObjectInput};
use crate::domain::error::DomainError;
use crate::domain::repo::ApiObjectsRepository;
use crate::domain::validation::validate_input;

#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn ApiObjectsRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn ApiObjectsRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "api_objects.service.list_objects", skip(self))]
    pub async fn list_objects(&self) -> Result<Vec<ApiObject>, DomainError> {
        Ok(self.repo.scan().await?)
    }

    #[instrument(name = "api_objects.service.get_object", skip(self), fields(object_id = id))]
    pub async fn get_object(&self, id: i64) -> Result<ApiObject, DomainError> {
        debug!("Getting object by id");
        Ok(self.repo.get(id).await?)
    }

    /// Objects whose name contains `name` (case-sensitive). A blank needle matches everything.
    #[instrument(name = "api_objects.service.search_by_name", skip(self))]
    pub async fn search_by_name(&self, name: &str) -> Result<Vec<ApiObject>, DomainError> {
        let filter = Filter::<ApiObject>::new().contains(Some(name), |o| Some(o.name.as_str()));
        let all = self.repo.scan().await?;
        Ok(all.into_iter().filter(|o| filter.matches(o)).collect())
    }

    #[instrument(name = "api_objects.service.create_object", skip(self, input))]
    pub async fn create_object(&self, input: ApiObjectInput) -> Result<ApiObject, DomainError> {
        info!("Creating new object");
        validate_input(&input)
            .into_result()
            .map_err(|errors| DomainError::Validation { errors })?;

        let now = Utc::now();
        let object = ApiObject {
            id: 0,
            name: input.name,
            data: input.data,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        let stored = self.repo.insert(object).await?;
        info!("Successfully created object with id={}", stored.id);
        Ok(stored)
    }

    #[instrument(name = "api_objects.service.update_object", skip(self, input), fields(object_id = id))]
    pub async fn update_object(
        &self,
        id: i64,
        input: ApiObjectInput,
    ) -> Result<ApiObject, DomainError> {
        info!("Updating object");
        validate_input(&input)
            .into_result()
            .map_err(|errors| DomainError::Validation { errors })?;

        let mut next = self.repo.get(id).await?;
        let expected = next.version;
        next.name = input.name;
        next.data = input.data;
        next.updated_at = Utc::now();
        Ok(self
            .repo
            .update_if_version_matches(id, next, expected)
            .await?)
    }

    #[instrument(name = "api_objects.service.delete_object", skip(self), fields(object_id = id))]
    pub async fn delete_object(&self, id: i64) -> Result<(), DomainError> {
        info!("Deleting object");
        Ok(self.repo.delete(id).await?)
    }
}
