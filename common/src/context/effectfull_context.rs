use std::sync::Arc;

use type_map::concurrent::TypeMap;

use crate::auth::{Auth, Service};
use crate::error::{self, AddCode};
use crate::repository::RepositoryObject;

/// Process-wide state shared by every request: the repositories registered at
/// startup, keyed by entity type.
pub struct ServiceState {
    pub repositories: TypeMap,
    pub service: Service,
}

impl ServiceState {
    pub fn new(service: Service) -> Self {
        Self {
            repositories: TypeMap::new(),
            service,
        }
    }

    pub fn insert<T: 'static>(&mut self, repository: RepositoryObject<T>) {
        self.repositories.insert(repository);
    }

    pub fn get_repository<T: 'static>(&self) -> Option<RepositoryObject<T>> {
        self.repositories.get::<RepositoryObject<T>>().cloned()
    }

    pub fn try_get_repository<T: 'static>(&self) -> error::Result<RepositoryObject<T>> {
        self.get_repository::<T>().ok_or(
            anyhow::anyhow!(
                "Repository for type {} not found",
                std::any::type_name::<T>()
            )
            .code(500),
        )
    }
}

#[derive(Clone)]
pub struct HandlerContext {
    pub user_auth: Auth,
}

#[derive(Clone)]
pub struct EffectfullContext(pub Arc<ServiceState>, pub HandlerContext);

impl EffectfullContext {
    pub fn try_get_repository<T: 'static>(&self) -> error::Result<RepositoryObject<T>> {
        self.0.try_get_repository::<T>()
    }

    pub fn auth(&self) -> &Auth {
        &self.1.user_auth
    }
}
