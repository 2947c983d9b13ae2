//! Business logic services

pub mod auth;
pub mod catalog;
pub mod profiles;
pub mod reservations;

use crate::{
    config::{AuthConfig, CreditsConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub profiles: profiles::ProfilesService,
    pub reservations: reservations::ReservationsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        credits_config: CreditsConfig,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            profiles: profiles::ProfilesService::new(
                repository.clone(),
                credits_config.daily_bonus_amount,
            ),
            reservations: reservations::ReservationsService::new(repository),
        }
    }
}
