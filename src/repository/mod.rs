//! Repository layer for database operations

pub mod books;
pub mod credits;
pub mod profiles;
pub mod reservations;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub profiles: profiles::ProfilesRepository,
    pub books: books::BooksRepository,
    pub reservations: reservations::ReservationsRepository,
    pub credits: credits::CreditsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            profiles: profiles::ProfilesRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            credits: credits::CreditsRepository::new(pool.clone()),
            pool,
        }
    }
}
