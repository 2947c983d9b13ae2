//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, profiles, reservations};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookyard API",
        version = "0.1.0",
        description = "Community Book Sharing Marketplace REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Profiles
        profiles::get_my_profile,
        profiles::get_profile,
        profiles::claim_daily_bonus,
        profiles::get_my_credit_balance,
        profiles::get_my_credit_history,
        // Reservations
        reservations::create_reservation,
        reservations::list_my_reservations,
        reservations::activate_reservation,
        reservations::complete_reservation,
        reservations::cancel_reservation,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::error::ErrorResponse,
            crate::models::book::Book,
            crate::models::book::Category,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::profile::Profile,
            crate::models::reservation::Reservation,
            crate::models::reservation::CreateReservation,
            crate::models::credits::CreditsHistory,
            crate::models::credits::CreditBalance,
            crate::models::credits::BonusClaim,
            crate::models::enums::UserRole,
            crate::models::enums::Intent,
            crate::models::enums::ReservationStatus,
            crate::models::enums::CreditEventType,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "books", description = "Book catalog"),
        (name = "profiles", description = "Profiles and credits"),
        (name = "reservations", description = "Reservation lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
