pub mod amenities;
pub mod cities;
pub mod index;
pub mod places;
pub mod places_amenities;
pub mod places_reviews;
pub mod resource;
pub mod states;
pub mod users;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use models::{
    Amenity, AmenityPatch, City, CityPatch, Place, PlacePatch, Review, ReviewPatch, State,
    StatePatch, User, UserPatch,
};
use tower::Layer;
use tower_http::{
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::errors::ApiError;
use crate::session::storage_session;
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn api_routes() -> Router<AppState> {
    use resource::{destroy, list, show, update};

    Router::new()
        .route("/status", get(index::status))
        .route("/stats", get(index::stats))
        .route("/states", get(list::<State>).post(states::create_state))
        .route(
            "/states/:id",
            get(show::<State>).put(update::<StatePatch>).delete(destroy::<State>),
        )
        .route("/states/:id/cities", get(cities::list_cities).post(cities::create_city))
        .route(
            "/cities/:id",
            get(show::<City>).put(update::<CityPatch>).delete(destroy::<City>),
        )
        .route("/cities/:id/places", get(places::list_places).post(places::create_place))
        .route(
            "/places/:id",
            get(show::<Place>).put(update::<PlacePatch>).delete(destroy::<Place>),
        )
        .route("/places_search", post(places::search_places))
        .route(
            "/places/:id/reviews",
            get(places_reviews::list_reviews).post(places_reviews::create_review),
        )
        .route(
            "/reviews/:id",
            get(show::<Review>).put(update::<ReviewPatch>).delete(destroy::<Review>),
        )
        .route("/places/:id/amenities", get(places_amenities::list_place_amenities))
        .route(
            "/places/:id/amenities/:amenity_id",
            post(places_amenities::link_amenity).delete(places_amenities::unlink_amenity),
        )
        .route("/amenities", get(list::<Amenity>).post(amenities::create_amenity))
        .route(
            "/amenities/:id",
            get(show::<Amenity>).put(update::<AmenityPatch>).delete(destroy::<Amenity>),
        )
        .route("/users", get(list::<User>).post(users::create_user))
        .route(
            "/users/:id",
            get(show::<User>).put(update::<UserPatch>).delete(destroy::<User>),
        )
}

/// Build the application router: API under `/api/v1` with a per-request
/// storage session, JSON 404 fallback, CORS and HTTP tracing.
pub fn build_router(state: AppState) -> Router {
    let api = api_routes().layer(middleware::from_fn_with_state(state.clone(), storage_session));

    Router::new()
        .nest(API_PREFIX, api)
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

/// Router wrapped so `/states/` and `/states` resolve to the same route.
/// Path normalization must run before routing, hence outside the router.
pub fn build_app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}
