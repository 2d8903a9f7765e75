use crate::auth;
use crate::core::state::AppState;
use crate::routes::{auth as auth_routes, genres, musicians};
use axum::{
    Router,
    extract::{MatchedPath, Request},
    http::{Method, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing::info_span;

pub(crate) fn routes(state: AppState) -> Router {
    let secured_routes = Router::new()
        .route("/auth/me", get(auth_routes::me))
        .route("/genres", get(genres::get_all))
        .route("/user/genres", post(genres::set_for_user))
        .route("/musicians", get(musicians::suggested))
        .route("/user/following", post(musicians::follow))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::gate::authorize,
        ));

    Router::new()
        .route("/", get(|| async { "Hello, World!" }))
        .route("/register", post(auth_routes::register))
        .route("/login", post(auth_routes::login))
        .merge(secured_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                        let matched_path = request
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str);

                        info_span!(
                            "request",
                            method = ?request.method(),
                            matched_path,
                        )
                    }),
                )
                .layer(
                    CorsLayer::new()
                        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                        .allow_origin(cors::Any)
                        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
                ),
        )
}
