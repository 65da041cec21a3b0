use crate::http::middleware::authentication;
use crate::state::AppState;
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use hyper::{Request, body::Incoming};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server,
};
use log::{error, info, warn};
use tower_http::cors::CorsLayer;
use tower_service::Service;

mod dashboard;
mod extract;
mod groups;
mod home;
mod login;
mod logout;
mod membership;
mod messages;
pub mod middleware;
mod profile;
mod register;
mod reports;
mod reviews;
mod schedule;
mod sos;
mod views;

/// Builds every route of the service
pub fn router(state: AppState) -> Router {
    let authentication =
        axum::middleware::from_fn_with_state(state.clone(), authentication::authentication);

    let user_routes = Router::new()
        .route("/logout", get(logout::logout))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/profile", get(profile::profile))
        .route("/update_profile", post(profile::update_profile))
        .route("/add_schedule_entry", post(schedule::add_schedule_entry))
        .route(
            "/delete_schedule_entry/{id}",
            post(schedule::delete_schedule_entry),
        )
        .route("/create_group", post(groups::create_group))
        .route("/delete_group/{id}", post(groups::delete_group))
        .route("/group/{id}", get(groups::group_detail))
        .route("/join_group/{id}", get(membership::join_group))
        .route("/leave_group/{id}", post(membership::leave_group))
        .route("/send_message/{id}", post(messages::send_message))
        .route("/submit_review", post(reviews::submit_review))
        .route("/my_reviews", get(reviews::my_reviews))
        .route("/submit_report", post(reports::submit_report))
        .route("/reports", get(reports::reports))
        .route("/send_sos", post(sos::send_sos))
        .route_layer(authentication);

    let mut app = Router::new()
        .route("/", get(home::home))
        .route("/register", post(register::register))
        .route("/login", post(login::login))
        .merge(user_routes);

    if let Some(frontend_url) = &state.config.frontend_url {
        match frontend_url.parse::<HeaderValue>() {
            Ok(origin) => app = app.layer(CorsLayer::new().allow_origin(origin)),
            Err(error) => warn!("Ignoring FRONTEND_URL, not a valid origin: {error}"),
        }
    }

    app.with_state(state)
}

/// Starts the HTTP server, serving every accepted connection on its own task
pub async fn listen(state: AppState) {
    let bind_address = state.config.bind_address.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .expect("Could not bind HTTP server");

    info!("HTTP server listening on {bind_address}");

    loop {
        let (socket, _remote_addr) = match listener.accept().await {
            Ok(listener) => listener,
            Err(error) => {
                error!("Could not get socket from accepted HTTP connection: {error}");
                continue;
            }
        };

        let tower_service = app.clone();
        tokio::spawn(async move {
            let socket = TokioIo::new(socket);
            let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
                tower_service.clone().call(request)
            });

            if let Err(err) = server::conn::auto::Builder::new(TokioExecutor::new())
                .serve_connection_with_upgrades(socket, hyper_service)
                .await
            {
                error!("Failed to serve connection: {err:#}");
            }
        });
    }
}
