use axum::{
    Router, middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer, SessionStore, cookie::SameSite,
    session_store::ExpiredDeletion,
};
use tower_sessions_sqlx_store::SqliteStore;
use tracing::{error, info};

use crate::config::{Config, SessionStoreKind};
use crate::constants::seed::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD};
use crate::db::{BookingStore, InMemoryStore, Store};
use crate::services::{
    AdminService, AuthService, AvailabilityService, Mailer, ReservationWriter, StoreAuthService,
};

mod admin;
mod assets;
pub mod auth;
pub mod availability;
mod error;
mod observability;
mod pages;
mod reservations;

pub use availability::AvailabilityResponse;
pub use error::ApiError;
pub use observability::AuthenticatedUser;

pub struct AppState {
    pub config: Config,

    pub store: Arc<dyn BookingStore>,

    /// The SQLite store when one is configured; shared with the session layer.
    pub db: Option<Store>,

    pub availability: Arc<AvailabilityService>,

    pub writer: Arc<ReservationWriter>,

    pub admin: Arc<AdminService>,

    pub auth: Arc<dyn AuthService>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Wires the services around `store`.
    #[must_use]
    pub fn new(
        config: Config,
        store: Arc<dyn BookingStore>,
        db: Option<Store>,
        mailer: Mailer,
        prometheus_handle: Option<PrometheusHandle>,
    ) -> Arc<Self> {
        let availability = Arc::new(AvailabilityService::new(store.clone()));
        let writer = Arc::new(ReservationWriter::new(store.clone(), mailer));
        let admin = Arc::new(AdminService::new(store.clone(), writer.clone()));
        let auth: Arc<dyn AuthService> = Arc::new(StoreAuthService::new(
            store.clone(),
            db.clone(),
            config.security.clone(),
        ));

        Arc::new(Self {
            config,
            store,
            db,
            availability,
            writer,
            admin,
            auth,
            prometheus_handle,
        })
    }
}

/// Opens the configured store and starts the mail listener.
pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let mailer = Mailer::start(&config.mail);

    if config.uses_memory_store() {
        info!("Using in-memory store, data will not survive a restart");
        let store = InMemoryStore::new().with_user(
            DEFAULT_ADMIN_EMAIL,
            DEFAULT_ADMIN_PASSWORD,
            &config.security,
        )?;
        return Ok(AppState::new(
            config,
            Arc::new(store),
            None,
            mailer,
            prometheus_handle,
        ));
    }

    let db = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(AppState::new(
        config,
        Arc::new(db.clone()),
        Some(db),
        mailer,
        prometheus_handle,
    ))
}

pub async fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let routes = create_router(state.clone());

    let router = match (state.config.server.session_store, &state.db) {
        (SessionStoreKind::Sqlite, Some(db)) => {
            let store = SqliteStore::new(db.conn.get_sqlite_connection_pool().clone());
            store.migrate().await?;

            tokio::spawn({
                let store = store.clone();
                async move {
                    if let Err(e) = store
                        .continuously_delete_expired(tokio::time::Duration::from_secs(60))
                        .await
                    {
                        error!(error = %e, "Expired session cleanup stopped");
                    }
                }
            });

            with_sessions(routes, store, &state.config)
        }
        (SessionStoreKind::Sqlite, None) => {
            anyhow::bail!("session_store = \"sqlite\" requires a sqlite database")
        }
        (SessionStoreKind::Memory, _) => {
            with_sessions(routes, MemoryStore::default(), &state.config)
        }
    };

    Ok(router
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_requests)))
}

fn with_sessions<S>(routes: Router, store: S, config: &Config) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = SessionManagerLayer::new(store)
        .with_secure(config.server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.server.session_inactivity_minutes,
        )));

    routes.layer(session_layer)
}

fn create_router(state: Arc<AppState>) -> Router {
    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/reservations-new", get(admin::reservations_new))
        .route("/reservations-all", get(admin::reservations_all))
        .route(
            "/reservations-calendar",
            get(admin::calendar).post(admin::post_calendar),
        )
        .route(
            "/reservations/{src}/{id}/show",
            get(admin::show_reservation),
        )
        .route("/reservations/{src}/{id}", post(admin::update_reservation))
        .route(
            "/process-reservation/{src}/{id}",
            get(admin::process_reservation),
        )
        .route(
            "/delete-reservation/{src}/{id}",
            get(admin::delete_reservation),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/", get(pages::home))
        .route("/about", get(pages::about))
        .route("/generals-quarters", get(pages::generals_quarters))
        .route("/majors-suite", get(pages::majors_suite))
        .route("/contact", get(pages::contact))
        .route(
            "/search-availability",
            get(availability::search_page).post(availability::post_search),
        )
        .route(
            "/search-availability-json",
            post(availability::availability_json),
        )
        .route("/choose-room/{id}", get(availability::choose_room))
        .route("/book-room", get(availability::book_room))
        .route(
            "/make-reservation",
            get(reservations::form).post(reservations::submit),
        )
        .route("/reservation-summary", get(reservations::summary))
        .route("/user/login", get(auth::login_page).post(auth::login))
        .route("/user/logout", get(auth::logout))
        .route("/metrics", get(observability::get_metrics))
        .route("/static/{*path}", get(assets::serve_asset))
        .nest("/admin", admin_routes)
        .with_state(state)
}
