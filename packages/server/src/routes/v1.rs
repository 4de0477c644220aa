use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/comics", comic_routes(config))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::profile))
}

fn comic_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::comic::list_comics,
            handlers::comic::create_comic
        ))
        .routes(routes!(handlers::comic::get_comic_by_name))
        .routes(routes!(
            handlers::comic::get_comic,
            handlers::comic::update_comic,
            handlers::comic::delete_comic
        ))
        .routes(routes!(handlers::comic::download_cover))
        .routes(routes!(handlers::comic::download_banner))
        .layer(handlers::comic::upload_body_limit(&config.storage))
}
