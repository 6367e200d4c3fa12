use crate::api::handlers::{health, posts, user_identity, user_login, user_register};
use utoipa::openapi::{
    security::{Http, HttpAuthScheme, SecurityScheme},
    ComponentsBuilder, InfoBuilder, OpenApiBuilder, Tag,
};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec.
pub(crate) fn api_router() -> OpenApiRouter {
    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    let mut router = OpenApiRouter::with_openapi(cargo_openapi())
        .routes(routes!(health::health))
        .routes(routes!(user_register::register))
        .routes(routes!(user_login::login))
        .routes(routes!(user_identity::identity))
        .routes(routes!(posts::list, posts::create))
        .routes(routes!(posts::update, posts::delete));

    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Registration, login and identity".to_string());

    let mut posts_tag = Tag::new("posts");
    posts_tag.description = Some("Skills being learned, scoped to their owner".to_string());

    let openapi = router.get_openapi_mut();
    openapi.tags = Some(vec![auth_tag, posts_tag]);
    openapi
        .components
        .get_or_insert(ComponentsBuilder::new().build())
        .add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );

    router
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    OpenApiBuilder::new().info(info).build()
}
