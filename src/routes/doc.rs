use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        clients::ClientPayload,
        products::{CreateProductRequest, UpdateProductRequest},
        users::UserPayload,
    },
    error::ErrorBody,
    models::{Client, ClientLocation, Product, TopProductByLocation, User},
    response::{ApiResponse, CreatedId, Page},
    routes::{analytics, auth, clients, dashboard, health, params, products, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::me,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        clients::list_clients,
        clients::get_client,
        clients::create_client,
        clients::update_client,
        clients::delete_client,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        dashboard::client_map,
        dashboard::product_field,
        dashboard::products_map,
        analytics::seisms,
        analytics::analytics
    ),
    components(
        schemas(
            User,
            Client,
            Product,
            ClientLocation,
            TopProductByLocation,
            UserPayload,
            ClientPayload,
            CreateProductRequest,
            UpdateProductRequest,
            LoginRequest,
            LoginResponse,
            CreatedId,
            ErrorBody,
            params::Pagination,
            Page<User>,
            Page<Client>,
            Page<Product>,
            ApiResponse<CreatedId>,
            ApiResponse<User>,
            ApiResponse<Client>,
            ApiResponse<Product>,
            ApiResponse<LoginResponse>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Login and current user"),
        (name = "Users", description = "Dashboard accounts"),
        (name = "Clients", description = "Client endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Dashboard", description = "Map and selector aggregates"),
        (name = "Analytics", description = "Relay to the analytics service"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
