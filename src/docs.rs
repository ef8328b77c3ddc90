use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, TokenResponse};
use crate::modules::password_reset::model::{
    ForgetPasswordRequest, MessageResponse, ResetPasswordRequest,
};
use crate::modules::users::model::{
    ChangePermissionRequest, ProfileResponse, RegisterRequest, RegisterResponse,
    UpdateProfileRequest, UserName, UsernamesRequest, UsernamesResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::router::ping,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh_token,
        crate::modules::password_reset::controller::forget_password,
        crate::modules::password_reset::controller::reset_password,
        crate::modules::users::controller::register,
        crate::modules::users::controller::get_profile,
        crate::modules::users::controller::update_profile,
        crate::modules::users::controller::change_permissions,
        crate::modules::users::controller::usernames,
    ),
    components(
        schemas(
            LoginRequest,
            TokenResponse,
            ForgetPasswordRequest,
            ResetPasswordRequest,
            MessageResponse,
            RegisterRequest,
            RegisterResponse,
            UpdateProfileRequest,
            ProfileResponse,
            ChangePermissionRequest,
            UsernamesRequest,
            UsernamesResponse,
            UserName,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and credential store health"),
        (name = "Authentication", description = "Session token issue and refresh"),
        (name = "Password Reset", description = "Emailed-code password reset"),
        (name = "Users", description = "Registration, profile and permissions")
    ),
    info(
        title = "CodeOJ User API",
        version = "0.1.0",
        description = "User identity service for CodeOJ: registration, session tokens, profiles, roles and password reset.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
