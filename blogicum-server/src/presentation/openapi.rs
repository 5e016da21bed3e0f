use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::presentation::handlers::auth::{AuthResponseDto, LoginDto, RegisterDto, UserDto};
use crate::presentation::handlers::categories::{CategoryDto, CategoryPageDto};
use crate::presentation::handlers::comments::{CommentDto, CommentFormDto};
use crate::presentation::handlers::posts::{
    CreatePostDto, PageMetaDto, PageQuery, PostDetailDto, PostDto, PostPageDto, PostPreviewDto,
    UpdatePostDto,
};
use crate::presentation::handlers::profiles::{ProfilePageDto, UpdateProfileDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::auth::register,
        crate::presentation::handlers::auth::login,
        crate::presentation::handlers::posts::home_page,
        crate::presentation::handlers::posts::get_post,
        crate::presentation::handlers::posts::create_post,
        crate::presentation::handlers::posts::update_post,
        crate::presentation::handlers::posts::delete_post,
        crate::presentation::handlers::categories::category_page,
        crate::presentation::handlers::comments::add_comment,
        crate::presentation::handlers::comments::edit_comment,
        crate::presentation::handlers::comments::delete_comment,
        crate::presentation::handlers::profiles::get_profile,
        crate::presentation::handlers::profiles::update_profile
    ),
    components(
        schemas(
            RegisterDto,
            LoginDto,
            AuthResponseDto,
            UserDto,
            PageQuery,
            PageMetaDto,
            PostDto,
            PostPreviewDto,
            PostPageDto,
            PostDetailDto,
            CreatePostDto,
            UpdatePostDto,
            CategoryDto,
            CategoryPageDto,
            CommentDto,
            CommentFormDto,
            ProfilePageDto,
            UpdateProfileDto
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "posts", description = "Post listings and CRUD"),
        (name = "comments", description = "Comment sub-resource"),
        (name = "profiles", description = "User profiles")
    ),
    modifiers(&SecurityAddon)
)]
pub(crate) struct ApiDoc;

pub(crate) struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.take().unwrap_or_default();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.components = Some(components);
    }
}
