use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::application::profile_service::ProfilePage;
use crate::domain::user::ProfileUpdateRequest;
use crate::presentation::AppState;
use crate::presentation::app_error::AppResult;
use crate::presentation::handlers::auth::UserDto;
use crate::presentation::handlers::posts::{PageMetaDto, PageQuery, PostPreviewDto};
use crate::presentation::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct UpdateProfileDto {
    #[validate(email)]
    pub(crate) email: String,
    #[validate(length(max = 150))]
    pub(crate) first_name: Option<String>,
    #[validate(length(max = 150))]
    pub(crate) last_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfilePageDto {
    pub(crate) profile: UserDto,
    pub(crate) posts: Vec<PostPreviewDto>,
    pub(crate) page: PageMetaDto,
}

impl From<ProfilePage> for ProfilePageDto {
    fn from(page: ProfilePage) -> Self {
        Self {
            profile: page.user.into(),
            posts: page
                .posts
                .items
                .into_iter()
                .map(PostPreviewDto::from)
                .collect(),
            page: page.posts.meta.into(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/profile/{username}",
    tag = "profiles",
    params(
        ("username" = String, Path, description = "Profile owner's username"),
        ("page" = Option<u32>, Query, description = "1-based page number, clamped to range")
    ),
    responses(
        (status = 200, description = "Profile with all of the user's posts", body = ProfilePageDto),
        (status = 404, description = "No such user"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ProfilePageDto>> {
    let page = query.page.unwrap_or(1);
    let result = state
        .profile_service
        .profile_page(&username, page, state.page_size)
        .await?;

    Ok(Json(ProfilePageDto::from(result)))
}

#[utoipa::path(
    put,
    path = "/profile/{username}",
    tag = "profiles",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("username" = String, Path, description = "Profile owner's username")
    ),
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserDto),
        (status = 303, description = "Requester does not own the profile; redirected to login"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such user"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(username): Path<String>,
    Json(dto): Json<UpdateProfileDto>,
) -> AppResult<Json<UserDto>> {
    dto.validate()?;
    let req = ProfileUpdateRequest {
        email: dto.email,
        first_name: dto.first_name,
        last_name: dto.last_name,
    };

    let user = state
        .profile_service
        .update_profile(auth.user_id, &username, req)
        .await?;
    Ok(Json(UserDto::from(user)))
}
