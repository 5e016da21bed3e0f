use crate::application::blog_service::PostPage;
use crate::application::pagination::Paginator;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::{ProfilePatch, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{ProfileUpdateRequest, User};

#[derive(Debug, Clone)]
pub(crate) struct ProfilePage {
    pub(crate) user: User,
    pub(crate) posts: PostPage,
}

pub(crate) struct ProfileService<U, P> {
    users: U,
    posts: P,
}

impl<U, P> ProfileService<U, P>
where
    U: UserRepository,
    P: PostRepository,
{
    pub(crate) fn new(users: U, posts: P) -> Self {
        Self { users, posts }
    }

    /// Profile listing shows everything the user wrote, drafts and
    /// scheduled posts included, to any visitor.
    pub(crate) async fn profile_page(
        &self,
        username: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ProfilePage, DomainError> {
        let user = self.require_user(username).await?;

        let total = self.posts.count_by_author(user.id).await?;
        let pager = Paginator::new(total, page_size);
        let page = pager.clamp_page(page);
        let items = self.posts.list_by_author(user.id, pager.slice(page)).await?;

        Ok(ProfilePage {
            user,
            posts: PostPage {
                items,
                meta: pager.meta(page),
            },
        })
    }

    pub(crate) async fn update_profile(
        &self,
        actor_user_id: i64,
        username: &str,
        req: ProfileUpdateRequest,
    ) -> Result<User, DomainError> {
        let req = req.validate()?;

        let user = self.require_user(username).await?;
        if user.id != actor_user_id {
            return Err(DomainError::NotProfileOwner);
        }

        let patch = ProfilePatch {
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
        };
        self.users
            .update_profile(user.id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))
    }

    async fn require_user(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .get_profile(username)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))
    }
}
