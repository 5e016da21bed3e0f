use chrono::Utc;

use crate::application::pagination::{PageMeta, Paginator};
use crate::data::category_repository::CategoryRepository;
use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::{NewPost, PostPatch, PostRepository, PostWithCategory};
use crate::domain::category::Category;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, Post, PostPreview, UpdatePostRequest};

#[derive(Debug, Clone)]
pub(crate) struct PostPage {
    pub(crate) items: Vec<PostPreview>,
    pub(crate) meta: PageMeta,
}

#[derive(Debug, Clone)]
pub(crate) struct CategoryPage {
    pub(crate) category: Category,
    pub(crate) posts: PostPage,
}

#[derive(Debug, Clone)]
pub(crate) struct PostDetail {
    pub(crate) post: Post,
    pub(crate) comments: Vec<Comment>,
}

pub(crate) struct BlogService<P, C, M> {
    posts: P,
    categories: C,
    comments: M,
}

impl<P, C, M> BlogService<P, C, M>
where
    P: PostRepository,
    C: CategoryRepository,
    M: CommentRepository,
{
    pub(crate) fn new(posts: P, categories: C, comments: M) -> Self {
        Self {
            posts,
            categories,
            comments,
        }
    }

    /// Home listing: publicly visible posts, newest first. The page number
    /// is clamped against the current total before the slice is fetched.
    pub(crate) async fn home_page(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<PostPage, DomainError> {
        let now = Utc::now();
        let total = self.posts.count_published(now).await?;
        let pager = Paginator::new(total, page_size);
        let page = pager.clamp_page(page);
        let items = self.posts.list_published(pager.slice(page), now).await?;

        Ok(PostPage {
            items,
            meta: pager.meta(page),
        })
    }

    pub(crate) async fn category_page(
        &self,
        slug: &str,
        page: u32,
        page_size: u32,
    ) -> Result<CategoryPage, DomainError> {
        let category = self
            .categories
            .get_published_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("category slug: {slug}")))?;

        let now = Utc::now();
        let total = self
            .posts
            .count_published_in_category(category.id, now)
            .await?;
        let pager = Paginator::new(total, page_size);
        let page = pager.clamp_page(page);
        let items = self
            .posts
            .list_published_in_category(category.id, pager.slice(page), now)
            .await?;

        Ok(CategoryPage {
            category,
            posts: PostPage {
                items,
                meta: pager.meta(page),
            },
        })
    }

    /// Detail view, widened to "publicly visible OR authored by the viewer".
    /// The check runs through the domain predicate so it cannot drift from
    /// the truth table tested on `Post`.
    pub(crate) async fn post_detail(
        &self,
        post_id: i64,
        viewer_id: Option<i64>,
    ) -> Result<PostDetail, DomainError> {
        let now = Utc::now();
        let PostWithCategory {
            post,
            category_is_published,
        } = self
            .posts
            .get_post_with_category(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;

        if !post.is_visible_to(viewer_id, category_is_published, now) {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }

        let comments = self.comments.list_for_post(post.id).await?;

        Ok(PostDetail { post, comments })
    }

    pub(crate) async fn create_post(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;
        self.require_published_category(req.category_id).await?;

        let new_post = NewPost {
            title: req.title,
            text: req.text,
            pub_date: req.pub_date.unwrap_or_else(Utc::now),
            author_id,
            category_id: req.category_id,
            location_id: req.location_id,
            is_published: req.is_published,
        };
        self.posts.create_post(new_post).await
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;
        if post.author_id != actor_user_id {
            return Err(DomainError::NotOwner { post_id });
        }

        self.require_published_category(req.category_id).await?;

        let patch = PostPatch {
            title: req.title,
            text: req.text,
            pub_date: req.pub_date,
            category_id: req.category_id,
            location_id: req.location_id,
            is_published: req.is_published,
        };
        self.posts
            .update_post(post_id, patch)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("post id: {post_id}")))?;
        if post.author_id != actor_user_id {
            return Err(DomainError::NotOwner { post_id });
        }

        let deleted = self.posts.delete_post(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        Ok(())
    }

    async fn require_published_category(&self, category_id: i64) -> Result<(), DomainError> {
        self.categories
            .get_published_by_id(category_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("category id: {category_id}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};

    use super::BlogService;
    use crate::data::category_repository::CategoryRepository;
    use crate::data::comment_repository::{CommentRepository, NewComment};
    use crate::data::post_repository::{
        NewPost, PageSlice, PostPatch, PostRepository, PostWithCategory,
    };
    use crate::domain::category::Category;
    use crate::domain::comment::Comment;
    use crate::domain::error::DomainError;
    use crate::domain::post::{CreatePostRequest, Post, PostPreview, UpdatePostRequest};

    #[derive(Clone, Default)]
    struct FakePostRepo {
        created_input: Arc<Mutex<Option<NewPost>>>,
        post_for_get: Arc<Mutex<Option<Post>>>,
        post_with_category: Arc<Mutex<Option<PostWithCategory>>>,
        update_result: Arc<Mutex<Option<Post>>>,
        update_call: Arc<Mutex<Option<(i64, PostPatch)>>>,
        delete_called: Arc<Mutex<bool>>,
        list_result: Arc<Mutex<Vec<PostPreview>>>,
        list_slice: Arc<Mutex<Option<PageSlice>>>,
        count_result: Arc<Mutex<i64>>,
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
            let post = sample_post(1, input.author_id);
            let post = Post {
                title: input.title.clone(),
                text: input.text.clone(),
                pub_date: input.pub_date,
                category_id: input.category_id,
                location_id: input.location_id,
                is_published: input.is_published,
                ..post
            };
            *self.created_input.lock().expect("mutex poisoned") = Some(input);
            Ok(post)
        }

        async fn get_post(&self, _id: i64) -> Result<Option<Post>, DomainError> {
            Ok(self.post_for_get.lock().expect("mutex poisoned").clone())
        }

        async fn get_post_with_category(
            &self,
            _id: i64,
        ) -> Result<Option<PostWithCategory>, DomainError> {
            Ok(self
                .post_with_category
                .lock()
                .expect("mutex poisoned")
                .clone())
        }

        async fn update_post(
            &self,
            id: i64,
            patch: PostPatch,
        ) -> Result<Option<Post>, DomainError> {
            *self.update_call.lock().expect("mutex poisoned") = Some((id, patch));
            Ok(self.update_result.lock().expect("mutex poisoned").clone())
        }

        async fn delete_post(&self, _id: i64) -> Result<bool, DomainError> {
            *self.delete_called.lock().expect("mutex poisoned") = true;
            Ok(true)
        }

        async fn list_published(
            &self,
            slice: PageSlice,
            _now: DateTime<Utc>,
        ) -> Result<Vec<PostPreview>, DomainError> {
            *self.list_slice.lock().expect("mutex poisoned") = Some(slice);
            Ok(self.list_result.lock().expect("mutex poisoned").clone())
        }

        async fn count_published(&self, _now: DateTime<Utc>) -> Result<i64, DomainError> {
            Ok(*self.count_result.lock().expect("mutex poisoned"))
        }

        async fn list_published_in_category(
            &self,
            _category_id: i64,
            slice: PageSlice,
            _now: DateTime<Utc>,
        ) -> Result<Vec<PostPreview>, DomainError> {
            *self.list_slice.lock().expect("mutex poisoned") = Some(slice);
            Ok(self.list_result.lock().expect("mutex poisoned").clone())
        }

        async fn count_published_in_category(
            &self,
            _category_id: i64,
            _now: DateTime<Utc>,
        ) -> Result<i64, DomainError> {
            Ok(*self.count_result.lock().expect("mutex poisoned"))
        }

        async fn list_by_author(
            &self,
            _author_id: i64,
            slice: PageSlice,
        ) -> Result<Vec<PostPreview>, DomainError> {
            *self.list_slice.lock().expect("mutex poisoned") = Some(slice);
            Ok(self.list_result.lock().expect("mutex poisoned").clone())
        }

        async fn count_by_author(&self, _author_id: i64) -> Result<i64, DomainError> {
            Ok(*self.count_result.lock().expect("mutex poisoned"))
        }
    }

    #[derive(Clone, Default)]
    struct FakeCategoryRepo {
        category: Arc<Mutex<Option<Category>>>,
    }

    #[async_trait]
    impl CategoryRepository for FakeCategoryRepo {
        async fn get_published_by_slug(
            &self,
            _slug: &str,
        ) -> Result<Option<Category>, DomainError> {
            Ok(self.category.lock().expect("mutex poisoned").clone())
        }

        async fn get_published_by_id(&self, _id: i64) -> Result<Option<Category>, DomainError> {
            Ok(self.category.lock().expect("mutex poisoned").clone())
        }
    }

    #[derive(Clone, Default)]
    struct FakeCommentRepo {
        list_result: Arc<Mutex<Vec<Comment>>>,
    }

    #[async_trait]
    impl CommentRepository for FakeCommentRepo {
        async fn create_comment(&self, _input: NewComment) -> Result<Comment, DomainError> {
            Err(DomainError::Unexpected("not used".to_string()))
        }

        async fn get_comment_for_post(
            &self,
            _comment_id: i64,
            _post_id: i64,
        ) -> Result<Option<Comment>, DomainError> {
            Ok(None)
        }

        async fn update_comment_text(
            &self,
            _comment_id: i64,
            _text: String,
        ) -> Result<Option<Comment>, DomainError> {
            Ok(None)
        }

        async fn delete_comment(&self, _comment_id: i64) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn list_for_post(&self, _post_id: i64) -> Result<Vec<Comment>, DomainError> {
            Ok(self.list_result.lock().expect("mutex poisoned").clone())
        }
    }

    fn service(
        posts: FakePostRepo,
        categories: FakeCategoryRepo,
        comments: FakeCommentRepo,
    ) -> BlogService<FakePostRepo, FakeCategoryRepo, FakeCommentRepo> {
        BlogService::new(posts, categories, comments)
    }

    fn sample_post(id: i64, author_id: i64) -> Post {
        Post {
            id,
            title: "title".to_string(),
            text: "text".to_string(),
            pub_date: Utc::now() - Duration::hours(1),
            author_id,
            category_id: 1,
            location_id: None,
            is_published: true,
            created_at: Utc::now(),
        }
    }

    fn sample_category(id: i64) -> Category {
        Category {
            id,
            slug: "travel".to_string(),
            title: "Travel".to_string(),
            description: String::new(),
            is_published: true,
            created_at: Utc::now(),
        }
    }

    fn preview(post: Post) -> PostPreview {
        PostPreview {
            post,
            comment_count: 0,
        }
    }

    #[tokio::test]
    async fn home_page_clamps_out_of_range_page_to_last() {
        let posts = FakePostRepo::default();
        *posts.count_result.lock().expect("mutex poisoned") = 25;
        *posts.list_result.lock().expect("mutex poisoned") = vec![preview(sample_post(1, 10))];

        let svc = service(posts.clone(), FakeCategoryRepo::default(), FakeCommentRepo::default());
        let page = svc.home_page(999, 10).await.expect("must succeed");

        assert_eq!(page.meta.page, 3);
        assert_eq!(page.meta.total_pages, 3);
        assert!(!page.meta.has_next);

        let slice = posts
            .list_slice
            .lock()
            .expect("mutex poisoned")
            .expect("slice must be captured");
        assert_eq!(slice.limit, 10);
        assert_eq!(slice.offset, 20);
    }

    #[tokio::test]
    async fn category_page_is_not_found_for_unpublished_category() {
        let svc = service(
            FakePostRepo::default(),
            FakeCategoryRepo::default(),
            FakeCommentRepo::default(),
        );

        let err = svc
            .category_page("hidden", 1, 10)
            .await
            .expect_err("must be not found");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn category_page_returns_category_and_posts() {
        let posts = FakePostRepo::default();
        *posts.count_result.lock().expect("mutex poisoned") = 1;
        *posts.list_result.lock().expect("mutex poisoned") = vec![preview(sample_post(1, 10))];
        let categories = FakeCategoryRepo::default();
        *categories.category.lock().expect("mutex poisoned") = Some(sample_category(1));

        let svc = service(posts, categories, FakeCommentRepo::default());
        let page = svc.category_page("travel", 1, 10).await.expect("must succeed");

        assert_eq!(page.category.slug, "travel");
        assert_eq!(page.posts.items.len(), 1);
        assert_eq!(page.posts.meta.total_items, 1);
    }

    fn with_category(post: Post, category_is_published: bool) -> PostWithCategory {
        PostWithCategory {
            post,
            category_is_published,
        }
    }

    #[tokio::test]
    async fn post_detail_shows_public_post_to_anonymous_viewer() {
        let posts = FakePostRepo::default();
        *posts.post_with_category.lock().expect("mutex poisoned") =
            Some(with_category(sample_post(7, 10), true));

        let svc = service(posts, FakeCategoryRepo::default(), FakeCommentRepo::default());
        let detail = svc.post_detail(7, None).await.expect("must succeed");

        assert_eq!(detail.post.id, 7);
    }

    #[tokio::test]
    async fn post_detail_hides_draft_from_other_viewers_but_not_the_author() {
        let posts = FakePostRepo::default();
        let draft = Post {
            is_published: false,
            ..sample_post(7, 10)
        };
        *posts.post_with_category.lock().expect("mutex poisoned") =
            Some(with_category(draft, true));

        let svc = service(posts, FakeCategoryRepo::default(), FakeCommentRepo::default());

        let err = svc
            .post_detail(7, Some(11))
            .await
            .expect_err("stranger must get not found");
        assert!(matches!(err, DomainError::NotFound(_)));

        let detail = svc.post_detail(7, Some(10)).await.expect("author must see it");
        assert_eq!(detail.post.id, 7);
    }

    #[tokio::test]
    async fn post_detail_hides_post_in_unpublished_category() {
        let posts = FakePostRepo::default();
        *posts.post_with_category.lock().expect("mutex poisoned") =
            Some(with_category(sample_post(7, 10), false));

        let svc = service(posts, FakeCategoryRepo::default(), FakeCommentRepo::default());

        let err = svc
            .post_detail(7, None)
            .await
            .expect_err("must be not found");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn post_detail_is_not_found_for_missing_post() {
        let svc = service(
            FakePostRepo::default(),
            FakeCategoryRepo::default(),
            FakeCommentRepo::default(),
        );

        let err = svc
            .post_detail(7, Some(11))
            .await
            .expect_err("must be not found");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn create_post_defaults_pub_date_to_now_and_checks_category() {
        let posts = FakePostRepo::default();
        let categories = FakeCategoryRepo::default();
        *categories.category.lock().expect("mutex poisoned") = Some(sample_category(1));

        let svc = service(posts.clone(), categories, FakeCommentRepo::default());
        let before = Utc::now();
        let created = svc
            .create_post(
                10,
                CreatePostRequest {
                    title: "  title  ".to_string(),
                    text: "  text  ".to_string(),
                    category_id: 1,
                    location_id: None,
                    pub_date: None,
                    is_published: true,
                },
            )
            .await
            .expect("must succeed");

        assert_eq!(created.title, "title");
        let input = posts
            .created_input
            .lock()
            .expect("mutex poisoned")
            .clone()
            .expect("input must be captured");
        assert_eq!(input.author_id, 10);
        assert!(input.pub_date >= before);
    }

    #[tokio::test]
    async fn create_post_rejects_unknown_category() {
        let svc = service(
            FakePostRepo::default(),
            FakeCategoryRepo::default(),
            FakeCommentRepo::default(),
        );

        let err = svc
            .create_post(
                10,
                CreatePostRequest {
                    title: "title".to_string(),
                    text: "text".to_string(),
                    category_id: 99,
                    location_id: None,
                    pub_date: None,
                    is_published: true,
                },
            )
            .await
            .expect_err("must be not found");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_post_by_non_author_yields_redirect_and_no_mutation() {
        let posts = FakePostRepo::default();
        *posts.post_for_get.lock().expect("mutex poisoned") = Some(sample_post(7, 99));

        let svc = service(posts.clone(), FakeCategoryRepo::default(), FakeCommentRepo::default());
        let err = svc
            .update_post(10, 7, sample_update_request())
            .await
            .expect_err("must be rejected");

        assert!(matches!(err, DomainError::NotOwner { post_id: 7 }));
        assert!(posts.update_call.lock().expect("mutex poisoned").is_none());
    }

    #[tokio::test]
    async fn update_post_by_author_applies_patch() {
        let posts = FakePostRepo::default();
        *posts.post_for_get.lock().expect("mutex poisoned") = Some(sample_post(7, 10));
        *posts.update_result.lock().expect("mutex poisoned") = Some(sample_post(7, 10));
        let categories = FakeCategoryRepo::default();
        *categories.category.lock().expect("mutex poisoned") = Some(sample_category(1));

        let svc = service(posts.clone(), categories, FakeCommentRepo::default());
        let updated = svc
            .update_post(10, 7, sample_update_request())
            .await
            .expect("must succeed");

        assert_eq!(updated.id, 7);
        let (id, patch) = posts
            .update_call
            .lock()
            .expect("mutex poisoned")
            .clone()
            .expect("update must be called");
        assert_eq!(id, 7);
        assert_eq!(patch.title, "new title");
    }

    #[tokio::test]
    async fn delete_post_by_non_author_yields_redirect_and_no_deletion() {
        let posts = FakePostRepo::default();
        *posts.post_for_get.lock().expect("mutex poisoned") = Some(sample_post(7, 99));

        let svc = service(posts.clone(), FakeCategoryRepo::default(), FakeCommentRepo::default());
        let err = svc.delete_post(10, 7).await.expect_err("must be rejected");

        assert!(matches!(err, DomainError::NotOwner { post_id: 7 }));
        assert!(!*posts.delete_called.lock().expect("mutex poisoned"));
    }

    #[tokio::test]
    async fn delete_post_by_author_deletes() {
        let posts = FakePostRepo::default();
        *posts.post_for_get.lock().expect("mutex poisoned") = Some(sample_post(7, 10));

        let svc = service(posts.clone(), FakeCategoryRepo::default(), FakeCommentRepo::default());
        svc.delete_post(10, 7).await.expect("must succeed");

        assert!(*posts.delete_called.lock().expect("mutex poisoned"));
    }

    fn sample_update_request() -> UpdatePostRequest {
        UpdatePostRequest {
            title: "new title".to_string(),
            text: "new text".to_string(),
            category_id: 1,
            location_id: None,
            pub_date: Utc::now(),
            is_published: true,
        }
    }
}
