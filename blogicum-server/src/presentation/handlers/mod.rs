pub(crate) mod auth;
pub(crate) mod categories;
pub(crate) mod comments;
pub(crate) mod posts;
pub(crate) mod profiles;
