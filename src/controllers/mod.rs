pub(crate) mod genre;
pub(crate) mod musician;
pub(crate) mod user;
