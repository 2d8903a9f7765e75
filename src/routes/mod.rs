pub(crate) mod auth;
pub(crate) mod genres;
pub(crate) mod musicians;
pub(crate) mod router;
