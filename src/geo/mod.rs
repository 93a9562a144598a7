pub(crate) mod arc;
pub(crate) mod atlas;
pub(crate) mod projection;
