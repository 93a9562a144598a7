pub(crate) mod controller;
pub(crate) mod gate;
pub(crate) mod schedule;
pub(crate) mod step;
pub(crate) mod target;
