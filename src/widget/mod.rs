pub(crate) mod config;
pub(crate) mod layout;
pub(crate) mod map_widget;
pub(crate) mod raster;
pub(crate) mod scene;
pub(crate) mod svg;
