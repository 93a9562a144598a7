pub(crate) mod highlight;
pub(crate) mod table;
