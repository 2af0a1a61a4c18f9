pub(crate) mod dynamic;
pub(crate) mod ease;
