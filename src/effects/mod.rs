pub(crate) mod chain;
pub(crate) mod color;
pub(crate) mod spatial;
pub(crate) mod stack;
