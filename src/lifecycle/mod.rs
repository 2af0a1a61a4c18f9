pub(crate) mod attach;
