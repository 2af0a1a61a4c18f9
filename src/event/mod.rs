pub(crate) mod bus;
/// Built-in topic names and the payload they carry.
pub mod topics;
