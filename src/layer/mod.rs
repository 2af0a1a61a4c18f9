pub(crate) mod audio_source;
pub(crate) mod base;
pub(crate) mod content;
pub(crate) mod options;
pub(crate) mod visual;
