pub(crate) mod decode;
pub(crate) mod formats;
pub(crate) mod media;
pub(crate) mod source;
