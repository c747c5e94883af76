pub(crate) mod composite;
pub(crate) mod compositor;
pub(crate) mod frame;
pub(crate) mod transform;
