pub(crate) mod job;
pub(crate) mod migrate;
pub(crate) mod sync;
