pub(crate) mod common;
mod insights;
