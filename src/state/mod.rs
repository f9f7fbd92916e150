pub mod poll_cache;
pub mod selection;
