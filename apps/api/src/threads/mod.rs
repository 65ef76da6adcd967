// Stored tweet threads: persistence, history pagination, ownership checks, stats.

pub mod handlers;
pub mod store;
