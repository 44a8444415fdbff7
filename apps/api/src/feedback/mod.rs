// Feedback collector: insert-only for anonymous callers, token-gated reads.

pub mod handlers;
pub mod store;
