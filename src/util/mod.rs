//! Small shared utilities

mod ratelimit;

pub use ratelimit::RateLimiter;
