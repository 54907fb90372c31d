//! Security helpers: the site's Content-Security-Policy and the client-side
//! rate limiter applied to backend requests.

pub mod csp;
pub mod rate_limit;

pub use csp::ContentSecurityPolicy;
pub use rate_limit::RateLimiter;
