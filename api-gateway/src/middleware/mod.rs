// Cross-cutting request decorators, composed explicitly on the routers:
// request-id tagging, token-bucket rate limiting, and idempotent replay.

pub mod idempotency;
pub mod rate_limit;
pub mod request_id;
