use std::sync::Arc;

use crate::rate_limit::RateLimiter;
use crate::service::GuestbookService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub guestbook: GuestbookService,
    pub limiter: Arc<RateLimiter>,
}
