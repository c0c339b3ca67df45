use std::time::{Duration, Instant};

/// Transient status-line message. Errors linger longer than notices.
#[derive(Debug, Clone, Default)]
pub struct MessageState {
    pub last_error: Option<String>,
    pub last_notice: Option<String>,
    pub expires_at: Option<Instant>,
}

impl MessageState {
    const ERROR_TIMEOUT_SECS: u64 = 5;
    const NOTICE_TIMEOUT_SECS: u64 = 2;

    pub fn set_error_at(&mut self, msg: String, now: Instant) {
        self.last_error = Some(msg);
        self.last_notice = None;
        self.expires_at = Some(now + Duration::from_secs(Self::ERROR_TIMEOUT_SECS));
    }

    pub fn set_notice_at(&mut self, msg: String, now: Instant) {
        self.last_notice = Some(msg);
        self.last_error = None;
        self.expires_at = Some(now + Duration::from_secs(Self::NOTICE_TIMEOUT_SECS));
    }

    pub fn clear_expired_at(&mut self, now: Instant) {
        if let Some(expires) = self.expires_at
            && expires <= now
        {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.last_error = None;
        self.last_notice = None;
        self.expires_at = None;
    }
}
