use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_ERROR_DISPLAY: Duration = Duration::from_millis(5000);
pub const DEFAULT_SUCCESS_DISPLAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A message shown to the user until it expires or is replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub expires_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug)]
struct Channel {
    kind: NoticeKind,
    display_for: Duration,
    current: Option<Notice>,
}

impl Channel {
    fn new(kind: NoticeKind, display_for: Duration) -> Self {
        Self {
            kind,
            display_for,
            current: None,
        }
    }

    // Replacing the notice also replaces its deadline.
    fn show(&mut self, message: String) {
        self.current = Some(Notice {
            kind: self.kind,
            message,
            expires_at: Instant::now() + self.display_for,
        });
    }

    fn visible(&self) -> Option<&Notice> {
        let now = Instant::now();
        self.current.as_ref().filter(|notice| !notice.is_expired(now))
    }
}

/// Two single-slot channels of auto-expiring messages, one for errors and one
/// for successes. There is no queue: a new message preempts the old one.
#[derive(Debug)]
pub struct NotificationCenter {
    error: Channel,
    success: Channel,
}

impl NotificationCenter {
    pub fn new(error_display: Duration, success_display: Duration) -> Self {
        Self {
            error: Channel::new(NoticeKind::Error, error_display),
            success: Channel::new(NoticeKind::Success, success_display),
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(kind = "error", %message, "Showing notification");
        self.error.show(message);
    }

    pub fn show_success(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::info!(kind = "success", %message, "Showing notification");
        self.success.show(message);
    }

    /// The error message currently on screen, if any
    pub fn error(&self) -> Option<&Notice> {
        self.error.visible()
    }

    /// The success message currently on screen, if any
    pub fn success(&self) -> Option<&Notice> {
        self.success.visible()
    }

    pub fn dismiss(&mut self, kind: NoticeKind) {
        self.channel_mut(kind).current = None;
    }

    /// Drops expired notices
    pub fn prune(&mut self) {
        let now = Instant::now();
        for channel in [&mut self.error, &mut self.success] {
            if channel
                .current
                .as_ref()
                .map(|notice| notice.is_expired(now))
                .unwrap_or(false)
            {
                channel.current = None;
            }
        }
    }

    /// When the next notice will auto-hide, for callers driving a timer
    pub fn next_expiry(&self) -> Option<Instant> {
        [&self.error, &self.success]
            .into_iter()
            .filter_map(|channel| channel.current.as_ref().map(|notice| notice.expires_at))
            .min()
    }

    fn channel_mut(&mut self, kind: NoticeKind) -> &mut Channel {
        match kind {
            NoticeKind::Error => &mut self.error,
            NoticeKind::Success => &mut self.success,
        }
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_DISPLAY, DEFAULT_SUCCESS_DISPLAY)
    }
}
