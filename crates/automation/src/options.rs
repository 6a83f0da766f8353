use std::time::Duration;

/// Registry-wide automation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutomationOptions {
	/// Interval used by [`Plan::poll_default`](crate::Plan::poll_default).
	pub default_poll_interval: Duration,
}

impl AutomationOptions {
	pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

	pub fn with_default_poll_interval(mut self, interval: Duration) -> Self {
		self.default_poll_interval = interval;
		self
	}
}

impl Default for AutomationOptions {
	fn default() -> Self {
		Self {
			default_poll_interval: Self::DEFAULT_POLL_INTERVAL,
		}
	}
}
