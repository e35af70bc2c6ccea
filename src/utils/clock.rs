use chrono::{DateTime, Utc};

/// Wall clock with a fixed test mode so pipeline timestamps are assertable.
#[derive(Clone, Debug, Default)]
pub struct Clock {
	fixed_now: Option<DateTime<Utc>>,
}

impl Clock {
	pub fn fixed(now: DateTime<Utc>) -> Self {
		Self { fixed_now: Some(now) }
	}

	pub fn now(&self) -> DateTime<Utc> {
		self.fixed_now.unwrap_or_else(Utc::now)
	}
}
