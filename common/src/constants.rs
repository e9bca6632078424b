use chrono::Duration;
use once_cell::sync::Lazy;

pub static DURATION: Lazy<Duration> = Lazy::new(|| Duration::days(7));
