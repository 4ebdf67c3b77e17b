use chrono::TimeDelta;

/// Renders an elapsed duration for humans ("5 minutes ago").
pub trait RelativeTime: Send + Sync + 'static {
    fn relative_time(&self, elapsed: TimeDelta) -> String;
}

/// Coarse English relative time: the largest whole unit wins.
#[derive(Clone, Copy, Default)]
pub struct HumanTime;

impl RelativeTime for HumanTime {
    fn relative_time(&self, elapsed: TimeDelta) -> String {
        let secs = elapsed.num_seconds();

        // Negative means clock skew; treat as fresh.
        if secs < 60 {
            return "just now".to_string();
        }

        let (n, unit) = if secs < 3_600 {
            (secs / 60, "minute")
        } else if secs < 86_400 {
            (secs / 3_600, "hour")
        } else {
            (secs / 86_400, "day")
        };

        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    }
}
