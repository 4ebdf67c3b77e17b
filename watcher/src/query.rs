use chrono::{DateTime, TimeDelta, Utc};

use crate::state::WatchState;
use crate::time::RelativeTime;

/// How recent a collection's floor is.
#[derive(Debug, Clone, PartialEq)]
pub enum Freshness {
    /// No refresh has succeeded yet.
    Never,
    Updated {
        at: DateTime<Utc>,
        elapsed: TimeDelta,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSummary {
    pub name: String,
    /// Newest floor in display units (0 before the first refresh).
    pub floor: f64,
    pub freshness: Freshness,
}

/// Current floor and freshness of every tracked collection, in configured order.
pub async fn list_collections(state: &WatchState, now: DateTime<Utc>) -> Vec<CollectionSummary> {
    state
        .floors()
        .await
        .into_iter()
        .map(|entry| CollectionSummary {
            floor: entry.history.latest(),
            freshness: match entry.updated_at {
                Some(at) => Freshness::Updated {
                    at,
                    elapsed: now - at,
                },
                None => Freshness::Never,
            },
            name: entry.name,
        })
        .collect()
}

/// Chat-style message listing every collection's floor.
pub fn render_collection_list(summaries: &[CollectionSummary], time: &dyn RelativeTime) -> String {
    let mut message = String::from("**Tracked collections**\n");

    for s in summaries {
        let freshness = match &s.freshness {
            Freshness::Updated { elapsed, .. } => format!("updated {}", time.relative_time(*elapsed)),
            Freshness::Never => "not yet updated".to_string(),
        };
        message.push_str(&format!(
            "- {}: ({} $STARS {})\n",
            s.name,
            format_stars(s.floor),
            freshness
        ));
    }

    message
}

/// Thousands-separated amount with trailing zero decimals stripped: `1234.5` → `1,234.5`.
pub fn format_stars(value: f64) -> String {
    let fixed = format!("{:.6}", value.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac.trim_end_matches('0');
    let sign = if value < 0.0 && (whole != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };

    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}
