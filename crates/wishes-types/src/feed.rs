//! Client-side view of the wall.
//!
//! A page learns about a new wish twice: once from its own successful POST and
//! once from the realtime push. [`WishFeed`] merges both paths by id so each
//! wish is rendered once.

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::models::{RECENT_WISHES_LIMIT, Wish};

const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2_520;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

/// Newest-first list of wishes, unique by id and capped in length.
#[derive(Debug, Clone)]
pub struct WishFeed {
    wishes: Vec<Wish>,
    capacity: usize,
}

impl Default for WishFeed {
    fn default() -> Self {
        Self::with_capacity(RECENT_WISHES_LIMIT as usize)
    }
}

impl WishFeed {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            wishes: Vec::new(),
            capacity,
        }
    }

    /// Replace the contents with a freshly fetched list.
    pub fn replace_all(&mut self, wishes: Vec<Wish>) {
        self.wishes.clear();
        for wish in wishes {
            self.merge(wish);
        }
    }

    /// Merge one wish into the feed. Returns `false` when nothing changed:
    /// the id is already present, or the feed is full and the wish is older
    /// than everything in it.
    pub fn merge(&mut self, wish: Wish) -> bool {
        if self.capacity == 0 || self.contains(&wish) {
            return false;
        }

        // Ties go in front, same as the store's newest-insert-first order.
        let pos = self
            .wishes
            .iter()
            .position(|w| w.created_at <= wish.created_at)
            .unwrap_or(self.wishes.len());

        if pos >= self.capacity {
            return false;
        }

        self.wishes.insert(pos, wish);
        self.wishes.truncate(self.capacity);
        true
    }

    pub fn contains(&self, wish: &Wish) -> bool {
        self.wishes.iter().any(|w| w.id == wish.id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Wish> {
        self.wishes.iter()
    }

    pub fn len(&self) -> usize {
        self.wishes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wishes.is_empty()
    }
}

/// Human label for how long ago `created_at` was, e.g. "5 minutes ago".
///
/// Buckets follow date-fns `formatDistanceToNow` with `addSuffix`. Timestamps
/// in the future are treated as "now".
pub fn relative_time(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(0);
    let minutes = (seconds as f64 / 60.0).round() as i64;

    let distance = if minutes < 1 {
        "less than a minute".to_string()
    } else if minutes < 45 {
        plural(minutes, "minute")
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if minutes < MINUTES_IN_DAY {
        let hours = (minutes as f64 / 60.0).round() as i64;
        format!("about {}", plural(hours, "hour"))
    } else if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        "1 day".to_string()
    } else if minutes < MINUTES_IN_MONTH {
        let days = (minutes as f64 / MINUTES_IN_DAY as f64).round() as i64;
        plural(days, "day")
    } else if minutes < MINUTES_IN_TWO_MONTHS {
        let months = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
        format!("about {}", plural(months, "month"))
    } else {
        let months = calendar_months_between(created_at, now);
        if months < 12 {
            let nearest = (minutes as f64 / MINUTES_IN_MONTH as f64).round() as i64;
            plural(nearest, "month")
        } else {
            let years = months / 12;
            match months % 12 {
                0..=2 => format!("about {}", plural(years, "year")),
                3..=8 => format!("over {}", plural(years, "year")),
                _ => format!("almost {}", plural(years + 1, "year")),
            }
        }
    };

    format!("{} ago", distance)
}

/// Whole calendar months from `earlier` to `later`. A month only counts once
/// the day and time of day have caught up, e.g. Jan 15 09:00 to Feb 15 08:00
/// is 0 months.
fn calendar_months_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month())
        - i64::from(earlier.month());

    let rest = |t: DateTime<Utc>| (t.day(), t.num_seconds_from_midnight(), t.nanosecond());
    if months > 0 && rest(later) < rest(earlier) {
        months -= 1;
    }
    months
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
