//! Time utilities

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Get current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Describe how long a build took, e.g. `850 ms`, `12.4 s` or `3 min 07 s`
pub fn describe_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    match secs {
        0 => format!("{} ms", elapsed.subsec_millis()),
        1..60 => format!("{:.1} s", elapsed.as_secs_f64()),
        _ => format!("{} min {:02} s", secs / 60, secs % 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_elapsed() {
        assert_eq!(describe_elapsed(Duration::from_millis(850)), "850 ms");
        assert_eq!(describe_elapsed(Duration::from_millis(12_440)), "12.4 s");
        assert_eq!(describe_elapsed(Duration::from_secs(187)), "3 min 07 s");
    }
}
