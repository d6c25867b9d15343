// sftp-canary Utils
//
// 출력용 포맷 함수 모음
// - mtime_str : unix timestamp → ls -la 스타일 날짜 문자열
// - fmt_size  : 바이트 → 사람이 읽기 좋은 단위 (1.2MB 등)

use chrono::{DateTime, Datelike, Local, LocalResult, TimeZone, Timelike, Utc};

/// unix timestamp → ls -la 스타일 날짜 문자열
///
/// - 현재 기준 6개월 이내: "Jun 22 15:30"
/// - 그 이상:             "Jun 22  2025"
pub fn mtime_str(ts: u64) -> String {
    let dt: DateTime<Local> = match Utc.timestamp_opt(ts as i64, 0) {
        LocalResult::Single(utc) => utc.with_timezone(&Local),
        _ => return "?".to_string(),
    };

    let now = Local::now();
    let six_months_ago = now - chrono::Duration::days(180);

    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun",
        "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    let mon = MONTHS[(dt.month() - 1) as usize];
    let day = dt.day();

    if dt > six_months_ago {
        format!("{} {:2} {:02}:{:02}", mon, day, dt.hour(), dt.minute())
    } else {
        format!("{} {:2}  {}", mon, day, dt.year())
    }
}

/// 바이트 → 사람이 읽기 좋은 단위 문자열
pub fn fmt_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB      { format!("{:.1}GB", bytes as f64 / GB as f64) }
    else if bytes >= MB { format!("{:.1}MB", bytes as f64 / MB as f64) }
    else if bytes >= KB { format!("{:.1}KB", bytes as f64 / KB as f64) }
    else                { format!("{}B",     bytes) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn old_timestamp_shows_year() {
        // 2001-06-15 12:00:00 UTC → 어느 타임존이든 같은 날짜
        assert_eq!(mtime_str(992_606_400), "Jun 15  2001");
    }

    #[test]
    fn recent_timestamp_shows_time() {
        let now = Local::now().timestamp() as u64;
        let s   = mtime_str(now);
        assert!(s.contains(':'), "{}", s);
    }

    #[test]
    fn sizes() {
        assert_eq!(fmt_size(512), "512B");
        assert_eq!(fmt_size(1536), "1.5KB");
        assert_eq!(fmt_size(5 * 1024 * 1024), "5.0MB");
        assert_eq!(fmt_size(3 * 1024 * 1024 * 1024), "3.0GB");
    }
}
