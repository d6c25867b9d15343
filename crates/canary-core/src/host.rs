// sftp-canary Host Extractor
//
// "sftp://host:22/path" 같은 절대 URI → host 부분만
// 그 외 (bare hostname, IP, "host:port" 등) → 원본 그대로
// 실패 경로 없음: 항상 best-effort 문자열 반환

use url::{Host, Url};

pub fn extract_host(raw: &str) -> String {
    let raw = raw.trim();
    match Url::parse(raw) {
        // IPv6는 Url이 "[::1]" 형태로 주므로 괄호 없이 꺼냄
        Ok(url) => match url.host() {
            Some(Host::Domain(d)) if !d.is_empty() => d.to_string(),
            Some(Host::Ipv4(ip))                   => ip.to_string(),
            Some(Host::Ipv6(ip))                   => ip.to_string(),
            _                                      => raw.to_string(),
        },
        Err(_) => raw.to_string(),
    }
}
