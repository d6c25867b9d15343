// sftp-canary Probe Config
//
// 프로세스 인자로부터 한 번 생성 → 이후 불변
// 전역 상태 없이 각 단계에 &ProbeConfig로 전달

use std::time::Duration;

use crate::host::extract_host;

pub const DEFAULT_PORT: u16         = 22;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// --uri 로 받은 원본 문자열
    pub uri: String,
    /// uri에서 추출한 호스트
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub resolve_dns: bool,
    pub timeout: Duration,
}

impl ProbeConfig {
    pub fn new(uri: impl Into<String>) -> Self {
        let uri  = uri.into();
        let host = extract_host(&uri);
        Self {
            uri,
            host,
            port: DEFAULT_PORT,
            username: None,
            password: None,
            resolve_dns: false,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// IPv6 리터럴은 "[::1]:22" 형태
    pub fn addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// user/pass 둘 다 비어있지 않을 때만 Some
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }
}
