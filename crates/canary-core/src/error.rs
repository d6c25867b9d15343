// sftp-canary Error Types
//
// 단계별 실패를 예외 대신 값으로 반환
// Display: 사용자에게 그대로 출력되는 메시지

use std::fmt;
use std::time::Duration;

use crate::state::ConnectionState;

#[derive(Debug)]
pub enum Error {
    Dns(String),
    Timeout(Duration),
    InvalidTransition {
        from: ConnectionState,
        to: ConnectionState,
    },
    Protocol(String),
    Auth(String),
    Sftp(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Dns(s)                         => write!(f, "DNS lookup failed: {}", s),
            Error::Timeout(d)                     => write!(f, "Timed out after {}s", d.as_secs()),
            Error::InvalidTransition { from, to } => write!(f, "Invalid state transition: {:?} → {:?}", from, to),
            Error::Protocol(s)                    => write!(f, "Protocol error: {}", s),
            Error::Auth(s)                        => write!(f, "Auth failed: {}", s),
            Error::Sftp(s)                        => write!(f, "SFTP error: {}", s),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
