// sftp-canary Core Library (tokio + russh 기반)
//
// DNS → TCP → SFTP 순서의 연결성 점검 단계를 각각 독립 함수로 제공
// 단계 간 조합(순서, 출력, exit code)은 CLI handler 담당

pub mod config;
pub mod dns;
pub mod error;
pub mod host;
pub mod session;
pub mod sftp;
pub mod state;
pub mod tcp;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod utils;
