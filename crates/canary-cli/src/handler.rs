// sftp-canary CLI Handler
//
// core 단계 호출 + 결과 출력 + exit code 결정
//
//   [DNS?] → TCP → (실패 시 종료) → [user/pass 있으면 SFTP] → 종료

use std::process::ExitCode;

use canary_core::config::ProbeConfig;
use canary_core::session::SftpSession;
use canary_core::sftp::ROOT_PATH;
use canary_core::state::TracingObserver;
use canary_core::utils::fmt_size;
use canary_core::{dns, tcp};

/// 자동화용 종료 코드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success      = 0,
    Usage        = 1,
    TcpFailure   = 2,
    SftpFailure  = 3,
}

impl From<Status> for ExitCode {
    fn from(s: Status) -> Self {
        ExitCode::from(s as u8)
    }
}

pub async fn run(config: &ProbeConfig) -> Status {
    if config.uri == config.host {
        println!("Target: {} (port {})", config.host, config.port);
    } else {
        println!("Target: {} → {} (port {})", config.uri, config.host, config.port);
    }

    // ── DNS (실패해도 계속) ──────────────────────────────────
    if config.resolve_dns {
        match dns::resolve(&config.host).await {
            Ok(records) => print!("{}", records.render(&config.host)),
            Err(e)      => println!("Error: {}", e),
        }
    }

    // ── TCP ──────────────────────────────────────────────────
    let outcome = tcp::probe(&config.host, config.port, config.timeout).await;
    println!("TCP {}: {}", config.addr(), outcome);
    if !outcome.is_success() {
        return Status::TcpFailure;
    }

    // ── SFTP (자격 증명 있을 때만) ───────────────────────────
    let Some((username, _)) = config.credentials() else {
        tracing::debug!("[handler] no credentials, skipping SFTP login");
        return Status::Success;
    };

    println!("Logging in as {}...", username);
    let mut session = SftpSession::new(Box::new(TracingObserver));
    match session.probe(config).await {
        Ok(entries) => {
            println!("Listing {}:", ROOT_PATH);
            for e in &entries {
                println!("{}", e.line());
            }
            let total: u64 = entries.iter().map(|e| e.size).sum();
            println!("Total: {} entries ({})", entries.len(), fmt_size(total));
            println!("SFTP login succeeded.");
            Status::Success
        }
        Err(e) => {
            println!("SFTP login failed: {}", e);
            Status::SftpFailure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canary_core::test_support::spawn_sftp_server;
    use std::time::{Duration, Instant};
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    fn config_for(port: u16) -> ProbeConfig {
        let mut cfg = ProbeConfig::new("127.0.0.1");
        cfg.port    = port;
        cfg.timeout = Duration::from_secs(3);
        cfg
    }

    #[test]
    fn exit_codes() {
        assert_eq!(Status::Success as u8, 0);
        assert_eq!(Status::Usage as u8, 1);
        assert_eq!(Status::TcpFailure as u8, 2);
        assert_eq!(Status::SftpFailure as u8, 3);
    }

    #[tokio::test]
    async fn closed_port_stops_before_sftp() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut cfg = config_for(port);
        cfg.username = Some("alice".into());
        cfg.password = Some("secret".into());

        let start = Instant::now();
        assert_eq!(run(&cfg).await, Status::TcpFailure);
        assert!(start.elapsed() < cfg.timeout + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn reachable_port_without_credentials_succeeds() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let cfg      = config_for(listener.local_addr().unwrap().port());
        assert_eq!(run(&cfg).await, Status::Success);
    }

    #[tokio::test]
    async fn reachable_port_without_sftp_reports_login_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port     = listener.local_addr().unwrap().port();
        // 첫 연결은 TCP 점검, 두 번째는 SFTP 시도 → 둘 다 SSH 아닌 응답 후 종료
        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                let _ = sock.write_all(b"220 not an ssh server\r\n").await;
                let _ = sock.shutdown().await;
            }
        });

        let mut cfg = config_for(port);
        cfg.username = Some("alice".into());
        cfg.password = Some("secret".into());

        assert_eq!(run(&cfg).await, Status::SftpFailure);
    }

    #[tokio::test]
    async fn valid_login_succeeds() {
        let port    = spawn_sftp_server("alice", "secret").await;
        let mut cfg = config_for(port);
        cfg.username = Some("alice".into());
        cfg.password = Some("secret".into());

        assert_eq!(run(&cfg).await, Status::Success);
    }

    #[tokio::test]
    async fn wrong_password_reports_login_failure() {
        let port    = spawn_sftp_server("alice", "secret").await;
        let mut cfg = config_for(port);
        cfg.username = Some("alice".into());
        cfg.password = Some("guess".into());

        assert_eq!(run(&cfg).await, Status::SftpFailure);
    }

    #[tokio::test]
    async fn resolve_dns_keeps_pipeline_going() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut cfg  = config_for(listener.local_addr().unwrap().port());
        cfg.resolve_dns = true;
        assert_eq!(run(&cfg).await, Status::Success);
    }
}
