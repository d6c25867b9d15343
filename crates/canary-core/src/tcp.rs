// sftp-canary TCP Prober
//
// connect 시도를 명시적 deadline으로 감쌈 (tokio::time::timeout)
// deadline 도달 시 connect future는 drop → 소켓 정리, 남는 작업 없음
//
// 결과 3가지:
//   Connected  : deadline 이전 연결 성공 (스트림은 바로 닫음)
//   TimedOut   : deadline 초과
//   Failed     : 소켓 레벨 에러 (refused, unreachable, DNS 실패 등)

use std::fmt;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tokio::net::TcpStream;

#[derive(Debug)]
pub enum TcpOutcome {
    Connected { peer: Option<SocketAddr>, elapsed: Duration },
    TimedOut(Duration),
    Failed(io::Error),
}

impl TcpOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TcpOutcome::Connected { .. })
    }
}

impl fmt::Display for TcpOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TcpOutcome::Connected { peer: Some(p), elapsed } => write!(f, "connected to {} in {}ms", p, elapsed.as_millis()),
            TcpOutcome::Connected { peer: None, elapsed }    => write!(f, "connected in {}ms", elapsed.as_millis()),
            TcpOutcome::TimedOut(d)                          => write!(f, "timed out after {}s", d.as_secs()),
            TcpOutcome::Failed(e)                            => write!(f, "connection failed: {}", e),
        }
    }
}

pub async fn probe(host: &str, port: u16, deadline: Duration) -> TcpOutcome {
    tracing::debug!("[tcp] connecting to {}:{} (deadline {:?})", host, port, deadline);
    let outcome = probe_with(TcpStream::connect((host, port)), deadline).await;
    tracing::info!("[tcp] {}:{} {}", host, port, outcome);
    outcome
}

/// connect future 자체를 받는 버전 (테스트에서 가짜 connect 주입)
pub async fn probe_with<F>(connect: F, deadline: Duration) -> TcpOutcome
where
    F: Future<Output = io::Result<TcpStream>>,
{
    let start = Instant::now();
    match tokio::time::timeout(deadline, connect).await {
        Ok(Ok(stream)) => {
            let peer = stream.peer_addr().ok();
            drop(stream);
            TcpOutcome::Connected { peer, elapsed: start.elapsed() }
        }
        Ok(Err(e)) => TcpOutcome::Failed(e),
        Err(_)     => TcpOutcome::TimedOut(deadline),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn connects_to_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port     = listener.local_addr().unwrap().port();

        let outcome = probe("127.0.0.1", port, Duration::from_secs(5)).await;
        assert!(outcome.is_success(), "{}", outcome);
        match outcome {
            TcpOutcome::Connected { peer, .. } => assert_eq!(peer.map(|p| p.port()), Some(port)),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn closed_port_fails_fast() {
        // bind 후 바로 drop → 해당 포트는 닫힌 상태
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };

        let start   = Instant::now();
        let outcome = probe("127.0.0.1", port, Duration::from_secs(10)).await;
        assert!(matches!(outcome, TcpOutcome::Failed(_)), "{}", outcome);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn pending_connect_hits_deadline() {
        let outcome = probe_with(std::future::pending(), Duration::from_secs(10)).await;
        assert!(matches!(outcome, TcpOutcome::TimedOut(d) if d == Duration::from_secs(10)));
        assert!(!outcome.is_success());
        assert_eq!(outcome.to_string(), "timed out after 10s");
    }

    #[tokio::test]
    async fn connect_error_is_reported_as_failure() {
        let refused = async {
            Err::<TcpStream, _>(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"))
        };
        let outcome = probe_with(refused, Duration::from_secs(10)).await;
        assert!(matches!(outcome, TcpOutcome::Failed(ref e) if e.kind() == io::ErrorKind::ConnectionRefused));
        assert_eq!(outcome.to_string(), "connection failed: refused");
    }
}
