// sftp-canary Connection State + Observer
//
// SFTP 점검 한 번의 세션 라이프사이클
// can_transition_to()로 허용된 전이만 가능
//
// 상태 흐름:
//   Idle → Connecting → Authenticating → Authenticated
//     → ChannelOpening → SftpReady → Listing → Disconnecting → Disconnected
//
//   어느 상태에서든 → Disconnecting, Error 전이 가능

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Authenticating,
    Authenticated,
    ChannelOpening,
    SftpReady,
    Listing,
    Disconnecting,
    Disconnected,
    Error {
        state: Box<ConnectionState>,  // 에러 발생 시점의 상태
        message: String,
    },
}

impl ConnectionState {
    pub fn can_transition_to(&self, next: &ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Idle, Connecting)
            | (Connecting, Authenticating)
            | (Authenticating, Authenticated)
            | (Authenticated, ChannelOpening)
            | (ChannelOpening, SftpReady)
            | (SftpReady, Listing)
            | (_, Disconnecting)
            | (Disconnecting, Disconnected)
            | (_, Error { .. })
        )
    }
}

/// 상태 변경 알림 trait
///
/// 기본 구현은 tracing 로그, 테스트에서는 전이 기록용
pub trait ConnectionObserver: Send + Sync {
    fn on_state_changed(&self, prev: &ConnectionState, next: &ConnectionState);
}

/// RUST_LOG=debug 에서 전이 로그 출력
pub struct TracingObserver;

impl ConnectionObserver for TracingObserver {
    fn on_state_changed(&self, _prev: &ConnectionState, next: &ConnectionState) {
        match next {
            ConnectionState::Error { state, message } => {
                tracing::warn!("[state] {:?} → Error: {}", state, message)
            }
            _ => tracing::debug!("[state] → {:?}", next),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConnectionState::*;

    #[test]
    fn happy_path_is_allowed() {
        let path = [
            Idle, Connecting, Authenticating, Authenticated,
            ChannelOpening, SftpReady, Listing, Disconnecting, Disconnected,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(&pair[1]), "{:?} → {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn skipping_auth_is_rejected() {
        assert!(!Connecting.can_transition_to(&SftpReady));
        assert!(!Idle.can_transition_to(&Listing));
        assert!(!Disconnected.can_transition_to(&Connecting));
    }

    #[test]
    fn error_reachable_from_anywhere() {
        let err = Error { state: Box::new(Authenticating), message: "denied".into() };
        assert!(Authenticating.can_transition_to(&err));
        assert!(Idle.can_transition_to(&err));
    }
}
