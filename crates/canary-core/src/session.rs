// sftp-canary SFTP Session (russh 기반)
//
// russh로 SSH 연결/패스워드 인증 → russh-sftp로 SFTP 세션 수립
// probe(): 접속 → 목록 조회 → 접속 해제를 한 번에 수행
// 어느 단계에서 실패하든 Err 반환, 프로세스는 계속 진행

use std::sync::Arc;

use russh::client;
use russh_sftp::client::SftpSession as RusshSftpSession;

use crate::config::ProbeConfig;
use crate::error::{Error, Result};
use crate::sftp::{FileEntry, SftpClient, ROOT_PATH};
use crate::state::{ConnectionObserver, ConnectionState};

// russh 클라이언트 핸들러 (서버 이벤트 처리)
pub(crate) struct ClientHandler;

#[async_trait::async_trait]
impl client::Handler for ClientHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::key::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        // canary는 도달성/로그인만 확인 → 호스트키 검증 생략
        tracing::debug!("[session] host key accepted without verification");
        Ok(true)
    }
}

pub struct SftpSession {
    state: ConnectionState,
    observer: Box<dyn ConnectionObserver>,
}

impl SftpSession {
    pub fn new(observer: Box<dyn ConnectionObserver>) -> Self {
        Self { state: ConnectionState::Idle, observer }
    }

    pub fn state(&self) -> &ConnectionState { &self.state }

    fn transition(&mut self, next: ConnectionState) -> Result<()> {
        if !self.state.can_transition_to(&next) {
            return Err(Error::InvalidTransition { from: self.state.clone(), to: next });
        }
        let prev = std::mem::replace(&mut self.state, next);
        self.observer.on_state_changed(&prev, &self.state);
        Ok(())
    }

    fn transition_to_error(&mut self, message: String) {
        let current = self.state.clone();
        let prev = std::mem::replace(
            &mut self.state,
            ConnectionState::Error { state: Box::new(current), message }
        );
        self.observer.on_state_changed(&prev, &self.state);
    }

    /// 에러 상태로 전이하면서 같은 에러를 그대로 돌려줌
    fn fail(&mut self, e: Error) -> Error {
        self.transition_to_error(e.to_string());
        e
    }

    /// 접속 → 목록 → 해제 (전체를 config.timeout 으로 제한)
    ///
    /// 타임아웃 시 진행 중이던 future가 drop 되면서 SSH 핸들도 같이 정리됨
    pub async fn probe(&mut self, config: &ProbeConfig) -> Result<Vec<FileEntry>> {
        let deadline = config.timeout;
        let outcome  = tokio::time::timeout(deadline, self.probe_inner(config)).await;
        match outcome {
            Ok(result) => result,
            Err(_)     => Err(self.fail(Error::Timeout(deadline))),
        }
    }

    async fn probe_inner(&mut self, config: &ProbeConfig) -> Result<Vec<FileEntry>> {
        let mut client = self.connect(config).await?;

        self.transition(ConnectionState::Listing)?;
        let listed = client.ls(ROOT_PATH).await;

        // 목록 실패여도 접속 해제는 시도
        self.transition(ConnectionState::Disconnecting)?;
        let closed = client.disconnect().await;

        let entries = match listed {
            Ok(entries) => entries,
            Err(e)      => return Err(self.fail(e)),
        };
        match closed {
            Ok(()) => {
                self.transition(ConnectionState::Disconnected)?;
                Ok(entries)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn connect(&mut self, config: &ProbeConfig) -> Result<SftpClient> {
        let (username, password) = config.credentials()
            .ok_or_else(|| Error::Auth("username and password are required".to_string()))?;

        // ---- SSH 연결 ----
        self.transition(ConnectionState::Connecting)?;

        let russh_config = Arc::new(client::Config::default());
        tracing::info!("[session] connecting to {}", config.addr());

        let mut ssh = match client::connect(russh_config, (config.host.as_str(), config.port), ClientHandler).await {
            Ok(ssh) => ssh,
            Err(e)  => return Err(self.fail(Error::Protocol(e.to_string()))),
        };

        // ---- 인증 ----
        self.transition(ConnectionState::Authenticating)?;

        let authed = match ssh.authenticate_password(username, password).await {
            Ok(ok) => ok,
            Err(e) => return Err(self.fail(Error::Auth(e.to_string()))),
        };
        if !authed {
            return Err(self.fail(Error::Auth("Authentication failed".to_string())));
        }
        self.transition(ConnectionState::Authenticated)?;

        // ---- 채널 + SFTP ----
        self.transition(ConnectionState::ChannelOpening)?;

        let channel = match ssh.channel_open_session().await {
            Ok(ch) => ch,
            Err(e) => return Err(self.fail(Error::Protocol(e.to_string()))),
        };
        if let Err(e) = channel.request_subsystem(true, "sftp").await {
            return Err(self.fail(Error::Protocol(e.to_string())));
        }
        let sftp = match RusshSftpSession::new(channel.into_stream()).await {
            Ok(s)  => s,
            Err(e) => return Err(self.fail(Error::Sftp(e.to_string()))),
        };

        self.transition(ConnectionState::SftpReady)?;

        tracing::info!("[session] SFTP ready");
        Ok(SftpClient::new(ssh, sftp))
    }
}
