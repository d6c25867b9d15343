// sftp-canary Test Support
//
// 테스트용 인프로세스 SSH/SFTP 서버 (russh server + russh-sftp server)
// - 패스워드 인증: 지정한 user/pass 한 쌍만 허용
// - 루트 디렉토리: ".", "..", "inbox/", "data.csv" 고정 목록
//
// canary-cli 테스트에서도 쓰도록 feature "test-support" 로 공개

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use russh::server::{self, Auth, Msg, Session};
use russh::{Channel, ChannelId};
use russh_sftp::protocol::{File, FileAttributes, Handle, Name, Status, StatusCode, Version};
use tokio::net::TcpListener;

pub const FIXTURE_CSV_SIZE: u64  = 1234;
pub const FIXTURE_CSV_MTIME: u32 = 992_606_400;  // 2001-06-15 12:00:00 UTC

fn attrs(size: Option<u64>, permissions: u32, mtime: Option<u32>) -> FileAttributes {
    FileAttributes {
        size,
        uid: None,
        user: None,
        gid: None,
        group: None,
        permissions: Some(permissions),
        atime: None,
        mtime,
    }
}

fn fixture_entries() -> Vec<File> {
    let entry = |name: &str, attrs: FileAttributes| File {
        filename: name.to_string(),
        longname: String::new(),
        attrs,
    };
    vec![
        entry(".",        attrs(Some(4096), 0o040755, None)),
        entry("..",       attrs(Some(4096), 0o040755, None)),
        entry("data.csv", attrs(Some(FIXTURE_CSV_SIZE), 0o100644, Some(FIXTURE_CSV_MTIME))),
        entry("inbox",    attrs(None, 0o040700, None)),
    ]
}

// ── SFTP 서브시스템 ──────────────────────────────────────────────────────────

#[derive(Default)]
struct FixtureSftp {
    // 이미 목록을 돌려준 디렉토리 핸들 → 다음 readdir은 EOF
    served: HashSet<String>,
    next_handle: u32,
}

impl russh_sftp::server::Handler for FixtureSftp {
    type Error = StatusCode;

    fn unimplemented(&self) -> Self::Error {
        StatusCode::OpUnsupported
    }

    async fn init(
        &mut self,
        _version: u32,
        _extensions: HashMap<String, String>,
    ) -> Result<Version, Self::Error> {
        Ok(Version::new())
    }

    async fn opendir(&mut self, id: u32, path: String) -> Result<Handle, Self::Error> {
        if path != "/" {
            return Err(StatusCode::NoSuchFile);
        }
        self.next_handle += 1;
        Ok(Handle { id, handle: format!("dir-{}", self.next_handle) })
    }

    async fn readdir(&mut self, id: u32, handle: String) -> Result<Name, Self::Error> {
        if !self.served.insert(handle) {
            return Err(StatusCode::Eof);
        }
        Ok(Name { id, files: fixture_entries() })
    }

    async fn close(&mut self, id: u32, handle: String) -> Result<Status, Self::Error> {
        self.served.remove(&handle);
        Ok(Status {
            id,
            status_code: StatusCode::Ok,
            error_message: String::new(),
            language_tag: "en".to_string(),
        })
    }
}

// ── SSH 서버 핸들러 ─────────────────────────────────────────────────────────

struct FixtureSsh {
    username: String,
    password: String,
    channels: HashMap<ChannelId, Channel<Msg>>,
}

#[async_trait::async_trait]
impl server::Handler for FixtureSsh {
    type Error = russh::Error;

    async fn auth_password(&mut self, user: &str, password: &str) -> Result<Auth, Self::Error> {
        if user == self.username && password == self.password {
            Ok(Auth::Accept)
        } else {
            Ok(Auth::Reject { proceed_with_methods: None })
        }
    }

    async fn channel_open_session(
        &mut self,
        channel: Channel<Msg>,
        _session: &mut Session,
    ) -> Result<bool, Self::Error> {
        self.channels.insert(channel.id(), channel);
        Ok(true)
    }

    async fn subsystem_request(
        &mut self,
        channel_id: ChannelId,
        name: &str,
        session: &mut Session,
    ) -> Result<(), Self::Error> {
        match self.channels.remove(&channel_id) {
            Some(channel) if name == "sftp" => {
                let _ = session.channel_success(channel_id);
                russh_sftp::server::run(channel.into_stream(), FixtureSftp::default()).await;
            }
            _ => {
                let _ = session.channel_failure(channel_id);
            }
        }
        Ok(())
    }
}

/// 127.0.0.1 임의 포트에 서버 기동 → 포트 반환
///
/// 연결마다 독립 세션 (TCP 점검용 연결이 먼저 끊겨도 영향 없음)
pub async fn spawn_sftp_server(username: &str, password: &str) -> u16 {
    let mut config = server::Config::default();
    config.keys = vec![russh::keys::key::KeyPair::generate_ed25519().unwrap()];
    config.auth_rejection_time = Duration::ZERO;
    config.auth_rejection_time_initial = Some(Duration::ZERO);
    let config = Arc::new(config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port     = listener.local_addr().unwrap().port();
    let username = username.to_string();
    let password = password.to_string();

    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let handler = FixtureSsh {
                username: username.clone(),
                password: password.clone(),
                channels: HashMap::new(),
            };
            let config = config.clone();
            tokio::spawn(async move {
                if let Ok(running) = server::run_stream(config, socket, handler).await {
                    let _ = running.await;
                }
            });
        }
    });

    port
}
