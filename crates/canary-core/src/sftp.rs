// sftp-canary SFTP (russh-sftp 기반)
//
// FileEntry : 리모트 디렉토리 엔트리 (이름/크기/수정시각)
// SftpClient: ls, disconnect

use russh::client;
use russh_sftp::client::SftpSession;

use crate::error::{Error, Result};
use crate::session::ClientHandler;
use crate::utils::mtime_str;

/// 점검 대상 디렉토리 (항상 루트)
pub const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub mtime: Option<u64>,  // unix timestamp
}

impl FileEntry {
    /// ls -la 스타일 날짜 문자열
    pub fn mtime_str(&self) -> String {
        self.mtime.map(mtime_str).unwrap_or_else(|| "?".to_string())
    }

    /// 목록 출력 한 줄: 크기, 수정시각, 이름 (디렉토리는 '/' 붙임)
    pub fn line(&self) -> String {
        let suffix = if self.is_dir { "/" } else { "" };
        format!("{:>12}  {:<12}  {}{}", self.size, self.mtime_str(), self.name, suffix)
    }
}

/// "." / ".." 제외 후 디렉토리 먼저, 이름 오름차순
pub(crate) fn tidy(entries: impl IntoIterator<Item = FileEntry>) -> Vec<FileEntry> {
    let mut entries: Vec<FileEntry> = entries.into_iter()
        .filter(|e| e.name != "." && e.name != "..")
        .collect();
    entries.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then(a.name.cmp(&b.name)));
    entries
}

pub struct SftpClient {
    ssh: client::Handle<ClientHandler>,
    sftp: SftpSession,
}

impl SftpClient {
    pub(crate) fn new(ssh: client::Handle<ClientHandler>, sftp: SftpSession) -> Self {
        Self { ssh, sftp }
    }

    pub async fn ls(&mut self, path: &str) -> Result<Vec<FileEntry>> {
        let dir = self.sftp.read_dir(path)
            .await
            .map_err(|e| Error::Sftp(e.to_string()))?;

        let entries = dir.into_iter().map(|e| {
            let attrs  = e.metadata();
            let is_dir = attrs.permissions
                .map(|p| p & 0o170000 == 0o040000)
                .unwrap_or(false);
            FileEntry {
                name: e.file_name().to_string(),
                is_dir,
                size: attrs.size.unwrap_or(0),
                mtime: attrs.mtime.map(|t| t as u64),
            }
        });

        let entries = tidy(entries);
        tracing::debug!("[sftp] {} → {} entries", path, entries.len());
        Ok(entries)
    }

    /// SFTP 채널 종료 → SSH disconnect
    pub async fn disconnect(self) -> Result<()> {
        self.sftp.close()
            .await
            .map_err(|e| Error::Sftp(e.to_string()))?;
        self.ssh.disconnect(russh::Disconnect::ByApplication, "", "English")
            .await
            .map_err(|e| Error::Protocol(e.to_string()))?;
        tracing::info!("[sftp] disconnected");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_dir: bool) -> FileEntry {
        FileEntry { name: name.to_string(), is_dir, size: 0, mtime: None }
    }

    #[test]
    fn tidy_drops_pseudo_entries_and_sorts_dirs_first() {
        let out = tidy([
            entry("b.txt", false),
            entry(".", true),
            entry("upload", true),
            entry("..", true),
            entry("a.txt", false),
        ]);
        let names: Vec<&str> = out.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["upload", "a.txt", "b.txt"]);
    }

    #[test]
    fn line_marks_directories_and_unknown_mtime() {
        let mut e = entry("incoming", true);
        e.size = 4096;
        let line = e.line();
        assert!(line.trim_start().starts_with("4096"));
        assert!(line.ends_with("incoming/"));
        assert!(line.contains('?'));
    }
}
