// sftp-canary DNS Prober
//
// tokio::net::lookup_host로 A/AAAA 전체 조회 → IPv4/IPv6로 분리
// 실패해도 파이프라인은 계속 진행 (handler에서 출력만)

use std::collections::BTreeSet;
use std::fmt::Write;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::{Error, Result};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DnsRecords {
    pub v4: Vec<Ipv4Addr>,
    pub v6: Vec<Ipv6Addr>,
}

impl DnsRecords {
    /// 중복 제거 + 정렬 (lookup_host는 소켓 타입별로 같은 주소를 여러 번 줄 수 있음)
    pub fn from_addrs(addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        let mut v4 = BTreeSet::new();
        let mut v6 = BTreeSet::new();
        for addr in addrs {
            match addr {
                IpAddr::V4(ip) => { v4.insert(ip); }
                IpAddr::V6(ip) => { v6.insert(ip); }
            }
        }
        Self { v4: v4.into_iter().collect(), v6: v6.into_iter().collect() }
    }

    /// 출력용 텍스트
    ///
    /// - A 레코드 섹션은 항상 출력 (비어있으면 "no records")
    /// - IPv4만 있으면 AAAA 섹션은 생략
    pub fn render(&self, host: &str) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "A records for {}:", host);
        if self.v4.is_empty() {
            let _ = writeln!(out, "  (no records)");
        }
        for ip in &self.v4 {
            let _ = writeln!(out, "  {}", ip);
        }

        if !self.v6.is_empty() || self.v4.is_empty() {
            let _ = writeln!(out, "AAAA records for {}:", host);
            if self.v6.is_empty() {
                let _ = writeln!(out, "  (no records)");
            }
            for ip in &self.v6 {
                let _ = writeln!(out, "  {}", ip);
            }
        }
        out
    }
}

pub async fn resolve(host: &str) -> Result<DnsRecords> {
    tracing::debug!("[dns] resolving {}", host);

    // lookup_host는 포트가 필요 → 0으로 채우고 IP만 사용
    let addrs = tokio::net::lookup_host((host, 0))
        .await
        .map_err(|e| Error::Dns(format!("{}: {}", host, e)))?;

    let records = DnsRecords::from_addrs(addrs.map(|a| a.ip()));
    tracing::info!("[dns] {} → {} A, {} AAAA", host, records.v4.len(), records.v6.len());
    Ok(records)
}
