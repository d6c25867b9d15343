// sftp-canary CLI Arguments
//
// 순수 파싱만 담당 (IO 없음, 테스트 용이)
// 경고 메시지는 모아서 반환 → main에서 출력

use std::time::Duration;

use canary_core::config::{ProbeConfig, DEFAULT_PORT, DEFAULT_TIMEOUT};

#[derive(Debug)]
pub enum Parsed {
    Run { config: ProbeConfig, warnings: Vec<String> },
    /// --uri 없이 요청된 경우에도 출력은 하되 종료 코드는 1
    Help { missing_uri: bool },
    Version { missing_uri: bool },
    Usage { message: String, warnings: Vec<String> },
}

/// 프로그램 이름을 제외한 인자 목록 파싱
pub fn parse<I, S>(args: I) -> Parsed
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut uri         = None;
    let mut port        = DEFAULT_PORT;
    let mut username    = None;
    let mut password    = None;
    let mut resolve_dns = false;
    let mut timeout     = DEFAULT_TIMEOUT;
    let mut warnings    = Vec::new();
    let mut help        = false;
    let mut version     = false;

    for arg in args {
        let arg = arg.as_ref();

        // --flag=value 형식
        if let Some((flag, value)) = arg.split_once('=') {
            match flag {
                "--uri"     => uri      = Some(value.trim().to_string()).filter(|v| !v.is_empty()),
                "--port"    => port     = parse_port(value, &mut warnings),
                "--user"    => username = Some(value.to_string()),
                "--pass"    => password = Some(value.to_string()),
                "--timeout" => timeout  = parse_timeout(value, &mut warnings),
                other       => warnings.push(format!("Ignoring unknown option: {}", other)),
            }
            continue;
        }

        match arg {
            "--help" | "-h" | "/?" => help    = true,
            "--version" | "-V"     => version = true,
            "--resolve-dns"        => resolve_dns = true,
            other                  => warnings.push(format!("Ignoring unknown option: {}", other)),
        }
    }

    if help {
        return Parsed::Help { missing_uri: uri.is_none() };
    }
    if version {
        return Parsed::Version { missing_uri: uri.is_none() };
    }

    let Some(uri) = uri else {
        return Parsed::Usage { message: "Missing required option --uri=<host or uri>".to_string(), warnings };
    };

    let mut config = ProbeConfig::new(uri);
    config.port        = port;
    config.username    = username;
    config.password    = password;
    config.resolve_dns = resolve_dns;
    config.timeout     = timeout;

    Parsed::Run { config, warnings }
}

/// 1~65535 밖이거나 숫자가 아니면 경고 후 기본값
fn parse_port(value: &str, warnings: &mut Vec<String>) -> u16 {
    match value.trim().parse::<u16>() {
        Ok(p) if p > 0 => p,
        _ => {
            warnings.push(format!(
                "Invalid port '{}' (must be 1-65535), using default {}", value, DEFAULT_PORT
            ));
            DEFAULT_PORT
        }
    }
}

fn parse_timeout(value: &str, warnings: &mut Vec<String>) -> Duration {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            warnings.push(format!(
                "Invalid timeout '{}', using default {}s", value, DEFAULT_TIMEOUT.as_secs()
            ));
            DEFAULT_TIMEOUT
        }
    }
}
