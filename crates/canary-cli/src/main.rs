// sftp-canary CLI
//
// Usage: sftp-canary --uri=<host or uri> [--port=22] [--user=..] [--pass=..] [--resolve-dns]
//
// exit code: 0 성공 / 1 인자 오류 / 2 TCP 실패 / 3 SFTP 로그인 실패

use std::env;
use std::process::ExitCode;

use tracing_subscriber::{EnvFilter, fmt};

mod args;
mod handler;

use args::Parsed;
use handler::Status;

#[tokio::main]
async fn main() -> ExitCode {
    // stdout은 점검 결과 전용 → 로그는 stderr, 기본 warn
    // RUST_LOG=debug sftp-canary --uri=...  (단계별 로그 + 상태 전이)
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn"))
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    match args::parse(env::args().skip(1)) {
        Parsed::Help { missing_uri } => {
            print_usage();
            info_status(missing_uri).into()
        }
        Parsed::Version { missing_uri } => {
            println!("sftp-canary {}", env!("CARGO_PKG_VERSION"));
            info_status(missing_uri).into()
        }
        Parsed::Usage { message, warnings } => {
            print_warnings(&warnings);
            println!("{}", message);
            println!();
            print_usage();
            Status::Usage.into()
        }
        Parsed::Run { config, warnings } => {
            print_warnings(&warnings);
            handler::run(&config).await.into()
        }
    }
}

/// --uri 누락은 다른 플래그와 무관하게 항상 1
fn info_status(missing_uri: bool) -> Status {
    if missing_uri { Status::Usage } else { Status::Success }
}

fn print_warnings(warnings: &[String]) {
    for w in warnings {
        println!("Warning: {}", w);
    }
}

fn print_usage() {
    println!("sftp-canary - SFTP endpoint connectivity check");
    println!();
    println!("Usage: sftp-canary --uri=<host or uri> [options]");
    println!();
    println!("Options:");
    println!("  --uri=<host|uri>   Target host or URI (required), e.g. sftp://files.example.com");
    println!("  --port=<1-65535>   TCP port (default 22)");
    println!("  --user=<name>      SFTP username");
    println!("  --pass=<password>  SFTP password (login is attempted only with both user and pass)");
    println!("  --resolve-dns      Print A/AAAA records before connecting");
    println!("  --timeout=<secs>   Connect timeout in seconds (default 10)");
    println!("  -h, --help, /?     Show this help");
    println!("  -V, --version      Show version");
    println!();
    println!("  --help and --version still exit 1 when --uri is missing.");
    println!();
    println!("Exit codes:");
    println!("  0  success");
    println!("  1  usage error (missing --uri); an invalid --port only warns and uses 22");
    println!("  2  TCP connectivity failure");
    println!("  3  SFTP login or listing failure");
}
