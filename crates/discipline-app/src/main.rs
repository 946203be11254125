//! # discipline-app
//!
//! Discipline 서버 바이너리 진입점.
//! 설정 로드, 저장소/서비스 조립, 웹 서버 라이프사이클.

mod lifecycle;

use anyhow::{Context, Result};
use clap::Parser;
use discipline_core::config::AppConfig;
use discipline_core::config_manager::ConfigManager;
use discipline_engine::streak;
use discipline_storage::sqlite::SqliteStorage;
use discipline_web::WebServer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;

/// 로그 필터를 적용할 crate 목록
const LOG_TARGETS: [&str; 6] = [
    "discipline",
    "discipline_core",
    "discipline_engine",
    "discipline_storage",
    "discipline_web",
    "tower_http",
];

/// 습관/규율 트래킹 서버
#[derive(Parser, Debug)]
#[command(name = "discipline")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 웹 서버 포트 (기본: 설정 파일, 5000)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 데이터 디렉토리 (SQLite 파일 위치)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,

    /// 외부 접근 허용 (0.0.0.0 바인드)
    #[arg(long)]
    allow_external: bool,

    /// 전체 스트릭 재계산 후 종료
    #[arg(long)]
    rebuild_streaks: bool,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

impl Args {
    /// CLI 인자로 설정 덮어쓰기
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(port) = self.port {
            config.web.port = port;
        }
        if self.allow_external {
            config.web.allow_external = true;
        }
        if let Some(ref dir) = self.data_dir {
            config.storage.data_dir = Some(dir.clone());
        }
    }
}

fn log_filter(level: &str) -> String {
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// 데이터베이스 경로 결정 (설정의 data_dir 또는 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/org.discipline.discipline/habits.db`
/// - Windows: `%APPDATA%\discipline\discipline\data\habits.db`
/// - Linux: `~/.local/share/discipline/habits.db`
fn resolve_db_path(config: &AppConfig) -> PathBuf {
    let dir = config.storage.data_dir.clone().unwrap_or_else(|| {
        ConfigManager::data_dir().unwrap_or_else(|e| {
            warn!("데이터 디렉토리 확인 실패, 현재 디렉토리 사용: {e}");
            PathBuf::from(".")
        })
    });
    dir.join(&config.storage.db_file_name)
}

fn load_config(path: Option<&PathBuf>) -> Result<ConfigManager> {
    let manager = match path {
        Some(path) => ConfigManager::with_path(path.clone())?,
        None => ConfigManager::new().or_else(|e| {
            warn!("설정 관리자 초기화 실패, 현재 디렉토리 사용: {e}");
            ConfigManager::with_path(PathBuf::from("config.json"))
        })?,
    };
    info!("설정 파일: {}", manager.config_path().display());
    Ok(manager)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(&args.log_level))),
        )
        .init();

    info!("Discipline 시작");

    // 1. 설정
    let config_manager = load_config(args.config.as_ref())?;
    let mut config = config_manager.get();
    args.apply_to(&mut config);

    // 2. 저장소 (파일 기반 SQLite)
    let db_path = resolve_db_path(&config);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("데이터 디렉토리 생성 실패: {}", parent.display()))?;
    }
    let storage = Arc::new(SqliteStorage::open(&db_path)?);
    info!("SQLite 저장소: {}", db_path.display());

    // 3. 스트릭 재계산 명령 (즉시 종료)
    if args.rebuild_streaks {
        let states = streak::rebuild_all(storage.as_ref()).await?;
        info!("스트릭 재계산 완료: {}개 습관", states.len());
        return Ok(());
    }

    if config.streaks.rebuild_on_startup {
        if let Err(e) = streak::rebuild_all(storage.as_ref()).await {
            warn!("시작 시 스트릭 재계산 실패: {e}");
        }
    }

    // 4. 웹 서버
    if !config.web.enabled {
        warn!("웹 서버 비활성화 상태 (web.enabled = false), 종료");
        return Ok(());
    }

    let lifecycle = LifecycleManager::new();
    let server = WebServer::new(storage, config.web.clone());
    info!("API 주소: {}/api", server.url());

    let mut server_task = tokio::spawn(server.run(lifecycle.subscribe()));

    tokio::select! {
        result = &mut server_task => {
            // 시그널 전에 서버가 끝났다면 바인드 실패
            result.context("웹 서버 태스크 비정상 종료")??;
            return Ok(());
        }
        _ = lifecycle.wait_for_signal() => {}
    }

    match server_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("웹 서버 오류: {e}"),
        Err(e) => error!("웹 서버 태스크 오류: {e}"),
    }

    info!("Discipline 종료");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("discipline").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let args = parse(&[]);
        let mut config = AppConfig::default_config();
        args.apply_to(&mut config);

        assert_eq!(config, AppConfig::default_config());
        assert_eq!(args.log_level, "info");
        assert!(!args.rebuild_streaks);
    }

    #[test]
    fn flags_override_config() {
        let args = parse(&[
            "--port",
            "8080",
            "--allow-external",
            "--data-dir",
            "/tmp/discipline",
        ]);
        let mut config = AppConfig::default_config();
        args.apply_to(&mut config);

        assert_eq!(config.web.port, 8080);
        assert!(config.web.allow_external);
        assert_eq!(
            resolve_db_path(&config),
            PathBuf::from("/tmp/discipline/habits.db")
        );
    }

    #[test]
    fn log_filter_covers_all_crates() {
        let filter = log_filter("debug");
        assert!(filter.contains("discipline_engine=debug"));
        assert!(filter.contains("tower_http=debug"));
        assert_eq!(filter.split(',').count(), LOG_TARGETS.len());
    }
}
