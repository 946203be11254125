//! 애플리케이션 설정 구조체.
//!
//! 웹 서버 포트, 저장소 경로, 스트릭 재계산 정책 등 런타임 설정을 정의한다.
//! `ConfigManager`를 통해 JSON 파일에서 로드하고, CLI 인자로 덮어쓴다.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 웹 API 설정
    #[serde(default)]
    pub web: WebConfig,
    /// 로컬 저장소 설정
    #[serde(default)]
    pub storage: StorageConfig,
    /// 스트릭 설정
    #[serde(default)]
    pub streaks: StreakConfig,
}

impl AppConfig {
    /// 기본 설정
    pub fn default_config() -> Self {
        Self::default()
    }
}

// ============================================================
// 웹 설정
// ============================================================

fn default_web_enabled() -> bool {
    true
}

fn default_web_port() -> u16 {
    5000
}

/// 웹 API 서버 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebConfig {
    /// 웹 서버 활성화 여부
    #[serde(default = "default_web_enabled")]
    pub enabled: bool,
    /// 웹 서버 포트 (기본: 5000)
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 여부 (false: 127.0.0.1 only)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            enabled: default_web_enabled(),
            port: default_web_port(),
            allow_external: false,
        }
    }
}

// ============================================================
// 저장소 설정
// ============================================================

fn default_db_file_name() -> String {
    "habits.db".to_string()
}

/// 로컬 저장소 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite 파일 이름
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,
    /// 데이터 디렉토리 (None이면 플랫폼 기본 경로)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_file_name: default_db_file_name(),
            data_dir: None,
        }
    }
}

// ============================================================
// 스트릭 설정
// ============================================================

/// 스트릭 재계산 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakConfig {
    /// 시작 시 전체 스트릭 재계산 (일관성 복구)
    #[serde(default)]
    pub rebuild_on_startup: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default_config();
        assert!(config.web.enabled);
        assert_eq!(config.web.port, 5000);
        assert!(!config.web.allow_external);
        assert_eq!(config.storage.db_file_name, "habits.db");
        assert!(config.storage.data_dir.is_none());
        assert!(!config.streaks.rebuild_on_startup);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"web": {"port": 8080}}"#).unwrap();
        assert_eq!(config.web.port, 8080);
        assert!(config.web.enabled);
        assert_eq!(config.storage.db_file_name, "habits.db");
    }
}
