use super::environment::{get_environment, get_storage_filename, Environment};
use crate::features::subscriptions::JsonRepository;
use crate::shared::errors::{AppError, AppResult};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// アプリケーション初期化の結果を表す構造体
#[derive(Debug)]
pub struct InitializationResult {
    /// 初回起動かどうか
    pub is_first_run: bool,
    /// データディレクトリのパス
    pub data_dir: PathBuf,
    /// 保存ファイルのパス
    pub storage_path: PathBuf,
    /// 実行環境
    pub environment: Environment,
}

/// ログシステムを初期化する
///
/// ログレベルは環境変数 LOG_LEVEL で指定できる
/// （error/warn/info/debug/trace、既定はinfo）。
/// 複数回呼び出しても2回目以降は何もしない。
pub fn initialize_logging_system() {
    LOGGING_INIT.call_once(|| {
        let log_level = match std::env::var("LOG_LEVEL")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "error" => log::LevelFilter::Error,
            "warn" => log::LevelFilter::Warn,
            "info" => log::LevelFilter::Info,
            "debug" => log::LevelFilter::Debug,
            "trace" => log::LevelFilter::Trace,
            _ => log::LevelFilter::Info,
        };

        // env_loggerを初期化
        env_logger::Builder::from_default_env()
            .filter_level(log_level)
            .format_timestamp_secs()
            .format_module_path(false)
            .format_target(false)
            .init();

        info!("ログシステムを初期化しました: level={log_level}");
    });
}

/// 環境変数を読み込む（.envファイルがある場合）
pub fn load_environment_variables() {
    if dotenv::dotenv().is_err() {
        // .envファイルがない場合は無視（本番環境では環境変数が直接設定される）
        warn!(".envファイルが見つかりません。環境変数が直接設定されていることを確認してください。");
    } else {
        info!(".envファイルを読み込みました");
    }
}

/// 保存ファイルのパスを解決する
///
/// # 引数
/// * `environment` - 実行環境
///
/// # 戻り値
/// 保存ファイルのパス、または失敗時はエラー
///
/// # 解決順序
/// 1. 環境変数 SUBSCRIPTION_DATA_PATH が設定されていればそのパス
/// 2. OSのデータディレクトリ配下の subscription-tracker/<環境別ファイル名>
fn resolve_storage_path(environment: &Environment) -> AppResult<PathBuf> {
    if let Ok(path) = std::env::var("SUBSCRIPTION_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::configuration("データディレクトリを特定できませんでした"))?;

    Ok(data_dir
        .join("subscription-tracker")
        .join(get_storage_filename(environment.clone())))
}

/// アプリケーションの初期化を実行する
///
/// # 戻り値
/// 初期化結果と構築済みのリポジトリ、または失敗時はエラー
///
/// # 処理内容
/// 1. 実行環境の判定
/// 2. 保存ファイルパスの解決
/// 3. 初回起動の判定（保存ファイルの存在で判定）
/// 4. リポジトリの構築（既存ファイルがあれば読み込み）
pub fn initialize_application() -> AppResult<(InitializationResult, JsonRepository)> {
    let environment = get_environment();
    let storage_path = resolve_storage_path(&environment)?;
    let is_first_run = !storage_path.exists();

    if is_first_run {
        info!(
            "初回起動です。保存ファイルを新規作成します: {}",
            storage_path.display()
        );
    }

    let repository = JsonRepository::open(&storage_path)?;
    let data_dir = storage_path.parent().map(Path::to_path_buf).unwrap_or_default();

    Ok((
        InitializationResult {
            is_first_run,
            data_dir,
            storage_path,
            environment,
        },
        repository,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::subscriptions::SubscriptionRepository;
    use crate::models::Subscription;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_initialize_application_with_env_override() {
        let temp_dir = TempDir::new().unwrap();
        let storage_path = temp_dir.path().join("data").join("subscriptions.json");
        std::env::set_var("SUBSCRIPTION_DATA_PATH", &storage_path);

        // 初回起動: ファイルが存在しないため is_first_run が立つ
        let (result, repository) = initialize_application().unwrap();
        assert!(result.is_first_run);
        assert_eq!(result.storage_path, storage_path);
        assert_eq!(result.data_dir, storage_path.parent().unwrap());

        let date = (Utc::now() + Duration::days(7)).fixed_offset();
        repository
            .add(Subscription::new("Netflix", 1980.0, "monthly", date, 12).unwrap())
            .unwrap();

        // 2回目の起動: 既存ファイルを読み込む
        let (result, repository) = initialize_application().unwrap();
        assert!(!result.is_first_run);
        assert_eq!(repository.find_all().unwrap().len(), 1);

        std::env::remove_var("SUBSCRIPTION_DATA_PATH");
    }

    #[test]
    fn test_initialization_result_creation() {
        let result = InitializationResult {
            is_first_run: true,
            data_dir: PathBuf::from("/tmp/test"),
            storage_path: PathBuf::from("/tmp/test/subscriptions.json"),
            environment: Environment::Production,
        };

        assert!(result.is_first_run);
        assert_eq!(result.environment, Environment::Production);
    }

    #[test]
    fn test_initialize_logging_system_is_idempotent() {
        // 2回呼び出してもパニックしないことを確認
        initialize_logging_system();
        initialize_logging_system();
    }
}
