/// 設定管理モジュール
///
/// 実行環境の判定、保存ファイルパスの解決、ログシステムの初期化を提供します。
pub mod environment;
pub mod initialization;

pub use environment::{get_environment, get_storage_filename, Environment};
pub use initialization::{
    initialize_application, initialize_logging_system, load_environment_variables,
    InitializationResult,
};
