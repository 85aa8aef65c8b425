use thiserror::Error;

/// アプリケーション全体で使用される統一エラー型
#[derive(Debug, Error)]
pub enum AppError {
    /// バリデーション関連のエラー（違反したルールごとのメッセージを保持する）
    #[error("バリデーションエラー: {}", .0.join("、"))]
    Validation(Vec<String>),

    /// リソースが見つからない場合のエラー
    #[error("リソースが見つかりません: {0}")]
    NotFound(String),

    /// 名前が重複している場合のエラー
    #[error("名前が重複しています: {0}")]
    Duplicate(String),

    /// 引数が不正な場合のエラー
    #[error("不正な引数です: {0}")]
    InvalidArgument(String),

    /// 支払いが完了済みのサブスクリプションへの支払い処理エラー
    #[error("サブスクリプションは終了しています")]
    SubscriptionEnded,

    /// 永続化（ミラーファイルへの書き込み）関連のエラー
    #[error("永続化エラー: {0}")]
    Persistence(String),

    /// 保存データが読み取り・解析できない場合のエラー
    #[error("保存データが破損しています: {0}")]
    CorruptState(String),

    /// 設定関連のエラー
    #[error("設定エラー: {0}")]
    Configuration(String),

    /// 並行処理関連のエラー
    #[error("並行処理エラー: {0}")]
    Concurrency(String),

    /// I/O関連のエラー
    #[error("I/Oエラー: {0}")]
    Io(#[from] std::io::Error),

    /// JSON解析エラー
    #[error("JSON解析エラー: {0}")]
    Json(#[from] serde_json::Error),
}

/// エラーの重要度を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorSeverity {
    /// 低重要度（ユーザー入力エラーなど）
    Low,
    /// 中重要度（I/Oの一時的エラーなど）
    Medium,
    /// 高重要度（永続化エラーなど）
    High,
    /// 最重要（保存データ破損など）
    Critical,
}

impl AppError {
    /// ユーザーに表示するためのフレンドリーなメッセージを取得
    ///
    /// # 戻り値
    /// ユーザーに表示可能なエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(messages) => messages.join("、"),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Duplicate(msg) => msg.clone(),
            AppError::InvalidArgument(msg) => msg.clone(),
            AppError::SubscriptionEnded => "サブスクリプションは終了しています".to_string(),
            AppError::Persistence(_) => "データの保存でエラーが発生しました".to_string(),
            AppError::CorruptState(_) => "保存データの読み込みでエラーが発生しました".to_string(),
            AppError::Configuration(_) => "設定エラーが発生しました".to_string(),
            AppError::Concurrency(_) => "並行処理でエラーが発生しました".to_string(),
            AppError::Io(_) => "ファイル操作でエラーが発生しました".to_string(),
            AppError::Json(_) => "データ形式の解析でエラーが発生しました".to_string(),
        }
    }

    /// エラーの詳細情報を取得
    ///
    /// # 戻り値
    /// エラーの詳細情報（ログ出力用）
    pub fn details(&self) -> String {
        format!("{self}")
    }

    /// エラーの重要度を取得
    ///
    /// # 戻り値
    /// エラーの重要度レベル
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::Validation(_) => ErrorSeverity::Low,
            AppError::NotFound(_) => ErrorSeverity::Low,
            AppError::Duplicate(_) => ErrorSeverity::Low,
            AppError::InvalidArgument(_) => ErrorSeverity::Low,
            AppError::SubscriptionEnded => ErrorSeverity::Low,
            AppError::Persistence(_) => ErrorSeverity::High,
            AppError::CorruptState(_) => ErrorSeverity::Critical,
            AppError::Configuration(_) => ErrorSeverity::High,
            AppError::Concurrency(_) => ErrorSeverity::High,
            AppError::Io(_) => ErrorSeverity::Medium,
            AppError::Json(_) => ErrorSeverity::Medium,
        }
    }

    /// バリデーションエラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `message` - バリデーションエラーメッセージ
    ///
    /// # 戻り値
    /// バリデーションエラー
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::Validation(vec![message.into()])
    }

    /// リソース未発見エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `name` - 見つからなかったサブスクリプション名
    ///
    /// # 戻り値
    /// リソース未発見エラー
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        AppError::NotFound(format!(
            "サブスクリプション「{}」が見つかりません",
            name.into()
        ))
    }

    /// 名前重複エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `name` - 重複したサブスクリプション名
    ///
    /// # 戻り値
    /// 名前重複エラー
    pub fn duplicate<S: Into<String>>(name: S) -> Self {
        AppError::Duplicate(format!(
            "サブスクリプション「{}」は既に存在します",
            name.into()
        ))
    }

    /// 不正引数エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `message` - 不正引数エラーメッセージ
    ///
    /// # 戻り値
    /// 不正引数エラー
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        AppError::InvalidArgument(message.into())
    }

    /// 永続化エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `message` - 永続化エラーメッセージ
    ///
    /// # 戻り値
    /// 永続化エラー
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        AppError::Persistence(message.into())
    }

    /// 保存データ破損エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `message` - 破損内容を示すメッセージ
    ///
    /// # 戻り値
    /// 保存データ破損エラー
    pub fn corrupt_state<S: Into<String>>(message: S) -> Self {
        AppError::CorruptState(message.into())
    }

    /// 設定エラーを作成するヘルパー関数
    ///
    /// # 引数
    /// * `message` - 設定エラーメッセージ
    ///
    /// # 戻り値
    /// 設定エラー
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}

/// AppErrorからStringへの変換（表示層での使用のため）
impl From<AppError> for String {
    fn from(error: AppError) -> Self {
        error.user_message()
    }
}

/// ロック汚染（ポイズニング）からAppErrorへの変換
impl<T> From<std::sync::PoisonError<T>> for AppError {
    fn from(error: std::sync::PoisonError<T>) -> Self {
        AppError::Concurrency(format!("ロックの取得に失敗しました: {error}"))
    }
}

/// Result型のエイリアス（アプリケーション全体で使用）
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        // 各エラータイプの重要度をテスト
        assert_eq!(
            AppError::validation("テスト").severity(),
            ErrorSeverity::Low
        );
        assert_eq!(AppError::not_found("Netflix").severity(), ErrorSeverity::Low);
        assert_eq!(AppError::duplicate("Netflix").severity(), ErrorSeverity::Low);
        assert_eq!(
            AppError::persistence("書き込み失敗").severity(),
            ErrorSeverity::High
        );
        assert_eq!(
            AppError::corrupt_state("解析失敗").severity(),
            ErrorSeverity::Critical
        );
        assert_eq!(
            AppError::configuration("設定不正").severity(),
            ErrorSeverity::High
        );
    }

    #[test]
    fn test_user_message() {
        // ユーザーメッセージのテスト
        let validation_error = AppError::validation("金額が不正です");
        assert_eq!(validation_error.user_message(), "金額が不正です");

        let not_found_error = AppError::not_found("Netflix");
        assert_eq!(
            not_found_error.user_message(),
            "サブスクリプション「Netflix」が見つかりません"
        );

        let persistence_error = AppError::persistence("ディスクフル");
        assert_eq!(
            persistence_error.user_message(),
            "データの保存でエラーが発生しました"
        );
    }

    #[test]
    fn test_validation_messages_joined() {
        // 複数のバリデーション違反がひとつのメッセージにまとまることをテスト
        let error = AppError::Validation(vec![
            "名前が空です".to_string(),
            "金額が不正です".to_string(),
        ]);
        assert_eq!(error.user_message(), "名前が空です、金額が不正です");
        assert!(error.details().contains("バリデーションエラー"));
    }

    #[test]
    fn test_helper_functions() {
        // ヘルパー関数のテスト
        let validation_error = AppError::validation("テストメッセージ");
        assert!(matches!(validation_error, AppError::Validation(_)));

        let not_found_error = AppError::not_found("テストリソース");
        assert!(matches!(not_found_error, AppError::NotFound(_)));

        let duplicate_error = AppError::duplicate("Spotify");
        assert!(matches!(duplicate_error, AppError::Duplicate(_)));

        let invalid_argument_error = AppError::invalid_argument("名前が空です");
        assert!(matches!(
            invalid_argument_error,
            AppError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_string_conversion() {
        // String変換のテスト
        let error = AppError::validation("テストエラー");
        let error_string: String = error.into();
        assert_eq!(error_string, "テストエラー");
    }

    #[test]
    fn test_error_details() {
        // エラー詳細のテスト
        let error = AppError::validation("詳細テスト");
        let details = error.details();
        assert!(details.contains("詳細テスト"));
    }
}
