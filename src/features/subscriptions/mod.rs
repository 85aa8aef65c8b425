/// サブスクリプション機能モジュール
///
/// このモジュールは、サブスクリプション管理に関連する機能を提供します：
/// - サブスクリプションの追加、一覧取得、更新、削除
/// - JSONファイルへの永続化と、保存失敗時の巻き戻し
pub mod repository;

// 公開インターフェース
pub use repository::{JsonRepository, MemoryRepository, SubscriptionRepository};
