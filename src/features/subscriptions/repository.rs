use crate::models::{Subscription, SubscriptionRecord};
use crate::shared::errors::{AppError, AppResult};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// サブスクリプションの保存先を抽象化するトレイト
///
/// 追加・一覧取得・更新・削除の基本操作を提供する。実装はスレッドセーフで
/// あること。一覧取得が返すのはスナップショットコピーであり、呼び出し側が
/// 変更しても保存先の状態には影響しない。
pub trait SubscriptionRepository: Send + Sync {
    /// サブスクリプションを追加する
    ///
    /// # 引数
    /// * `subscription` - 追加するサブスクリプション
    ///
    /// # 戻り値
    /// 成功時はOk(())、同名のサブスクリプションが存在する場合はエラー
    fn add(&self, subscription: Subscription) -> AppResult<()>;

    /// サブスクリプションの一覧を取得する
    ///
    /// # 戻り値
    /// 登録順のサブスクリプション一覧（スナップショットコピー）
    fn find_all(&self) -> AppResult<Vec<Subscription>>;

    /// 指定した名前のサブスクリプションを置き換える
    ///
    /// # 引数
    /// * `name` - 置き換え対象のサブスクリプション名
    /// * `updated` - 置き換え後のサブスクリプション
    ///
    /// # 戻り値
    /// 成功時はOk(())、対象が存在しない場合や名前変更先が重複する場合はエラー
    fn update(&self, name: &str, updated: Subscription) -> AppResult<()>;

    /// 指定した名前のサブスクリプションを削除する
    ///
    /// # 引数
    /// * `name` - 削除対象のサブスクリプション名
    ///
    /// # 戻り値
    /// 成功時はOk(())、対象が存在しない場合はエラー
    fn delete(&self, name: &str) -> AppResult<()>;
}

/// 同名のサブスクリプションが存在しないことを確認する（大文字小文字を区別）
fn ensure_unique_name(subscriptions: &[Subscription], name: &str) -> AppResult<()> {
    if subscriptions.iter().any(|s| s.name() == name) {
        return Err(AppError::duplicate(name));
    }
    Ok(())
}

/// 名前からサブスクリプションの位置を取得する
fn position_by_name(subscriptions: &[Subscription], name: &str) -> AppResult<usize> {
    if name.trim().is_empty() {
        return Err(AppError::invalid_argument(
            "サブスクリプション名を指定してください",
        ));
    }

    subscriptions
        .iter()
        .position(|s| s.name() == name)
        .ok_or_else(|| AppError::not_found(name))
}

/// メモリ上のみで保持するサブスクリプションリポジトリ
///
/// 永続ミラーを持たないため、プロセス終了とともに内容は失われる。
pub struct MemoryRepository {
    subscriptions: RwLock<Vec<Subscription>>,
}

impl MemoryRepository {
    /// 空のリポジトリを作成する
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl SubscriptionRepository for MemoryRepository {
    fn add(&self, subscription: Subscription) -> AppResult<()> {
        let mut subscriptions = self.subscriptions.write()?;
        ensure_unique_name(&subscriptions, subscription.name())?;

        subscriptions.push(subscription);
        Ok(())
    }

    fn find_all(&self) -> AppResult<Vec<Subscription>> {
        Ok(self.subscriptions.read()?.clone())
    }

    fn update(&self, name: &str, updated: Subscription) -> AppResult<()> {
        let mut subscriptions = self.subscriptions.write()?;
        let index = position_by_name(&subscriptions, name)?;

        // 名前を変更する場合は重複を確認
        if updated.name() != name {
            ensure_unique_name(&subscriptions, updated.name())?;
        }

        subscriptions[index] = updated;
        Ok(())
    }

    fn delete(&self, name: &str) -> AppResult<()> {
        let mut subscriptions = self.subscriptions.write()?;
        let index = position_by_name(&subscriptions, name)?;

        subscriptions.remove(index);
        Ok(())
    }
}

/// JSONファイルへの永続ミラーを持つサブスクリプションリポジトリ
///
/// メモリ上の一覧が正であり、変更操作のたびに全件をJSONファイルへ書き出す。
/// 書き込みに失敗した場合はメモリ上の変更を巻き戻し、ファイルとメモリの
/// 内容が乖離しないことを保証する。変更と書き出しはひとつの排他ロックの
/// 中で行うため、巻き戻し中の状態が他のスレッドから観測されることはない。
pub struct JsonRepository {
    file_path: PathBuf,
    subscriptions: RwLock<Vec<Subscription>>,
}

impl JsonRepository {
    /// JSONファイルからリポジトリを構築する
    ///
    /// # 引数
    /// * `file_path` - 永続化先のJSONファイルパス
    ///
    /// # 戻り値
    /// 構築されたリポジトリ、または失敗時はエラー
    ///
    /// # 処理内容
    /// 1. 保存先ディレクトリが存在しない場合は作成
    /// 2. ファイルが存在する場合は全件を読み込み（解析不能・不正なレコードが
    ///    含まれる場合は `CorruptState` で失敗し、部分的な読み込みは行わない）
    /// 3. ファイルが存在しない場合は空の状態で開始
    pub fn open<P: AsRef<Path>>(file_path: P) -> AppResult<Self> {
        let file_path = file_path.as_ref().to_path_buf();

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                info!("データディレクトリを作成しました: {}", parent.display());
            }
        }

        let subscriptions = if file_path.exists() {
            load_from_file(&file_path)?
        } else {
            Vec::new()
        };

        info!(
            "サブスクリプションストアを初期化しました: {}（{}件）",
            file_path.display(),
            subscriptions.len()
        );

        Ok(Self {
            file_path,
            subscriptions: RwLock::new(subscriptions),
        })
    }

    /// 永続化先のファイルパスを取得する
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl SubscriptionRepository for JsonRepository {
    fn add(&self, subscription: Subscription) -> AppResult<()> {
        let mut subscriptions = self.subscriptions.write()?;
        ensure_unique_name(&subscriptions, subscription.name())?;

        let name = subscription.name().to_string();
        subscriptions.push(subscription);

        if let Err(e) = save_to_file(&self.file_path, &subscriptions) {
            // 保存に失敗した場合は追加を巻き戻す
            subscriptions.pop();
            warn!("保存に失敗したため「{name}」の追加を巻き戻しました: {e}");
            return Err(e);
        }

        Ok(())
    }

    fn find_all(&self) -> AppResult<Vec<Subscription>> {
        Ok(self.subscriptions.read()?.clone())
    }

    fn update(&self, name: &str, updated: Subscription) -> AppResult<()> {
        let mut subscriptions = self.subscriptions.write()?;
        let index = position_by_name(&subscriptions, name)?;

        // 名前を変更する場合は重複を確認
        if updated.name() != name {
            ensure_unique_name(&subscriptions, updated.name())?;
        }

        let previous = std::mem::replace(&mut subscriptions[index], updated);

        if let Err(e) = save_to_file(&self.file_path, &subscriptions) {
            // 保存に失敗した場合は置き換え前の状態に戻す
            subscriptions[index] = previous;
            warn!("保存に失敗したため「{name}」の更新を巻き戻しました: {e}");
            return Err(e);
        }

        Ok(())
    }

    fn delete(&self, name: &str) -> AppResult<()> {
        let mut subscriptions = self.subscriptions.write()?;
        let index = position_by_name(&subscriptions, name)?;

        let removed = subscriptions.remove(index);

        if let Err(e) = save_to_file(&self.file_path, &subscriptions) {
            // 保存に失敗した場合は元の位置に戻す
            subscriptions.insert(index, removed);
            warn!("保存に失敗したため「{name}」の削除を巻き戻しました: {e}");
            return Err(e);
        }

        info!("サブスクリプション「{name}」を削除しました");
        Ok(())
    }
}

/// JSONファイルから全件を読み込む
fn load_from_file(file_path: &Path) -> AppResult<Vec<Subscription>> {
    let data = fs::read_to_string(file_path).map_err(|e| {
        AppError::corrupt_state(format!("ファイルの読み込みに失敗しました: {e}"))
    })?;

    let records: Vec<SubscriptionRecord> = serde_json::from_str(&data)
        .map_err(|e| AppError::corrupt_state(format!("JSONの解析に失敗しました: {e}")))?;

    let mut subscriptions = Vec::with_capacity(records.len());
    for record in &records {
        subscriptions.push(Subscription::from_record(record)?);
    }

    Ok(subscriptions)
}

/// 全件をJSONファイルへ書き出す（全体上書き、整形出力）
fn save_to_file(file_path: &Path, subscriptions: &[Subscription]) -> AppResult<()> {
    let records: Vec<SubscriptionRecord> =
        subscriptions.iter().map(Subscription::to_record).collect();

    let data = serde_json::to_string_pretty(&records)
        .map_err(|e| AppError::persistence(format!("JSONへの変換に失敗しました: {e}")))?;

    fs::write(file_path, data)
        .map_err(|e| AppError::persistence(format!("ファイルへの書き込みに失敗しました: {e}")))
}
