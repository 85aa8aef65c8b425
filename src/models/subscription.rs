use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, Duration, FixedOffset, Months, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 支払い頻度を表す列挙型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentFrequency {
    /// 毎日
    Daily,
    /// 毎週
    Weekly,
    /// 毎月
    Monthly,
    /// 毎年
    Yearly,
}

impl PaymentFrequency {
    /// 現在の支払日から次回の支払日を算出する
    ///
    /// # 引数
    /// * `current` - 現在の次回支払日
    ///
    /// # 戻り値
    /// 頻度に応じて進めた次回支払日
    ///
    /// # 日付計算の規則
    /// - daily: 1日後（時刻は維持）
    /// - weekly: 7日後（時刻は維持）
    /// - monthly: 翌月の同日。翌月に同日が存在しない場合は月末に丸める
    ///   （例: 1月31日 → 2月28日/29日）
    /// - yearly: 翌年の同月同日。2月29日で翌年がうるう年でない場合は2月28日に丸める
    pub fn advance(&self, current: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        match self {
            PaymentFrequency::Daily => current + Duration::days(1),
            PaymentFrequency::Weekly => current + Duration::days(7),
            // chronoのMonths加算は対象月に同日が存在しない場合、月末に丸める
            PaymentFrequency::Monthly => current
                .checked_add_months(Months::new(1))
                .unwrap_or(current),
            PaymentFrequency::Yearly => current
                .checked_add_months(Months::new(12))
                .unwrap_or(current),
        }
    }

    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Daily => "daily",
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Yearly => "yearly",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(PaymentFrequency::Daily),
            "weekly" => Ok(PaymentFrequency::Weekly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            "yearly" => Ok(PaymentFrequency::Yearly),
            _ => Err(
                "支払い頻度は'daily'、'weekly'、'monthly'、'yearly'のいずれかである必要があります"
                    .to_string(),
            ),
        }
    }
}

/// サブスクリプションデータモデル
///
/// フィールドはバリデーション済みの状態のみを保持するため非公開とし、
/// 参照はゲッター、変更は `process_payment` を通してのみ行う。
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    name: String,
    cost: f64,
    payment_frequency: PaymentFrequency,
    next_payment_date: DateTime<FixedOffset>,
    remaining_payments: i64,
    total_payments: i64,
}

/// 永続化用のサブスクリプションレコード
///
/// JSONファイルとの入出力に使用するDTO。日時はRFC3339形式
/// （オフセット付き）の文字列、支払い頻度は文字列で保持する。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    pub name: String,
    pub cost: f64,
    pub payment_frequency: String,
    pub next_payment_date: String,
    pub remaining_payments: i64,
    pub total_payments: i64,
}

impl Subscription {
    /// サブスクリプションを作成する
    ///
    /// # 引数
    /// * `name` - サブスクリプション名（空でないこと）
    /// * `cost` - 金額（正の数値）
    /// * `frequency` - 支払い頻度（"daily"/"weekly"/"monthly"/"yearly"）
    /// * `next_payment_date` - 次回支払日（未来の日時であること）
    /// * `total_payments` - 支払い回数（正の整数）
    ///
    /// # 戻り値
    /// 作成されたサブスクリプション、または失敗時はバリデーションエラー
    ///
    /// # バリデーション
    /// すべてのルールを検査し、違反をまとめてひとつの
    /// `AppError::Validation` として返す（最初の違反で中断しない）。
    /// メッセージは名前、金額、頻度、日付、回数の順に並ぶ。
    pub fn new(
        name: &str,
        cost: f64,
        frequency: &str,
        next_payment_date: DateTime<FixedOffset>,
        total_payments: i64,
    ) -> AppResult<Self> {
        let mut violations = Vec::new();

        // バリデーション: 名前は必須
        if name.trim().is_empty() {
            violations.push("サブスクリプション名を入力してください".to_string());
        }

        // バリデーション: 金額は正の数値
        if !cost.is_finite() || cost <= 0.0 {
            violations.push("金額は正の数値である必要があります".to_string());
        }

        // バリデーション: 支払い頻度は定義済みのいずれか
        let parsed_frequency = PaymentFrequency::from_str(frequency);
        if let Err(ref message) = parsed_frequency {
            violations.push(message.clone());
        }

        // バリデーション: 次回支払日は未来の日時
        if next_payment_date.with_timezone(&Utc) <= Utc::now() {
            violations.push("次回支払日は未来の日時である必要があります".to_string());
        }

        // バリデーション: 支払い回数は正の整数
        if total_payments <= 0 {
            violations.push("支払い回数は正の整数である必要があります".to_string());
        }

        if let (true, Ok(payment_frequency)) = (violations.is_empty(), parsed_frequency) {
            info!("サブスクリプションを作成しました: {name}（支払い回数: {total_payments}）");
            Ok(Self {
                name: name.to_string(),
                cost,
                payment_frequency,
                next_payment_date,
                remaining_payments: total_payments,
                total_payments,
            })
        } else {
            Err(AppError::Validation(violations))
        }
    }

    /// 永続化レコードからサブスクリプションを復元する
    ///
    /// # 引数
    /// * `record` - JSONファイルから読み込んだレコード
    ///
    /// # 戻り値
    /// 復元されたサブスクリプション、または失敗時は `CorruptState` エラー
    ///
    /// 作成時バリデーションのうち「次回支払日が未来であること」は作成時のみの
    /// 規則のため復元時には適用しない。保存済みの支払日は時間の経過により
    /// 過去になり得る。
    pub fn from_record(record: &SubscriptionRecord) -> AppResult<Self> {
        if record.name.trim().is_empty() {
            return Err(AppError::corrupt_state(
                "サブスクリプション名が空のレコードが含まれています",
            ));
        }

        if !record.cost.is_finite() || record.cost <= 0.0 {
            return Err(AppError::corrupt_state(format!(
                "サブスクリプション「{}」の金額が不正です: {}",
                record.name, record.cost
            )));
        }

        let payment_frequency =
            PaymentFrequency::from_str(&record.payment_frequency).map_err(|message| {
                AppError::corrupt_state(format!(
                    "サブスクリプション「{}」: {message}",
                    record.name
                ))
            })?;

        let next_payment_date = DateTime::parse_from_rfc3339(&record.next_payment_date)
            .map_err(|e| {
                AppError::corrupt_state(format!(
                    "サブスクリプション「{}」の日付形式が不正です: {e}",
                    record.name
                ))
            })?;

        if record.total_payments <= 0 {
            return Err(AppError::corrupt_state(format!(
                "サブスクリプション「{}」の支払い回数が不正です: {}",
                record.name, record.total_payments
            )));
        }

        if record.remaining_payments < 0 || record.remaining_payments > record.total_payments {
            return Err(AppError::corrupt_state(format!(
                "サブスクリプション「{}」の残り支払い回数が不正です: {}/{}",
                record.name, record.remaining_payments, record.total_payments
            )));
        }

        Ok(Self {
            name: record.name.clone(),
            cost: record.cost,
            payment_frequency,
            next_payment_date,
            remaining_payments: record.remaining_payments,
            total_payments: record.total_payments,
        })
    }

    /// 永続化用レコードへ変換する
    ///
    /// # 戻り値
    /// JSONファイルへの書き出しに使用するレコード
    pub fn to_record(&self) -> SubscriptionRecord {
        SubscriptionRecord {
            name: self.name.clone(),
            cost: self.cost,
            payment_frequency: self.payment_frequency.to_string(),
            next_payment_date: self.next_payment_date.to_rfc3339(),
            remaining_payments: self.remaining_payments,
            total_payments: self.total_payments,
        }
    }

    /// サブスクリプション名を取得する
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 金額を取得する
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// 支払い頻度を取得する
    pub fn payment_frequency(&self) -> PaymentFrequency {
        self.payment_frequency
    }

    /// 次回支払日を取得する
    pub fn next_payment_date(&self) -> DateTime<FixedOffset> {
        self.next_payment_date
    }

    /// 残り支払い回数を取得する
    pub fn remaining_payments(&self) -> i64 {
        self.remaining_payments
    }

    /// 総支払い回数を取得する
    pub fn total_payments(&self) -> i64 {
        self.total_payments
    }

    /// 支払いを1回分処理する
    ///
    /// # 戻り値
    /// 成功時はOk(())、支払いがすべて完了している場合はエラー
    ///
    /// 成功時は残り支払い回数を1減らし、次回支払日を現在の支払日を基準に
    /// 頻度に応じて進める（処理時点の現在時刻は基準にしない）。
    pub fn process_payment(&mut self) -> AppResult<()> {
        if self.remaining_payments <= 0 {
            return Err(AppError::SubscriptionEnded);
        }

        self.remaining_payments -= 1;
        self.next_payment_date = self.payment_frequency.advance(self.next_payment_date);

        info!(
            "サブスクリプション「{}」の支払いを処理しました（残り: {}/{}）",
            self.name, self.remaining_payments, self.total_payments
        );

        Ok(())
    }

    /// サブスクリプションの状態を表す文字列を取得する
    ///
    /// # 戻り値
    /// 完了時は "Completed"、継続中は "Active (残り/総数 payments remaining)"
    pub fn status(&self) -> String {
        if self.remaining_payments <= 0 {
            "Completed".to_string()
        } else {
            format!(
                "Active ({}/{} payments remaining)",
                self.remaining_payments, self.total_payments
            )
        }
    }

    /// 次回支払日までの残り時間を取得する
    ///
    /// # 戻り値
    /// 次回支払日までの残り時間（支払日を過ぎている場合は負の値）
    pub fn time_until_next_payment(&self) -> Duration {
        self.next_payment_date.with_timezone(&Utc) - Utc::now()
    }

    /// 次回支払日までの残り時間を整形した文字列を取得する
    ///
    /// # 戻り値
    /// "3d 5h 30m" 形式の文字列。日、時（0〜23）、分（0〜59）は
    /// 切り捨てで求め、秒以下は表示しない。
    pub fn formatted_time_until_next_payment(&self) -> String {
        let duration = self.time_until_next_payment();
        let days = duration.num_days();
        let hours = duration.num_hours() % 24;
        let minutes = duration.num_minutes() % 60;

        format!("{days}d {hours}h {minutes}m")
    }
}
