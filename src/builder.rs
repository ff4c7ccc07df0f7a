//! Builder Module
//!
//! Fluent Builder APIを提供し、`AutoFilter`インスタンスを段階的に構築する。

use serde_json::Value;

use crate::entities::{AutoFilter, Filters, SortCondition};
use crate::error::XlsxPartError;
use crate::types::CellRange;

/// 列の表示条件の設定（構築中）
#[derive(Debug, Clone)]
struct ColumnConfig {
    col_id: u32,
    filters: Filters,
    options: Value,
}

/// オートフィルターの設定を保持する内部構造体
#[derive(Debug, Clone, Default)]
struct FilterConfig {
    /// フィルター範囲（A1形式）
    range: Option<String>,

    /// 列の表示条件（宣言順）
    columns: Vec<ColumnConfig>,

    /// 並べ替え条件（宣言順）
    sort_conditions: Vec<SortCondition>,
}

/// Fluent Builder APIを提供する構造体
///
/// `AutoFilter`インスタンスを段階的に構築するためのビルダーです。
/// 範囲と列オフセットの整合性は`build()`時にまとめて検証されます。
///
/// # 使用例
///
/// ```rust
/// use xlsxpart::{AutoFilterBuilder, Filters, SortCondition};
///
/// # fn main() -> Result<(), xlsxpart::XlsxPartError> {
/// let filter = AutoFilterBuilder::new()
///     .with_range("A1:C20")
///     .with_sort_condition(SortCondition::new(2, true, Vec::new())?)
///     .with_column(0, Filters::new())
///     .build()?;
///
/// assert_eq!(filter.range(), Some("A1:C20"));
/// assert_eq!(filter.columns().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct AutoFilterBuilder {
    /// 内部設定（構築中）
    config: FilterConfig,
}

impl AutoFilterBuilder {
    /// 空の設定を持つビルダーインスタンスを生成する
    pub fn new() -> Self {
        Self::default()
    }

    /// フィルター範囲を指定する
    ///
    /// # 引数
    ///
    /// * `range` - A1形式の範囲（例: `"A1:D50"`）。先頭行はヘッダー行として扱われます
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.config.range = Some(range.into());
        self
    }

    /// 列の表示条件を追加する
    ///
    /// # 引数
    ///
    /// * `col_id` - 範囲の先頭列からの列オフセット
    /// * `filters` - 表示条件
    pub fn with_column(self, col_id: u32, filters: Filters) -> Self {
        self.with_column_options(col_id, filters, Value::Null)
    }

    /// 列の表示条件を、列の設定オブジェクト（`hidden_button`など）と共に追加する
    pub fn with_column_options(mut self, col_id: u32, filters: Filters, options: Value) -> Self {
        self.config.columns.push(ColumnConfig {
            col_id,
            filters,
            options,
        });
        self
    }

    /// 並べ替え条件を追加する（先に追加した条件が優先）
    pub fn with_sort_condition(mut self, condition: SortCondition) -> Self {
        self.config.sort_conditions.push(condition);
        self
    }

    /// 設定を検証し、`AutoFilter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(AutoFilter)` - 設定が有効な場合
    /// * `Err(XlsxPartError::MissingCollaborator)` - 範囲が指定されていない場合
    /// * `Err(XlsxPartError::MalformedRange)` - 範囲の形式が不正、
    ///   または列オフセットが範囲の列数を超える場合
    /// * `Err(XlsxPartError::InvalidValue)` - 列の設定オブジェクトが不正な場合
    pub fn build(self) -> Result<AutoFilter, XlsxPartError> {
        // 1. 範囲の検証
        let raw = self.config.range.ok_or_else(|| {
            XlsxPartError::MissingCollaborator("autoFilter builder has no range".to_string())
        })?;
        let range = CellRange::parse(&raw)?;

        // 2. AutoFilterインスタンス生成
        let mut filter = AutoFilter::new();
        filter.set_range(raw)?;
        for column in self.config.columns {
            filter.add_column(column.col_id, column.filters, &column.options)?;
        }
        for condition in self.config.sort_conditions {
            filter.add_sort_condition(condition);
        }

        // 3. 列オフセットの検証
        filter.check_column_offsets(&range)?;

        Ok(filter)
    }
}
