//! Auto Filter Module
//!
//! ワークシートのオートフィルター（`<autoFilter>`）を定義するモジュール。
//! フィルター範囲・列ごとの表示条件・並べ替え状態をまとめ、
//! XML出力とワークシートへの適用（並べ替えと行の非表示化）を行います。

use std::sync::OnceLock;

use serde_json::Value;
use tracing::debug;

use super::filter_column::FilterColumn;
use super::filters::Filters;
use super::sort_state::{SortCondition, SortState};
use crate::entity::Entity;
use crate::error::XlsxPartError;
use crate::schema::{EntitySchema, PropertyBag, ValidatorKind};
use crate::sort_filter::{self, RangeOutcome};
use crate::types::CellRange;
use crate::worksheet::Worksheet;

/// オートフィルター
///
/// # 使用例
///
/// ```rust
/// use xlsxpart::{AutoFilter, CellValue, Filters, Worksheet};
/// use serde_json::json;
///
/// # fn main() -> Result<(), xlsxpart::XlsxPartError> {
/// let mut sheet = Worksheet::new("Sheet1");
/// sheet.add_row(["Name", "Status"]);
/// sheet.add_row(["b", "Open"]);
/// sheet.add_row(["a", "Closed"]);
///
/// let mut filter = AutoFilter::new();
/// filter.set_range("A1:B3")?;
/// filter.sort_state_mut().add_sort_condition(0, false, Vec::new())?;
/// filter.add_column(1, Filters::with_options(&json!({ "filter_items": ["Open"] }))?, &json!({}))?;
///
/// let outcome = filter.apply(&mut sheet)?;
/// assert_eq!(outcome.hidden, 1);
/// assert_eq!(sheet.rows()[1].value(0), Some(&CellValue::from("a")));
/// assert!(sheet.rows()[1].hidden);
/// assert_eq!(filter.defined_name(&sheet)?, Some("'Sheet1'!$A$1:$B$3".to_string()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AutoFilter {
    properties: PropertyBag,
    columns: Vec<FilterColumn>,
    sort_state: SortState,
}

impl AutoFilter {
    /// 範囲のない状態で生成
    pub fn new() -> Self {
        Self {
            properties: PropertyBag::new(Self::schema()),
            columns: Vec::new(),
            sort_state: SortState::new(),
        }
    }

    /// フィルター範囲の文字列（例: `"A1:B3"`）
    pub fn range(&self) -> Option<&str> {
        self.properties.get_str("ref").ok().flatten()
    }

    /// フィルター範囲を設定
    ///
    /// 範囲の形式は適用・出力時に検証されます。
    pub fn set_range(&mut self, range: impl Into<String>) -> Result<(), XlsxPartError> {
        let range: String = range.into();
        self.set("ref", range)
    }

    /// フィルター範囲を解析する
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxPartError::MissingCollaborator)` - 範囲が設定されていない場合
    /// * `Err(XlsxPartError::MalformedRange)` - 範囲の形式が不正な場合
    pub fn parsed_range(&self) -> Result<CellRange, XlsxPartError> {
        let range = self.range().ok_or_else(|| {
            XlsxPartError::MissingCollaborator("autoFilter has no range".to_string())
        })?;
        CellRange::parse(range)
    }

    /// 列の表示条件を追加
    pub fn add_column(
        &mut self,
        col_id: u32,
        filters: Filters,
        options: &Value,
    ) -> Result<&mut FilterColumn, XlsxPartError> {
        self.columns.push(FilterColumn::new(col_id, filters, options)?);
        let last = self.columns.len() - 1;
        Ok(&mut self.columns[last])
    }

    /// 並べ替え条件を追加
    pub fn add_sort_condition(&mut self, condition: SortCondition) -> &mut SortCondition {
        self.sort_state.push(condition)
    }

    /// すべての列（宣言順）
    pub fn columns(&self) -> &[FilterColumn] {
        &self.columns
    }

    /// 並べ替え状態
    pub fn sort_state(&self) -> &SortState {
        &self.sort_state
    }

    /// 並べ替え状態（可変）
    pub fn sort_state_mut(&mut self) -> &mut SortState {
        &mut self.sort_state
    }

    /// フィルター範囲の定義名（`_xlnm._FilterDatabase`）の数式
    ///
    /// 範囲が設定されていない場合は`None`を返します。
    pub fn defined_name(&self, worksheet: &Worksheet) -> Result<Option<String>, XlsxPartError> {
        if self.range().is_none() {
            return Ok(None);
        }
        let range = self.parsed_range()?;
        Ok(Some(worksheet.defined_name_formula(&range)))
    }

    /// 列と並べ替え条件の列オフセットが範囲の列数に収まるかを検証する
    ///
    /// # 戻り値
    ///
    /// * `Err(XlsxPartError::MalformedRange)` - 範囲外のオフセットがある場合
    pub(crate) fn check_column_offsets(&self, range: &CellRange) -> Result<(), XlsxPartError> {
        let (_, width) = range.size();
        let offsets = self
            .columns
            .iter()
            .map(FilterColumn::col_id)
            .chain(self.sort_state.sort_conditions().iter().map(SortCondition::column_index));
        for offset in offsets {
            if offset >= width {
                return Err(XlsxPartError::MalformedRange(format!(
                    "column offset {} is outside {} ({} columns)",
                    offset, range, width
                )));
            }
        }
        Ok(())
    }

    /// ワークシートに並べ替えとフィルターを適用する
    ///
    /// ヘッダー行（範囲の先頭行）の下の行を並べ替え条件で安定ソートし、
    /// 各列の表示条件を満たさない行を非表示にします。
    /// 列オフセットが範囲の列数を超える場合は`MalformedRange`を返し、
    /// ワークシートは変更されません。
    pub fn apply(&self, worksheet: &mut Worksheet) -> Result<RangeOutcome, XlsxPartError> {
        let range = self.parsed_range()?;
        self.check_column_offsets(&range)?;
        let keys = self.sort_state.sort_keys();

        debug!(
            sheet = worksheet.name(),
            range = %range,
            sort_conditions = keys.len(),
            filter_columns = self.columns.len(),
            "applying auto filter"
        );

        Ok(sort_filter::sort_and_filter(
            worksheet.rows_mut(),
            &range,
            &keys,
            self.columns.as_slice(),
        ))
    }
}

impl Default for AutoFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for AutoFilter {
    fn schema() -> &'static EntitySchema {
        static SCHEMA: OnceLock<EntitySchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::builder("autoFilter")
                .attribute("ref", ValidatorKind::String, None)
                .build()
        })
    }

    fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    fn child_xml(&self) -> Result<String, XlsxPartError> {
        let range = self.parsed_range()?;
        self.check_column_offsets(&range)?;

        let mut out = String::new();
        for column in &self.columns {
            out.push_str(&column.to_xml()?);
        }
        out.push_str(&self.sort_state.to_xml_in(&range)?);
        Ok(out)
    }

    /// 範囲が設定されていない場合は空文字列を返す
    fn to_xml(&self) -> Result<String, XlsxPartError> {
        if self.range().is_none() {
            return Ok(String::new());
        }
        crate::xml::write_entity(self)
    }
}
