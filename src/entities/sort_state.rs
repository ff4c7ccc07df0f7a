//! Sort State Module
//!
//! オートフィルター範囲の並べ替え状態（`<sortState>`）と並べ替え条件
//! （`<sortCondition>`）を定義するモジュール。
//!
//! `ref`属性はどちらもフィルター範囲から導出されるため、
//! 出力には範囲を渡す`to_xml_in`を使用します。

use std::sync::OnceLock;

use crate::entity::Entity;
use crate::error::XlsxPartError;
use crate::schema::{EntitySchema, PropertyBag, PropertyValue, ValidatorKind};
use crate::sort_filter::SortKey;
use crate::types::{CellCoord, CellRange};
use crate::xml;

/// 並べ替え条件
///
/// `column_index`はフィルター範囲の先頭列からのオフセットです。
#[derive(Debug, Clone, PartialEq)]
pub struct SortCondition {
    properties: PropertyBag,
    column_index: u32,
    custom_list: Vec<String>,
}

impl SortCondition {
    /// 列オフセット・方向・明示的な並び順から生成
    ///
    /// `custom_list`が空の場合は自然順序で並べ替えます。
    pub fn new(
        column_index: u32,
        descending: bool,
        custom_list: Vec<String>,
    ) -> Result<Self, XlsxPartError> {
        let mut properties = PropertyBag::new(Self::schema());
        if descending {
            properties.set("descending", true)?;
        }
        Ok(Self {
            properties,
            column_index,
            custom_list,
        })
    }

    /// 範囲の先頭列からの列オフセット
    pub fn column_index(&self) -> u32 {
        self.column_index
    }

    /// 降順かどうか
    pub fn descending(&self) -> bool {
        self.properties
            .get_bool("descending")
            .ok()
            .flatten()
            .unwrap_or(false)
    }

    /// 明示的な並び順
    pub fn custom_list(&self) -> &[String] {
        &self.custom_list
    }

    /// 並べ替えエンジン用のキーに変換
    pub fn to_sort_key(&self) -> SortKey {
        SortKey::with_custom_order(self.column_index, self.descending(), self.custom_list.clone())
    }

    /// この条件が対象とする1列分の範囲（ヘッダー行を除く）
    ///
    /// 列オフセットが範囲の列数を超える場合は`MalformedRange`を返します。
    pub fn reference(&self, range: &CellRange) -> Result<CellRange, XlsxPartError> {
        let (_, width) = range.size();
        if self.column_index >= width {
            return Err(XlsxPartError::MalformedRange(format!(
                "sort column offset {} is outside {} ({} columns)",
                self.column_index, range, width
            )));
        }

        let body = range.without_header().unwrap_or(*range);
        let col = body.start.col + self.column_index;
        Ok(CellRange::new(
            CellCoord::new(body.start.row, col),
            CellCoord::new(body.end.row, col),
        ))
    }

    /// フィルター範囲を指定してXML断片として出力する
    pub fn to_xml_in(&self, range: &CellRange) -> Result<String, XlsxPartError> {
        let mut extra = vec![("ref", PropertyValue::Text(self.reference(range)?.to_string()))];
        if !self.custom_list.is_empty() {
            extra.push(("custom_list", PropertyValue::Text(self.custom_list.join(","))));
        }

        let attributes = xml::serialize_attributes(&self.properties, &extra, true);
        xml::serialize_element(Self::schema().tag(), &attributes, None)
    }
}

impl Entity for SortCondition {
    fn schema() -> &'static EntitySchema {
        static SCHEMA: OnceLock<EntitySchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::builder("sortCondition")
                .attribute("descending", ValidatorKind::Boolean, None)
                .build()
        })
    }

    fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    fn to_xml(&self) -> Result<String, XlsxPartError> {
        Err(XlsxPartError::MissingCollaborator(
            "sortCondition requires the auto filter range".to_string(),
        ))
    }
}

/// 並べ替え状態
///
/// 条件は宣言順に優先されます（先の条件が主キー）。
#[derive(Debug, Clone, PartialEq)]
pub struct SortState {
    properties: PropertyBag,
    conditions: Vec<SortCondition>,
}

impl SortState {
    /// 条件のない状態で生成
    pub fn new() -> Self {
        Self {
            properties: PropertyBag::new(Self::schema()),
            conditions: Vec::new(),
        }
    }

    /// 条件を追加
    pub fn add_sort_condition(
        &mut self,
        column_index: u32,
        descending: bool,
        custom_list: Vec<String>,
    ) -> Result<&mut SortCondition, XlsxPartError> {
        Ok(self.push(SortCondition::new(column_index, descending, custom_list)?))
    }

    /// 生成済みの条件を追加
    pub fn push(&mut self, condition: SortCondition) -> &mut SortCondition {
        self.conditions.push(condition);
        let last = self.conditions.len() - 1;
        &mut self.conditions[last]
    }

    /// すべての条件（宣言順）
    pub fn sort_conditions(&self) -> &[SortCondition] {
        &self.conditions
    }

    /// 並べ替えエンジン用のキー（宣言順）
    pub fn sort_keys(&self) -> Vec<SortKey> {
        self.conditions.iter().map(SortCondition::to_sort_key).collect()
    }

    /// フィルター範囲を指定してXML断片として出力する
    ///
    /// 条件がない場合は空文字列を返します。
    pub fn to_xml_in(&self, range: &CellRange) -> Result<String, XlsxPartError> {
        if self.conditions.is_empty() {
            return Ok(String::new());
        }

        let body_range = range.without_header().unwrap_or(*range);
        let extra = [("ref", PropertyValue::Text(body_range.to_string()))];
        let attributes = xml::serialize_attributes(&self.properties, &extra, true);

        let mut body = String::new();
        for condition in &self.conditions {
            body.push_str(&condition.to_xml_in(range)?);
        }

        xml::serialize_element(Self::schema().tag(), &attributes, Some(&body))
    }
}

impl Default for SortState {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for SortState {
    fn schema() -> &'static EntitySchema {
        static SCHEMA: OnceLock<EntitySchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::builder("sortState")
                .attribute("column_sort", ValidatorKind::Boolean, None)
                .attribute("case_sensitive", ValidatorKind::Boolean, None)
                .build()
        })
    }

    fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    fn to_xml(&self) -> Result<String, XlsxPartError> {
        Err(XlsxPartError::MissingCollaborator(
            "sortState requires the auto filter range".to_string(),
        ))
    }
}
