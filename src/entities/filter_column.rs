//! Filter Column Module
//!
//! オートフィルターの1列分の設定（`<filterColumn>`）を定義するモジュール。

use std::sync::OnceLock;

use serde_json::Value;

use super::filters::Filters;
use crate::entity::Entity;
use crate::error::XlsxPartError;
use crate::schema::{EntitySchema, PropertyBag, ValidatorKind};
use crate::sort_filter::{ColumnFilter, FilterPredicate};
use crate::worksheet::Row;

/// オートフィルター列
///
/// `col_id`はフィルター範囲の先頭列からのオフセットです。
#[derive(Debug, Clone, PartialEq)]
pub struct FilterColumn {
    properties: PropertyBag,
    filters: Filters,
}

impl FilterColumn {
    /// 列オフセットと表示条件から生成
    ///
    /// `options`で`hidden_button` / `show_button`を指定できます。
    /// `options`内の`col_id`は無視され、引数の`col_id`が使われます。
    pub fn new(col_id: u32, filters: Filters, options: &Value) -> Result<Self, XlsxPartError> {
        let mut options = options.clone();
        if let Value::Object(map) = &mut options {
            map.remove("col_id");
        }

        let mut properties = PropertyBag::new(Self::schema());
        properties.set("col_id", col_id)?;
        properties.apply_options(&options)?;
        Ok(Self {
            properties,
            filters,
        })
    }

    /// 範囲の先頭列からの列オフセット
    ///
    /// `col_id`は32ビット符号なし整数として検証されるため、常に`u32`に収まります。
    pub fn col_id(&self) -> u32 {
        self.properties
            .get_i64("col_id")
            .ok()
            .flatten()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(0)
    }

    /// 表示条件
    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// 表示条件（可変）
    pub fn filters_mut(&mut self) -> &mut Filters {
        &mut self.filters
    }
}

impl ColumnFilter for FilterColumn {
    fn apply(&self, row: &mut Row, column_offset: u32) {
        let cell = column_offset
            .checked_add(self.col_id())
            .and_then(|col| row.cell(col));
        if !self.filters.passes(cell) {
            row.hidden = true;
        }
    }
}

impl Entity for FilterColumn {
    fn schema() -> &'static EntitySchema {
        static SCHEMA: OnceLock<EntitySchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::builder("filterColumn")
                .attribute("col_id", ValidatorKind::UnsignedInt, None)
                .attribute("hidden_button", ValidatorKind::Boolean, Some(false.into()))
                .attribute("show_button", ValidatorKind::Boolean, Some(true.into()))
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
        self.filters.to_xml()
    }
}
