//! Filters Module
//!
//! オートフィルター列の表示条件（`<filters>`）と、その項目
//! （`<filter>` / `<dateGroupItem>`）を定義するモジュール。

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde_json::Value;

use crate::api::{CalendarType, DateTimeGrouping};
use crate::entity::Entity;
use crate::error::XlsxPartError;
use crate::schema::{EntitySchema, PropertyBag, ValidatorKind};
use crate::sort_filter::FilterPredicate;
use crate::types::CellValue;
use crate::worksheet::Cell;

/// 表示する値の項目（`<filter val="..."/>`）
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    properties: PropertyBag,
}

impl Filter {
    /// 値を指定して生成
    pub fn new(val: impl Into<String>) -> Result<Self, XlsxPartError> {
        let val: String = val.into();
        let mut properties = PropertyBag::new(Self::schema());
        properties.set("val", val)?;
        Ok(Self { properties })
    }

    /// 項目の値
    pub fn val(&self) -> &str {
        self.properties.get_str("val").ok().flatten().unwrap_or("")
    }
}

impl Entity for Filter {
    fn schema() -> &'static EntitySchema {
        static SCHEMA: OnceLock<EntitySchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::builder("filter")
                .attribute("val", ValidatorKind::String, None)
                .build()
        })
    }

    fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }
}

/// 日付のグループ化項目（`<dateGroupItem>`）
///
/// `date_time_grouping`で指定した粒度までの日付・時刻要素が
/// 一致するセルを表示対象にします。
#[derive(Debug, Clone, PartialEq)]
pub struct DateGroupItem {
    properties: PropertyBag,
}

impl DateGroupItem {
    /// 設定オブジェクトから生成
    ///
    /// `year`と`date_time_grouping`は必須です。
    pub fn new(options: &Value) -> Result<Self, XlsxPartError> {
        let properties = PropertyBag::with_options(Self::schema(), options)?;
        for required in ["year", "date_time_grouping"] {
            if properties.get(required)?.is_none() {
                return Err(XlsxPartError::invalid_value(required, "a value", "none"));
            }
        }
        Ok(Self { properties })
    }

    /// グループ化の粒度
    pub fn grouping(&self) -> Option<DateTimeGrouping> {
        self.properties
            .get_str("date_time_grouping")
            .ok()
            .flatten()
            .and_then(DateTimeGrouping::from_symbol)
    }

    /// 日時が粒度までの要素すべてで一致するかどうか
    ///
    /// 粒度までに必要な要素が未設定の場合は一致しません。
    pub fn matches(&self, value: &NaiveDateTime) -> bool {
        let Some(grouping) = self.grouping() else {
            return false;
        };

        let levels = [
            (DateTimeGrouping::Year, "year", i64::from(value.year())),
            (DateTimeGrouping::Month, "month", i64::from(value.month())),
            (DateTimeGrouping::Day, "day", i64::from(value.day())),
            (DateTimeGrouping::Hour, "hour", i64::from(value.hour())),
            (DateTimeGrouping::Minute, "minute", i64::from(value.minute())),
            (DateTimeGrouping::Second, "second", i64::from(value.second())),
        ];

        levels
            .iter()
            .take_while(|(level, _, _)| *level <= grouping)
            .all(|(_, name, actual)| {
                self.properties.get_i64(name).ok().flatten() == Some(*actual)
            })
    }
}

impl Entity for DateGroupItem {
    fn schema() -> &'static EntitySchema {
        static SCHEMA: OnceLock<EntitySchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::builder("dateGroupItem")
                .attribute("year", ValidatorKind::UnsignedInt, None)
                .attribute("month", ValidatorKind::UnsignedInt, None)
                .attribute("day", ValidatorKind::UnsignedInt, None)
                .attribute("hour", ValidatorKind::UnsignedInt, None)
                .attribute("minute", ValidatorKind::UnsignedInt, None)
                .attribute("second", ValidatorKind::UnsignedInt, None)
                .attribute(
                    "date_time_grouping",
                    ValidatorKind::Symbol(DateTimeGrouping::SYMBOLS),
                    None,
                )
                .build()
        })
    }

    fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }
}

/// 列の表示条件（`<filters>`）
///
/// 値の一覧（`filter_items`）と日付グループ（`date_group_items`）のいずれかに
/// 一致するセルを表示します。`blank`が`true`の場合は空セルも表示します。
///
/// # 使用例
///
/// ```rust
/// use xlsxpart::{Entity, Filters};
/// use serde_json::json;
///
/// # fn main() -> Result<(), xlsxpart::XlsxPartError> {
/// let filters = Filters::with_options(&json!({
///     "blank": true,
///     "filter_items": ["Open", "Pending"]
/// }))?;
///
/// assert_eq!(
///     filters.to_xml()?,
///     r#"<filters blank="1"><filter val="Open"/><filter val="Pending"/></filters>"#
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filters {
    properties: PropertyBag,
    filter_items: Vec<Filter>,
    date_group_items: Vec<DateGroupItem>,
}

impl Filters {
    /// 条件のない状態で生成
    pub fn new() -> Self {
        Self {
            properties: PropertyBag::new(Self::schema()),
            filter_items: Vec::new(),
            date_group_items: Vec::new(),
        }
    }

    /// 設定オブジェクトから生成
    ///
    /// スキーマのプロパティに加えて、`filter_items`（文字列の配列）と
    /// `date_group_items`（`DateGroupItem`の設定オブジェクトの配列）を受け付けます。
    pub fn with_options(options: &Value) -> Result<Self, XlsxPartError> {
        let mut filters = Self::new();
        filters.apply_options(options)?;

        if let Some(items) = options.get("filter_items") {
            let items = items
                .as_array()
                .ok_or_else(|| XlsxPartError::invalid_value("filter_items", "array", items))?;
            for item in items {
                match item {
                    Value::String(s) => filters.add_item(s.as_str())?,
                    other => filters.add_item(other.to_string())?,
                }
            }
        }

        if let Some(items) = options.get("date_group_items") {
            let items = items
                .as_array()
                .ok_or_else(|| XlsxPartError::invalid_value("date_group_items", "array", items))?;
            for item in items {
                filters.add_date_group_item(item)?;
            }
        }

        Ok(filters)
    }

    /// 表示する値を追加
    pub fn add_item(&mut self, val: impl Into<String>) -> Result<(), XlsxPartError> {
        self.filter_items.push(Filter::new(val)?);
        Ok(())
    }

    /// 日付グループを追加
    pub fn add_date_group_item(&mut self, options: &Value) -> Result<(), XlsxPartError> {
        self.date_group_items.push(DateGroupItem::new(options)?);
        Ok(())
    }

    /// カレンダーの種類を設定
    pub fn set_calendar_type(&mut self, value: CalendarType) -> Result<(), XlsxPartError> {
        self.set("calendar_type", value.as_symbol())
    }

    /// 表示する値の一覧
    pub fn filter_items(&self) -> &[Filter] {
        &self.filter_items
    }

    /// 日付グループの一覧
    pub fn date_group_items(&self) -> &[DateGroupItem] {
        &self.date_group_items
    }

    fn shows_blank(&self) -> bool {
        self.properties.get_bool("blank").ok().flatten().unwrap_or(false)
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterPredicate for Filters {
    fn passes(&self, cell: Option<&Cell>) -> bool {
        let Some(cell) = cell else {
            return true;
        };

        match &cell.value {
            CellValue::Empty => self.shows_blank(),
            value => {
                let text = value.as_raw_string();
                if self.filter_items.iter().any(|item| item.val() == text) {
                    return true;
                }
                match value {
                    CellValue::Date(date) => {
                        self.date_group_items.iter().any(|item| item.matches(date))
                    }
                    _ => false,
                }
            }
        }
    }
}

impl Entity for Filters {
    fn schema() -> &'static EntitySchema {
        static SCHEMA: OnceLock<EntitySchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::builder("filters")
                .attribute("blank", ValidatorKind::Boolean, None)
                .attribute(
                    "calendar_type",
                    ValidatorKind::Symbol(CalendarType::SYMBOLS),
                    None,
                )
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
        let mut out = String::new();
        for item in &self.filter_items {
            out.push_str(&item.to_xml()?);
        }
        for item in &self.date_group_items {
            out.push_str(&item.to_xml()?);
        }
        Ok(out)
    }
}
