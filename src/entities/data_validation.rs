//! Data Validation Module
//!
//! ワークシートのデータ入力規則（`<dataValidation>`）と、
//! その集合（`<dataValidations>`）を定義するモジュール。

use std::sync::OnceLock;

use serde_json::Value;

use crate::api::{ErrorStyle, ValidationOperator, ValidationType};
use crate::entity::Entity;
use crate::error::XlsxPartError;
use crate::schema::{EntitySchema, PropertyBag, PropertyDescriptor, PropertyValue, ValidatorKind};
use crate::xml;

/// データ入力規則
///
/// 出力される属性は規則の種類に依存します。
///
/// | 種類 | 追加で出力されるもの |
/// |------|----------------------|
/// | `whole` / `decimal` / `date` / `time` / `text_length` | `operator`, `formula1`（範囲演算子なら`formula2`も） |
/// | `list` | `showDropDown`, `formula1` |
/// | `custom` | `formula1` |
/// | `none` | なし |
///
/// # 使用例
///
/// ```rust
/// use xlsxpart::{DataValidation, Entity, ValidationType};
///
/// # fn main() -> Result<(), xlsxpart::XlsxPartError> {
/// let mut rule = DataValidation::new();
/// rule.set_validation_type(ValidationType::List)?;
/// rule.set("formula1", "\"Yes,No\"")?;
/// rule.set("sqref", "A1:A10")?;
///
/// let xml = rule.to_xml()?;
/// assert!(xml.starts_with(r#"<dataValidation type="list" errorStyle="stop" allowBlank="1""#));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataValidation {
    properties: PropertyBag,
}

impl DataValidation {
    /// デフォルト値で規則を生成
    pub fn new() -> Self {
        Self {
            properties: PropertyBag::new(Self::schema()),
        }
    }

    /// 設定オブジェクトを適用した規則を生成
    pub fn with_options(options: &Value) -> Result<Self, XlsxPartError> {
        Ok(Self {
            properties: PropertyBag::with_options(Self::schema(), options)?,
        })
    }

    /// 規則の種類
    pub fn validation_type(&self) -> ValidationType {
        self.properties
            .get_str("type")
            .ok()
            .flatten()
            .and_then(ValidationType::from_symbol)
            .unwrap_or(ValidationType::None)
    }

    /// 規則の種類を設定
    pub fn set_validation_type(&mut self, value: ValidationType) -> Result<(), XlsxPartError> {
        self.set("type", value.as_symbol())
    }

    /// 比較演算子を設定
    pub fn set_operator(&mut self, value: ValidationOperator) -> Result<(), XlsxPartError> {
        self.set("operator", value.as_symbol())
    }

    /// エラーメッセージのスタイルを設定
    pub fn set_error_style(&mut self, value: ErrorStyle) -> Result<(), XlsxPartError> {
        self.set("error_style", value.as_symbol())
    }

    /// ドロップダウン矢印の表示フラグ（`hide_drop_down`と同じ値）
    pub fn show_drop_down(&self) -> bool {
        self.properties
            .get_bool("show_drop_down")
            .ok()
            .flatten()
            .unwrap_or(false)
    }

    fn uses_range_operator(&self) -> bool {
        self.properties
            .get_str("operator")
            .ok()
            .flatten()
            .map(ValidationOperator::is_range_operator)
            .unwrap_or(false)
    }
}

impl Default for DataValidation {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for DataValidation {
    fn schema() -> &'static EntitySchema {
        static SCHEMA: OnceLock<EntitySchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::builder("dataValidation")
                .element("formula1", ValidatorKind::String, None)
                .element("formula2", ValidatorKind::String, None)
                .attribute("type", ValidatorKind::Symbol(ValidationType::SYMBOLS), Some("none".into()))
                .attribute("error_style", ValidatorKind::Symbol(ErrorStyle::SYMBOLS), Some("stop".into()))
                .attribute(
                    "operator",
                    ValidatorKind::Symbol(ValidationOperator::SYMBOLS),
                    Some("between".into()),
                )
                .attribute("allow_blank", ValidatorKind::Boolean, Some(true.into()))
                .attribute("show_drop_down", ValidatorKind::Boolean, Some(false.into()))
                .attribute("show_input_message", ValidatorKind::Boolean, Some(false.into()))
                .attribute("show_error_message", ValidatorKind::Boolean, Some(false.into()))
                .attribute("error_title", ValidatorKind::String, Some("".into()))
                .attribute("error", ValidatorKind::String, Some("".into()))
                .attribute("prompt_title", ValidatorKind::String, Some("".into()))
                .attribute("prompt", ValidatorKind::String, Some("".into()))
                .attribute("sqref", ValidatorKind::String, None)
                .alias("hide_drop_down", "show_drop_down")
                .build()
        })
    }

    fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    fn emits(&self, descriptor: &PropertyDescriptor) -> bool {
        let kind = self.validation_type();
        match descriptor.name() {
            "operator" => kind.uses_operator(),
            "formula1" => {
                kind.uses_operator()
                    || matches!(kind, ValidationType::List | ValidationType::Custom)
            }
            "formula2" => kind.uses_operator() && self.uses_range_operator(),
            "show_drop_down" => kind == ValidationType::List,
            _ => true,
        }
    }
}

/// データ入力規則の集合（`<dataValidations count="n">`）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataValidations {
    items: Vec<DataValidation>,
}

impl DataValidations {
    /// 空の集合を生成
    pub fn new() -> Self {
        Self::default()
    }

    /// 規則を追加
    pub fn push(&mut self, rule: DataValidation) {
        self.items.push(rule);
    }

    /// 設定オブジェクトから規則を生成して追加
    pub fn add(&mut self, options: &Value) -> Result<&mut DataValidation, XlsxPartError> {
        self.items.push(DataValidation::with_options(options)?);
        let last = self.items.len() - 1;
        Ok(&mut self.items[last])
    }

    /// 規則の数
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 規則がないかどうか
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// すべての規則
    pub fn iter(&self) -> impl Iterator<Item = &DataValidation> {
        self.items.iter()
    }

    /// XML断片として出力する（規則がない場合は空文字列）
    pub fn to_xml(&self) -> Result<String, XlsxPartError> {
        if self.items.is_empty() {
            return Ok(String::new());
        }

        let mut body = String::new();
        for rule in &self.items {
            body.push_str(&rule.to_xml()?);
        }

        let count = xml::format_value(&PropertyValue::Integer(self.items.len() as i64));
        xml::serialize_element("dataValidations", &[("count".to_string(), count)], Some(&body))
    }
}
