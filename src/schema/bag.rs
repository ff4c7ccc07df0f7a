//! Property Bag Module
//!
//! エンティティインスタンスの現在値を保持し、検証付きの読み書きを提供します。
//! 保持される値はすべて検証を通過しており、未検証の値が入ることはありません。

use serde_json::{Map, Value};

use super::descriptor::{EntitySchema, PropertyDescriptor};
use super::validators::PropertyValue;
use crate::error::XlsxPartError;

/// エンティティインスタンスのプロパティ値
///
/// 値はスキーマの宣言順に並んだスロットに格納され、
/// 生成時にスキーマのデフォルト値で初期化されます。
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyBag {
    /// 対応するスキーマ（プロセス全体で共有・不変）
    schema: &'static EntitySchema,

    /// 宣言順の値スロット
    values: Vec<Option<PropertyValue>>,
}

impl PropertyBag {
    /// デフォルト値で初期化されたインスタンスを生成
    pub fn new(schema: &'static EntitySchema) -> Self {
        let values = schema
            .properties()
            .iter()
            .map(|p| p.default_value().cloned())
            .collect();
        Self { schema, values }
    }

    /// デフォルト値で初期化し、設定オブジェクトを適用したインスタンスを生成
    ///
    /// # 戻り値
    ///
    /// * `Ok(PropertyBag)` - すべての値が検証に成功した場合
    /// * `Err(XlsxPartError::InvalidValue)` - 最初に検証に失敗した値
    pub fn with_options(
        schema: &'static EntitySchema,
        options: &Value,
    ) -> Result<Self, XlsxPartError> {
        let mut bag = Self::new(schema);
        bag.apply_options(options)?;
        Ok(bag)
    }

    /// 対応するスキーマ
    pub fn schema(&self) -> &'static EntitySchema {
        self.schema
    }

    /// 宣言順の記述子と現在値の組を返す
    pub fn entries(&self) -> impl Iterator<Item = (&PropertyDescriptor, Option<&PropertyValue>)> {
        self.schema
            .properties()
            .iter()
            .zip(self.values.iter().map(|v| v.as_ref()))
    }

    /// プロパティの現在値を取得（別名も可）
    ///
    /// 一度も設定されていない場合はデフォルト値、
    /// デフォルト値もない場合は`None`を返します。
    pub fn get(&self, name: &str) -> Result<Option<&PropertyValue>, XlsxPartError> {
        let index = self.position(name)?;
        Ok(self.values[index].as_ref())
    }

    /// 論理値プロパティを取得
    pub fn get_bool(&self, name: &str) -> Result<Option<bool>, XlsxPartError> {
        Ok(self.get(name)?.and_then(PropertyValue::as_bool))
    }

    /// 文字列（列挙シンボルを含む）プロパティを取得
    pub fn get_str(&self, name: &str) -> Result<Option<&str>, XlsxPartError> {
        Ok(self.get(name)?.and_then(PropertyValue::as_str))
    }

    /// 数値プロパティを取得
    pub fn get_f64(&self, name: &str) -> Result<Option<f64>, XlsxPartError> {
        Ok(self.get(name)?.and_then(PropertyValue::as_f64))
    }

    /// 整数プロパティを取得
    pub fn get_i64(&self, name: &str) -> Result<Option<i64>, XlsxPartError> {
        Ok(self.get(name)?.and_then(PropertyValue::as_i64))
    }

    /// プロパティに値を書き込む（別名も可）
    ///
    /// 値はプロパティの検証種別で検証され、成功した場合のみ保存されます。
    /// 失敗した場合、インスタンスは変更されません。
    pub fn set(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), XlsxPartError> {
        let index = self.position(name)?;
        let descriptor = &self.schema.properties()[index];
        let value = descriptor.kind().validate(name, value.into())?;
        self.values[index] = Some(value);
        Ok(())
    }

    /// 設定オブジェクトを適用する
    ///
    /// キーの順に`set`を呼び出します。スキーマにないキーは無視されますが、
    /// 検証に失敗したキーがあればそこで中断してエラーを返します
    /// （それ以前のキーは適用済みのまま残ります）。
    /// `null`は空の設定として扱います。
    pub fn apply_options(&mut self, options: &Value) -> Result<(), XlsxPartError> {
        let map = match options {
            Value::Null => return Ok(()),
            Value::Object(map) => map,
            other => return Err(XlsxPartError::invalid_value("options", "object", other)),
        };

        for (key, raw) in map {
            if self.schema.position(key).is_none() {
                continue;
            }
            let value = PropertyValue::from_json(key, raw)?;
            self.set(key, value)?;
        }

        Ok(())
    }

    /// 現在値をJSONオブジェクトとして出力（未設定のプロパティは含まない）
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (descriptor, value) in self.entries() {
            if let Some(value) = value {
                if let Ok(json) = serde_json::to_value(value) {
                    map.insert(descriptor.name().to_string(), json);
                }
            }
        }
        Value::Object(map)
    }

    fn position(&self, name: &str) -> Result<usize, XlsxPartError> {
        self.schema
            .position(name)
            .ok_or_else(|| XlsxPartError::UnknownProperty {
                entity: self.schema.tag().to_string(),
                property: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidatorKind;
    use serde_json::json;
    use std::sync::OnceLock;

    const STYLES: &[&str] = &["stop", "warning", "information"];

    fn schema() -> &'static EntitySchema {
        static SCHEMA: OnceLock<EntitySchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::builder("sample")
                .attribute("error_style", ValidatorKind::Symbol(STYLES), Some("stop".into()))
                .attribute("show_drop_down", ValidatorKind::Boolean, Some(false.into()))
                .attribute("left", ValidatorKind::UnsignedNumeric, Some(0.75.into()))
                .attribute("sqref", ValidatorKind::String, None)
                .alias("hide_drop_down", "show_drop_down")
                .build()
        })
    }

    #[test]
    fn test_new_uses_defaults() {
        let bag = PropertyBag::new(schema());
        assert_eq!(bag.get_str("error_style").unwrap(), Some("stop"));
        assert_eq!(bag.get_bool("show_drop_down").unwrap(), Some(false));
        assert_eq!(bag.get_f64("left").unwrap(), Some(0.75));
        assert_eq!(bag.get("sqref").unwrap(), None);
    }

    #[test]
    fn test_set_validates_before_storing() {
        let mut bag = PropertyBag::new(schema());
        bag.set("left", 1.25).unwrap();
        assert_eq!(bag.get_f64("left").unwrap(), Some(1.25));

        let result = bag.set("left", -2.0);
        assert!(matches!(result, Err(XlsxPartError::InvalidValue { .. })));
        // 失敗時は変更前の値が残る
        assert_eq!(bag.get_f64("left").unwrap(), Some(1.25));
    }

    #[test]
    fn test_every_kind_rejects_out_of_kind_values() {
        let mut bag = PropertyBag::new(schema());
        let before = bag.clone();

        assert!(bag.set("error_style", "fatal").is_err());
        assert!(bag.set("show_drop_down", "yes").is_err());
        assert!(bag.set("left", "wide").is_err());
        assert!(bag.set("sqref", 5).is_err());

        assert_eq!(bag, before);
    }

    #[test]
    fn test_unknown_property() {
        let mut bag = PropertyBag::new(schema());
        match bag.set("gutter", 1.0) {
            Err(XlsxPartError::UnknownProperty { entity, property }) => {
                assert_eq!(entity, "sample");
                assert_eq!(property, "gutter");
            }
            other => panic!("Expected UnknownProperty, got {:?}", other),
        }
        assert!(bag.get("gutter").is_err());
    }

    #[test]
    fn test_alias_shares_slot() {
        let mut bag = PropertyBag::new(schema());

        bag.set("hide_drop_down", true).unwrap();
        assert_eq!(bag.get_bool("show_drop_down").unwrap(), Some(true));

        bag.set("show_drop_down", false).unwrap();
        assert_eq!(bag.get_bool("hide_drop_down").unwrap(), Some(false));

        // 別名も論理値検証を通る
        assert!(bag.set("hide_drop_down", 1).is_err());
    }

    #[test]
    fn test_apply_options_ignores_unknown_keys() {
        let bag = PropertyBag::with_options(
            schema(),
            &json!({ "left": 2, "gutter": 9, "sqref": "A1:A5" }),
        )
        .unwrap();

        assert_eq!(bag.get_f64("left").unwrap(), Some(2.0));
        assert_eq!(bag.get_str("sqref").unwrap(), Some("A1:A5"));
    }

    #[test]
    fn test_apply_options_stops_at_first_invalid_key() {
        let mut bag = PropertyBag::new(schema());
        // キーの順（辞書順）: error_style, left, sqref
        let result = bag.apply_options(&json!({
            "error_style": "warning",
            "left": -1,
            "sqref": "B2"
        }));

        assert!(matches!(result, Err(XlsxPartError::InvalidValue { ref property, .. }) if property == "left"));
        assert_eq!(bag.get_str("error_style").unwrap(), Some("warning"));
        assert_eq!(bag.get_f64("left").unwrap(), Some(0.75));
        assert_eq!(bag.get("sqref").unwrap(), None);
    }

    #[test]
    fn test_apply_options_null_and_non_object() {
        let mut bag = PropertyBag::new(schema());
        assert!(bag.apply_options(&Value::Null).is_ok());
        assert!(bag.apply_options(&json!([1, 2])).is_err());
        assert!(bag.apply_options(&json!({ "sqref": null })).is_err());
    }

    #[test]
    fn test_to_json_skips_absent_values() {
        let mut bag = PropertyBag::new(schema());
        bag.set("hide_drop_down", true).unwrap();

        assert_eq!(
            bag.to_json(),
            json!({
                "error_style": "stop",
                "show_drop_down": true,
                "left": 0.75
            })
        );
    }
}
