//! Validators Module
//!
//! プロパティ値の型と、プリミティブ種別ごとの検証処理を提供します。
//! 検証は型変換を行わず、種別に合わない値は即座に`InvalidValue`で拒否されます。

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::XlsxPartError;

/// プロパティに保持される値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// 論理値
    Bool(bool),

    /// 整数
    Integer(i64),

    /// 実数
    Number(f64),

    /// 文字列（列挙シンボルを含む）
    Text(String),
}

impl PropertyValue {
    /// 論理値として取得
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// 文字列として取得
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 整数として取得
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// 数値として取得（整数も含む）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Integer(i) => Some(*i as f64),
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// JSON値から変換
    ///
    /// `null`、配列、オブジェクトはプロパティ値として扱えないため拒否されます。
    pub(crate) fn from_json(property: &str, value: &Value) -> Result<Self, XlsxPartError> {
        match value {
            Value::Bool(b) => Ok(PropertyValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(PropertyValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(PropertyValue::Number(f))
                } else {
                    Err(XlsxPartError::invalid_value(property, "scalar", n))
                }
            }
            Value::String(s) => Ok(PropertyValue::Text(s.clone())),
            other => Err(XlsxPartError::invalid_value(property, "scalar", other)),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Number(n) => write!(f, "{}", n),
            PropertyValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Integer(value as i64)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Integer(value as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

/// プロパティの検証種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorKind {
    /// 文字列
    String,

    /// 論理値（`true` / `false`）
    Boolean,

    /// 0以上の32ビット整数（`xsd:unsignedInt`）
    UnsignedInt,

    /// 0以上の数値（整数・実数）
    UnsignedNumeric,

    /// 整数
    Int,

    /// 数値（整数・実数）
    Float,

    /// 許可集合に含まれる列挙シンボル
    Symbol(&'static [&'static str]),
}

impl ValidatorKind {
    /// 値を検証する
    ///
    /// # 引数
    ///
    /// * `property` - エラーメッセージに含めるプロパティ名
    /// * `value` - 検証する値
    ///
    /// # 戻り値
    ///
    /// * `Ok(PropertyValue)` - 検証に成功した値（変換なし）
    /// * `Err(XlsxPartError::InvalidValue)` - 種別に合わない値
    pub fn validate(
        &self,
        property: &str,
        value: PropertyValue,
    ) -> Result<PropertyValue, XlsxPartError> {
        let valid = match (self, &value) {
            (ValidatorKind::String, PropertyValue::Text(_)) => true,
            (ValidatorKind::Boolean, PropertyValue::Bool(_)) => true,
            (ValidatorKind::UnsignedInt, PropertyValue::Integer(i)) => u32::try_from(*i).is_ok(),
            (ValidatorKind::UnsignedNumeric, PropertyValue::Integer(i)) => *i >= 0,
            (ValidatorKind::UnsignedNumeric, PropertyValue::Number(n)) => n.is_finite() && *n >= 0.0,
            (ValidatorKind::Int, PropertyValue::Integer(_)) => true,
            (ValidatorKind::Float, PropertyValue::Integer(_)) => true,
            (ValidatorKind::Float, PropertyValue::Number(n)) => n.is_finite(),
            (ValidatorKind::Symbol(allowed), PropertyValue::Text(s)) => allowed.contains(&s.as_str()),
            _ => false,
        };

        if valid {
            Ok(value)
        } else {
            Err(XlsxPartError::invalid_value(property, self.describe(), &value))
        }
    }

    /// 種別の説明文字列（エラーメッセージ用）
    pub fn describe(&self) -> String {
        match self {
            ValidatorKind::String => "string".to_string(),
            ValidatorKind::Boolean => "boolean".to_string(),
            ValidatorKind::UnsignedInt => "unsigned integer".to_string(),
            ValidatorKind::UnsignedNumeric => "unsigned numeric".to_string(),
            ValidatorKind::Int => "integer".to_string(),
            ValidatorKind::Float => "numeric".to_string(),
            ValidatorKind::Symbol(allowed) => format!("one of [{}]", allowed.join(", ")),
        }
    }

    /// 識別子（列挙シンボル）を保持する種別かどうか
    pub fn is_symbol(&self) -> bool {
        matches!(self, ValidatorKind::Symbol(_))
    }
}
