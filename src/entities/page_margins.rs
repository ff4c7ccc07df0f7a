//! Page Margins Module
//!
//! 印刷時のページ余白（`<pageMargins>`）を定義するモジュール。
//! 値はすべてインチ単位の非負数です。

use std::sync::OnceLock;

use serde_json::Value;

use crate::entity::Entity;
use crate::error::XlsxPartError;
use crate::schema::{EntitySchema, PropertyBag, ValidatorKind};

/// ページ余白
///
/// # 使用例
///
/// ```rust
/// use xlsxpart::{Entity, PageMargins};
/// use serde_json::json;
///
/// # fn main() -> Result<(), xlsxpart::XlsxPartError> {
/// let mut margins = PageMargins::new();
/// margins.set_margins(&json!({ "left": 1, "right": 1.25 }))?;
///
/// assert_eq!(
///     margins.to_xml()?,
///     r#"<pageMargins left="1" right="1.25" top="1" bottom="1" header="0.5" footer="0.5"/>"#
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageMargins {
    properties: PropertyBag,
}

impl PageMargins {
    /// デフォルトの余白で生成
    pub fn new() -> Self {
        Self {
            properties: PropertyBag::new(Self::schema()),
        }
    }

    /// 設定オブジェクトを適用した余白を生成
    pub fn with_options(options: &Value) -> Result<Self, XlsxPartError> {
        Ok(Self {
            properties: PropertyBag::with_options(Self::schema(), options)?,
        })
    }

    /// 複数の余白をまとめて設定する
    ///
    /// 未知のキーは無視されます。最初の不正な値でエラーを返し、
    /// それより前のキーは適用済みのまま残ります。
    pub fn set_margins(&mut self, options: &Value) -> Result<(), XlsxPartError> {
        self.apply_options(options)
    }

    pub fn left(&self) -> f64 {
        self.margin("left")
    }

    pub fn right(&self) -> f64 {
        self.margin("right")
    }

    pub fn top(&self) -> f64 {
        self.margin("top")
    }

    pub fn bottom(&self) -> f64 {
        self.margin("bottom")
    }

    pub fn header(&self) -> f64 {
        self.margin("header")
    }

    pub fn footer(&self) -> f64 {
        self.margin("footer")
    }

    // すべての余白はデフォルト値を持つため、未設定にはならない
    fn margin(&self, name: &str) -> f64 {
        self.properties
            .get_f64(name)
            .ok()
            .flatten()
            .unwrap_or_default()
    }
}

impl Default for PageMargins {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for PageMargins {
    fn schema() -> &'static EntitySchema {
        static SCHEMA: OnceLock<EntitySchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            EntitySchema::builder("pageMargins")
                .attribute("left", ValidatorKind::UnsignedNumeric, Some(0.75.into()))
                .attribute("right", ValidatorKind::UnsignedNumeric, Some(0.75.into()))
                .attribute("top", ValidatorKind::UnsignedNumeric, Some(1.0.into()))
                .attribute("bottom", ValidatorKind::UnsignedNumeric, Some(1.0.into()))
                .attribute("header", ValidatorKind::UnsignedNumeric, Some(0.5.into()))
                .attribute("footer", ValidatorKind::UnsignedNumeric, Some(0.5.into()))
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
