//! Entity Module
//!
//! 型ごとのスキーマとXMLタグを結び付ける`Entity`トレイトを定義するモジュール。

use crate::error::XlsxPartError;
use crate::schema::{EntitySchema, PropertyBag, PropertyDescriptor, PropertyValue};

/// スキーマで宣言されたプロパティを持つ文書エンティティ
///
/// 実装側は型ごとに一度だけ構築される`'static`なスキーマを返し、
/// 値は`PropertyBag`に保持します。読み書きは既定実装の`get` / `set`を経由し、
/// 書き込みは必ず検証されます。
///
/// # 使用例
///
/// ```rust
/// use xlsxpart::{Entity, PageMargins};
///
/// # fn main() -> Result<(), xlsxpart::XlsxPartError> {
/// let mut margins = PageMargins::new();
/// margins.set("top", 1.5)?;
/// assert_eq!(margins.get_f64("top")?, Some(1.5));
/// # Ok(())
/// # }
/// ```
pub trait Entity {
    /// 型ごとの不変スキーマ
    fn schema() -> &'static EntitySchema
    where
        Self: Sized;

    /// 現在値
    fn properties(&self) -> &PropertyBag;

    /// 現在値（可変）
    fn properties_mut(&mut self) -> &mut PropertyBag;

    /// プロパティの現在値を取得
    fn get(&self, name: &str) -> Result<Option<&PropertyValue>, XlsxPartError> {
        self.properties().get(name)
    }

    /// 論理値プロパティを取得
    fn get_bool(&self, name: &str) -> Result<Option<bool>, XlsxPartError> {
        self.properties().get_bool(name)
    }

    /// 文字列プロパティを取得
    fn get_str(&self, name: &str) -> Result<Option<&str>, XlsxPartError> {
        self.properties().get_str(name)
    }

    /// 数値プロパティを取得
    fn get_f64(&self, name: &str) -> Result<Option<f64>, XlsxPartError> {
        self.properties().get_f64(name)
    }

    /// 検証してからプロパティに書き込む
    fn set<V>(&mut self, name: &str, value: V) -> Result<(), XlsxPartError>
    where
        Self: Sized,
        V: Into<PropertyValue>,
    {
        self.properties_mut().set(name, value)
    }

    /// 設定オブジェクトを適用する（未知のキーは無視、最初の不正値で中断）
    fn apply_options(&mut self, options: &serde_json::Value) -> Result<(), XlsxPartError> {
        self.properties_mut().apply_options(options)
    }

    /// 現在の状態でこのプロパティを出力するかどうか
    fn emits(&self, _descriptor: &PropertyDescriptor) -> bool {
        true
    }

    /// スキーマ外の追加属性（宣言済みの名前なら値を上書き）
    fn extra_attributes(&self) -> Vec<(String, PropertyValue)> {
        Vec::new()
    }

    /// 子要素プロパティの後に続く子エンティティのXML
    fn child_xml(&self) -> Result<String, XlsxPartError> {
        Ok(String::new())
    }

    /// エンティティをXML断片として出力する
    fn to_xml(&self) -> Result<String, XlsxPartError> {
        crate::xml::write_entity(self)
    }
}
