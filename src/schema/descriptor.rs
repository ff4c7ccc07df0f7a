//! Descriptor Module
//!
//! プロパティ記述子と、エンティティ型ごとの不変スキーマを定義します。
//!
//! スキーマは型の初回使用時に一度だけ構築され（`std::sync::OnceLock`）、
//! 以後は変更されません。宣言順がそのまま属性の出力順になります。

use tracing::debug;

use super::validators::{PropertyValue, ValidatorKind};
use crate::xml::camel;

/// プロパティのシリアライズ方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializeAs {
    /// 開始タグの属性として出力
    Attribute,

    /// プロパティ名の子要素（テキストノード）として出力
    Element,
}

/// 1つのプロパティの静的メタデータ
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    /// 宣言名（snake_case）
    name: &'static str,

    /// 出力名（lowerCamelCase、登録時に計算済み）
    xml_name: String,

    /// 検証種別
    kind: ValidatorKind,

    /// デフォルト値（`None`の場合は未設定扱い）
    default: Option<PropertyValue>,

    /// シリアライズ方式
    serialize_as: SerializeAs,
}

impl PropertyDescriptor {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn xml_name(&self) -> &str {
        &self.xml_name
    }

    pub fn kind(&self) -> ValidatorKind {
        self.kind
    }

    pub fn default_value(&self) -> Option<&PropertyValue> {
        self.default.as_ref()
    }

    pub fn serialize_as(&self) -> SerializeAs {
        self.serialize_as
    }
}

/// エンティティ型ごとの順序付きプロパティ記述子の集合
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    /// XMLタグ名
    tag: &'static str,

    /// 宣言順のプロパティ記述子
    properties: Vec<PropertyDescriptor>,

    /// 別名 -> 記述子インデックス
    aliases: Vec<(&'static str, usize)>,
}

impl EntitySchema {
    /// スキーマビルダーを生成
    pub fn builder(tag: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            tag,
            properties: Vec::new(),
            aliases: Vec::new(),
        }
    }

    /// XMLタグ名
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// 宣言順のプロパティ記述子
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// プロパティ名（または別名）から記述子のインデックスを取得
    pub fn position(&self, name: &str) -> Option<usize> {
        self.properties
            .iter()
            .position(|p| p.name == name)
            .or_else(|| {
                self.aliases
                    .iter()
                    .find(|(alias, _)| *alias == name)
                    .map(|(_, index)| *index)
            })
    }

    /// プロパティ名（または別名）から記述子を取得
    pub fn descriptor(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.position(name).map(|index| &self.properties[index])
    }
}

/// スキーマの構築を行うビルダー
///
/// エンティティ型の定義時にのみ使用されます。
///
/// # 使用例
///
/// ```rust
/// use xlsxpart::{EntitySchema, PropertyValue, SerializeAs, ValidatorKind};
///
/// let schema = EntitySchema::builder("pageSetup")
///     .attribute("fit_to_width", ValidatorKind::UnsignedInt, Some(PropertyValue::Integer(1)))
///     .attribute("fit_to_height", ValidatorKind::UnsignedInt, None)
///     .build();
///
/// assert_eq!(schema.properties()[0].xml_name(), "fitToWidth");
/// ```
#[derive(Debug)]
pub struct SchemaBuilder {
    tag: &'static str,
    properties: Vec<PropertyDescriptor>,
    aliases: Vec<(&'static str, usize)>,
}

impl SchemaBuilder {
    /// プロパティを1つ登録する
    ///
    /// # パニック
    ///
    /// 同じ名前（別名を含む）が既に登録されている場合。
    /// スキーマは型定義時に静的に構築されるため、重複は定義側の誤りです。
    pub fn define_property(
        mut self,
        name: &'static str,
        kind: ValidatorKind,
        default: Option<PropertyValue>,
        serialize_as: SerializeAs,
    ) -> Self {
        assert!(
            !self.is_defined(name),
            "property '{}' is already defined for <{}>",
            name,
            self.tag
        );

        self.properties.push(PropertyDescriptor {
            name,
            xml_name: camel(name),
            kind,
            default,
            serialize_as,
        });
        self
    }

    /// 属性として出力されるプロパティを登録する
    pub fn attribute(
        self,
        name: &'static str,
        kind: ValidatorKind,
        default: Option<PropertyValue>,
    ) -> Self {
        self.define_property(name, kind, default, SerializeAs::Attribute)
    }

    /// 子要素として出力されるプロパティを登録する
    pub fn element(
        self,
        name: &'static str,
        kind: ValidatorKind,
        default: Option<PropertyValue>,
    ) -> Self {
        self.define_property(name, kind, default, SerializeAs::Element)
    }

    /// 既存プロパティの別名を登録する
    ///
    /// 別名は同じ値スロットを読み書きし、同じ検証を通ります。
    /// 別名自体は出力されません。
    ///
    /// # パニック
    ///
    /// `target`が未登録、または`alias`が既に使われている場合。
    pub fn alias(mut self, alias: &'static str, target: &'static str) -> Self {
        assert!(
            !self.is_defined(alias),
            "alias '{}' is already defined for <{}>",
            alias,
            self.tag
        );
        let index = self
            .properties
            .iter()
            .position(|p| p.name == target);
        match index {
            Some(index) => self.aliases.push((alias, index)),
            None => panic!(
                "alias target '{}' is not defined for <{}>",
                target, self.tag
            ),
        }
        self
    }

    /// スキーマを確定する
    pub fn build(self) -> EntitySchema {
        debug!(
            tag = self.tag,
            properties = self.properties.len(),
            aliases = self.aliases.len(),
            "registered entity schema"
        );

        EntitySchema {
            tag: self.tag,
            properties: self.properties,
            aliases: self.aliases,
        }
    }

    fn is_defined(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name == name)
            || self.aliases.iter().any(|(alias, _)| *alias == name)
    }
}
