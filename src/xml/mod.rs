//! XML Serialization Module
//!
//! スキーマと現在値からXML断片を生成するシリアライズエンジン。
//! `quick-xml`の`Writer`で開始タグ・属性・終了タグを書き出します。
//!
//! 出力はスキーマの宣言順のみに依存し、同じ状態からは常に同じバイト列が得られます。

use std::borrow::Cow;
use std::io::{Cursor, Write};

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::entity::Entity;
use crate::error::XlsxPartError;
use crate::schema::{PropertyBag, PropertyDescriptor, PropertyValue, SerializeAs};

/// 論理値`true`の出力トークン
pub const TRUE_TOKEN: &str = "1";

/// 論理値`false`の出力トークン
pub const FALSE_TOKEN: &str = "0";

/// snake_caseの識別子をlowerCamelCaseに変換する
///
/// 既にcamelCaseの識別子はそのまま返されます。
///
/// ```rust
/// use xlsxpart::xml::camel;
///
/// assert_eq!(camel("show_drop_down"), "showDropDown");
/// assert_eq!(camel("colId"), "colId");
/// ```
pub fn camel(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper_next = false;

    for ch in name.chars() {
        if ch == '_' {
            upper_next = !result.is_empty();
            continue;
        }
        if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }

    result
}

/// 値を正規の文字列表現に変換する
///
/// 論理値は`TRUE_TOKEN` / `FALSE_TOKEN`、それ以外は通常の文字列変換です。
pub fn format_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Bool(true) => TRUE_TOKEN.to_string(),
        PropertyValue::Bool(false) => FALSE_TOKEN.to_string(),
        other => other.to_string(),
    }
}

/// 記述子に従って値を出力文字列に変換（内部ヘルパー）
fn render_value(
    descriptor: Option<&PropertyDescriptor>,
    value: &PropertyValue,
    camelize_values: bool,
) -> String {
    let text = format_value(value);
    let is_identifier = descriptor.map(|d| d.kind().is_symbol()).unwrap_or(false);
    if camelize_values && is_identifier {
        camel(&text)
    } else {
        text
    }
}

/// 属性として出力する(名前, 値)の組を宣言順に生成する
///
/// # 引数
///
/// * `bag` - エンティティの現在値
/// * `extra` - 追加の属性。宣言済みの名前と一致する場合はその位置で値を上書きし、
///   それ以外は末尾に追加されます
/// * `camelize_values` - 列挙シンボル値をlowerCamelCaseに変換するか
///
/// 値が`None`のプロパティと、子要素として出力されるプロパティは含まれません。
pub fn serialize_attributes(
    bag: &PropertyBag,
    extra: &[(&str, PropertyValue)],
    camelize_values: bool,
) -> Vec<(String, String)> {
    serialize_attributes_filtered(bag, extra, camelize_values, |_| true)
}

/// `serialize_attributes`に出力対象の絞り込みを加えたもの
///
/// `include`が`false`を返した記述子は出力されません。
pub fn serialize_attributes_filtered<F>(
    bag: &PropertyBag,
    extra: &[(&str, PropertyValue)],
    camelize_values: bool,
    include: F,
) -> Vec<(String, String)>
where
    F: Fn(&PropertyDescriptor) -> bool,
{
    let mut attributes: Vec<(String, String)> = bag
        .entries()
        .filter(|(d, _)| d.serialize_as() == SerializeAs::Attribute && include(*d))
        .filter_map(|(d, value)| {
            value.map(|v| (d.xml_name().to_string(), render_value(Some(d), v, camelize_values)))
        })
        .collect();

    for (name, value) in extra {
        let descriptor = bag.schema().descriptor(name);
        let xml_name = descriptor
            .map(|d| d.xml_name().to_string())
            .unwrap_or_else(|| camel(name));
        let rendered = render_value(descriptor, value, camelize_values);

        match attributes.iter_mut().find(|(n, _)| *n == xml_name) {
            Some(existing) => existing.1 = rendered,
            None => attributes.push((xml_name, rendered)),
        }
    }

    attributes
}

/// 要素を1つ書き出す
///
/// `body`が`None`の場合は自己終了タグ（`<tag a="v"/>`）、
/// それ以外は本文（XML断片としてそのまま挿入）と終了タグを出力します。
/// 属性値はXMLエスケープされます。
pub fn serialize_element(
    tag: &str,
    attributes: &[(String, String)],
    body: Option<&str>,
) -> Result<String, XlsxPartError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    let mut start = BytesStart::new(tag);
    for (name, value) in attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    match body {
        None => writer.write_event(Event::Empty(start))?,
        Some(body) => {
            writer.write_event(Event::Start(start))?;
            writer.get_mut().write_all(body.as_bytes())?;
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
    }

    let bytes = writer.into_inner().into_inner();
    Ok(std::str::from_utf8(&bytes)?.to_string())
}

/// テキストノードのみを持つ要素を書き出す（テキストはエスケープされる）
pub fn text_element(tag: &str, text: &str) -> Result<String, XlsxPartError> {
    let escaped: Cow<str> = quick_xml::escape::escape(text);
    serialize_element(tag, &[], Some(&escaped))
}

/// 子要素として宣言されたプロパティを宣言順に書き出す
///
/// 値が`None`のプロパティは出力されません。
pub fn serialize_element_properties(bag: &PropertyBag) -> Result<String, XlsxPartError> {
    serialize_element_properties_filtered(bag, |_| true)
}

/// `serialize_element_properties`に出力対象の絞り込みを加えたもの
pub fn serialize_element_properties_filtered<F>(
    bag: &PropertyBag,
    include: F,
) -> Result<String, XlsxPartError>
where
    F: Fn(&PropertyDescriptor) -> bool,
{
    let mut out = String::new();
    for (descriptor, value) in bag.entries() {
        if descriptor.serialize_as() != SerializeAs::Element || !include(descriptor) {
            continue;
        }
        if let Some(value) = value {
            out.push_str(&text_element(descriptor.xml_name(), &value.to_string())?);
        }
    }
    Ok(out)
}

/// エンティティ全体を1つの要素として書き出す
///
/// 属性、子要素プロパティ、`Entity::child_xml`の順に出力します。
/// 本文が空の場合は自己終了タグになります。
pub fn write_entity<E: Entity + ?Sized>(entity: &E) -> Result<String, XlsxPartError> {
    let bag = entity.properties();
    let extra = entity.extra_attributes();
    let extra_refs: Vec<(&str, PropertyValue)> = extra
        .iter()
        .map(|(name, value)| (name.as_str(), value.clone()))
        .collect();

    let attributes =
        serialize_attributes_filtered(bag, &extra_refs, true, |d| entity.emits(d));

    let mut body = serialize_element_properties_filtered(bag, |d| entity.emits(d))?;
    body.push_str(&entity.child_xml()?);

    let body = if body.is_empty() { None } else { Some(body.as_str()) };
    serialize_element(bag.schema().tag(), &attributes, body)
}
