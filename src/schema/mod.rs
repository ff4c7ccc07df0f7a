//! Schema Module
//!
//! 宣言的なプロパティスキーマと、検証付きプロパティアクセサを提供するモジュール。
//!
//! - `validators`: プリミティブ型ごとの検証関数群（`ValidatorKind`）
//! - `descriptor`: プロパティ記述子とエンティティ型ごとのスキーマ
//! - `bag`: エンティティインスタンスのプロパティ値（`PropertyBag`）

mod bag;
mod descriptor;
mod validators;

pub use bag::PropertyBag;
pub use descriptor::{EntitySchema, PropertyDescriptor, SchemaBuilder, SerializeAs};
pub use validators::{PropertyValue, ValidatorKind};
