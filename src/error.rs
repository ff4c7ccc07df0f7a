//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsxpartクレート全体で使用するエラー型
///
/// プロパティの検証、範囲文字列の解析、XML断片の生成中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `InvalidValue`: プロパティへの書き込みが検証に失敗した（値は保存されない）
/// - `UnknownProperty`: スキーマに存在しないプロパティ名でアクセスした
/// - `MissingCollaborator`: 範囲やワークシートが必要な操作をそれなしで呼び出した
/// - `MalformedRange`: 範囲文字列が2つの端点に解析できない
/// - `Xml` / `Io` / `Utf8`: XML書き出し時の下位エラー
///
/// # 使用例
///
/// ```rust
/// use xlsxpart::{Entity, PageMargins, XlsxPartError};
///
/// let mut margins = PageMargins::new();
/// match margins.set("left", -1.0) {
///     Err(XlsxPartError::InvalidValue { property, .. }) => assert_eq!(property, "left"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxPartError {
    /// プロパティ値が検証に失敗したエラー
    ///
    /// 値は保存されず、インスタンスは変更前の状態のまま残ります。
    #[error("Invalid value for property '{property}' (expected {expected}): {value}")]
    InvalidValue {
        /// 書き込もうとしたプロパティ名
        property: String,
        /// 期待された値の種類
        expected: String,
        /// 拒否された値の表示文字列
        value: String,
    },

    /// スキーマに存在しないプロパティ名が指定されたエラー
    ///
    /// 設定オブジェクト経由の適用では未知のキーは無視されるため、
    /// このエラーは`get`/`set`を直接呼び出した場合にのみ発生します。
    #[error("Unknown property '{property}' for <{entity}>")]
    UnknownProperty {
        /// エンティティのXMLタグ名
        entity: String,
        /// 指定されたプロパティ名
        property: String,
    },

    /// 必要な協調オブジェクト（範囲など）が設定されていないエラー
    #[error("Missing collaborator: {0}")]
    MissingCollaborator(String),

    /// 範囲文字列の形式が不正なエラー
    ///
    /// `A1:B3`のようにコロンで区切られた2つのA1形式の端点が必要です。
    #[error("Malformed range: {0}")]
    MalformedRange(String),

    /// XML書き出し中に発生したエラー
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// I/O操作中に発生したエラー
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8文字列の変換エラー
    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl XlsxPartError {
    /// `InvalidValue`エラーを生成する（内部ヘルパー）
    pub(crate) fn invalid_value(
        property: &str,
        expected: impl Into<String>,
        value: impl std::fmt::Display,
    ) -> Self {
        XlsxPartError::InvalidValue {
            property: property.to_string(),
            expected: expected.into(),
            value: value.to_string(),
        }
    }
}
