//! Public API Types
//!
//! 列挙型プロパティで使用する公開シンボル型を定義するモジュール。
//!
//! 各列挙型はスキーマ上では列挙シンボル（`ValidatorKind::Symbol`）として扱われ、
//! 許可されるシンボル集合は`SYMBOLS`定数で公開されます。シンボルは
//! snake_caseで保持され、シリアライズ時にlowerCamelCaseへ変換されます。

/// データ入力規則の種類
///
/// `<dataValidation type="...">`に対応します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationType {
    /// 制限なし（デフォルト）
    None,
    /// 整数
    Whole,
    /// 小数
    Decimal,
    /// リスト（ドロップダウン）
    List,
    /// 日付
    Date,
    /// 時刻
    Time,
    /// 文字列長
    TextLength,
    /// ユーザー定義（数式）
    Custom,
}

impl ValidationType {
    /// 許可されるシンボル集合
    pub const SYMBOLS: &'static [&'static str] = &[
        "none",
        "whole",
        "decimal",
        "list",
        "date",
        "time",
        "text_length",
        "custom",
    ];

    /// スキーマ上のシンボル表現
    pub fn as_symbol(&self) -> &'static str {
        match self {
            ValidationType::None => "none",
            ValidationType::Whole => "whole",
            ValidationType::Decimal => "decimal",
            ValidationType::List => "list",
            ValidationType::Date => "date",
            ValidationType::Time => "time",
            ValidationType::TextLength => "text_length",
            ValidationType::Custom => "custom",
        }
    }

    /// シンボルから変換
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "none" => Some(ValidationType::None),
            "whole" => Some(ValidationType::Whole),
            "decimal" => Some(ValidationType::Decimal),
            "list" => Some(ValidationType::List),
            "date" => Some(ValidationType::Date),
            "time" => Some(ValidationType::Time),
            "text_length" => Some(ValidationType::TextLength),
            "custom" => Some(ValidationType::Custom),
            _ => None,
        }
    }

    /// 比較演算子（`operator`）を使用する種類かどうか
    pub fn uses_operator(&self) -> bool {
        matches!(
            self,
            ValidationType::Whole
                | ValidationType::Decimal
                | ValidationType::Date
                | ValidationType::Time
                | ValidationType::TextLength
        )
    }
}

/// データ入力規則の比較演算子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationOperator {
    Between,
    NotBetween,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl ValidationOperator {
    /// 許可されるシンボル集合
    pub const SYMBOLS: &'static [&'static str] = &[
        "between",
        "not_between",
        "equal",
        "not_equal",
        "less_than",
        "less_than_or_equal",
        "greater_than",
        "greater_than_or_equal",
    ];

    /// スキーマ上のシンボル表現
    pub fn as_symbol(&self) -> &'static str {
        match self {
            ValidationOperator::Between => "between",
            ValidationOperator::NotBetween => "not_between",
            ValidationOperator::Equal => "equal",
            ValidationOperator::NotEqual => "not_equal",
            ValidationOperator::LessThan => "less_than",
            ValidationOperator::LessThanOrEqual => "less_than_or_equal",
            ValidationOperator::GreaterThan => "greater_than",
            ValidationOperator::GreaterThanOrEqual => "greater_than_or_equal",
        }
    }

    /// 2つ目の数式（`formula2`）を必要とする演算子かどうか
    pub fn is_range_operator(symbol: &str) -> bool {
        matches!(symbol, "between" | "not_between")
    }
}

/// エラーメッセージのスタイル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStyle {
    /// 入力を拒否（デフォルト）
    Stop,
    /// 警告
    Warning,
    /// 情報
    Information,
}

impl ErrorStyle {
    /// 許可されるシンボル集合
    pub const SYMBOLS: &'static [&'static str] = &["stop", "warning", "information"];

    /// スキーマ上のシンボル表現
    pub fn as_symbol(&self) -> &'static str {
        match self {
            ErrorStyle::Stop => "stop",
            ErrorStyle::Warning => "warning",
            ErrorStyle::Information => "information",
        }
    }
}

/// フィルターの暦の種類
///
/// `<filters calendarType="...">`に対応します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CalendarType {
    Gregorian,
    GregorianUs,
    GregorianMeFrench,
    GregorianArabic,
    Hijri,
    Hebrew,
    Taiwan,
    Japan,
    Thai,
    Korea,
    Saka,
    GregorianXlitEnglish,
    GregorianXlitFrench,
}

impl CalendarType {
    /// 許可されるシンボル集合
    pub const SYMBOLS: &'static [&'static str] = &[
        "gregorian",
        "gregorian_us",
        "gregorian_me_french",
        "gregorian_arabic",
        "hijri",
        "hebrew",
        "taiwan",
        "japan",
        "thai",
        "korea",
        "saka",
        "gregorian_xlit_english",
        "gregorian_xlit_french",
    ];

    /// スキーマ上のシンボル表現
    pub fn as_symbol(&self) -> &'static str {
        match self {
            CalendarType::Gregorian => "gregorian",
            CalendarType::GregorianUs => "gregorian_us",
            CalendarType::GregorianMeFrench => "gregorian_me_french",
            CalendarType::GregorianArabic => "gregorian_arabic",
            CalendarType::Hijri => "hijri",
            CalendarType::Hebrew => "hebrew",
            CalendarType::Taiwan => "taiwan",
            CalendarType::Japan => "japan",
            CalendarType::Thai => "thai",
            CalendarType::Korea => "korea",
            CalendarType::Saka => "saka",
            CalendarType::GregorianXlitEnglish => "gregorian_xlit_english",
            CalendarType::GregorianXlitFrench => "gregorian_xlit_french",
        }
    }
}

/// 日付グループ化の粒度
///
/// `<dateGroupItem dateTimeGrouping="...">`に対応します。
/// 列挙順は粗い粒度から細かい粒度の順です。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[non_exhaustive]
pub enum DateTimeGrouping {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl DateTimeGrouping {
    /// 許可されるシンボル集合
    pub const SYMBOLS: &'static [&'static str] =
        &["year", "month", "day", "hour", "minute", "second"];

    /// スキーマ上のシンボル表現
    pub fn as_symbol(&self) -> &'static str {
        match self {
            DateTimeGrouping::Year => "year",
            DateTimeGrouping::Month => "month",
            DateTimeGrouping::Day => "day",
            DateTimeGrouping::Hour => "hour",
            DateTimeGrouping::Minute => "minute",
            DateTimeGrouping::Second => "second",
        }
    }

    /// シンボルから変換
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "year" => Some(DateTimeGrouping::Year),
            "month" => Some(DateTimeGrouping::Month),
            "day" => Some(DateTimeGrouping::Day),
            "hour" => Some(DateTimeGrouping::Hour),
            "minute" => Some(DateTimeGrouping::Minute),
            "second" => Some(DateTimeGrouping::Second),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_type_symbols_round_trip() {
        for symbol in ValidationType::SYMBOLS {
            let kind = ValidationType::from_symbol(symbol).unwrap();
            assert_eq!(kind.as_symbol(), *symbol);
        }
        assert!(ValidationType::from_symbol("textLength").is_none());
    }

    #[test]
    fn test_validation_type_uses_operator() {
        assert!(ValidationType::Whole.uses_operator());
        assert!(ValidationType::TextLength.uses_operator());
        assert!(!ValidationType::List.uses_operator());
        assert!(!ValidationType::Custom.uses_operator());
        assert!(!ValidationType::None.uses_operator());
    }

    #[test]
    fn test_operator_symbols_listed() {
        assert!(ValidationOperator::SYMBOLS.contains(&ValidationOperator::NotBetween.as_symbol()));
        assert!(ValidationOperator::is_range_operator("between"));
        assert!(ValidationOperator::is_range_operator("not_between"));
        assert!(!ValidationOperator::is_range_operator("equal"));
    }

    #[test]
    fn test_date_time_grouping_order() {
        assert!(DateTimeGrouping::Year < DateTimeGrouping::Month);
        assert!(DateTimeGrouping::Minute < DateTimeGrouping::Second);
        assert_eq!(
            DateTimeGrouping::from_symbol("hour"),
            Some(DateTimeGrouping::Hour)
        );
    }

    #[test]
    fn test_calendar_and_error_style_symbols() {
        assert!(CalendarType::SYMBOLS.contains(&CalendarType::Japan.as_symbol()));
        assert!(ErrorStyle::SYMBOLS.contains(&ErrorStyle::Information.as_symbol()));
    }
}
