//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。
//! セル値、A1形式のセル座標、セル範囲を提供します。

use std::cmp::Ordering;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::XlsxPartError;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// 日付・時刻
    Date(NaiveDateTime),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 値を文字列として取得（書式適用前）
    ///
    /// 日付は時刻成分が0の場合`YYYY-MM-DD`、それ以外は`YYYY-MM-DD HH:MM:SS`になります。
    pub fn as_raw_string(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
            CellValue::Empty => String::new(),
        }
    }

    /// 1900年システムのシリアル値に変換
    ///
    /// 数値はそのまま、日付は1899年12月30日起算の日数（小数部は時刻）を返します。
    pub fn to_serial(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Date(dt) => {
                let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
                let seconds = dt.signed_duration_since(epoch).num_seconds();
                Some(seconds as f64 / 86_400.0)
            }
            _ => None,
        }
    }

    /// 種類ごとの並び順（数値・日付 < 文字列 < 論理値 < 空）
    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Number(_) | CellValue::Date(_) => 0,
            CellValue::String(_) => 1,
            CellValue::Bool(_) => 2,
            CellValue::Empty => 3,
        }
    }

    /// 自然順序で比較する
    ///
    /// 異なる種類同士は種類の順位で、同じ種類同士は値で比較します。
    /// 数値と日付はシリアル値で比較されます。
    pub fn natural_cmp(&self, other: &Self) -> Ordering {
        let rank = self.kind_rank().cmp(&other.kind_rank());
        if rank != Ordering::Equal {
            return rank;
        }

        match (self, other) {
            (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
            _ => match (self.to_serial(), other.to_serial()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => Ordering::Equal,
            },
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::Date(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value.and_time(chrono::NaiveTime::MIN))
    }
}

/// セル座標（0始まり）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    /// 新しい座標を生成
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// A1形式の文字列を座標に変換（例: "B3" -> (2, 1)）
    ///
    /// `$B$3`のような絶対参照の`$`は無視されます。
    pub fn parse_a1(name: &str) -> Result<Self, XlsxPartError> {
        let name = name.trim();
        let malformed = || XlsxPartError::MalformedRange(format!("Invalid cell reference: '{}'", name));

        let mut col: u32 = 0;
        let mut letters = 0;
        let mut chars = name.chars().filter(|c| *c != '$').peekable();

        while let Some(ch) = chars.peek().copied() {
            if !ch.is_ascii_alphabetic() {
                break;
            }
            let digit = (ch.to_ascii_uppercase() as u8 - b'A') as u32 + 1;
            col = col
                .checked_mul(26)
                .and_then(|c| c.checked_add(digit))
                .ok_or_else(malformed)?;
            letters += 1;
            chars.next();
        }

        let row_part: String = chars.collect();
        if letters == 0 || row_part.is_empty() || !row_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }

        let row: u32 = row_part.parse().map_err(|_| malformed())?;
        if row == 0 {
            return Err(malformed());
        }

        Ok(Self::new(row - 1, col - 1))
    }

    /// A1形式の文字列に変換（例: (0, 0) -> "A1"）
    #[allow(clippy::wrong_self_convention)]
    pub fn to_a1_notation(&self) -> String {
        let col_str = Self::col_index_to_letter(self.col);
        format!("{}{}", col_str, self.row + 1)
    }

    /// 絶対参照のA1形式に変換（例: (0, 0) -> "$A$1"）
    #[allow(clippy::wrong_self_convention)]
    pub fn to_absolute_a1(&self) -> String {
        let col_str = Self::col_index_to_letter(self.col);
        format!("${}${}", col_str, self.row + 1)
    }

    /// 列インデックスを文字列に変換（0 -> "A", 25 -> "Z", 26 -> "AA"）
    pub(crate) fn col_index_to_letter(mut col: u32) -> String {
        let mut result = String::new();
        loop {
            let remainder = col % 26;
            result.insert(0, (b'A' + remainder as u8) as char);
            if col < 26 {
                break;
            }
            col = col / 26 - 1;
        }
        result
    }
}

/// セル範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellCoord,
    pub end: CellCoord,
}

impl CellRange {
    /// 新しい範囲を生成
    pub fn new(start: CellCoord, end: CellCoord) -> Self {
        Self { start, end }
    }

    /// 範囲文字列を解析（例: "A1:B3"）
    ///
    /// コロンで区切られたちょうど2つの端点が必要です。
    /// それ以外は`XlsxPartError::MalformedRange`を返します。
    pub fn parse(range: &str) -> Result<Self, XlsxPartError> {
        let parts: Vec<&str> = range.split(':').collect();
        if parts.len() != 2 {
            return Err(XlsxPartError::MalformedRange(format!(
                "Expected two endpoints separated by ':': '{}'",
                range
            )));
        }

        let start = CellCoord::parse_a1(parts[0])?;
        let end = CellCoord::parse_a1(parts[1])?;
        if start.row > end.row || start.col > end.col {
            return Err(XlsxPartError::MalformedRange(format!(
                "Range start is after range end: '{}'",
                range
            )));
        }

        Ok(Self::new(start, end))
    }

    /// 範囲のサイズ（行数 × 列数）を計算
    pub fn size(&self) -> (u32, u32) {
        let rows = self.end.row - self.start.row + 1;
        let cols = self.end.col - self.start.col + 1;
        (rows, cols)
    }

    /// 先頭行（ヘッダー行）を除いた範囲
    ///
    /// 範囲が1行しかない場合は`None`を返します。
    pub fn without_header(&self) -> Option<Self> {
        if self.start.row >= self.end.row {
            return None;
        }
        Some(Self::new(
            CellCoord::new(self.start.row + 1, self.start.col),
            self.end,
        ))
    }

    /// 絶対参照形式の範囲文字列（例: "$A$1:$B$3"）
    #[allow(clippy::wrong_self_convention)]
    pub fn to_absolute(&self) -> String {
        format!("{}:{}", self.start.to_absolute_a1(), self.end.to_absolute_a1())
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.start.to_a1_notation(),
            self.end.to_a1_notation()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // CellValue のテスト
    #[test]
    fn test_cell_value_is_empty() {
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Number(42.0).is_empty());
        assert!(!CellValue::String("test".to_string()).is_empty());
        assert!(!CellValue::Bool(true).is_empty());
    }

    #[test]
    fn test_cell_value_as_raw_string() {
        assert_eq!(CellValue::Empty.as_raw_string(), "");
        assert_eq!(CellValue::Number(42.5).as_raw_string(), "42.5");
        assert_eq!(CellValue::Number(3.0).as_raw_string(), "3");
        assert_eq!(
            CellValue::String("hello".to_string()).as_raw_string(),
            "hello"
        );
        assert_eq!(CellValue::Bool(true).as_raw_string(), "true");

        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(CellValue::from(date).as_raw_string(), "2024-03-05");
        let datetime = date.and_hms_opt(13, 4, 0).unwrap();
        assert_eq!(
            CellValue::from(datetime).as_raw_string(),
            "2024-03-05 13:04:00"
        );
    }

    #[test]
    fn test_cell_value_to_serial() {
        let date = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        assert_eq!(CellValue::from(date).to_serial(), Some(2.0));

        let noon = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(CellValue::from(noon).to_serial(), Some(36526.5));

        assert_eq!(CellValue::Number(7.0).to_serial(), Some(7.0));
        assert_eq!(CellValue::from("7").to_serial(), None);
    }

    #[test]
    fn test_natural_cmp_same_kind() {
        assert_eq!(
            CellValue::Number(1.0).natural_cmp(&CellValue::Number(2.0)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::from("b").natural_cmp(&CellValue::from("a")),
            Ordering::Greater
        );
        assert_eq!(
            CellValue::Bool(false).natural_cmp(&CellValue::Bool(true)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Empty.natural_cmp(&CellValue::Empty),
            Ordering::Equal
        );
    }

    #[test]
    fn test_natural_cmp_mixed_kinds() {
        // 数値 < 文字列 < 論理値 < 空
        assert_eq!(
            CellValue::Number(999.0).natural_cmp(&CellValue::from("a")),
            Ordering::Less
        );
        assert_eq!(
            CellValue::from("z").natural_cmp(&CellValue::Bool(false)),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Bool(true).natural_cmp(&CellValue::Empty),
            Ordering::Less
        );

        // 日付と数値はシリアル値で比較
        let date = CellValue::from(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap());
        assert_eq!(date.natural_cmp(&CellValue::Number(3.0)), Ordering::Less);
        assert_eq!(date.natural_cmp(&CellValue::Number(1.0)), Ordering::Greater);
    }

    // CellCoord のテスト
    #[test]
    fn test_cell_coord_to_a1_notation() {
        assert_eq!(CellCoord::new(0, 0).to_a1_notation(), "A1");
        assert_eq!(CellCoord::new(0, 25).to_a1_notation(), "Z1");
        assert_eq!(CellCoord::new(0, 26).to_a1_notation(), "AA1");
        assert_eq!(CellCoord::new(99, 701).to_a1_notation(), "ZZ100");
        assert_eq!(CellCoord::new(0, 51).to_a1_notation(), "AZ1");
    }

    #[test]
    fn test_cell_coord_to_absolute_a1() {
        assert_eq!(CellCoord::new(0, 0).to_absolute_a1(), "$A$1");
        assert_eq!(CellCoord::new(2, 27).to_absolute_a1(), "$AB$3");
    }

    #[test]
    fn test_cell_coord_parse_a1() {
        assert_eq!(CellCoord::parse_a1("A1").unwrap(), CellCoord::new(0, 0));
        assert_eq!(CellCoord::parse_a1("B3").unwrap(), CellCoord::new(2, 1));
        assert_eq!(CellCoord::parse_a1("AA10").unwrap(), CellCoord::new(9, 26));
        assert_eq!(CellCoord::parse_a1("$C$4").unwrap(), CellCoord::new(3, 2));
        assert_eq!(CellCoord::parse_a1("zz100").unwrap(), CellCoord::new(99, 701));
    }

    #[test]
    fn test_cell_coord_parse_a1_invalid() {
        assert!(CellCoord::parse_a1("").is_err());
        assert!(CellCoord::parse_a1("A").is_err());
        assert!(CellCoord::parse_a1("12").is_err());
        assert!(CellCoord::parse_a1("A0").is_err());
        assert!(CellCoord::parse_a1("A1B").is_err());
        assert!(CellCoord::parse_a1("A-1").is_err());
    }

    // CellRange のテスト
    #[test]
    fn test_cell_range_parse() {
        let range = CellRange::parse("A1:B3").unwrap();
        assert_eq!(range.start, CellCoord::new(0, 0));
        assert_eq!(range.end, CellCoord::new(2, 1));
        assert_eq!(range.size(), (3, 2));
        assert_eq!(range.to_string(), "A1:B3");
    }

    #[test]
    fn test_cell_range_parse_malformed() {
        for input in ["", "A1", "A1:B3:C4", "A1:", ":B3", "A1-B3", "B3:A1"] {
            match CellRange::parse(input) {
                Err(XlsxPartError::MalformedRange(_)) => {}
                other => panic!("Expected MalformedRange for '{}', got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_cell_range_without_header() {
        let range = CellRange::parse("A1:B3").unwrap();
        assert_eq!(range.without_header().unwrap().to_string(), "A2:B3");

        let single_row = CellRange::parse("A1:D1").unwrap();
        assert!(single_row.without_header().is_none());
    }

    #[test]
    fn test_cell_range_to_absolute() {
        let range = CellRange::parse("A1:B3").unwrap();
        assert_eq!(range.to_absolute(), "$A$1:$B$3");
    }

    #[allow(unused_doc_comments)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[allow(unused_doc_comments)]
        /// A1記法の往復変換
        ///
        /// 座標をA1記法に変換し、再度解析すると元の座標に戻ることを確認します。
        proptest! {
            #[test]
            fn test_a1_notation_round_trip(row in 0u32..1_048_576, col in 0u32..16_384) {
                let coord = CellCoord::new(row, col);
                let parsed = CellCoord::parse_a1(&coord.to_a1_notation()).unwrap();
                prop_assert_eq!(parsed, coord);

                let parsed_abs = CellCoord::parse_a1(&coord.to_absolute_a1()).unwrap();
                prop_assert_eq!(parsed_abs, coord);
            }
        }
    }
}
