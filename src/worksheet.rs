//! Worksheet Module
//!
//! 並べ替え・フィルターの対象となる行コレクションを提供するモジュール。
//! 行は位置で読み書きでき、セルは列インデックスで参照できます。

use crate::error::XlsxPartError;
use crate::types::{CellCoord, CellRange, CellValue};

/// セル
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// セルの値
    pub value: CellValue,
}

impl Cell {
    /// 新しいセルを生成
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// 空セルを生成
    pub fn empty() -> Self {
        Self {
            value: CellValue::Empty,
        }
    }
}

/// 行
///
/// セルの並びと非表示フラグを持ちます。並べ替えでは行ごと移動し、
/// セルの内容は行と一緒に移動します。
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,

    /// 非表示かどうか
    pub hidden: bool,
}

impl Row {
    /// セルの並びから行を生成
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            hidden: false,
        }
    }

    /// 列インデックス（0始まり）のセルを取得
    pub fn cell(&self, col: u32) -> Option<&Cell> {
        self.cells.get(col as usize)
    }

    /// 列インデックス（0始まり）のセル値を取得
    pub fn value(&self, col: u32) -> Option<&CellValue> {
        self.cell(col).map(|c| &c.value)
    }

    /// すべてのセル
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// ワークシート（行コレクション）
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    name: String,
    rows: Vec<Row>,
}

impl Worksheet {
    /// 空のワークシートを生成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// シート名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 値の並びから行を追加する
    pub fn add_row<I, V>(&mut self, values: I) -> &mut Row
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let cells = values.into_iter().map(Cell::new).collect();
        self.rows.push(Row::new(cells));
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// すべての行
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// すべての行（可変）
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    /// 行インデックス（0始まり）の行を取得
    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    /// A1形式のセル名を座標に変換する（例: "A1" -> (0, 0)）
    pub fn name_to_indices(&self, name: &str) -> Result<CellCoord, XlsxPartError> {
        CellCoord::parse_a1(name)
    }

    /// シート名と絶対参照の範囲を組み合わせた定義名の数式を生成する
    ///
    /// 例: `'Sheet1'!$A$1:$B$3`（シート名中の`'`は`''`にエスケープ）
    pub fn defined_name_formula(&self, range: &CellRange) -> String {
        format!("'{}'!{}", self.name.replace('\'', "''"), range.to_absolute())
    }
}
