//! Sort and Filter Module
//!
//! 範囲内の行を複数キーで安定ソートし、列ごとのフィルター述語で非表示にするエンジン。
//!
//! 範囲の先頭行はヘッダー行として扱われ、並べ替えにも非表示化にも含まれません。
//! 呼び出しをまたいだ状態は持ちません。

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::types::{CellRange, CellValue};
use crate::worksheet::{Cell, Row};

/// セル値に対するフィルター述語
pub trait FilterPredicate {
    /// セルが表示条件を満たすかどうか
    ///
    /// `None`は行にその列のセルが存在しないことを表します。
    fn passes(&self, cell: Option<&Cell>) -> bool;
}

/// 列単位のフィルター
pub trait ColumnFilter {
    /// 行を評価し、条件を満たさなければ行を非表示にする
    ///
    /// `column_offset`はフィルター範囲の先頭列のインデックスです。
    fn apply(&self, row: &mut Row, column_offset: u32);
}

/// 並べ替えキー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// 範囲の先頭列からの列オフセット
    pub column: u32,

    /// 降順かどうか
    pub descending: bool,

    /// 明示的な並び順（空の場合は自然順序）
    pub custom_order: Vec<String>,
}

impl SortKey {
    /// 自然順序のキーを生成
    pub fn new(column: u32, descending: bool) -> Self {
        Self {
            column,
            descending,
            custom_order: Vec::new(),
        }
    }

    /// 明示的な並び順を持つキーを生成
    pub fn with_custom_order(column: u32, descending: bool, custom_order: Vec<String>) -> Self {
        Self {
            column,
            descending,
            custom_order,
        }
    }

    /// 2つのセル値をこのキーで比較する
    ///
    /// 空セル（または存在しないセル）は方向に関係なく常に最後になります。
    /// 並び順リストにない値は、リストのすべての値の後ろとして扱われ、
    /// 降順ではその位置も反転されます。
    fn compare(&self, a: Option<&CellValue>, b: Option<&CellValue>) -> Ordering {
        let a = a.filter(|v| !v.is_empty());
        let b = b.filter(|v| !v.is_empty());

        let (a, b) = match (a, b) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Greater,
            (Some(_), None) => return Ordering::Less,
            (Some(a), Some(b)) => (a, b),
        };

        let ordering = if self.custom_order.is_empty() {
            a.natural_cmp(b)
        } else {
            self.order_position(a).cmp(&self.order_position(b))
        };

        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }

    fn order_position(&self, value: &CellValue) -> usize {
        let text = value.as_raw_string();
        self.custom_order
            .iter()
            .position(|entry| *entry == text)
            .unwrap_or(self.custom_order.len())
    }
}

/// 1回の並べ替え・フィルター処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeOutcome {
    /// 対象となった行数（ヘッダー行を除く）
    pub rows: usize,

    /// 処理後に非表示になっている行数
    pub hidden: usize,
}

/// 複数キーで2行を比較する（内部ヘルパー）
///
/// キーを宣言順に評価し、最初に差が出たキーの結果を返します。
/// 列インデックスが`u32`を超えるキーは、存在しないセルとして比較します。
fn compare_rows(a: &Row, b: &Row, keys: &[SortKey], column_offset: u32) -> Ordering {
    for key in keys {
        let col = column_offset.checked_add(key.column);
        let ordering = key.compare(
            col.and_then(|c| a.value(c)),
            col.and_then(|c| b.value(c)),
        );
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// 範囲内の行を並べ替え、フィルターを適用する
///
/// # 引数
///
/// * `rows` - ワークシートの全行（先頭がシートの1行目）
/// * `range` - フィルター範囲（先頭行はヘッダー行）
/// * `keys` - 並べ替えキー（空の場合は並べ替えない）
/// * `columns` - 列フィルター（宣言順に評価）
///
/// # 処理
///
/// 1. 対象行 `rows[header + 1 ..= end]` を決定（シートの行数で切り詰め）
/// 2. キーがあれば対象行を安定ソートし、その位置に書き戻す
/// 3. 各列フィルターについて、非表示でない行だけを評価する
///    （一度非表示になった行は以降の列で評価されない）
pub fn sort_and_filter<C: ColumnFilter>(
    rows: &mut [Row],
    range: &CellRange,
    keys: &[SortKey],
    columns: &[C],
) -> RangeOutcome {
    let first = range.start.row as usize + 1;
    let end = (range.end.row as usize + 1).min(rows.len());
    if first >= end {
        debug!(range = %range, "no rows below the header row");
        return RangeOutcome::default();
    }

    let working = &mut rows[first..end];
    let column_offset = range.start.col;

    if !keys.is_empty() {
        for key in keys {
            trace!(
                column = key.column,
                descending = key.descending,
                custom_order = key.custom_order.len(),
                "sort key"
            );
        }
        working.sort_by(|a, b| compare_rows(a, b, keys, column_offset));
    }

    for column in columns {
        for row in working.iter_mut() {
            if row.hidden {
                continue;
            }
            column.apply(row, column_offset);
        }
    }

    let outcome = RangeOutcome {
        rows: working.len(),
        hidden: working.iter().filter(|r| r.hidden).count(),
    };
    debug!(
        range = %range,
        rows = outcome.rows,
        hidden = outcome.hidden,
        keys = keys.len(),
        columns = columns.len(),
        "applied sort and filter"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn row(values: Vec<CellValue>) -> Row {
        Row::new(values.into_iter().map(Cell::new).collect())
    }

    fn text_rows(rows: &[Row], col: u32) -> Vec<String> {
        rows.iter()
            .map(|r| r.value(col).map(|v| v.as_raw_string()).unwrap_or_default())
            .collect()
    }

    /// 指定した値と一致するセルを非表示にする列フィルター
    struct HideValue {
        col: u32,
        value: CellValue,
        calls: RefCell<usize>,
    }

    impl HideValue {
        fn new(col: u32, value: impl Into<CellValue>) -> Self {
            Self {
                col,
                value: value.into(),
                calls: RefCell::new(0),
            }
        }
    }

    impl ColumnFilter for HideValue {
        fn apply(&self, row: &mut Row, column_offset: u32) {
            *self.calls.borrow_mut() += 1;
            if row.value(column_offset + self.col) == Some(&self.value) {
                row.hidden = true;
            }
        }
    }

    fn no_columns() -> Vec<HideValue> {
        Vec::new()
    }

    #[test]
    fn test_multi_key_sort() {
        let mut rows = vec![
            row(vec!["A".into(), "B".into()]),
            row(vec![1.into(), 2.into()]),
            row(vec![1.into(), 1.into()]),
            row(vec![2.into(), 0.into()]),
        ];
        let range = CellRange::parse("A1:B4").unwrap();
        let keys = [SortKey::new(0, false), SortKey::new(1, false)];

        sort_and_filter(&mut rows, &range, &keys, &no_columns());

        assert_eq!(text_rows(&rows, 0), vec!["A", "1", "1", "2"]);
        assert_eq!(text_rows(&rows, 1), vec!["B", "1", "2", "0"]);
    }

    #[test]
    fn test_custom_order() {
        let mut rows = vec![
            row(vec!["Priority".into()]),
            row(vec!["High".into()]),
            row(vec!["Low".into()]),
            row(vec!["Medium".into()]),
        ];
        let range = CellRange::parse("A1:A4").unwrap();
        let order = vec!["Low".to_string(), "Medium".to_string(), "High".to_string()];
        let keys = [SortKey::with_custom_order(0, false, order)];

        sort_and_filter(&mut rows, &range, &keys, &no_columns());

        assert_eq!(text_rows(&rows, 0), vec!["Priority", "Low", "Medium", "High"]);
    }

    #[test]
    fn test_custom_order_unlisted_values_sort_last_and_tie() {
        let mut rows = vec![
            row(vec!["H".into(), "id".into()]),
            row(vec!["Zeta".into(), "1".into()]),
            row(vec!["High".into(), "2".into()]),
            row(vec!["Alpha".into(), "3".into()]),
            row(vec!["Low".into(), "4".into()]),
        ];
        let range = CellRange::parse("A1:B5").unwrap();
        let order = vec!["Low".to_string(), "High".to_string()];
        let keys = [SortKey::with_custom_order(0, false, order.clone())];

        sort_and_filter(&mut rows, &range, &keys, &no_columns());
        // 並び順にない値は最後、かつ互いに同順位（元の順序を保持）
        assert_eq!(text_rows(&rows, 1), vec!["id", "4", "2", "1", "3"]);

        let keys = [SortKey::with_custom_order(0, true, order)];
        sort_and_filter(&mut rows, &range, &keys, &no_columns());
        // 降順では位置も反転する
        assert_eq!(text_rows(&rows, 1), vec!["id", "1", "3", "2", "4"]);
    }

    #[test]
    fn test_descending_applies_per_key() {
        let mut rows = vec![
            row(vec!["A".into(), "B".into()]),
            row(vec![1.into(), 1.into()]),
            row(vec![2.into(), 1.into()]),
            row(vec![1.into(), 2.into()]),
        ];
        let range = CellRange::parse("A1:B4").unwrap();
        let keys = [SortKey::new(0, true), SortKey::new(1, false)];

        sort_and_filter(&mut rows, &range, &keys, &no_columns());

        assert_eq!(text_rows(&rows, 0), vec!["A", "2", "1", "1"]);
        assert_eq!(text_rows(&rows, 1), vec!["B", "1", "1", "2"]);
    }

    #[test]
    fn test_empty_cells_sort_last_in_both_directions() {
        let range = CellRange::parse("A1:A4").unwrap();
        for descending in [false, true] {
            let mut rows = vec![
                row(vec!["H".into()]),
                row(vec![CellValue::Empty]),
                row(vec![5.into()]),
                row(vec![]),
            ];
            sort_and_filter(&mut rows, &range, &[SortKey::new(0, descending)], &no_columns());
            assert_eq!(text_rows(&rows, 0), vec!["H", "5", "", ""]);
        }
    }

    #[test]
    fn test_header_row_is_excluded() {
        let mut rows = vec![
            row(vec!["zzz".into()]),
            row(vec!["b".into()]),
            row(vec!["a".into()]),
        ];
        let range = CellRange::parse("A1:A3").unwrap();
        let hide_header = [HideValue::new(0, "zzz")];

        let outcome = sort_and_filter(&mut rows, &range, &[SortKey::new(0, false)], &hide_header);

        assert_eq!(text_rows(&rows, 0), vec!["zzz", "a", "b"]);
        assert!(!rows[0].hidden);
        assert_eq!(outcome, RangeOutcome { rows: 2, hidden: 0 });
    }

    #[test]
    fn test_rows_outside_range_untouched() {
        let mut rows = vec![
            row(vec!["before".into()]),
            row(vec!["H".into()]),
            row(vec!["c".into()]),
            row(vec!["b".into()]),
            row(vec!["a".into()]),
        ];
        let range = CellRange::parse("A2:A4").unwrap();

        sort_and_filter(&mut rows, &range, &[SortKey::new(0, false)], &no_columns());

        assert_eq!(text_rows(&rows, 0), vec!["before", "H", "b", "c", "a"]);
    }

    #[test]
    fn test_column_offset_applies() {
        let mut rows = vec![
            row(vec!["x".into(), "H".into()]),
            row(vec!["x".into(), 3.into()]),
            row(vec!["x".into(), 1.into()]),
        ];
        let range = CellRange::parse("B1:B3").unwrap();

        sort_and_filter(&mut rows, &range, &[SortKey::new(0, false)], &no_columns());

        assert_eq!(text_rows(&rows, 1), vec!["H", "1", "3"]);
    }

    #[test]
    fn test_hiding_is_monotonic() {
        let mut rows = vec![
            row(vec!["A".into(), "B".into()]),
            row(vec!["drop".into(), "keep".into()]),
            row(vec!["keep".into(), "keep".into()]),
            row(vec!["keep".into(), "drop".into()]),
        ];
        let range = CellRange::parse("A1:B4").unwrap();
        let columns = [HideValue::new(0, "drop"), HideValue::new(1, "drop")];

        let outcome = sort_and_filter(&mut rows, &range, &[], &columns);

        assert!(rows[1].hidden);
        assert!(!rows[2].hidden);
        assert!(rows[3].hidden);
        // 2列目のフィルターは、1列目で非表示になった行を評価しない
        assert_eq!(*columns[0].calls.borrow(), 3);
        assert_eq!(*columns[1].calls.borrow(), 2);
        assert_eq!(outcome, RangeOutcome { rows: 3, hidden: 2 });
    }

    #[test]
    fn test_already_hidden_rows_are_skipped() {
        let mut rows = vec![
            row(vec!["H".into()]),
            row(vec!["a".into()]),
            row(vec!["b".into()]),
        ];
        rows[1].hidden = true;
        let range = CellRange::parse("A1:A3").unwrap();
        let columns = [HideValue::new(0, "nothing")];

        let outcome = sort_and_filter(&mut rows, &range, &[], &columns);

        assert_eq!(*columns[0].calls.borrow(), 1);
        assert_eq!(outcome.hidden, 1);
    }

    #[test]
    fn test_range_beyond_rows_is_clamped() {
        let mut rows = vec![row(vec!["H".into()]), row(vec![2.into()]), row(vec![1.into()])];
        let range = CellRange::parse("A1:A100").unwrap();

        let outcome = sort_and_filter(&mut rows, &range, &[SortKey::new(0, false)], &no_columns());

        assert_eq!(text_rows(&rows, 0), vec!["H", "1", "2"]);
        assert_eq!(outcome.rows, 2);
    }

    #[test]
    fn test_overflowing_key_column_compares_as_missing() {
        let mut rows = vec![
            row(vec!["x".into(), "H".into()]),
            row(vec!["x".into(), 2.into()]),
            row(vec!["x".into(), 1.into()]),
        ];
        let range = CellRange::parse("B1:B3").unwrap();
        let keys = [SortKey::new(u32::MAX, false), SortKey::new(0, false)];

        sort_and_filter(&mut rows, &range, &keys, &no_columns());

        assert_eq!(text_rows(&rows, 1), vec!["H", "1", "2"]);
    }

    #[test]
    fn test_header_only_range_is_noop() {
        let mut rows = vec![row(vec!["b".into()]), row(vec!["a".into()])];
        let range = CellRange::parse("A2:A2").unwrap();

        let outcome = sort_and_filter(&mut rows, &range, &[SortKey::new(0, false)], &no_columns());

        assert_eq!(outcome, RangeOutcome::default());
        assert_eq!(text_rows(&rows, 0), vec!["b", "a"]);
    }

    #[allow(unused_doc_comments)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[allow(unused_doc_comments)]
        /// 安定ソート
        ///
        /// すべてのキーで同順位の行は、元の相対順序を保つことを確認します。
        proptest! {
            #[test]
            fn test_sort_is_stable(values in proptest::collection::vec(0u8..4, 1..40)) {
                let mut rows = vec![row(vec!["key".into(), "seq".into()])];
                for (i, v) in values.iter().enumerate() {
                    rows.push(row(vec![(*v as i32).into(), (i as i32).into()]));
                }
                let range = CellRange::parse(&format!("A1:B{}", rows.len())).unwrap();

                sort_and_filter(&mut rows, &range, &[SortKey::new(0, false)], &no_columns());

                for pair in rows[1..].windows(2) {
                    let (k1, k2) = (pair[0].value(0).unwrap(), pair[1].value(0).unwrap());
                    prop_assert_ne!(k1.natural_cmp(k2), Ordering::Greater);
                    if k1 == k2 {
                        let s1 = pair[0].value(1).unwrap().to_serial().unwrap();
                        let s2 = pair[1].value(1).unwrap().to_serial().unwrap();
                        prop_assert!(s1 < s2);
                    }
                }
            }
        }
    }
}
