//! Entities Module
//!
//! スキーマを持つワークシート部品の具体的なエンティティ型。

mod auto_filter;
mod data_validation;
mod filter_column;
mod filters;
mod page_margins;
mod sort_state;

pub use auto_filter::AutoFilter;
pub use data_validation::{DataValidation, DataValidations};
pub use filter_column::FilterColumn;
pub use filters::{DateGroupItem, Filter, Filters};
pub use page_margins::PageMargins;
pub use sort_state::{SortCondition, SortState};
