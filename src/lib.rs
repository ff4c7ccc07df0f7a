//! xlsxpart - Schema-driven worksheet parts for SpreadsheetML
//!
//! This crate models the small XML parts of an XLSX worksheet (data validations,
//! page margins, auto filters with sort state) as typed entities. Every entity
//! declares its properties once in a static schema; writes are validated against
//! that schema and serialization follows its declaration order, so identical
//! state always produces identical XML.
//!
//! It also contains the row sorting and filtering engine that applies an auto
//! filter to an in-memory worksheet.
//!
//! # Quick Start
//!
//! ```rust
//! use xlsxpart::{DataValidation, Entity, ValidationType};
//!
//! fn main() -> Result<(), xlsxpart::XlsxPartError> {
//!     let mut rule = DataValidation::new();
//!     rule.set_validation_type(ValidationType::Whole)?;
//!     rule.set("formula1", "1")?;
//!     rule.set("formula2", "100")?;
//!     rule.set("sqref", "B2:B20")?;
//!
//!     println!("{}", rule.to_xml()?);
//!     Ok(())
//! }
//! ```
//!
//! # Sorting and Filtering
//!
//! ```rust
//! use xlsxpart::{AutoFilterBuilder, CellValue, Filters, SortCondition, Worksheet};
//! use serde_json::json;
//!
//! fn main() -> Result<(), xlsxpart::XlsxPartError> {
//!     let mut sheet = Worksheet::new("Tasks");
//!     sheet.add_row(["Task", "Priority"]);
//!     sheet.add_row(["deploy", "High"]);
//!     sheet.add_row(["lint", "Low"]);
//!     sheet.add_row(["review", "Medium"]);
//!
//!     let order = vec!["Low".to_string(), "Medium".to_string(), "High".to_string()];
//!     let filter = AutoFilterBuilder::new()
//!         .with_range("A1:B4")
//!         .with_sort_condition(SortCondition::new(1, false, order)?)
//!         .with_column(1, Filters::with_options(&json!({ "filter_items": ["Low", "High"] }))?)
//!         .build()?;
//!
//!     filter.apply(&mut sheet)?;
//!
//!     assert_eq!(sheet.rows()[1].value(0), Some(&CellValue::from("lint")));
//!     assert!(sheet.rows()[2].hidden);
//!     Ok(())
//! }
//! ```
//!
//! # Configuration Objects
//!
//! Entities accept `serde_json::Value` objects of snake_case keys. Unknown keys
//! are ignored; the first invalid value aborts with an error.
//!
//! ```rust
//! use xlsxpart::{Entity, PageMargins};
//! use serde_json::json;
//!
//! fn main() -> Result<(), xlsxpart::XlsxPartError> {
//!     let margins = PageMargins::with_options(&json!({ "left": 0.5, "right": 0.5 }))?;
//!     assert_eq!(margins.get_f64("left")?, Some(0.5));
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod entities;
mod entity;
mod error;
mod schema;
mod sort_filter;
mod types;
mod worksheet;
pub mod xml;

// 公開API
pub use api::{CalendarType, DateTimeGrouping, ErrorStyle, ValidationOperator, ValidationType};
pub use builder::AutoFilterBuilder;
pub use entities::{
    AutoFilter, DataValidation, DataValidations, DateGroupItem, Filter, FilterColumn, Filters,
    PageMargins, SortCondition, SortState,
};
pub use entity::Entity;
pub use error::XlsxPartError;
pub use schema::{
    EntitySchema, PropertyBag, PropertyDescriptor, PropertyValue, SchemaBuilder, SerializeAs,
    ValidatorKind,
};
pub use sort_filter::{sort_and_filter, ColumnFilter, FilterPredicate, RangeOutcome, SortKey};
pub use types::{CellCoord, CellRange, CellValue};
pub use worksheet::{Cell, Row, Worksheet};
