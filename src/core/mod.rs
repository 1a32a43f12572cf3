//! Core module containing the record model and the view pipeline

pub mod accessor;
pub mod column;
pub mod date;
pub mod error;
pub mod field;
pub mod filter;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod relevance;
pub mod schema;
pub mod sort;
pub mod state;
pub mod validation;

pub use accessor::{AccessorRegistry, ColumnAccessor, FieldAccessor, RegisteredColumn};
pub use column::{ColumnDef, FieldKind, FilterKind, FlagLabels, PersonKeys};
pub use error::{ConfigError, DatasetError, ViewError};
pub use field::{ComparableValue, FieldValue, PLACEHOLDER};
pub use filter::{FieldFilter, FilterQuery};
pub use pipeline::{ViewEntry, ViewOutput};
pub use query::{PaginationMeta, QueryParams, ViewQuery};
pub use record::Record;
pub use relevance::{RelevanceScorer, RelevanceTier};
pub use schema::ViewSchema;
pub use sort::{SortDirection, SortKey, SortSpec};
pub use state::AppState;
pub use validation::{
    RecordRef, ValidationContext, ValidationRules, ValidationWarning, WarningCode,
};
