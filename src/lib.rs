//! # recordview
//!
//! Filtering, search relevance and multi-key sorting for small,
//! heterogeneous JSON datasets shown as a table (award-winning novels,
//! television episodes, ...).
//!
//! ## Features
//!
//! - **Accessor Registry**: one normalization rule per column, shared by filter, search and sort
//! - **Tolerant Values**: absent or malformed fields become a missing sentinel, never a panic
//! - **Relevance Tiers**: exact title > title contains > any searchable field contains
//! - **Stable Multi-key Sort**: missing values always last, in both directions
//! - **Validation Warnings**: duplicate ids, missing fields, negative numbers, future dates
//! - **Configuration-Based**: columns declared in YAML, with `books` and `episodes` presets
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use recordview::prelude::*;
//!
//! let config = ViewConfig::preset(Preset::Episodes)?;
//! let records = parse_records(&json_text, &config.envelope_keys())?;
//!
//! let state = AppState::new(records, config.schema())
//!     .with_text("rose")
//!     .with_filter("era", "Modern")
//!     .toggle_sort("broadcast_date");
//!
//! let view = state.view();
//! for row in view.display_rows(&state.schema().registry) {
//!     println!("{}", row.join(" | "));
//! }
//! println!("{} warnings", view.warning_count());
//! ```

pub mod config;
pub mod core;
pub mod dataset;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Records and Accessors ===
    pub use crate::core::{
        AccessorRegistry, ColumnAccessor, ColumnDef, ComparableValue, FieldAccessor,
        FieldKind, FieldValue, FilterKind, FlagLabels, PersonKeys, Record, RegisteredColumn,
        PLACEHOLDER,
    };

    // === Queries ===
    pub use crate::core::{
        FieldFilter, FilterQuery, PaginationMeta, QueryParams, RelevanceTier, SortDirection,
        SortKey, SortSpec, ViewQuery,
    };

    // === Pipeline ===
    pub use crate::core::pipeline::run;
    pub use crate::core::{AppState, ViewEntry, ViewOutput, ViewSchema};

    // === Validation ===
    pub use crate::core::{
        RecordRef, ValidationContext, ValidationRules, ValidationWarning, WarningCode,
    };

    // === Errors ===
    pub use crate::core::{ConfigError, DatasetError, ViewError};

    // === Configuration and Datasets ===
    pub use crate::config::{Preset, ViewConfig};
    pub use crate::dataset::{load_records_file, parse_records};
}
