//! Small helpers shared across the backend.
//!
//! Import what you use (`use crate::util::compare::not_empty;`). Nothing here
//! is installed globally.

pub mod compare;
pub mod data;
pub mod date;

pub use compare::{
    contains, empty, equal, if_empty, if_not_empty, if_not_null, if_null, not_empty, IsEmpty,
};
pub use data::{copy, lv, vl, LabelValue};
pub use date::{now, now_js, now_time};
