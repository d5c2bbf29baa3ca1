//! Row-to-struct mapping over the Quarry pools.

pub mod collection;
pub mod entity;
pub mod errors;
pub mod pluralize;

pub use collection::Collection;
pub use entity::{Entity, all, delete, find, from_row, save, to_columns};
pub use errors::{EntityError, EntityResult};
pub use pluralize::{pluralize, snake_case};
