// Entity storage owned by the dashboards.

mod collection;

pub use collection::{Identified, Named, SortedCollection};
