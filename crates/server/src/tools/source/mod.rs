//! Source browsing and mutation tools.

pub mod close;
pub mod invalidate;
pub mod load;
pub mod mutate;
pub mod sort;

pub use close::{ScreenCloseParams, close_impl};
pub use invalidate::{SourceInvalidateParams, invalidate_impl};
pub use load::{SourceLoadParams, load_impl};
pub use mutate::{SourceMutateParams, mutate_impl};
pub use sort::{SourceSortParams, sort_impl};
