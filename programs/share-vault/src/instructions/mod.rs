pub mod admin;
pub mod initialize;
pub mod stake;
pub mod unstake;
pub mod view;

#[allow(ambiguous_glob_reexports)]
pub use admin::*;
#[allow(ambiguous_glob_reexports)]
pub use initialize::*;
#[allow(ambiguous_glob_reexports)]
pub use stake::*;
#[allow(ambiguous_glob_reexports)]
pub use unstake::*;
#[allow(ambiguous_glob_reexports)]
pub use view::*;
