//! Derived views over a fetched [`ListingTable`](crate::models::ListingTable).
//!
//! Nothing here touches the network or mutates the source table; every
//! function returns a fresh, request-scoped value.

pub mod change;
pub mod dashboard;
pub mod select;

pub use change::change_view;
pub use dashboard::{Dashboard, DisplayOptions};
pub use select::{filtered_count, select, CoinSelection};
