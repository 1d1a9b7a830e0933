pub mod listing;
pub mod view;
pub mod window;

pub use listing::*;
pub use view::*;
pub use window::*;
