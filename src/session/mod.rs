mod event;
mod refresh;
mod session;

pub use event::{MapEvent, RefreshState, SurfaceUpdate};
pub use refresh::refresh_area;
pub use session::Session;
