pub mod viewer_session;

pub use viewer_session::{ImageSelection, ViewerSession};
