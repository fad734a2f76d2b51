pub mod form_payload;
pub mod image_categorizer;
pub mod navigator;
pub mod presenter;

pub use form_payload::{build_batch_update, BatchUpdateRequest};
pub use image_categorizer::{categorize, ImagePartition, ImageRole};
pub use navigator::Navigator;
