pub mod jsonl_loader;

pub use jsonl_loader::{load_challenges, load_dataset, load_jsonl, load_jsonl_as, Dataset};
