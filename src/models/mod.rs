pub mod challenge;
pub mod episode;
pub mod loaders;
pub mod task;

pub use challenge::Challenge;
pub use episode::{Action, EpisodeRecord, Position};
pub use loaders::{load_challenges, load_dataset, Dataset};
pub use task::TaskKind;
