pub mod behavior;
pub mod providers;
pub mod recommendations;
pub mod scorer;

pub use behavior::{BehaviorStorage, BehaviorStore};
pub use providers::PropertyCatalog;
pub use scorer::ScoringContext;
