pub mod behavior;
pub mod env_overrides;
pub mod hot_reload;
pub mod store;

pub use behavior::{Behavior, BehaviorConfig};
pub use env_overrides::parse_flag;
pub use hot_reload::{BehaviorHandle, BehaviorSink};
pub use store::{CONFIG_FILE, ConfigStore, TRACKERS_FILE};
