pub mod cli;
pub mod runtime;
pub mod traits;

pub use cli::CliChannel;
pub use runtime::{handle_message, run};
pub use traits::{Channel, ChannelMessage};
