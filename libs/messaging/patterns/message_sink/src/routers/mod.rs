pub mod channel;
pub mod logging;

pub use channel::ChannelRouter;
pub use logging::LoggingRouter;
