/*!
 * nmterm core
 * nmcli command runner, output parsers and connection management facade
 */

pub mod config;
pub mod network;
pub mod parse;
pub mod runner;

pub use config::{Config, ConfigError};
pub use network::{NetworkManager, NmCommand, Snapshot};
pub use runner::{tokenize, CommandError, CommandRunner, Execute};
