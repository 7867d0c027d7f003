//! One module per subcommand.

pub mod decode;
pub mod detect;
pub mod encode;
pub mod list;
pub mod verify;
