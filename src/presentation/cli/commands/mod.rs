pub mod apply;
pub mod init;

pub use apply::*;
pub use init::*;
