pub mod dispatcher;
pub mod producer;
pub mod worker;

pub use dispatcher::*;
pub use producer::*;
pub use worker::*;
