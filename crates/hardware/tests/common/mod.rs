

pub use harness::{TestContext, addr};
