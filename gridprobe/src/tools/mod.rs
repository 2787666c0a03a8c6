pub mod help;
pub mod probe;
pub mod serve;
pub mod thumbnail;
