//! Router settings loaded from TOML and the environment.

pub use waymark_conf::*;
