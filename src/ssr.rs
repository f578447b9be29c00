//! Server-side page pipeline.

pub use waymark_ssr::*;
