//! Client-side navigation.
//!
//! History stack, router URL, navigation guards and mask watchers for a
//! single-threaded client.

pub use waymark_history::*;
