//! URL primitives: masks, parameter codec and rewriter.

// Re-export all waymark-urls functionality
pub use waymark_urls::*;
