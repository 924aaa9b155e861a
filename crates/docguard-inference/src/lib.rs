//! # docguard-inference
//!
//! External-service boundary for docguard: the completion backend, the
//! text-extraction (OCR) client, deterministic mocks for both, and the
//! completion throttle that serializes every completion call in the process.

pub mod completion;
pub mod mock;
pub mod ocr;
pub mod throttle;

pub use completion::{CompletionConfig, HttpCompletionBackend};
pub use mock::{MockCompletionBackend, MockOcrBackend};
pub use ocr::{HttpOcrBackend, OcrConfig};
pub use throttle::{CompletionThrottle, ThrottleConfig};
