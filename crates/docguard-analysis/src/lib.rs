//! # docguard-analysis
//!
//! Pure analysis heuristics for docguard:
//!
//! - keyword scoring shared by the risk and email classifiers
//! - rule-based scam/phishing risk assessment
//! - transactional vs promotional email classification
//! - validation of untrusted completion-service output
//!
//! Everything in this crate is deterministic and side-effect free, which is
//! what makes the pipeline's scoring behavior unit-testable in isolation.

pub mod email;
pub mod keywords;
pub mod scam;
pub mod validator;

pub use email::is_transactional;
pub use keywords::{capped_score, match_phrases, PhraseMatches};
pub use scam::{assess, extract_domain, suspicious_domain_reason};
pub use validator::{extract_payload, parse_completion, validate};
