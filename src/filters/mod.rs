//! Deduplication engines.
//!
//! | Engine          | Memory                   | Count                   |
//! |-----------------|--------------------------|-------------------------|
//! | [`BloomEngine`] | fixed, M bits            | approximate (see below) |
//! | [`ExactEngine`] | grows with distinct keys | exact                   |
//!
//! The Bloom count can be **under** the true value because of false positives
//! and, with [`BloomLayout::Classic`], **over** it when two workers race on
//! the same new key. [`BloomLayout::WordBlocked`] removes the overcount.
//!
//! Both implement [`DedupEngine`](crate::core::DedupEngine); the driver picks
//! one with [`build_engine`].

pub mod bloom;
pub mod exact;

pub use bloom::{BloomConfig, BloomEngine, BloomLayout};
pub use exact::ExactEngine;

use crate::core::engine::{DedupEngine, EngineKind};
use crate::error::Result;

/// Construct the engine selected by `kind`.
///
/// `bloom` is only consulted for [`EngineKind::Bloom`].
///
/// # Errors
///
/// Propagates [`BloomEngine::new`] errors.
///
/// ```
/// use ipcount::core::EngineKind;
/// use ipcount::filters::{build_engine, BloomConfig};
///
/// let engine = build_engine(EngineKind::Exact, &BloomConfig::default()).unwrap();
/// assert_eq!(engine.kind(), EngineKind::Exact);
/// ```
pub fn build_engine(kind: EngineKind, bloom: &BloomConfig) -> Result<Box<dyn DedupEngine>> {
    Ok(match kind {
        EngineKind::Bloom => Box::new(BloomEngine::new(*bloom)?),
        EngineKind::Exact => Box::new(ExactEngine::new()),
    })
}
