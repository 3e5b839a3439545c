//! Scroll geometry, scroll sources and the smooth-scroll driver.

/// Scroll-to-frame mapping.
pub mod mapper;
/// Eased scroll driver.
pub mod smooth;
/// Scroll sources and observer registration.
pub mod source;
