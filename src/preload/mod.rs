//! Frame preloading: pure progress state, session-tagged settlement and parallel dispatch.

/// Asset loaders and the parallel load dispatcher.
pub mod loader;
/// Session-owning preloader.
pub mod session;
/// Pure preload state machine.
pub mod state;
