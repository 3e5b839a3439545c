/// Image-sequence descriptor and frame path derivation.
pub mod config;
