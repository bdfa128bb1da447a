//! Resolution of simulation parameters from defaults and a user supplied overlay.

mod overlay;
mod parameters;
mod resolver;

pub use overlay::Overlay;
pub use parameters::{PARAMETER_KEYS, Parameters};
pub use resolver::ParameterResolver;
