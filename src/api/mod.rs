//! Request pipeline and its collaborators.

pub mod classify;
pub mod decode;
pub mod events;
pub mod options;
pub mod pipeline;
pub mod transport;
