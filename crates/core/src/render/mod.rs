//! Render commands and the sink trait the engine emits them through.

pub mod command;
pub mod sink;

pub use command::{MarkerId, MarkerMeta, RenderCommand};
pub use sink::{MockRenderSink, NoOpRenderSink, RenderSink};
