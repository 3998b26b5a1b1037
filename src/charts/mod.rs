//! Charts module - chart description, options and rendering

mod descriptor;
mod options;
pub mod registry;
mod renderer;
mod style;

pub use descriptor::RenderDescriptor;
pub use options::{ChartOptions, PointStyle, TooltipConfig};
pub use renderer::{
    BitmapChartRenderer, ChartRenderer, DrawingSurface, RenderError, RenderedChart,
};
