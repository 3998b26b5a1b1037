//! Chart Texture
//! Renders charts into egui textures for display in the viewer.

use crate::charts::{
    BitmapChartRenderer, ChartRenderer, DrawingSurface, RenderDescriptor, RenderError,
    RenderedChart,
};
use egui::{ColorImage, TextureHandle, TextureOptions};

/// A rendered chart uploaded to the GPU. The texture is freed when this is
/// dropped.
pub struct ChartTexture {
    texture: TextureHandle,
    chart: RenderedChart,
}

impl ChartTexture {
    pub fn texture(&self) -> &TextureHandle {
        &self.texture
    }

    pub fn chart(&self) -> &RenderedChart {
        &self.chart
    }

    /// Size in points.
    pub fn size(&self) -> egui::Vec2 {
        egui::vec2(self.chart.width as f32, self.chart.height as f32)
    }
}

/// Paints with [`BitmapChartRenderer`] and uploads the result to egui.
pub struct EguiChartRenderer {
    ctx: egui::Context,
    bitmap: BitmapChartRenderer,
}

impl EguiChartRenderer {
    pub fn new(ctx: egui::Context) -> Self {
        Self {
            ctx,
            bitmap: BitmapChartRenderer::new(),
        }
    }
}

impl ChartRenderer for EguiChartRenderer {
    type Handle = ChartTexture;

    fn render_line_chart(
        &mut self,
        surface: &DrawingSurface,
        descriptor: &RenderDescriptor,
    ) -> Result<ChartTexture, RenderError> {
        let chart = self.bitmap.paint(surface, descriptor)?;
        let image = ColorImage::from_rgb(
            [chart.width as usize, chart.height as usize],
            &chart.pixels,
        );
        let texture = self
            .ctx
            .load_texture("balance_chart", image, TextureOptions::LINEAR);
        Ok(ChartTexture { texture, chart })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartOptions;
    use crate::data::BalanceSeries;

    fn allocated(ctx: &egui::Context) -> usize {
        ctx.tex_manager().read().num_allocated()
    }

    #[test]
    fn texture_lives_as_long_as_the_handle() {
        let ctx = egui::Context::default();
        let mut renderer = EguiChartRenderer::new(ctx.clone());

        let mut options = ChartOptions::default();
        options.x_axis.show_ticks = false;
        options.y_axis.show_ticks = false;
        let series =
            BalanceSeries::new(vec!["Jan".into(), "Feb".into()], vec![80.0, 90.0]).unwrap();
        let descriptor = RenderDescriptor::line_chart(&series, &options);
        let surface = DrawingSurface::new(160, 90).unwrap();

        let before = allocated(&ctx);
        let handle = renderer.render_line_chart(&surface, &descriptor).unwrap();
        assert_eq!(allocated(&ctx), before + 1);
        assert_eq!(handle.size(), egui::vec2(160.0, 90.0));
        assert_eq!(handle.texture().size(), [160, 90]);
        assert_eq!(handle.chart().markers.len(), 2);

        drop(handle);
        assert_eq!(allocated(&ctx), before);
    }
}
