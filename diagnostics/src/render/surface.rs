//! One drawing surface per artifact: acquire, draw, present, encode, release.

use std::error::Error;

use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::coord::Shift;
use plotters::prelude::{DrawingArea, IntoDrawingArea, WHITE};
use plotters_backend::DrawingBackend;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use tracing::{debug, error};

use crate::artifact::{ImageArtifact, ImageFormat};
use crate::error::{ReportError, Result};
use crate::style::RenderStyle;

pub(crate) type DrawResult = std::result::Result<(), Box<dyn Error>>;

/// Something that can be drawn on any plotters backend.
pub(crate) trait Figure {
    fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &RenderStyle) -> DrawResult
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static;
}

/// Draw `figure` on a fresh surface of `size` pixels and encode it.
///
/// The surface is presented and dropped before encoding, on the error path
/// too. When presenting fails after the drawing already failed, the drawing
/// error is the one returned.
pub(crate) fn render_figure<F: Figure>(figure: &F, style: &RenderStyle, size: (u32, u32)) -> Result<ImageArtifact> {
    let bytes = match style.format {
        ImageFormat::Svg => {
            let mut svg = String::new();
            {
                let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
                let drawn = paint(figure, &root, style);
                settle(drawn, root.present().map_err(|e| e.to_string()))?;
            }
            svg.into_bytes()
        }
        ImageFormat::Png => {
            let (w, h) = size;
            let mut pixels = vec![0u8; (w as usize) * (h as usize) * 3];
            {
                let root = BitMapBackend::with_buffer(&mut pixels, size).into_drawing_area();
                let drawn = paint(figure, &root, style);
                settle(drawn, root.present().map_err(|e| e.to_string()))?;
            }
            encode_png(&pixels, size)?
        }
    };
    debug!("Rendered {} byte {:?} figure", bytes.len(), style.format);
    Ok(ImageArtifact::encode(style.format, &bytes))
}

fn paint<F, DB>(figure: &F, root: &DrawingArea<DB, Shift>, style: &RenderStyle) -> DrawResult
where
    F: Figure,
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    figure.draw(root, style)
}

/// Combine the drawing outcome with the release outcome.
fn settle(drawn: DrawResult, presented: std::result::Result<(), String>) -> Result<()> {
    match (drawn, presented) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(release)) => Err(ReportError::Render(format!("releasing surface: {release}"))),
        (Err(draw), Ok(())) => Err(ReportError::Render(draw.to_string())),
        (Err(draw), Err(release)) => {
            error!("Releasing surface after failed draw also failed: {}", release);
            Err(ReportError::Render(draw.to_string()))
        }
    }
}

fn encode_png(pixels: &[u8], (w, h): (u32, u32)) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(pixels, w, h, ColorType::Rgb8)
        .map_err(|e| ReportError::Render(format!("png encoding: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::prelude::{Color, Rectangle, BLACK};

    struct Boxes;

    impl Figure for Boxes {
        fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, _style: &RenderStyle) -> DrawResult
        where
            DB: DrawingBackend,
            DB::ErrorType: 'static,
        {
            root.draw(&Rectangle::new([(2, 2), (8, 8)], BLACK.filled()))?;
            Ok(())
        }
    }

    struct Broken;

    impl Figure for Broken {
        fn draw<DB>(&self, _root: &DrawingArea<DB, Shift>, _style: &RenderStyle) -> DrawResult
        where
            DB: DrawingBackend,
            DB::ErrorType: 'static,
        {
            Err("cannot plot this".into())
        }
    }

    #[test]
    fn test_svg_surface() {
        let artifact = render_figure(&Boxes, &RenderStyle::default(), (10, 10)).unwrap();
        let svg = String::from_utf8(artifact.decode().unwrap()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<rect"));
    }

    #[test]
    fn test_png_surface() {
        let style = RenderStyle {
            format: ImageFormat::Png,
            ..RenderStyle::default()
        };
        let artifact = render_figure(&Boxes, &style, (10, 10)).unwrap();
        assert_eq!(artifact.media_subtype(), Some("png"));
        assert_eq!(&artifact.decode().unwrap()[1..4], b"PNG");
    }

    #[test]
    fn test_draw_error_is_returned_after_release() {
        let err = render_figure(&Broken, &RenderStyle::default(), (10, 10)).unwrap_err();
        assert!(err.to_string().contains("cannot plot this"));
    }

    #[test]
    fn test_settle_keeps_draw_error() {
        let err = settle(Err("draw".into()), Err("release".to_string())).unwrap_err();
        assert_eq!(err.to_string(), "render: draw");
    }
}
