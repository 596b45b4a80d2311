//! Scene rasterization: semantic shapes to panel pixels.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, PrimitiveStyleBuilder};

use bourdon::scene::{Scene, Shape, Tone};

use crate::frame::FrameBuffer;

/// Map a semantic tone to its panel color.
pub fn palette(tone: Tone) -> Rgb565 {
    match tone {
        Tone::Background => Rgb565::BLACK,
        Tone::VoiceA => Rgb565::GREEN,
        Tone::VoiceB => Rgb565::BLUE,
        Tone::FaceFill => Rgb565::YELLOW,
        Tone::Ink => Rgb565::BLACK,
    }
}

/// Draw a whole scene, backdrop first and overlay on top, into any
/// RGB565 draw target.
pub fn rasterize<D>(scene: &Scene, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    for shape in scene.backdrop().iter().chain(scene.overlay()) {
        draw_shape(shape, target)?;
    }
    Ok(())
}

/// Clear the frame to the background tone and rasterize the scene into it.
///
/// Drawing into the in-memory frame cannot fail, so unlike [`rasterize`]
/// this is infallible.
pub fn compose(scene: &Scene, frame: &mut FrameBuffer<'_>) {
    frame.fill(palette(Tone::Background));
    match rasterize(scene, frame) {
        Ok(()) => {}
        Err(e) => match e {},
    }
}

fn draw_shape<D>(shape: &Shape, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    match *shape {
        Shape::Disc {
            center,
            radius,
            fill,
            outline,
        } => {
            let mut style = PrimitiveStyleBuilder::new().fill_color(palette(fill));
            if let Some(outline) = outline {
                style = style.stroke_color(palette(outline)).stroke_width(1);
            }
            Circle::with_center(Point::new(center.0, center.1), radius * 2 + 1)
                .into_styled(style.build())
                .draw(target)
        }
        Shape::Segment { start, end, tone } => {
            Line::new(Point::new(start.0, start.1), Point::new(end.0, end.1))
                .into_styled(PrimitiveStyle::with_stroke(palette(tone), 1))
                .draw(target)
        }
        Shape::Span { x, y, width, tone } => {
            Line::new(Point::new(x, y), Point::new(x + width as i32 - 1, y))
                .into_styled(PrimitiveStyle::with_stroke(palette(tone), 1))
                .draw(target)
        }
        Shape::Dot { x, y, tone } => Pixel(Point::new(x, y), palette(tone)).draw(target),
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FRAME_PIXELS;
    use bourdon::scene::{PANEL_HEIGHT, PANEL_WIDTH};

    fn composed(scene: &Scene) -> [u16; FRAME_PIXELS] {
        let mut backing = [0u16; FRAME_PIXELS];
        let mut frame = FrameBuffer::new(&mut backing);
        compose(scene, &mut frame);
        backing
    }

    fn pixel(backing: &[u16; FRAME_PIXELS], x: i32, y: i32) -> Rgb565 {
        use embedded_graphics::pixelcolor::raw::RawU16;
        Rgb565::from(RawU16::new(backing[(y * PANEL_WIDTH + x) as usize]))
    }

    #[test]
    fn empty_scene_is_all_background() {
        let backing = composed(&Scene::new());
        assert!(backing.iter().all(|&raw| raw == 0));
    }

    #[test]
    fn dot_lands_on_its_pixel() {
        let mut scene = Scene::new();
        scene.push_overlay(Shape::Dot {
            x: 5,
            y: 7,
            tone: Tone::VoiceA,
        });
        let backing = composed(&scene);
        assert_eq!(pixel(&backing, 5, 7), Rgb565::GREEN);
        assert_eq!(pixel(&backing, 6, 7), Rgb565::BLACK);
        assert_eq!(pixel(&backing, 5, 8), Rgb565::BLACK);
    }

    #[test]
    fn span_covers_its_width() {
        let mut scene = Scene::new();
        scene.push_overlay(Shape::Span {
            x: 10,
            y: 20,
            width: 2,
            tone: Tone::VoiceB,
        });
        let backing = composed(&scene);
        assert_eq!(pixel(&backing, 10, 20), Rgb565::BLUE);
        assert_eq!(pixel(&backing, 11, 20), Rgb565::BLUE);
        assert_eq!(pixel(&backing, 9, 20), Rgb565::BLACK);
        assert_eq!(pixel(&backing, 12, 20), Rgb565::BLACK);
    }

    #[test]
    fn horizontal_segment_connects_its_endpoints() {
        let mut scene = Scene::new();
        scene.push_overlay(Shape::Segment {
            start: (30, 40),
            end: (34, 40),
            tone: Tone::VoiceA,
        });
        let backing = composed(&scene);
        for x in 30..=34 {
            assert_eq!(pixel(&backing, x, 40), Rgb565::GREEN, "x={}", x);
        }
    }

    #[test]
    fn disc_fills_and_outlines() {
        let mut scene = Scene::new();
        scene.push_backdrop(Shape::Disc {
            center: (100, 100),
            radius: 20,
            fill: Tone::FaceFill,
            outline: Some(Tone::VoiceB),
        });
        let backing = composed(&scene);
        assert_eq!(pixel(&backing, 100, 100), Rgb565::YELLOW);
        // The outline ring shows up somewhere along the center row.
        assert!((0..PANEL_WIDTH).any(|x| pixel(&backing, x, 100) == Rgb565::BLUE));
        // Far corner stays background.
        assert_eq!(pixel(&backing, 5, 5), Rgb565::BLACK);
    }

    #[test]
    fn overlay_draws_over_the_backdrop() {
        let mut scene = Scene::new();
        scene.push_backdrop(Shape::Disc {
            center: (50, 50),
            radius: 10,
            fill: Tone::FaceFill,
            outline: None,
        });
        scene.push_overlay(Shape::Dot {
            x: 50,
            y: 50,
            tone: Tone::VoiceB,
        });
        let backing = composed(&scene);
        assert_eq!(pixel(&backing, 50, 50), Rgb565::BLUE);
    }

    #[test]
    fn off_panel_shapes_are_clipped_not_fatal() {
        let mut scene = Scene::new();
        scene.push_overlay(Shape::Dot {
            x: -3,
            y: 0,
            tone: Tone::VoiceA,
        });
        scene.push_overlay(Shape::Segment {
            start: (PANEL_WIDTH - 2, PANEL_HEIGHT - 1),
            end: (PANEL_WIDTH + 5, PANEL_HEIGHT - 1),
            tone: Tone::VoiceA,
        });
        let backing = composed(&scene);
        assert_eq!(
            pixel(&backing, PANEL_WIDTH - 1, PANEL_HEIGHT - 1),
            Rgb565::GREEN
        );
    }
}
