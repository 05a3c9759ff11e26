//! Styled Danmaku
//!
//! A comment that has been measured and is ready to be placed on a track.
//! Measurement happens once at construction; the composited image is built
//! on the first draw and reused for every frame after that.

use crate::bitmap::{create_danmaku_image, DanmakuImage};
use crate::canvas::DrawScope;
use crate::measure::{LayoutConstraints, TextLayout, TextMeasurer};
use crate::{
    Color, Danmaku, DanmakuConfig, DanmakuLocation, DanmakuPresentation, DanmakuStyle,
    TextDecoration, TextStyle,
};
use std::cell::OnceCell;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Sample text of the placeholder danmaku: ASCII, CJK and an emoji.
pub const DUMMY_TEXT: &str = "dummy 占位 攟 の \u{1F604}";

/// Counter for placeholder ids
static NEXT_DUMMY_ID: AtomicU64 = AtomicU64::new(1);

/// A danmaku whose on-screen size is known.
///
/// Only sized danmaku can be assigned to a track.
pub trait SizeSpecifiedDanmaku {
    fn danmaku_width(&self) -> u32;
    fn danmaku_height(&self) -> u32;
}

/// Everything needed to draw one comment
///
/// Holds the two measured passes (fill and outline) and lazily the image
/// composited from them. The cache is a [`OnceCell`], so an instance can
/// only be drawn from one thread.
pub struct StyledDanmaku<L: TextLayout> {
    presentation: DanmakuPresentation,
    solid_layout: L,
    border_layout: L,
    image: OnceCell<DanmakuImage>,
    danmaku_width: u32,
    danmaku_height: u32,
}

impl<L: TextLayout> StyledDanmaku<L> {
    /// Measure a comment.
    ///
    /// With `enable_color` off every comment is drawn white. With `is_debug`
    /// on the emission time is appended to the text.
    pub fn new<M>(
        presentation: DanmakuPresentation,
        measurer: &M,
        base_style: &TextStyle,
        style: &DanmakuStyle,
        enable_color: bool,
        is_debug: bool,
    ) -> Self
    where
        M: TextMeasurer<Layout = L>,
    {
        let danmaku_text = compose_text(&presentation.danmaku, is_debug);

        let color = if enable_color {
            Color::opaque_from_packed(presentation.danmaku.color)
        } else {
            Color::WHITE
        };
        let decoration = TextStyle::default().with_decoration(if presentation.is_self {
            TextDecoration::Underline
        } else {
            TextDecoration::None
        });

        let solid_layout = measurer.measure(
            &danmaku_text,
            &base_style
                .merge(&style.style_for_text(color))
                .merge(&decoration),
            LayoutConstraints::single_line(),
        );
        let border_layout = measurer.measure(
            &danmaku_text,
            &base_style.merge(&style.style_for_border()).merge(&decoration),
            LayoutConstraints::single_line(),
        );

        // Placement uses the fill metrics; the outline may overhang them.
        let size = solid_layout.size();

        debug!(
            "Styled danmaku {} {:?} ({:?}): {}x{}",
            presentation.danmaku.id,
            danmaku_text,
            presentation.danmaku.location,
            size.width,
            size.height
        );

        Self {
            presentation,
            solid_layout,
            border_layout,
            image: OnceCell::new(),
            danmaku_width: size.width,
            danmaku_height: size.height,
        }
    }

    /// Measure a comment with surface-wide settings.
    pub fn from_config<M>(
        presentation: DanmakuPresentation,
        measurer: &M,
        base_style: &TextStyle,
        config: &DanmakuConfig,
    ) -> Self
    where
        M: TextMeasurer<Layout = L>,
    {
        Self::new(
            presentation,
            measurer,
            base_style,
            &config.style,
            config.enable_color,
            config.is_debug,
        )
    }

    pub fn presentation(&self) -> &DanmakuPresentation {
        &self.presentation
    }

    /// Draw at the position the providers report.
    ///
    /// The providers are called on every draw, so the same instance can move
    /// from frame to frame. The image is composited on the first call only.
    pub fn draw<S>(
        &self,
        scope: &mut S,
        screen_pos_x: impl FnOnce() -> f32,
        screen_pos_y: impl FnOnce() -> f32,
    ) where
        S: DrawScope + ?Sized,
    {
        let image = self
            .image
            .get_or_init(|| create_danmaku_image(&self.solid_layout, &self.border_layout));

        scope.draw_image(image, screen_pos_x(), screen_pos_y());
    }

    #[cfg(test)]
    pub(crate) fn solid_layout(&self) -> &L {
        &self.solid_layout
    }

    #[cfg(test)]
    pub(crate) fn border_layout(&self) -> &L {
        &self.border_layout
    }

    #[cfg(test)]
    pub(crate) fn cached_image(&self) -> Option<&DanmakuImage> {
        self.image.get()
    }
}

impl<L: TextLayout> SizeSpecifiedDanmaku for StyledDanmaku<L> {
    fn danmaku_width(&self) -> u32 {
        self.danmaku_width
    }

    fn danmaku_height(&self) -> u32 {
        self.danmaku_height
    }
}

/// `minutes:seconds.ff` for an emission time, e.g. `1:15.00`.
pub fn format_play_time(play_time_millis: i64) -> String {
    let seconds = play_time_millis as f32 / 1000.0;
    let minutes = (seconds / 60.0).floor() as i64;
    format!("{}:{:.2}", minutes, seconds % 60.0)
}

fn compose_text(danmaku: &Danmaku, is_debug: bool) -> String {
    if is_debug {
        format!("{} {}", danmaku.text, format_play_time(danmaku.play_time_millis))
    } else {
        danmaku.text.clone()
    }
}

/// Placeholder danmaku used to preview track layout.
pub fn dummy_danmaku<M: TextMeasurer>(
    measurer: &M,
    base_style: &TextStyle,
    style: &DanmakuStyle,
) -> StyledDanmaku<M::Layout> {
    dummy_danmaku_with_text(measurer, base_style, style, DUMMY_TEXT)
}

/// Placeholder danmaku with custom text.
pub fn dummy_danmaku_with_text<M: TextMeasurer>(
    measurer: &M,
    base_style: &TextStyle,
    style: &DanmakuStyle,
    text: &str,
) -> StyledDanmaku<M::Layout> {
    let id = NEXT_DUMMY_ID.fetch_add(1, Ordering::Relaxed);
    let presentation = DanmakuPresentation::new(
        Danmaku::new(
            format!("dummy-{id}"),
            "dummy",
            0,
            "1",
            DanmakuLocation::Normal,
            text,
            0,
        ),
        false,
    );

    StyledDanmaku::new(presentation, measurer, base_style, style, false, false)
}
