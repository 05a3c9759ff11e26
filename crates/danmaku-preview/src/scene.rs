//! Static lane placement for preview frames
//!
//! Top and bottom danmaku are centred and stacked from their edge. Scrolling
//! danmaku fill the lanes between the two blocks, staggered horizontally so
//! neighbours do not line up. Lanes wrap when the middle band is full.

use danmaku_render::{DanmakuLocation, SizeSpecifiedDanmaku};

/// Fractions of the frame width used to stagger scrolling lanes
const STAGGER: [f32; 5] = [0.05, 0.35, 0.15, 0.5, 0.25];

/// Top-left corner of one danmaku in the frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
}

/// Place each danmaku, in input order.
pub fn layout<D: SizeSpecifiedDanmaku>(
    items: &[(DanmakuLocation, &D)],
    frame_width: u32,
    frame_height: u32,
    spacing: u32,
) -> Vec<Placement> {
    let centred = |d: &D| (frame_width as f32 - d.danmaku_width() as f32).max(0.0) / 2.0;

    let mut placements = vec![Placement { x: 0.0, y: 0.0 }; items.len()];
    let mut top_end = 0u32;
    let mut bottom_start = frame_height;

    for (i, (location, d)) in items.iter().enumerate() {
        match location {
            DanmakuLocation::Top => {
                placements[i] = Placement {
                    x: centred(*d),
                    y: top_end as f32,
                };
                top_end += d.danmaku_height() + spacing;
            }
            DanmakuLocation::Bottom => {
                bottom_start = bottom_start.saturating_sub(d.danmaku_height());
                placements[i] = Placement {
                    x: centred(*d),
                    y: bottom_start as f32,
                };
                bottom_start = bottom_start.saturating_sub(spacing);
            }
            DanmakuLocation::Normal => {}
        }
    }

    let mut lane_y = top_end;
    let mut lane = 0usize;
    for (i, (location, d)) in items.iter().enumerate() {
        if *location != DanmakuLocation::Normal {
            continue;
        }
        if lane_y + d.danmaku_height() > bottom_start && lane_y > top_end {
            lane_y = top_end;
        }
        placements[i] = Placement {
            x: frame_width as f32 * STAGGER[lane % STAGGER.len()],
            y: lane_y as f32,
        };
        lane_y += d.danmaku_height() + spacing;
        lane += 1;
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u32, u32);

    impl SizeSpecifiedDanmaku for Fixed {
        fn danmaku_width(&self) -> u32 {
            self.0
        }

        fn danmaku_height(&self) -> u32 {
            self.1
        }
    }

    #[test]
    fn test_pinned_lanes() {
        let d = Fixed(100, 20);
        let items = [
            (DanmakuLocation::Top, &d),
            (DanmakuLocation::Top, &d),
            (DanmakuLocation::Bottom, &d),
        ];

        let placed = layout(&items, 300, 200, 5);
        assert_eq!(placed[0], Placement { x: 100.0, y: 0.0 });
        assert_eq!(placed[1], Placement { x: 100.0, y: 25.0 });
        assert_eq!(placed[2], Placement { x: 100.0, y: 180.0 });
    }

    #[test]
    fn test_scrolling_lanes_below_top_block() {
        let d = Fixed(50, 20);
        let items = [
            (DanmakuLocation::Normal, &d),
            (DanmakuLocation::Top, &d),
            (DanmakuLocation::Normal, &d),
        ];

        let placed = layout(&items, 200, 200, 0);
        assert_eq!(placed[1].y, 0.0);
        assert_eq!(placed[0].y, 20.0);
        assert_eq!(placed[2].y, 40.0);
        assert_ne!(placed[0].x, placed[2].x);
    }

    #[test]
    fn test_scrolling_lanes_wrap() {
        let d = Fixed(10, 40);
        let items = [
            (DanmakuLocation::Normal, &d),
            (DanmakuLocation::Normal, &d),
            (DanmakuLocation::Normal, &d),
        ];

        let placed = layout(&items, 100, 100, 0);
        assert_eq!(placed[0].y, 0.0);
        assert_eq!(placed[1].y, 40.0);
        assert_eq!(placed[2].y, 0.0);
    }
}
