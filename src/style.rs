use crate::core::Rgba8;

/// Named palette entry. Fixture data refers to hues, not raw colors, so the
/// worked example stays independent of the concrete theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Hue {
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
    Gray,
    White,
}

/// Connector styling shared by every arrow a scene draws.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ArrowStyle {
    pub color: Rgba8,
    /// Stroke width in px at the 1080p reference canvas.
    pub stroke_width: f64,
    /// Shortening applied to both arrow ends, in scene units.
    pub buffer: f64,
    /// Gap between a box edge and the arrow anchor, in scene units.
    pub anchor_offset: f64,
    /// Arrow head length in scene units.
    pub tip_length: f64,
    pub label_font_size: f64,
    /// Horizontal nudge keeping branch labels off the line, in scene units.
    pub label_offset: f64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Theme {
    pub background: Rgba8,
    pub text: Rgba8,
    pub muted: Rgba8,

    pub title_font_size: f64,
    pub code_font_size: f64,
    pub token_font_size: f64,
    pub token_caption_font_size: f64,
    pub rule_font_size: f64,
    pub rule_header_font_size: f64,
    pub node_font_size: f64,
    pub stmt_font_size: f64,
    pub block_title_font_size: f64,
    pub annotation_font_size: f64,
    pub note_font_size: f64,

    /// Arrows between AST nodes.
    pub ast_arrow: ArrowStyle,
    /// Arrows in the final control-flow graph.
    pub cfg_arrow: ArrowStyle,
    /// Arrows in the block-merging demonstration (denser layout).
    pub merge_arrow: ArrowStyle,
}

impl Theme {
    pub fn hue(&self, hue: Hue) -> Rgba8 {
        match hue {
            Hue::Blue => Rgba8::rgb(0x58, 0xc4, 0xdd),
            Hue::Green => Rgba8::rgb(0x83, 0xc1, 0x67),
            Hue::Yellow => Rgba8::rgb(0xff, 0xff, 0x00),
            Hue::Orange => Rgba8::rgb(0xff, 0x86, 0x2f),
            Hue::Red => Rgba8::rgb(0xfc, 0x62, 0x55),
            Hue::Purple => Rgba8::rgb(0x9a, 0x72, 0xac),
            Hue::Gray => Rgba8::rgb(0x88, 0x88, 0x88),
            Hue::White => Rgba8::rgb(0xff, 0xff, 0xff),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        let blue = Rgba8::rgb(0x58, 0xc4, 0xdd);
        let gray = Rgba8::rgb(0x88, 0x88, 0x88);
        Self {
            background: Rgba8::rgb(18, 20, 28),
            text: Rgba8::rgb(0xff, 0xff, 0xff),
            muted: gray,

            title_font_size: 36.0,
            code_font_size: 22.0,
            token_font_size: 24.0,
            token_caption_font_size: 14.0,
            rule_font_size: 24.0,
            rule_header_font_size: 28.0,
            node_font_size: 18.0,
            stmt_font_size: 20.0,
            block_title_font_size: 24.0,
            annotation_font_size: 16.0,
            note_font_size: 20.0,

            ast_arrow: ArrowStyle {
                color: gray,
                stroke_width: 1.5,
                buffer: 0.1,
                anchor_offset: 0.0,
                tip_length: 0.15,
                label_font_size: 14.0,
                label_offset: 0.25,
            },
            cfg_arrow: ArrowStyle {
                color: blue,
                stroke_width: 3.0,
                buffer: 0.2,
                anchor_offset: 0.15,
                tip_length: 0.25,
                label_font_size: 16.0,
                label_offset: 0.3,
            },
            merge_arrow: ArrowStyle {
                color: blue,
                stroke_width: 2.5,
                buffer: 0.15,
                anchor_offset: 0.1,
                tip_length: 0.2,
                label_font_size: 14.0,
                label_offset: 0.25,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_hue_resolves_to_an_opaque_color() {
        let theme = Theme::default();
        for hue in [
            Hue::Blue,
            Hue::Green,
            Hue::Yellow,
            Hue::Orange,
            Hue::Red,
            Hue::Purple,
            Hue::Gray,
            Hue::White,
        ] {
            assert_eq!(theme.hue(hue).a, 255);
        }
    }

    #[test]
    fn branch_label_offset_is_nonzero() {
        // Labels must clear the arrow line (true/false edges).
        let theme = Theme::default();
        assert!(theme.cfg_arrow.label_offset > 0.0);
        assert!(theme.merge_arrow.label_offset > 0.0);
    }
}
