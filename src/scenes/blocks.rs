//! The three control-flow-graph stills: boundary identification, block
//! construction, and the finished graph.

use std::collections::BTreeMap;

use crate::core::{Canvas, Fps, Point};
use crate::element::VisualUnit;
use crate::error::VizResult;
use crate::fixture::{self, CfgFigure};
use crate::graph::BlockId;
use crate::scene::{Scene, SceneRecorder};
use crate::style::{Hue, Theme};
use crate::widgets::{self, SourceAnchor, StackedText, TextLine};

/// Hold time for a still; `frame --last` picks the final frame either way.
const STILL_SECS: f64 = 1.0;

pub fn identify_basic_blocks(fps: Fps, canvas: Canvas, theme: &Theme) -> VizResult<Scene> {
    let mut rec = SceneRecorder::new("identify_basic_blocks", fps, canvas);

    rec.add_shown(widgets::top_title(
        "title",
        "Step 3: Identify Basic Block Boundaries",
        theme.hue(Hue::Blue),
        canvas,
        theme,
    ))?;

    let mut rules = vec![TextLine::new(
        fixture::BOUNDARY_HEADER,
        theme.hue(Hue::Green),
        theme.rule_font_size,
    )];
    rules.extend(
        fixture::boundary_rules()
            .into_iter()
            .map(|r| TextLine::new(r, theme.text, theme.stmt_font_size)),
    );
    rec.add_shown(
        StackedText::new("boundary_rules", rules)
            .gap(0.4)
            .scale(0.8)
            .build_at(Point::new(0.0, 1.5)),
    )?;

    let marked = fixture::marked_code()
        .into_iter()
        .map(|line| TextLine::new(line.text, theme.hue(line.hue), theme.node_font_size).mono())
        .collect();
    rec.add_shown(
        StackedText::new("marked_code", marked)
            .gap(0.2)
            .scale(0.6)
            .build_at(Point::new(0.0, -0.5)),
    )?;

    rec.wait(STILL_SECS);
    rec.finish()
}

pub fn build_basic_blocks(fps: Fps, canvas: Canvas, theme: &Theme) -> VizResult<Scene> {
    let mut rec = SceneRecorder::new("build_basic_blocks", fps, canvas);

    rec.add_shown(widgets::top_title(
        "title",
        "Step 4: Build Basic Blocks",
        theme.hue(Hue::Blue),
        canvas,
        theme,
    ))?;

    let fig = fixture::grade_cfg_loose()?;
    for unit in block_units(&fig, theme)?.into_values() {
        rec.add_shown(unit)?;
    }

    rec.wait(STILL_SECS);
    rec.finish()
}

pub fn final_cfg(fps: Fps, canvas: Canvas, theme: &Theme) -> VizResult<Scene> {
    let mut rec = SceneRecorder::new("final_cfg", fps, canvas);

    let fig = fixture::grade_cfg_final()?;
    let blocks = block_units(&fig, theme)?;
    for edge in &fig.graph.edges {
        rec.add_shown(widgets::connector(
            format!("edge_{}__{}", edge.from, edge.to),
            &blocks[&edge.from],
            &blocks[&edge.to],
            SourceAnchor::for_label(edge.label),
            edge.label,
            &theme.cfg_arrow,
        ))?;
    }
    for unit in blocks.into_values() {
        rec.add_shown(unit)?;
    }

    rec.wait(STILL_SECS);
    rec.finish()
}

/// Build one block box per placement, positions scaled with the figure.
pub(crate) fn block_units(
    fig: &CfgFigure,
    theme: &Theme,
) -> VizResult<BTreeMap<BlockId, VisualUnit>> {
    let mut units = BTreeMap::new();
    for placement in &fig.placements {
        let block = fig.graph.block(&placement.id)?;
        let pos = Point::new(placement.pos.x * fig.scale, placement.pos.y * fig.scale);
        units.insert(
            placement.id.clone(),
            widgets::block_box(
                placement.id.0.clone(),
                &placement.id.0,
                &block.statements,
                placement.hue,
                pos,
                fig.scale,
                theme,
            ),
        );
    }
    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Shape, UnitId};

    fn fps() -> Fps {
        Fps::new(30, 1).unwrap()
    }

    #[test]
    fn stills_build_and_validate() {
        let theme = Theme::default();
        for scene in [
            identify_basic_blocks(fps(), Canvas::hd(), &theme).unwrap(),
            build_basic_blocks(fps(), Canvas::hd(), &theme).unwrap(),
            final_cfg(fps(), Canvas::hd(), &theme).unwrap(),
        ] {
            assert!(scene.duration.0 > 0);
            assert!(!scene.units.is_empty());
        }
    }

    #[test]
    fn final_cfg_has_six_blocks_and_six_edges() {
        let theme = Theme::default();
        let scene = final_cfg(fps(), Canvas::hd(), &theme).unwrap();
        let blocks = scene
            .units
            .iter()
            .filter(|u| !u.id.0.starts_with("edge_"))
            .count();
        let edges = scene.units.len() - blocks;
        assert_eq!(blocks, 6);
        assert_eq!(edges, 6);
    }

    #[test]
    fn exit_block_renders_the_empty_placeholder() {
        let theme = Theme::default();
        let scene = final_cfg(fps(), Canvas::hd(), &theme).unwrap();
        let exit = scene.unit(&UnitId::new("exit_block")).unwrap();
        let has_placeholder = exit.elements.iter().any(|e| {
            matches!(&e.shape, Shape::Text(span) if span.content == "(empty)")
        });
        assert!(has_placeholder);
    }

    #[test]
    fn branch_edges_carry_their_labels() {
        let theme = Theme::default();
        let scene = final_cfg(fps(), Canvas::hd(), &theme).unwrap();
        for (edge_id, expected) in [
            ("edge_block_1__block_2", "true"),
            ("edge_block_1__block_3", "false"),
        ] {
            let unit = scene.unit(&UnitId::new(edge_id)).unwrap();
            let label = unit.elements.iter().find_map(|e| match &e.shape {
                Shape::Text(span) => Some(span.content.clone()),
                _ => None,
            });
            assert_eq!(label.as_deref(), Some(expected), "{edge_id}");
        }
    }
}
