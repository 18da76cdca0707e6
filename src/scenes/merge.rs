//! Animated basic-block merging: show a CFG, point out the straight-line
//! chain, collapse it, and present the result.

use crate::core::{Canvas, Fps, Point};
use crate::element::UnitId;
use crate::error::VizResult;
use crate::fixture;
use crate::graph::Edge;
use crate::layout;
use crate::scene::{Animation, Scene, SceneRecorder};
use crate::scenes::blocks::block_units;
use crate::style::{Hue, Theme};
use crate::widgets::{self, SourceAnchor, StackedText, TextLine};

fn edge_unit_id(edge: &Edge) -> String {
    format!("edge_{}__{}", edge.from, edge.to)
}

pub fn build(fps: Fps, canvas: Canvas, theme: &Theme) -> VizResult<Scene> {
    let mut rec = SceneRecorder::new("block_merging", fps, canvas);

    let fig = fixture::merge_cfg()?;
    let plan = fixture::merge_plan();
    let outcome = fig.graph.merge_chain(&plan)?;

    // --- step 1: the initial graph ---------------------------------------
    let title1 = rec.add(widgets::corner_title(
        "title_initial",
        "Step 1: Initial Basic Blocks",
        theme.hue(Hue::Blue),
        canvas,
        theme,
    ))?;

    let blocks = block_units(&fig, theme)?;
    let mut block_ids = Vec::new();
    let mut edge_ids = Vec::new();
    for unit in blocks.values() {
        block_ids.push(rec.add(unit.clone())?);
    }
    for edge in &fig.graph.edges {
        edge_ids.push(rec.add(widgets::connector(
            edge_unit_id(edge),
            &blocks[&edge.from],
            &blocks[&edge.to],
            SourceAnchor::for_label(edge.label),
            edge.label,
            &theme.merge_arrow,
        ))?);
    }

    rec.play(&[Animation::Write(title1)], 1.0)?;
    let batch: Vec<Animation> = block_ids.iter().cloned().map(Animation::Create).collect();
    rec.play(&batch, 2.0)?;
    let batch: Vec<Animation> = edge_ids.iter().cloned().map(Animation::Create).collect();
    rec.play(&batch, 2.0)?;
    rec.wait(2.0);

    // --- step 2: point out the chain --------------------------------------
    let title2 = rec.add(widgets::corner_title(
        "title_identify",
        "Step 2: Identify Mergeable Blocks",
        theme.hue(Hue::Blue),
        canvas,
        theme,
    ))?;
    rec.play(
        &[Animation::FadeOut(UnitId::new("title_initial")), Animation::Write(title2)],
        1.0,
    )?;

    let mut rule_lines = vec![TextLine::new(
        fixture::MERGE_RULE_HEADER,
        theme.hue(Hue::Green),
        theme.rule_font_size,
    )];
    rule_lines.extend(
        fixture::merge_rules()
            .into_iter()
            .map(|r| TextLine::new(r, theme.text, theme.stmt_font_size)),
    );
    let rules = rec.add(
        StackedText::new("merge_rules", rule_lines)
            .gap(0.3)
            .scale(0.7)
            .build_at_right_edge(canvas, 0.5, 0.0),
    )?;
    rec.play(&[Animation::Write(rules.clone())], 1.0)?;

    // dim everything outside the chain so the highlights stand out
    let mut dim: Vec<Animation> = blocks
        .keys()
        .filter(|id| !plan.chain.contains(id))
        .map(|id| Animation::FadeTo(UnitId::new(id.0.clone()), 0.35))
        .collect();
    dim.extend(
        fig.graph
            .edges
            .iter()
            .map(|e| Animation::FadeTo(UnitId::new(edge_unit_id(e)), 0.35)),
    );
    rec.play(&dim, 1.0)?;

    let mut highlight_ids = Vec::new();
    let mut annotation_ids = Vec::new();
    for chain_id in &plan.chain {
        let block = &blocks[chain_id];
        highlight_ids.push(rec.add(widgets::surround(
            format!("highlight_{chain_id}"),
            block.bbox(),
            theme.hue(Hue::Yellow),
            0.1,
            0.0,
            4.0,
        ))?);
        let em = layout::em_units(theme.annotation_font_size);
        let center = Point::new(
            (block.frame.x0 + block.frame.x1) / 2.0,
            block.frame.y0 - 0.3 - em / 2.0,
        );
        annotation_ids.push(rec.add(widgets::centered_text(
            format!("annotation_{chain_id}"),
            fixture::MERGEABLE_ANNOTATION,
            theme.hue(Hue::Yellow),
            theme.annotation_font_size,
            center,
            true,
        ))?);
    }
    let batch: Vec<Animation> = highlight_ids.iter().cloned().map(Animation::Create).collect();
    rec.play(&batch, 1.5)?;
    let batch: Vec<Animation> = annotation_ids.iter().cloned().map(Animation::Write).collect();
    rec.play(&batch, 1.0)?;
    rec.wait(2.0);

    // --- step 3: perform the merge ----------------------------------------
    let title3 = rec.add(widgets::corner_title(
        "title_merge",
        "Step 3: Perform the Merge",
        theme.hue(Hue::Blue),
        canvas,
        theme,
    ))?;
    rec.play(
        &[Animation::FadeOut(UnitId::new("title_identify")), Animation::Write(title3)],
        1.0,
    )?;

    let mut batch = vec![Animation::FadeOut(rules)];
    batch.extend(highlight_ids.into_iter().map(Animation::FadeOut));
    batch.extend(annotation_ids.into_iter().map(Animation::FadeOut));
    rec.play(&batch, 1.0)?;

    // the chain and every edge touching it go away together
    let mut batch: Vec<Animation> = plan
        .chain
        .iter()
        .map(|id| Animation::FadeOut(UnitId::new(id.0.clone())))
        .collect();
    batch.extend(
        outcome
            .removed_edges
            .iter()
            .map(|e| Animation::FadeOut(UnitId::new(edge_unit_id(e)))),
    );
    rec.play(&batch, 1.0)?;

    let merged_place = fixture::merged_block_placement();
    let merged = widgets::block_box(
        merged_place.id.0.clone(),
        &merged_place.id.0,
        &outcome.merged.statements,
        merged_place.hue,
        Point::new(
            merged_place.pos.x * fig.scale,
            merged_place.pos.y * fig.scale,
        ),
        fig.scale,
        theme,
    );
    let merged_id = rec.add(merged.clone())?;
    rec.play(&[Animation::Create(merged_id)], 1.0)?;

    let mut batch = Vec::new();
    for edge in &outcome.added_edges {
        let (from_unit, to_unit) = if edge.from == merged_place.id {
            (&merged, &blocks[&edge.to])
        } else {
            (&blocks[&edge.from], &merged)
        };
        let id = rec.add(widgets::connector(
            edge_unit_id(edge),
            from_unit,
            to_unit,
            SourceAnchor::for_label(edge.label),
            edge.label,
            &theme.merge_arrow,
        ))?;
        batch.push(Animation::Create(id));
    }
    rec.play(&batch, 1.0)?;
    rec.wait(2.0);

    // --- step 4: the merged graph ------------------------------------------
    let title4 = rec.add(widgets::corner_title(
        "title_merged",
        "Step 4: The Merged CFG",
        theme.hue(Hue::Blue),
        canvas,
        theme,
    ))?;
    rec.play(
        &[Animation::FadeOut(UnitId::new("title_merge")), Animation::Write(title4)],
        1.0,
    )?;

    // bring the dimmed context back to full opacity
    let mut restore: Vec<Animation> = blocks
        .keys()
        .filter(|id| !plan.chain.contains(id))
        .map(|id| Animation::FadeTo(UnitId::new(id.0.clone()), 1.0))
        .collect();
    restore.extend(
        fig.graph
            .edges
            .iter()
            .filter(|e| !outcome.removed_edges.contains(e))
            .map(|e| Animation::FadeTo(UnitId::new(edge_unit_id(e)), 1.0)),
    );
    rec.play(&restore, 1.0)?;

    let note_lines = fixture::merge_note()
        .into_iter()
        .map(|l| TextLine::new(l, theme.hue(Hue::Green), theme.note_font_size))
        .collect();
    let note = rec.add(
        StackedText::new("merge_note", note_lines)
            .gap(0.4)
            .build_at_right_edge(canvas, 0.5, 0.0),
    )?;
    rec.play(&[Animation::Write(note)], 1.0)?;
    rec.wait(3.0);

    rec.finish()
}
