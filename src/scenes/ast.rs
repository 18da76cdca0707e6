//! Source -> tokens -> grammar -> AST, as one continuous animation.

use std::collections::BTreeMap;

use crate::core::{Canvas, Fps, Point};
use crate::element::{Element, Shape, TextAnchor, TextSpan, UnitId, VisualUnit};
use crate::error::VizResult;
use crate::fixture;
use crate::layout;
use crate::scene::{Animation, Scene, SceneRecorder};
use crate::style::{Hue, Theme};
use crate::widgets::{self, SourceAnchor, StackedText, TextLine};

const TOKENS_PER_ROW: usize = 6;
const NODE_SCALE: f64 = 0.55;

pub fn build(fps: Fps, canvas: Canvas, theme: &Theme) -> VizResult<Scene> {
    let mut rec = SceneRecorder::new("ast_generation", fps, canvas);

    show_source(&mut rec, theme)?;
    show_tokens(&mut rec, theme)?;
    show_grammar(&mut rec, theme)?;
    show_tree(&mut rec, theme)?;

    rec.finish()
}

fn title(rec: &mut SceneRecorder, id: &str, text: &str, hue: Hue, theme: &Theme) -> VizResult<UnitId> {
    let canvas = rec.canvas();
    rec.add(widgets::corner_title(id, text, theme.hue(hue), canvas, theme))
}

fn show_source(rec: &mut SceneRecorder, theme: &Theme) -> VizResult<()> {
    let title = title(rec, "title_source", "Step 1: Source Code", Hue::Blue, theme)?;

    let lines = fixture::source_lines()
        .into_iter()
        .map(|l| TextLine::new(l, theme.text, theme.code_font_size).mono())
        .collect();
    let listing = StackedText::new("source_listing", lines)
        .gap(0.25)
        .scale(0.8)
        .build_at(Point::new(0.0, -0.3));
    let listing_box = widgets::surround(
        "source_box",
        listing.bbox(),
        theme.hue(Hue::Blue),
        0.3,
        0.2,
        2.0,
    );
    let listing = rec.add(listing)?;
    let listing_box = rec.add(listing_box)?;

    rec.play(&[Animation::Write(title)], 1.0)?;
    rec.play(
        &[Animation::Create(listing_box), Animation::Write(listing)],
        2.0,
    )?;
    rec.wait(2.0);
    Ok(())
}

fn show_tokens(rec: &mut SceneRecorder, theme: &Theme) -> VizResult<()> {
    let new_title = title(
        rec,
        "title_tokens",
        "Step 2: Lexical Analysis (Tokenization)",
        Hue::Green,
        theme,
    )?;
    rec.play(
        &[
            Animation::FadeOut(UnitId::new("title_source")),
            Animation::Write(new_title),
        ],
        1.0,
    )?;
    rec.play(
        &[
            Animation::FadeOut(UnitId::new("source_box")),
            Animation::FadeOut(UnitId::new("source_listing")),
        ],
        1.0,
    )?;

    // 6-per-row grid, scaled toward its center and nudged below the title
    let scale = 0.8;
    let tokens = fixture::tokens();
    let mut rows: Vec<Vec<UnitId>> = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let row = i / TOKENS_PER_ROW;
        let col = i % TOKENS_PER_ROW;
        let x = (col as f64 * 2.0 - 6.0 + 1.0) * scale;
        let y = (2.5 - row as f64 * 1.2 + 0.5) * scale - 0.5;

        let lexeme_font = theme.token_font_size * scale;
        let caption_font = theme.token_caption_font_size * scale;
        let caption_y = y
            - layout::em_units(lexeme_font) / 2.0
            - 0.1 * scale
            - layout::em_units(caption_font) / 2.0;

        let unit = VisualUnit::new(
            format!("token_{i}"),
            vec![
                Element {
                    shape: Shape::Text(TextSpan {
                        content: token.lexeme.to_string(),
                        font_size: lexeme_font,
                        bold: false,
                        mono: true,
                        anchor: TextAnchor::Middle,
                        origin: Point::new(x, y),
                    }),
                    color: theme.hue(token.category.hue()),
                },
                Element {
                    shape: Shape::Text(TextSpan {
                        content: token.category.label().to_string(),
                        font_size: caption_font,
                        bold: false,
                        mono: false,
                        anchor: TextAnchor::Middle,
                        origin: Point::new(x, caption_y),
                    }),
                    color: theme.muted,
                },
            ],
        );
        let id = rec.add(unit)?;
        if rows.len() <= row {
            rows.push(Vec::new());
        }
        rows[row].push(id);
    }

    for row in &rows {
        let batch: Vec<Animation> = row.iter().cloned().map(Animation::Write).collect();
        rec.play(&batch, 0.3)?;
    }
    rec.wait(2.0);
    Ok(())
}

fn show_grammar(rec: &mut SceneRecorder, theme: &Theme) -> VizResult<()> {
    let new_title = title(
        rec,
        "title_grammar",
        "Step 3: Syntax Analysis (Parsing)",
        Hue::Orange,
        theme,
    )?;
    rec.play(
        &[
            Animation::FadeOut(UnitId::new("title_tokens")),
            Animation::Write(new_title),
        ],
        1.0,
    )?;

    let fade: Vec<Animation> = (0..fixture::tokens().len())
        .map(|i| Animation::FadeOut(UnitId::new(format!("token_{i}"))))
        .collect();
    rec.play(&fade, 1.0)?;

    let mut lines = vec![TextLine::new(
        fixture::GRAMMAR_HEADER,
        theme.hue(Hue::Green),
        theme.rule_header_font_size,
    )];
    lines.extend(
        fixture::grammar_rules()
            .into_iter()
            .map(|r| TextLine::new(r, theme.text, theme.rule_font_size)),
    );
    let rules = rec.add(
        StackedText::new("grammar_rules", lines)
            .gap(0.4)
            .scale(0.85)
            .build_at(Point::ZERO),
    )?;

    rec.play(&[Animation::Write(rules)], 3.0)?;
    rec.wait(2.0);
    Ok(())
}

fn show_tree(rec: &mut SceneRecorder, theme: &Theme) -> VizResult<()> {
    let new_title = title(
        rec,
        "title_tree",
        "Step 4: Building the AST",
        Hue::Purple,
        theme,
    )?;
    rec.play(
        &[
            Animation::FadeOut(UnitId::new("title_grammar")),
            Animation::Write(new_title),
        ],
        1.0,
    )?;
    rec.play(&[Animation::FadeOut(UnitId::new("grammar_rules"))], 1.0)?;

    let mut nodes: BTreeMap<&str, VisualUnit> = BTreeMap::new();
    for node in fixture::ast_nodes() {
        nodes.insert(
            node.id,
            widgets::node_box(node.id, &node.lines, node.hue, node.pos, NODE_SCALE, theme),
        );
    }

    // one connector per child, named after its destination
    let mut connectors: BTreeMap<&str, VisualUnit> = BTreeMap::new();
    for (parent, child) in fixture::ast_edges() {
        connectors.insert(
            child,
            widgets::connector(
                format!("edge_{child}"),
                &nodes[parent],
                &nodes[child],
                SourceAnchor::Bottom,
                None,
                &theme.ast_arrow,
            ),
        );
    }

    let mut node_ids: BTreeMap<&str, UnitId> = BTreeMap::new();
    let mut conn_ids: BTreeMap<&str, UnitId> = BTreeMap::new();
    for node in fixture::ast_nodes() {
        let unit = nodes.remove(node.id).expect("node built above");
        node_ids.insert(node.id, rec.add(unit)?);
        if let Some(conn) = connectors.remove(node.id) {
            conn_ids.insert(node.id, rec.add(conn)?);
        }
    }

    for stage in fixture::ast_reveal_stages() {
        let mut batch = Vec::new();
        for id in &stage.node_ids {
            batch.push(Animation::Create(node_ids[id].clone()));
            if let Some(conn) = conn_ids.get(id) {
                batch.push(Animation::Create(conn.clone()));
            }
        }
        rec.play(&batch, stage.secs)?;
    }
    rec.wait(3.0);
    Ok(())
}
