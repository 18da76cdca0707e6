//! End-to-end scene construction: every built-in scene bakes, validates,
//! and produces sensible SVG frames.

use compviz::{Canvas, Fps, FrameIndex, SceneKind, Theme, pipeline};

fn fps() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn every_scene_builds_at_hd() {
    let theme = Theme::default();
    for kind in SceneKind::ALL {
        let scene = kind.build(fps(), Canvas::hd(), &theme).unwrap();
        assert_eq!(scene.name, kind.name());
        assert!(scene.duration.0 > 0, "{kind} has no frames");
        assert!(!scene.units.is_empty(), "{kind} has no units");
        scene.validate().unwrap();
    }
}

#[test]
fn every_scene_builds_at_other_sizes() {
    let theme = Theme::default();
    let square = Canvas {
        width: 1080,
        height: 1080,
    };
    for kind in SceneKind::ALL {
        kind.build(fps(), square, &theme).unwrap();
        kind.build(Fps::new(60, 1).unwrap(), Canvas::hd(), &theme)
            .unwrap();
    }
}

#[test]
fn first_and_last_frames_produce_svg() {
    let theme = Theme::default();
    for kind in SceneKind::ALL {
        let scene = kind.build(fps(), Canvas::hd(), &theme).unwrap();
        let first = pipeline::render_svg(&scene, FrameIndex(0), &theme).unwrap();
        let last =
            pipeline::render_svg(&scene, FrameIndex(scene.duration.0 - 1), &theme).unwrap();
        assert!(first.starts_with("<svg "), "{kind}");
        assert!(last.ends_with("</svg>\n"), "{kind}");
        // something is on screen by the end of every scene
        assert!(last.contains("<text"), "{kind} final frame has no text");
    }
}

#[test]
fn still_scenes_show_everything_from_frame_zero() {
    let theme = Theme::default();
    for kind in [
        SceneKind::IdentifyBasicBlocks,
        SceneKind::BuildBasicBlocks,
        SceneKind::FinalCfg,
    ] {
        let scene = kind.build(fps(), Canvas::hd(), &theme).unwrap();
        for unit in &scene.units {
            assert_eq!(
                unit.opacity.sample(FrameIndex(0)),
                1.0,
                "{kind}: unit '{}' hidden at frame 0",
                unit.id
            );
        }
    }
}

#[test]
fn scenes_serialize_to_json_and_back() {
    let theme = Theme::default();
    let scene = SceneKind::FinalCfg.build(fps(), Canvas::hd(), &theme).unwrap();
    let json = serde_json::to_string(&scene).unwrap();
    let back: compviz::Scene = serde_json::from_str(&json).unwrap();
    assert_eq!(back.duration, scene.duration);
    assert_eq!(back.units.len(), scene.units.len());
    back.validate().unwrap();
}

#[test]
fn ast_scene_token_and_node_counts() {
    let theme = Theme::default();
    let scene = SceneKind::AstGeneration
        .build(fps(), Canvas::hd(), &theme)
        .unwrap();
    let tokens = scene
        .units
        .iter()
        .filter(|u| u.id.0.starts_with("token_"))
        .count();
    assert_eq!(tokens, 33);
    let edges = scene
        .units
        .iter()
        .filter(|u| u.id.0.starts_with("edge_"))
        .count();
    assert_eq!(edges, 9);
}
