use gerber_types::Polarity;

use crate::config::Context;
use crate::error::Error;
use crate::font::Font;
use crate::scene::{Node, Role, Scene, SheetKind};
use crate::shape::{ShapeKind, ShapeSpec, Style};

pub fn logging_init() {
    let _ = env_logger::builder()
        .is_test(true)
        .try_init();
}

/// Block letters on a 10 unit em, enough for reference designators such as "U1".
pub fn sample_font() -> Result<Font, Error> {
    Font::new("block", 10.0)
        .with_glyph('U', "m 1,-10 v 9 h 4 v -9 h -1 v 8 h -2 v -8 z", 6.0)?
        .with_glyph('1', "m 2,-10 h 2 v 10 h -2 z", 6.0)?
        .with_glyph(' ', "", 4.0)
}

pub fn sample_context() -> Result<Context, Error> {
    Ok(Context::default().with_font("block", sample_font()?))
}

/// A 10 x 8 board with a pour on the top conductor, one 1.2 pad at (2, 3) and a 0.6 drill under it.
pub fn sample_scene(context: &Context) -> Result<Scene, Error> {
    let mut scene = Scene::new("sample");

    let outline = ShapeSpec::new("outline", ShapeKind::Rect {
        width: 10.0,
        height: 8.0,
        radii: [0.0; 4],
    })
    .with_style(Style::Stroke {
        width: 0.1,
    })
    .at(5.0, 4.0);
    scene.add(None, SheetKind::Outline, Node::shape(outline.build(context)?, Role::Shape))?;

    let pour = ShapeSpec::new("pour", ShapeKind::Rect {
        width: 9.0,
        height: 7.0,
        radii: [0.0; 4],
    })
    .with_polarity(Polarity::Dark)
    .at(5.0, 4.0);
    scene.add(Some("top"), SheetKind::Pours, Node::shape(pour.build(context)?, Role::Shape))?;

    let pad = ShapeSpec::new("pad", ShapeKind::Circle {
        diameter: 1.2,
    })
    .at(2.0, 3.0);
    scene.add(Some("top"), SheetKind::Pads, Node::shape(pad.build(context)?, Role::Shape))?;

    let drill = ShapeSpec::new("drill", ShapeKind::Drill {
        diameter: 0.6,
    })
    .at(2.0, 3.0);
    scene.add(None, SheetKind::Drills, Node::shape(drill.build(context)?, Role::Shape))?;

    Ok(scene)
}
