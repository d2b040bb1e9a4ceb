use std::fs;

use log::{debug, info};

use crate::config::Context;
use crate::error::Error;
use crate::excellon::{self, DrillTable, ExcellonFile};
use crate::gerber::{GerberFile, GerberWriter};
use crate::mask::{masks, ClearanceKind};
use crate::scene::{place, place_by_role, Layer, Scene, SheetKind, StyledPath};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtworkFile {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GerberOptions {
    /// stamp a flash at every pad center of conductor files
    pub flashes: bool,
}

pub fn file_name(scene: &Scene, key: &str, context: &Context) -> String {
    format!("{}_{}.{}", scene.name, key, context.config.manufacturer.extension(key))
}

fn styled_paths(nodes: &[crate::scene::Node]) -> Vec<StyledPath> {
    place_by_role(nodes)
        .iter()
        .map(|placed| placed.styled_path())
        .collect()
}

/// Conductor body in plotting order: pours, pour masks, routing, pads, then the conductor sheet.
pub fn conductor_paths(scene: &Scene, layer: &Layer, context: &Context) -> Vec<StyledPath> {
    let mut paths = styled_paths(layer.sheet(SheetKind::Pours));

    if layer.has_pours() {
        let global = &context.config.clearances;
        let board = scene.clearances.as_ref();
        for (nodes, kind) in [
            (layer.sheet(SheetKind::Pads), ClearanceKind::Pad),
            (layer.sheet(SheetKind::Routing), ClearanceKind::Route),
            (scene.board_sheet(SheetKind::Drills), ClearanceKind::Drill),
            (scene.board_sheet(SheetKind::Outline), ClearanceKind::Outline),
        ] {
            paths.extend(masks(&place(nodes), kind, board, global));
        }
    }

    paths.extend(styled_paths(layer.sheet(SheetKind::Routing)));
    paths.extend(styled_paths(layer.sheet(SheetKind::Pads)));
    paths.extend(styled_paths(layer.sheet(SheetKind::Conductor)));
    paths
}

/// Gerber for one output sheet of a layer, `None` when the sheet has no content.
#[profiling::function]
pub fn layer_gerber(
    scene: &Scene,
    layer: &Layer,
    sheet: SheetKind,
    context: &Context,
    options: &GerberOptions,
) -> Result<Option<GerberFile>, Error> {
    let (paths, flashes) = match sheet {
        SheetKind::Conductor => {
            let flashes = match options.flashes {
                true => place(layer.sheet(SheetKind::Pads))
                    .iter()
                    .map(|pad| pad.center())
                    .collect(),
                false => Vec::new(),
            };
            (conductor_paths(scene, layer, context), flashes)
        }
        _ => (styled_paths(layer.sheet(sheet)), Vec::new()),
    };

    if paths.is_empty() && flashes.is_empty() {
        debug!("no content. layer: {}, sheet: {}", layer.name, sheet);
        return Ok(None);
    }

    let name = format!("{}_{}_{}", scene.name, layer.name, sheet);
    let mut writer = GerberWriter::new(&name, &context.config)?;
    writer.add_all(&paths)?;
    for center in flashes {
        writer.flash(center)?;
    }
    Ok(Some(writer.finish()))
}

/// Gerber for a board level sheet such as the outline.
pub fn board_gerber(scene: &Scene, sheet: SheetKind, context: &Context) -> Result<Option<GerberFile>, Error> {
    let paths = styled_paths(scene.board_sheet(sheet));
    if paths.is_empty() {
        return Ok(None);
    }

    let mut writer = GerberWriter::new(&format!("{}_{}", scene.name, sheet), &context.config)?;
    writer.add_all(&paths)?;
    Ok(Some(writer.finish()))
}

pub fn drills(scene: &Scene, context: &Context) -> ExcellonFile {
    let table = DrillTable::from_placed(
        &place(scene.board_sheet(SheetKind::Drills)),
        context.config.significant_digits,
    );
    excellon::write(&format!("{}_{}", scene.name, SheetKind::Drills), &table)
}

/// All Gerber files with content plus the drill file.
pub fn generate(scene: &Scene, context: &Context, options: &GerberOptions) -> Result<Vec<ArtworkFile>, Error> {
    let mut files = Vec::new();

    for layer in scene.layers() {
        for sheet in SheetKind::ALL
            .into_iter()
            .filter(SheetKind::is_layer_output)
        {
            if let Some(gerber) = layer_gerber(scene, layer, sheet, context, options)? {
                files.push(ArtworkFile {
                    name: file_name(scene, &format!("{}_{}", layer.name, sheet), context),
                    content: gerber.source()?,
                });
            }
        }
    }

    for sheet in [SheetKind::Outline, SheetKind::Documentation] {
        if let Some(gerber) = board_gerber(scene, sheet, context)? {
            files.push(ArtworkFile {
                name: file_name(scene, sheet.name(), context),
                content: gerber.source()?,
            });
        }
    }

    files.push(ArtworkFile {
        name: file_name(scene, SheetKind::Drills.name(), context),
        content: drills(scene, context).to_string(),
    });

    info!("generated {} artwork files for '{}'", files.len(), scene.name);
    Ok(files)
}

pub fn write_artwork(files: &[ArtworkFile], directory: impl AsRef<std::path::Path>) -> Result<(), Error> {
    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;
    for file in files {
        let path = directory.join(&file.name);
        fs::write(&path, &file.content)?;
        debug!("wrote {}", path.display());
    }
    Ok(())
}
