use gerber_types::Polarity;
use log::{debug, trace};

use crate::config::Clearances;
use crate::scene::{PlacedShape, StyledPath};
use crate::shape::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearanceKind {
    Outline,
    Pad,
    Route,
    Drill,
}

impl Clearances {
    pub fn get(&self, kind: ClearanceKind) -> f64 {
        match kind {
            ClearanceKind::Outline => self.outline,
            ClearanceKind::Pad => self.pad,
            ClearanceKind::Route => self.route,
            ClearanceKind::Drill => self.drill,
        }
    }
}

/// Shape override first, then the board, then the global default.
pub fn clearance(kind: ClearanceKind, shape: Option<f64>, board: Option<&Clearances>, global: &Clearances) -> f64 {
    shape
        .or_else(|| board.map(|clearances| clearances.get(kind)))
        .unwrap_or_else(|| global.get(kind))
}

/// Clear polarity paths keeping a pour `clearance` away from `styled`.
///
/// A filled shape is masked by its fill followed by the same path stroked at twice the clearance,
/// a stroked shape by its stroke widened by twice the clearance.  Zero clearance yields no mask.
pub fn mask(styled: &StyledPath, clearance: f64) -> Vec<StyledPath> {
    if clearance == 0.0 {
        trace!("zero clearance, mask suppressed");
        return Vec::new();
    }

    let clear = |style: Style| StyledPath {
        path: styled.path.clone(),
        style,
        polarity: Polarity::Clear,
    };

    match styled.style {
        Style::Fill => vec![clear(Style::Fill), clear(Style::Stroke {
            width: 2.0 * clearance,
        })],
        Style::Stroke {
            width,
        } => vec![clear(Style::Stroke {
            width: width + 2.0 * clearance,
        })],
    }
}

/// Masks for every placed shape of one kind.
pub fn masks(
    placed: &[PlacedShape<'_>],
    kind: ClearanceKind,
    board: Option<&Clearances>,
    global: &Clearances,
) -> Vec<StyledPath> {
    let masks = placed
        .iter()
        .flat_map(|placed| {
            let clearance = clearance(kind, placed.shape.spec.pour_buffer, board, global);
            mask(&placed.styled_path(), clearance)
        })
        .collect::<Vec<_>>();
    debug!("generated {} mask paths for {:?} features", masks.len(), kind);
    masks
}
