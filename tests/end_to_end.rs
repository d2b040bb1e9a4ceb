use board_artwork::artwork::{generate, write_artwork, GerberOptions};
#[cfg(feature = "parser")]
use board_artwork::gerber::GerberFile;
#[cfg(feature = "parser")]
use board_artwork::gerber_types::{
    Aperture, ApertureDefinition, Circle, Command, DCode, ExtendedCode, FunctionCode, GCode, Operation, Polarity,
};
#[cfg(feature = "parser")]
use board_artwork::spacial::Point;
use board_artwork::testing::{logging_init, sample_context, sample_scene};
#[cfg(feature = "parser")]
use board_artwork::BoundingBox;

/// A run of plotting commands sharing polarity and aperture.
#[cfg(feature = "parser")]
#[derive(Debug)]
struct Block {
    polarity: Polarity,
    aperture: Option<i32>,
    region: bool,
    bounds: BoundingBox,
}

#[cfg(feature = "parser")]
fn blocks(file: &GerberFile) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut polarity = Polarity::Dark;
    let mut aperture = None;
    let mut region = false;
    let mut current: Option<Block> = None;

    for command in &file.commands {
        match command {
            Command::ExtendedCode(ExtendedCode::LoadPolarity(value)) => polarity = *value,
            Command::FunctionCode(FunctionCode::DCode(DCode::SelectAperture(code))) => aperture = Some(*code),
            Command::FunctionCode(FunctionCode::GCode(GCode::RegionMode(enabled))) => {
                region = *enabled;
                blocks.extend(current.take());
            }
            Command::FunctionCode(FunctionCode::DCode(DCode::Operation(operation))) => {
                let (coordinates, moving) = match operation {
                    Operation::Move(Some(coordinates)) => (coordinates, true),
                    Operation::Interpolate(Some(coordinates), _) => (coordinates, false),
                    _ => continue,
                };
                let point = Point::new(
                    f64::from(coordinates.x.unwrap()),
                    f64::from(coordinates.y.unwrap()),
                );
                let starts_block = moving && !region;
                if starts_block || current.is_none() {
                    blocks.extend(current.take());
                    current = Some(Block {
                        polarity,
                        aperture,
                        region,
                        bounds: BoundingBox::default(),
                    });
                }
                if let Some(block) = current.as_mut() {
                    block.bounds.include(point);
                }
            }
            _ => {}
        }
    }
    blocks.extend(current.take());
    blocks
}

#[cfg(feature = "parser")]
fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-3
}

#[cfg(feature = "parser")]
#[test]
fn test_pour_mask_and_flash() {
    // given
    logging_init();
    let context = sample_context().unwrap();
    let scene = sample_scene(&context).unwrap();
    let options = GerberOptions {
        flashes: true,
    };

    // when
    let files = generate(&scene, &context, &options).unwrap();

    // then
    let conductor = files
        .iter()
        .find(|file| file.name == "sample_top_conductor.ger")
        .unwrap();
    let gerber = GerberFile::parse(&conductor.name, &conductor.content).unwrap();
    let blocks = blocks(&gerber);

    // one dark pour fill, plotted first
    let pours = blocks
        .iter()
        .filter(|block| block.region && block.polarity == Polarity::Dark && approx(block.bounds.width(), 9.0))
        .count();
    assert_eq!(pours, 1);
    assert!(blocks[0].region && approx(blocks[0].bounds.height(), 7.0));

    // the pad mask is a clear fill followed by a clear stroke, centered on the pad
    let pad_center = Point::new(2.0, -3.0);
    let pad_masks = blocks
        .iter()
        .filter(|block| block.polarity == Polarity::Clear)
        .filter(|block| (block.bounds.center() - pad_center).norm() < 1e-3 && approx(block.bounds.width(), 1.2))
        .collect::<Vec<_>>();
    assert!(pad_masks[0].region);
    assert!(!pad_masks[1].region);
    assert!(
        gerber
            .commands
            .contains(&Command::ExtendedCode(ExtendedCode::ApertureDefinition(ApertureDefinition::new(
                pad_masks[1].aperture.unwrap(),
                Aperture::Circle(Circle::new(0.5))
            ))))
    );

    // the pad itself comes after all masks, in dark
    let last = blocks.last().unwrap();
    assert!(last.region && last.polarity == Polarity::Dark);
    assert!((last.bounds.center() - pad_center).norm() < 1e-3);

    assert_eq!(gerber.flashes(), vec![pad_center]);
}

#[test]
fn test_drill_file() {
    // given
    logging_init();
    let context = sample_context().unwrap();
    let scene = sample_scene(&context).unwrap();

    // when
    let files = generate(&scene, &context, &GerberOptions::default()).unwrap();

    // then
    let drills = files
        .iter()
        .find(|file| file.name == "sample_drills.drl")
        .unwrap();
    let lines = drills
        .content
        .lines()
        .collect::<Vec<_>>();
    assert_eq!(lines, vec!["M48", "METRIC,TZ", "G90", "M71", "T1C0.6", "%", "T1", "X2000000Y-3000000", "M30"]);
}

#[cfg(feature = "parser")]
#[test]
fn test_files_read_back_identically() {
    // given
    logging_init();
    let context = sample_context().unwrap();
    let scene = sample_scene(&context).unwrap();

    // when
    let files = generate(&scene, &context, &GerberOptions {
        flashes: true,
    })
    .unwrap();

    // then
    let names = files
        .iter()
        .map(|file| file.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["sample_top_conductor.ger", "sample_outline.ger", "sample_drills.drl"]);

    for file in files
        .iter()
        .filter(|file| file.name.ends_with(".ger"))
    {
        let gerber = GerberFile::parse(&file.name, &file.content).unwrap();
        assert_eq!(gerber.source().unwrap(), file.content);
        gerber.cross_check().unwrap();
    }
}

#[test]
fn test_write_to_directory() {
    // given
    logging_init();
    let context = sample_context().unwrap();
    let scene = sample_scene(&context).unwrap();
    let files = generate(&scene, &context, &GerberOptions::default()).unwrap();
    let directory = tempfile::tempdir().unwrap();

    // when
    write_artwork(&files, directory.path()).unwrap();

    // then
    for file in &files {
        let content = std::fs::read_to_string(directory.path().join(&file.name)).unwrap();
        assert_eq!(content, file.content);
    }
}
