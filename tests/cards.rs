use std::path::PathBuf;

use mdcards::{
    BitmapTypeface, CardOptions, Node, PageBreakPolicy, Pipeline, Template, TemplateConfig,
};
use pretty_assertions::assert_eq;

fn template() -> Template {
    Template::with_typeface(TemplateConfig::default(), Box::new(BitmapTypeface)).unwrap()
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn single_document_renders_one_card() {
    let template = template();
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(&template, CardOptions::default());

    let pages = pipeline.plan("# Title\n\nShort paragraph.");
    assert_eq!(pages.len(), 1);
    assert!(matches!(pages[0].nodes[0], Node::Heading { level: 1, .. }));
    assert!(matches!(pages[0].nodes[1], Node::Paragraph { .. }));

    let written = pipeline
        .write_cards("# Title\n\nShort paragraph.", dir.path())
        .unwrap();
    assert_eq!(names(&written), vec!["page_01.png"]);
    let image = image::open(&written[0]).unwrap();
    assert_eq!((image.width(), image.height()), (1080, 1920));
}

#[test]
fn marker_segments_number_pages_continuously() {
    let template = template();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested/cards");
    let pipeline = Pipeline::new(&template, CardOptions::default());

    let written = pipeline.write_cards("A[[PAGE_BREAK]]B", &out).unwrap();
    assert_eq!(names(&written), vec!["page_01.png", "page_02.png"]);
    assert!(written.iter().all(|path| path.exists()));
}

#[test]
fn page_indices_cover_every_segment_without_gaps() {
    let template = template();
    let dir = tempfile::tempdir().unwrap();
    let long = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n\n".repeat(120);
    let text = format!("{long}[[PAGE_BREAK]]short[[PAGE_BREAK]]{long}");
    let pipeline = Pipeline::new(&template, CardOptions::default());

    let planned = pipeline.plan(&text).len();
    assert!(planned >= 3);
    let written = pipeline.write_cards(&text, dir.path()).unwrap();
    let expected: Vec<String> = (1..=planned).map(|n| format!("page_{n:02}.png")).collect();
    assert_eq!(names(&written), expected);
}

#[test]
fn char_budget_policy_splits_long_input() {
    let template = template();
    let options = CardOptions {
        policy: PageBreakPolicy::CharBudget(100),
        ..CardOptions::default()
    };
    let text = "one two three four five six seven eight nine ten\n\n".repeat(5);
    let pages = Pipeline::new(&template, options).plan(&text);
    // 48 chars plus a newline per paragraph: two fit under 100.
    let sizes: Vec<usize> = pages.iter().map(|page| page.nodes.len()).collect();
    assert_eq!(sizes, vec![2, 2, 1]);
}

#[test]
fn local_images_resolve_against_the_asset_root() {
    let template = template();
    let dir = tempfile::tempdir().unwrap();
    image::RgbaImage::from_pixel(440, 300, image::Rgba([10, 120, 200, 255]))
        .save(dir.path().join("photo.png"))
        .unwrap();
    let options = CardOptions {
        asset_root: dir.path().to_path_buf(),
        ..CardOptions::default()
    };
    let pipeline = Pipeline::new(&template, options);

    let pages = pipeline.plan("![photo](photo.png)");
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].extent, 300.0);

    let out = dir.path().join("out");
    let written = pipeline.write_cards("![photo](photo.png)", &out).unwrap();
    let card = image::open(&written[0]).unwrap().to_rgb8();
    assert_eq!(*card.get_pixel(300, 280), image::Rgb([10, 120, 200]));
}
