//! Scene composition: layers, cells, numbers and zone labels

use std::collections::HashMap;

use tracing::debug;

use crate::assign::AssignmentStore;
use crate::grid::{Cell, CellId, Size};
use crate::project::{LayerKind, Project};
use crate::view::{Selection, ViewOptions, ViewTransform};

use super::color::{fmt_num, Rgb};
use super::svg::{escape_xml, SvgBuilder};
use super::SceneConfig;

const ASSIGNED_FILL_ALPHA: f64 = 0.4;
const ASSIGNED_STROKE_ALPHA: f64 = 0.6;
const GRID_STROKE_ALPHA: f64 = 0.4;
const NUMBER_ALPHA: f64 = 0.6;

/// Cell number font size range, proportional to cell height
const NUMBER_FONT: (f64, f64, f64) = (0.28, 5.0, 13.0);
/// Zone label font size range, proportional to cell height
const LABEL_FONT: (f64, f64, f64) = (0.24, 5.0, 10.0);
/// Average glyph width as a fraction of the font size
const GLYPH_WIDTH: f64 = 0.6;
const MIN_LABEL_CHARS: usize = 4;

/// Everything one frame is drawn from
#[derive(Debug, Clone, Copy)]
pub struct SceneInput<'a> {
    pub project: &'a Project,
    pub cells: &'a [Cell],
    pub store: &'a AssignmentStore,
    pub selection: &'a Selection,
    pub options: ViewOptions,
    pub canvas: Size,
}

/// A rendered frame and the transform it was drawn with
#[derive(Debug, Clone)]
pub struct Frame {
    pub svg: String,
    pub transform: ViewTransform,
}

/// How a cell is drawn, in priority order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellState {
    Selected,
    Assigned(Rgb),
    Hovered,
    Plain,
}

impl CellState {
    fn class(&self) -> &'static str {
        match self {
            CellState::Selected => "selected",
            CellState::Assigned(_) => "assigned",
            CellState::Hovered => "hovered",
            CellState::Plain => "plain",
        }
    }
}

/// Classify a cell as selected, assigned, hovered or plain
pub fn classify(cell: CellId, input: &SceneInput<'_>, fallback: Rgb) -> CellState {
    if input.selection.contains(cell) {
        return CellState::Selected;
    }
    if let Some(zone) = input.store.zone_for_cell(cell) {
        return CellState::Assigned(group_color(input, zone).unwrap_or(fallback));
    }
    if input.selection.hovered == Some(cell) {
        return CellState::Hovered;
    }
    CellState::Plain
}

fn group_color(input: &SceneInput<'_>, zone: &str) -> Option<Rgb> {
    let assignment = input.store.get_assignment(zone)?;
    let group = input.project.group(&assignment.group_id)?;
    Rgb::from_hex(&group.color)
}

/// Font size `h * factor` clamped to `[min, max]`
fn font_size(cell_h: f64, (factor, min, max): (f64, f64, f64)) -> f64 {
    (cell_h * factor).clamp(min, max)
}

/// Shorten `label` to fit a cell `cell_w` wide at `font_size`, ending in an
/// ellipsis when cut
pub fn truncate_label(label: &str, cell_w: f64, font_size: f64) -> String {
    let budget = ((cell_w / (font_size * GLYPH_WIDTH)).floor() as usize).max(MIN_LABEL_CHARS);
    if label.chars().count() <= budget {
        return label.to_string();
    }
    let mut out: String = label.chars().take(budget - 1).collect();
    out.push('…');
    out
}

/// Render one frame of the scene to SVG.
///
/// The returned transform is the one from [`ViewTransform::fit`] for the
/// canvas and project map, so callers can map pointer input without
/// recomputing it.
pub fn render_scene(input: &SceneInput<'_>, config: &SceneConfig) -> Frame {
    let theme = &config.theme;
    let map = input.project.map_size();
    let transform = ViewTransform::fit(input.canvas, map);
    let mut builder = SvgBuilder::new(config);
    let prefix = builder.prefix().to_string();

    let number_shadow = format!("url(#{}number-shadow)", prefix);
    let label_shadow = format!("url(#{}label-shadow)", prefix);
    builder.add_shadow_filter("number-shadow", 2.0, &theme.color("number-shadow"));
    builder.add_shadow_filter("label-shadow", 3.0, &theme.color("label-shadow"));

    builder.add_rect(
        0.0,
        0.0,
        input.canvas.width,
        input.canvas.height,
        &[format!("{}background", prefix)],
        &theme.color("background"),
    );

    builder.start_group(Some("map"), &[], Some(transform.to_svg().as_str()));

    // Layers, back to front
    for layer in &input.project.layers {
        if !layer.visible || layer.kind != LayerKind::Image {
            continue;
        }
        if let Some(image) = input.project.drawable_image(&layer.id) {
            builder.add_image(&layer.id, image, map, layer.effective_opacity());
        }
    }

    // Label anchor cell → zone
    let label_cells: HashMap<CellId, &str> = input
        .store
        .iter()
        .filter_map(|(zone, a)| a.label_cell().map(|cell| (cell, zone)))
        .collect();

    let fallback = Rgb::from_hex(&theme.color("fallback-group")).unwrap_or(Rgb::GRAY);
    let grid_rgb = Rgb::from_hex(&theme.color("grid-stroke")).unwrap_or(Rgb::new(255, 255, 255));
    let number_rgb = Rgb::from_hex(&theme.color("number")).unwrap_or(Rgb::new(255, 255, 255));
    let selection = theme.color("selection");
    let opacity = input.options.grid_opacity.clamp(0.0, 1.0);
    let plain_stroke = grid_rgb.rgba(opacity * GRID_STROKE_ALPHA);

    for cell in input.cells {
        let state = classify(cell.id, input, fallback);

        let (fill, stroke, stroke_width) = match state {
            CellState::Selected => (theme.color("selection-fill"), selection.clone(), 2.0),
            CellState::Assigned(rgb) => (
                rgb.rgba(ASSIGNED_FILL_ALPHA),
                rgb.rgba(ASSIGNED_STROKE_ALPHA),
                1.0,
            ),
            CellState::Hovered => (theme.color("hover-fill"), plain_stroke.clone(), 1.0),
            CellState::Plain => ("none".to_string(), plain_stroke.clone(), 0.3),
        };
        let zone = input.store.zone_for_cell(cell.id);
        let zone_attr = zone
            .map(|z| format!(r#" data-zone="{}""#, escape_xml(z)))
            .unwrap_or_default();
        builder.add_diamond(
            cell,
            &[format!("{}cell-{}", prefix, state.class())],
            &format!(
                r#"{} fill="{}" stroke="{}" stroke-width="{}""#,
                zone_attr, fill, stroke, stroke_width
            ),
        );

        if input.options.show_numbers && zone.is_none() {
            let size = font_size(cell.h, NUMBER_FONT);
            let color = if state == CellState::Selected {
                selection.clone()
            } else {
                number_rgb.rgba(opacity * NUMBER_ALPHA)
            };
            builder.add_text(
                &cell.id.to_string(),
                cell.cx,
                cell.cy,
                &[format!("{}cell-number", prefix)],
                &format!(
                    r#" font-size="{}" font-weight="bold" font-family="sans-serif" fill="{}" filter="{}""#,
                    fmt_num(size),
                    color,
                    number_shadow
                ),
            );
        }

        if let Some(zone) = label_cells.get(&cell.id) {
            let size = font_size(cell.h, LABEL_FONT);
            let text = truncate_label(input.project.zone_name(zone), cell.w, size);
            builder.add_text(
                &text,
                cell.cx,
                cell.cy,
                &[format!("{}zone-label", prefix)],
                &format!(
                    r#" font-size="{}" font-weight="bold" font-family="sans-serif" fill="{}" filter="{}""#,
                    fmt_num(size),
                    theme.color("label"),
                    label_shadow
                ),
            );
        }
    }

    builder.end_group();

    debug!(
        cells = input.cells.len(),
        zones = input.store.assigned_count(),
        scale = transform.scale,
        "rendered frame"
    );

    Frame {
        svg: builder.build(input.canvas),
        transform,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{generate, GridParams};

    fn project() -> Project {
        Project::from_json(
            r##"{"name": "p", "mapW": 140, "mapH": 70, "groups": [
                {"id": "g1", "name": "Group One", "color": "#E57373", "zones": [
                    {"id": "z1", "name": "A very long zone name indeed"},
                    {"id": "z2", "name": "Short"}
                ]}
            ]}"##,
        )
        .unwrap()
    }

    fn input<'a>(
        project: &'a Project,
        cells: &'a [Cell],
        store: &'a AssignmentStore,
        selection: &'a Selection,
    ) -> SceneInput<'a> {
        SceneInput {
            project,
            cells,
            store,
            selection,
            options: ViewOptions::default(),
            canvas: Size::new(280.0, 140.0),
        }
    }

    #[test]
    fn test_truncate_label() {
        // 70 / (10 * 0.6) = 11.67 → 11 chars
        assert_eq!(truncate_label("Short", 70.0, 10.0), "Short");
        assert_eq!(truncate_label("Hapjeong Station", 70.0, 10.0), "Hapjeong S…");
        // budget never drops below four characters
        assert_eq!(truncate_label("abcdefgh", 5.0, 10.0), "abc…");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_label("상암동", 70.0, 10.0), "상암동");
    }

    #[test]
    fn test_font_size_clamped() {
        assert!((font_size(35.0, NUMBER_FONT) - 9.8).abs() < 1e-9);
        assert_eq!(font_size(100.0, NUMBER_FONT), 13.0);
        assert_eq!(font_size(5.0, LABEL_FONT), 5.0);
    }

    #[test]
    fn test_classification_priority() {
        let project = project();
        let cells = generate(140.0, 70.0, &GridParams::default());
        let mut store = AssignmentStore::new();
        store.assign("z1", "g1", [CellId(1), CellId(2)]).unwrap();
        let mut selection = Selection::new();
        selection.toggle(CellId(1));
        selection.hovered = Some(CellId(2));
        let scene = input(&project, &cells, &store, &selection);

        assert_eq!(classify(CellId(1), &scene, Rgb::GRAY), CellState::Selected);
        assert_eq!(
            classify(CellId(2), &scene, Rgb::GRAY),
            CellState::Assigned(Rgb::new(229, 115, 115))
        );
        assert_eq!(classify(CellId(3), &scene, Rgb::GRAY), CellState::Plain);
    }

    #[test]
    fn test_unknown_group_uses_fallback() {
        let project = project();
        let cells = generate(140.0, 70.0, &GridParams::default());
        let mut store = AssignmentStore::new();
        store.assign("ghost", "nowhere", [CellId(5)]).unwrap();
        let selection = Selection::new();
        let scene = input(&project, &cells, &store, &selection);
        assert_eq!(classify(CellId(5), &scene, Rgb::GRAY), CellState::Assigned(Rgb::GRAY));
    }

    #[test]
    fn test_numbers_only_on_unassigned_cells() {
        let project = project();
        let cells = generate(140.0, 70.0, &GridParams::default());
        let mut store = AssignmentStore::new();
        store.assign("z2", "g1", [CellId(3)]).unwrap();
        let selection = Selection::new();
        let frame = render_scene(
            &input(&project, &cells, &store, &selection),
            &SceneConfig::default(),
        );
        let numbers: Vec<_> = frame
            .svg
            .lines()
            .filter(|l| l.contains("iso-cell-number"))
            .collect();
        assert_eq!(numbers.len(), cells.len() - 1);
        assert!(!numbers.iter().any(|l| l.contains(">3</text>")));
        assert!(frame.svg.contains(">Short</text>"));
    }

    #[test]
    fn test_label_on_median_cell() {
        let project = project();
        let cells = generate(140.0, 70.0, &GridParams::default());
        let mut store = AssignmentStore::new();
        store
            .assign("z1", "g1", [CellId(4), CellId(2), CellId(9)])
            .unwrap();
        let selection = Selection::new();
        let frame = render_scene(
            &input(&project, &cells, &store, &selection),
            &SceneConfig::default(),
        );
        let cell4 = cells.iter().find(|c| c.id == CellId(4)).unwrap();
        let label = frame
            .svg
            .lines()
            .find(|l| l.contains("iso-zone-label"))
            .unwrap();
        assert!(label.contains(&format!(r#"x="{}" y="{}""#, cell4.cx, cell4.cy)));
        // 8.4px font in a 70 wide cell leaves room for 13 characters
        assert!(label.contains(">A very long …</text>"));
    }

    #[test]
    fn test_hidden_and_unready_layers_skipped() {
        let mut project = Project::from_json(
            r##"{"name": "p", "mapW": 140, "mapH": 70, "layers": [
                {"id": "a", "name": "A", "type": "image", "src": "a.png", "visible": true},
                {"id": "b", "name": "B", "type": "image", "src": "b.png", "visible": false},
                {"id": "c", "name": "C", "type": "image", "src": "c.png", "visible": true, "opacity": 0.5}
            ]}"##,
        )
        .unwrap();
        project.set_image("a", crate::project::LayerImage::linked("a.png"));
        project.set_image("b", crate::project::LayerImage::linked("b.png"));
        let store = AssignmentStore::new();
        let selection = Selection::new();
        let frame = render_scene(
            &input(&project, &[], &store, &selection),
            &SceneConfig::default(),
        );
        assert!(frame.svg.contains(r#"href="a.png""#));
        assert!(!frame.svg.contains("b.png"));
        assert!(!frame.svg.contains("c.png"));
    }

    #[test]
    fn test_frame_reports_fit_transform() {
        let project = project();
        let store = AssignmentStore::new();
        let selection = Selection::new();
        let scene = input(&project, &[], &store, &selection);
        let frame = render_scene(&scene, &SceneConfig::default());
        assert_eq!(
            frame.transform,
            ViewTransform::fit(scene.canvas, project.map_size())
        );
        assert!(frame.svg.contains(&frame.transform.to_svg()));
    }
}
