//! Incremental SVG document builder

use crate::grid::{Cell, Size};
use crate::project::LayerImage;

use super::color::fmt_num;
use super::SceneConfig;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    class_prefix: String,
    standalone: bool,
    pretty_print: bool,
    defs: Vec<String>,
    elements: Vec<String>,
    indent: usize,
}

impl SvgBuilder {
    /// Create a new SVG builder
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            class_prefix: config.class_prefix.clone().unwrap_or_default(),
            standalone: config.standalone,
            pretty_print: config.pretty_print,
            defs: vec![],
            elements: vec![],
            indent: 1,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.class_prefix
    }

    fn indent_str(&self) -> String {
        if self.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn class_list(&self, base: &str, classes: &[String]) -> String {
        std::iter::once(format!("{}{}", self.class_prefix, base))
            .chain(classes.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Add a drop shadow filter referenced as `url(#{prefix}{name})`
    pub fn add_shadow_filter(&mut self, name: &str, blur: f64, color: &str) {
        // canvas shadowBlur is roughly twice the gaussian standard deviation
        self.defs.push(format!(
            r#"<filter id="{}{}" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="0" dy="0" stdDeviation="{}" flood-color="{}"/></filter>"#,
            self.class_prefix,
            name,
            fmt_num(blur / 2.0),
            escape_xml(color)
        ));
    }

    /// Add a plain filled rectangle
    pub fn add_rect(&mut self, x: f64, y: f64, w: f64, h: f64, classes: &[String], fill: &str) {
        self.elements.push(format!(
            r#"{}<rect class="{}" x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            self.indent_str(),
            self.class_list("rect", classes),
            x,
            y,
            w,
            h,
            escape_xml(fill)
        ));
    }

    /// Add a layer image stretched over `size`
    pub fn add_image(&mut self, id: &str, image: &LayerImage, size: Size, opacity: f64) {
        let opacity_attr = if opacity < 1.0 {
            format!(r#" opacity="{}""#, fmt_num(opacity))
        } else {
            String::new()
        };
        self.elements.push(format!(
            r#"{}<image id="{}layer-{}" class="{}" href="{}" x="0" y="0" width="{}" height="{}" preserveAspectRatio="none"{}/>"#,
            self.indent_str(),
            self.class_prefix,
            escape_xml(id),
            self.class_list("layer", &[]),
            escape_xml(&image.href),
            size.width,
            size.height,
            opacity_attr
        ));
    }

    /// Add a cell diamond as a polygon
    pub fn add_diamond(&mut self, cell: &Cell, classes: &[String], attrs: &str) {
        let points = cell
            .corners()
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        self.elements.push(format!(
            r#"{}<polygon class="{}" data-cell="{}" points="{}"{}/>"#,
            self.indent_str(),
            self.class_list("cell", classes),
            cell.id,
            points,
            attrs
        ));
    }

    /// Add centered text
    pub fn add_text(&mut self, text: &str, x: f64, y: f64, classes: &[String], attrs: &str) {
        self.elements.push(format!(
            r#"{}<text class="{}" x="{}" y="{}" text-anchor="middle" dominant-baseline="middle"{}>{}</text>"#,
            self.indent_str(),
            self.class_list("text", classes),
            x,
            y,
            attrs,
            escape_xml(text)
        ));
    }

    /// Open a group element with an optional transform
    pub fn start_group(&mut self, id: Option<&str>, classes: &[String], transform: Option<&str>) {
        let id_attr = id
            .map(|i| format!(r#" id="{}{}""#, self.class_prefix, escape_xml(i)))
            .unwrap_or_default();
        let class_attr = if classes.is_empty() {
            String::new()
        } else {
            format!(r#" class="{}""#, classes.join(" "))
        };
        let transform_attr = transform
            .map(|t| format!(r#" transform="{}""#, t))
            .unwrap_or_default();

        self.elements.push(format!(
            "{}<g{}{}{}>",
            self.indent_str(),
            id_attr,
            class_attr,
            transform_attr
        ));
        self.indent += 1;
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string sized to the canvas
    pub fn build(self, canvas: Size) -> String {
        let nl = self.newline();

        let mut svg = String::new();

        if self.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = canvas.width,
            h = canvas.height
        ));
        svg.push_str(nl);

        if !self.defs.is_empty() {
            svg.push_str(if self.pretty_print { "  <defs>" } else { "<defs>" });
            svg.push_str(nl);
            for def in &self.defs {
                if self.pretty_print {
                    svg.push_str("    ");
                }
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str(if self.pretty_print { "  </defs>" } else { "</defs>" });
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");

        svg
    }
}

/// Escape special XML characters
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
