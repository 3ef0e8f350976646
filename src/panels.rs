//! Hard-coded sample data for the map and bar chart panels.
//!
//! Neither panel is connected to the URL check. The data below is fixed at
//! compile time and only ever read.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub label: &'static str,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: &'static str,
    pub count: u32,
}

static MARKERS: [MapMarker; 1] = [MapMarker {
    lat: 42.0285,
    lon: -93.65,
    label: "Ames, Iowa: sample scam report",
}];

static SCAM_CATEGORIES: [CategoryCount; 3] = [
    CategoryCount { category: "Grandparent Scam", count: 120 },
    CategoryCount { category: "Tech Support Scam", count: 200 },
    CategoryCount { category: "Financial Scam", count: 180 },
];

pub fn map_markers() -> &'static [MapMarker] {
    &MARKERS
}

pub fn map_marker() -> MapMarker {
    MARKERS[0]
}

/// GeoJSON `FeatureCollection` for the map panel (coordinates in `[lon, lat]` order).
pub fn map_geojson() -> Value {
    let features: Vec<Value> = MARKERS
        .iter()
        .map(|m| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [m.lon, m.lat] },
                "properties": { "label": m.label }
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

pub fn scam_categories() -> &'static [CategoryCount] {
    &SCAM_CATEGORIES
}

const SVG_WIDTH: u32 = 480;
const SVG_HEIGHT: u32 = 320;
const PLOT_TOP: u32 = 30;
const PLOT_BOTTOM: u32 = 270;
const BAR_GAP: u32 = 30;
const SIDE_MARGIN: u32 = 40;

/// Render the category counts as a standalone SVG bar chart.
pub fn bar_chart_svg() -> String {
    let rows = scam_categories();
    let max = rows.iter().map(|r| r.count).max().unwrap_or(1).max(1);
    let n = rows.len() as u32;
    let plot_w = SVG_WIDTH - 2 * SIDE_MARGIN;
    let bar_w = (plot_w - BAR_GAP * (n + 1)) / n;
    let plot_h = PLOT_BOTTOM - PLOT_TOP;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
        w = SVG_WIDTH,
        h = SVG_HEIGHT
    );
    let _ = write!(
        svg,
        r##"<line x1="{x0}" y1="{y}" x2="{x1}" y2="{y}" stroke="#333"/>"##,
        x0 = SIDE_MARGIN,
        x1 = SVG_WIDTH - SIDE_MARGIN,
        y = PLOT_BOTTOM
    );
    for (i, row) in rows.iter().enumerate() {
        let i = i as u32;
        let h = (u64::from(row.count) * u64::from(plot_h) / u64::from(max)) as u32;
        let x = SIDE_MARGIN + BAR_GAP + i * (bar_w + BAR_GAP);
        let y = PLOT_BOTTOM - h;
        let cx = x + bar_w / 2;
        let _ = write!(
            svg,
            r##"<rect class="bar" x="{x}" y="{y}" width="{bar_w}" height="{h}" fill="#4c78a8" data-count="{count}"/>"##,
            count = row.count
        );
        let _ = write!(
            svg,
            r#"<text x="{cx}" y="{ty}" text-anchor="middle">{count}</text>"#,
            ty = y.saturating_sub(6),
            count = row.count
        );
        let _ = write!(
            svg,
            r#"<text x="{cx}" y="{ly}" text-anchor="middle">{label}</text>"#,
            ly = PLOT_BOTTOM + 18,
            label = escape_xml(row.category)
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Horizontal text bar chart for terminal output.
pub fn render_text_chart(width: usize) -> String {
    let rows = scam_categories();
    let max = rows.iter().map(|r| r.count).max().unwrap_or(1).max(1) as usize;
    let label_w = rows.iter().map(|r| r.category.len()).max().unwrap_or(0);
    let width = width.max(1);

    let mut out = String::new();
    for r in rows {
        let len = (r.count as usize * width).div_ceil(max);
        let _ = writeln!(
            out,
            "{:<label_w$}  {:<width$}  {}",
            r.category,
            "#".repeat(len),
            r.count,
            label_w = label_w,
            width = width
        );
    }
    out
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
