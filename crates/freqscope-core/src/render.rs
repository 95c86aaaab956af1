//! SVG chart rendering.
//!
//! Draws [`ChartData`] as a single SVG document: the pie chart with its
//! legend on top, the bar chart below.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt::Write as _;

use camino::Utf8Path;

use crate::chart::{ChartData, Rgb};
use crate::error::RenderError;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 960.0;

const PIE_CX: f64 = 280.0;
const PIE_CY: f64 = 270.0;
const PIE_R: f64 = 190.0;
const LEGEND_X: f64 = 540.0;
const LEGEND_Y: f64 = 90.0;
const LEGEND_STEP: f64 = 20.0;

const BAR_TOP: f64 = 570.0;
const BAR_BOTTOM: f64 = 860.0;
const BAR_LEFT: f64 = 80.0;
const BAR_RIGHT: f64 = 860.0;
const BAR_COLOR: Rgb = Rgb(0x34, 0xa8, 0x53);

/// Render chart data as an SVG document.
pub fn svg_document(data: &ChartData) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"##
    );
    let _ = writeln!(
        svg,
        r##"<rect width="{WIDTH}" height="{HEIGHT}" fill="#ffffff"/>"##
    );
    pie(&mut svg, data);
    bars(&mut svg, data);
    svg.push_str("</svg>\n");
    svg
}

/// Render chart data and write it to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`RenderError::Write`] if the file cannot be written.
#[tracing::instrument(skip(data), fields(path = %path))]
pub fn write_svg(data: &ChartData, path: &Utf8Path) -> Result<(), RenderError> {
    let svg = svg_document(data);
    std::fs::write(path.as_std_path(), &svg).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(bytes = svg.len(), "chart written");
    Ok(())
}

fn pie(svg: &mut String, data: &ChartData) {
    title(svg, PIE_CX, 50.0, &data.pie_title());

    // Slices run counter-clockwise from twelve o'clock.
    let mut angle = FRAC_PI_2;
    for slice in &data.slices {
        let sweep = slice.share * TAU;
        let fill = slice.color.hex();

        if slice.share >= 1.0 {
            let _ = writeln!(
                svg,
                r##"<circle cx="{PIE_CX}" cy="{PIE_CY}" r="{PIE_R}" fill="{fill}" stroke="#ffffff"/>"##
            );
        } else {
            let (x0, y0) = polar(angle, PIE_R);
            let (x1, y1) = polar(angle + sweep, PIE_R);
            let large = u8::from(sweep > std::f64::consts::PI);
            let _ = writeln!(
                svg,
                r##"<path d="M {PIE_CX} {PIE_CY} L {x0:.2} {y0:.2} A {PIE_R} {PIE_R} 0 {large} 0 {x1:.2} {y1:.2} Z" fill="{fill}" stroke="#ffffff"/>"##
            );
        }

        let (lx, ly) = polar(angle + sweep / 2.0, PIE_R * 0.65);
        let _ = writeln!(
            svg,
            r##"<text x="{lx:.2}" y="{ly:.2}" font-size="12" text-anchor="middle" dominant-baseline="middle">{:.1}%</text>"##,
            slice.share * 100.0
        );
        angle += sweep;
    }

    for (i, item) in data.legend.iter().enumerate() {
        let y = LEGEND_Y + i as f64 * LEGEND_STEP;
        let _ = writeln!(
            svg,
            r##"<rect x="{LEGEND_X}" y="{:.1}" width="14" height="14" fill="{}"/>"##,
            y - 11.0,
            item.color.hex()
        );
        let _ = writeln!(
            svg,
            r##"<text x="{:.1}" y="{y:.1}" font-size="13">{}</text>"##,
            LEGEND_X + 22.0,
            escape(&item.text)
        );
    }
}

fn bars(svg: &mut String, data: &ChartData) {
    title(svg, (BAR_LEFT + BAR_RIGHT) / 2.0, BAR_TOP - 40.0, &data.bar_title());

    let _ = writeln!(
        svg,
        r##"<line x1="{BAR_LEFT}" y1="{BAR_BOTTOM}" x2="{BAR_RIGHT}" y2="{BAR_BOTTOM}" stroke="#000000"/>"##
    );
    let _ = writeln!(
        svg,
        r##"<line x1="{BAR_LEFT}" y1="{BAR_TOP}" x2="{BAR_LEFT}" y2="{BAR_BOTTOM}" stroke="#000000"/>"##
    );
    let _ = writeln!(
        svg,
        r##"<text x="30" y="{:.1}" font-size="13" text-anchor="middle" transform="rotate(-90 30 {:.1})">Frequency</text>"##,
        (BAR_TOP + BAR_BOTTOM) / 2.0,
        (BAR_TOP + BAR_BOTTOM) / 2.0
    );
    let _ = writeln!(
        svg,
        r##"<text x="{:.1}" y="{:.1}" font-size="13" text-anchor="middle">{}</text>"##,
        (BAR_LEFT + BAR_RIGHT) / 2.0,
        BAR_BOTTOM + 70.0,
        escape(&data.unit)
    );

    if data.bars.is_empty() {
        return;
    }

    let max = data
        .bars
        .iter()
        .map(|b| b.frequency)
        .fold(0.0_f64, f64::max);
    let scale = if max > 0.0 {
        (BAR_BOTTOM - BAR_TOP) / (max * 1.1)
    } else {
        0.0
    };
    let slot = (BAR_RIGHT - BAR_LEFT) / data.bars.len() as f64;
    let width = slot * 0.7;
    let fill = BAR_COLOR.hex();

    for (i, bar) in data.bars.iter().enumerate() {
        let height = bar.frequency * scale;
        let x = BAR_LEFT + i as f64 * slot + (slot - width) / 2.0;
        let y = BAR_BOTTOM - height;
        let cx = x + width / 2.0;

        let _ = writeln!(
            svg,
            r##"<rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" fill="{fill}"/>"##
        );
        let _ = writeln!(
            svg,
            r##"<text x="{cx:.2}" y="{:.2}" font-size="11" text-anchor="middle">{:.2}</text>"##,
            y - 4.0,
            bar.frequency
        );
        let _ = writeln!(
            svg,
            r##"<text x="{cx:.2}" y="{:.2}" font-size="11" text-anchor="end" transform="rotate(-45 {cx:.2} {:.2})">{}</text>"##,
            BAR_BOTTOM + 16.0,
            BAR_BOTTOM + 16.0,
            escape(&bar.label)
        );
    }
}

fn title(svg: &mut String, x: f64, y: f64, text: &str) {
    let _ = writeln!(
        svg,
        r##"<text x="{x:.1}" y="{y:.1}" font-size="18" font-weight="bold" text-anchor="middle">{}</text>"##,
        escape(text)
    );
}

/// Point on the pie circle at `angle` radians (counter-clockwise from east).
fn polar(angle: f64, radius: f64) -> (f64, f64) {
    (PIE_CX + radius * angle.cos(), PIE_CY - radius * angle.sin())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
