use crate::foundation::core::{Affine, Canvas, Rgba8};
use crate::geo::arc::fmt_coord;
use crate::widget::config::StyleConfig;
use crate::widget::layout::MapLayout;
use crate::widget::scene::Scene;

const GLOW_ID: &str = "glow";
const TEXT_GLOW_ID: &str = "text-glow";

/// Serialize `scene` as a standalone SVG document.
pub fn scene_svg(canvas: Canvas, layout: &MapLayout, style: &StyleConfig, scene: &Scene) -> String {
    let mut out = String::with_capacity(4096 + layout.regions.len() * 256);
    let (w, h) = (canvas.width, canvas.height);

    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    ));
    out.push_str("<defs>");
    push_glow_filter(&mut out, GLOW_ID, style.glow_radius, style.accent);
    push_glow_filter(&mut out, TEXT_GLOW_ID, style.text_glow_radius, style.accent);
    out.push_str("</defs>");
    out.push_str(&format!(
        r#"<rect width="{w}" height="{h}" {}/>"#,
        paint("fill", style.background)
    ));

    out.push_str(&format!(
        r#"<g transform="{}">"#,
        svg_matrix(scene.map.to_affine())
    ));

    out.push_str(&format!(
        r#"<g {} stroke-width="{}">"#,
        paint("stroke", style.border),
        fmt_coord(style.border_width)
    ));
    for (region, fill) in layout.regions.iter().zip(&scene.fills) {
        out.push_str(&format!(
            r#"<path data-key="{}" d="{}" {}/>"#,
            escape_xml(&region.key),
            region.path_d,
            paint("fill", *fill)
        ));
    }
    out.push_str("</g>");

    for ((leg, line), label_opacity) in layout.legs.iter().zip(&scene.lines).zip(&scene.labels) {
        let Some(leg) = leg else {
            continue;
        };
        if line.opacity > 0.0
            && let Some(d) = leg.arc.trimmed_svg_d(line.fraction)
        {
            out.push_str(&format!(
                r#"<path d="{d}" fill="none" {} stroke-width="{}" stroke-dasharray="{} {}" opacity="{}" filter="url(#{GLOW_ID})"/>"#,
                paint("stroke", style.accent),
                fmt_coord(style.line_width),
                fmt_coord(style.line_dash[0]),
                fmt_coord(style.line_dash[1]),
                fmt_unit(line.opacity),
            ));
        }
        if *label_opacity > 0.0 {
            let p = leg.destination;
            out.push_str(&format!(r#"<g opacity="{}">"#, fmt_unit(*label_opacity)));
            push_dot(&mut out, style, fmt_coord(p.x), fmt_coord(p.y));
            push_text(
                &mut out,
                style,
                &leg.label,
                fmt_coord(p.x),
                fmt_coord(p.y - style.label_lift),
                Some("middle"),
            );
            out.push_str("</g>");
        }
    }

    if let Some(origin) = layout.origin {
        out.push_str(&format!(
            r#"<g transform="translate({} {})">"#,
            fmt_coord(origin.x),
            fmt_coord(origin.y)
        ));
        push_dot(&mut out, style, "0".into(), "0".into());
        push_text(
            &mut out,
            style,
            &layout.caption,
            fmt_coord(style.caption_offset.x),
            fmt_coord(style.caption_offset.y),
            None,
        );
        out.push_str("</g>");
    }

    out.push_str("</g></svg>");
    out
}

fn push_glow_filter(out: &mut String, id: &str, radius: f64, color: Rgba8) {
    // CSS drop-shadow blur radius is twice the Gaussian deviation.
    out.push_str(&format!(
        r#"<filter id="{id}" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="0" dy="0" stdDeviation="{}" flood-color="{}" flood-opacity="{}"/></filter>"#,
        fmt_coord(radius / 2.0),
        color.hex(),
        fmt_unit(color.alpha_f64())
    ));
}

fn push_dot(out: &mut String, style: &StyleConfig, cx: String, cy: String) {
    out.push_str(&format!(
        r#"<circle cx="{cx}" cy="{cy}" r="{}" {} filter="url(#{GLOW_ID})"/>"#,
        fmt_coord(style.marker_radius),
        paint("fill", style.accent)
    ));
}

fn push_text(
    out: &mut String,
    style: &StyleConfig,
    text: &str,
    x: String,
    y: String,
    anchor: Option<&str>,
) {
    let anchor = anchor
        .map(|a| format!(r#" text-anchor="{a}""#))
        .unwrap_or_default();
    out.push_str(&format!(
        r#"<text x="{x}" y="{y}"{anchor} font-family="{}" font-size="{}" font-weight="{}" letter-spacing="{}" {} filter="url(#{TEXT_GLOW_ID})">{}</text>"#,
        escape_xml(&style.font_family),
        fmt_coord(style.font_size),
        style.font_weight,
        fmt_coord(style.letter_spacing * style.font_size),
        paint("fill", style.text),
        escape_xml(text)
    ));
}

/// `fill="#rrggbb"` plus an opacity attribute when the color is translucent.
fn paint(attr: &str, color: Rgba8) -> String {
    if color.a == 255 {
        format!(r#"{attr}="{}""#, color.hex())
    } else {
        format!(
            r#"{attr}="{}" {attr}-opacity="{}""#,
            color.hex(),
            fmt_unit(color.alpha_f64())
        )
    }
}

fn svg_matrix(m: Affine) -> String {
    let c = m.as_coeffs().map(|v| {
        let s = format!("{v:.6}");
        let s = s.trim_end_matches('0').trim_end_matches('.');
        if s == "-0" { "0".to_string() } else { s.to_string() }
    });
    format!(
        "matrix({} {} {} {} {} {})",
        c[0], c[1], c[2], c[3], c[4], c[5]
    )
}

fn fmt_unit(v: f64) -> String {
    fmt_coord(v.clamp(0.0, 1.0))
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/widget/svg.rs"]
mod tests;
