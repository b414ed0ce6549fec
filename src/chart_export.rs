//! Frequency charts to PNG (plotters bitmap) and EPS (minimal PostScript, no deps).
//!
//! Both formats draw horizontal bars, first bucket on top.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::aggregate::Bucket;
use crate::ChartFormat;

/// Escape a string for PostScript ( and ) and \.
fn ps_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Generate "nice" tick values in [0, max] with roughly max_ticks steps.
fn nice_ticks(max: f64, max_ticks: usize) -> Vec<f64> {
    let range = if max > 0.0 { max } else { 1.0 };
    if max_ticks == 0 {
        return vec![0.0];
    }
    let raw_step = range / max_ticks as f64;
    let mag = 10.0_f64.powf(raw_step.log10().floor());
    let norm = raw_step / mag;
    let step = if norm <= 1.0 {
        mag
    } else if norm <= 2.0 {
        2.0 * mag
    } else if norm <= 5.0 {
        5.0 * mag
    } else {
        10.0 * mag
    };
    // counts are whole numbers
    let step = step.max(1.0);
    let mut ticks = Vec::new();
    let mut v = 0.0;
    while v <= range + step * 0.001 && ticks.len() <= max_ticks + 2 {
        ticks.push(v);
        v += step;
    }
    ticks
}

/// Format a tick value: plain integer, or compact thousands.
fn format_tick(v: f64) -> String {
    if v >= 10_000.0 {
        format!("{:.0}k", v / 1000.0)
    } else {
        format!("{:.0}", v)
    }
}

fn ensure_data(buckets: &[Bucket]) -> Result<usize> {
    if buckets.is_empty() {
        return Err(eyre!("No data to export"));
    }
    Ok(buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1))
}

/// File name for a chart image, e.g. `gender.png`.
pub fn chart_file_name(chart_id: &str, format: ChartFormat) -> String {
    format!("{}.{}", chart_id, format.extension())
}

/// Write `buckets` as a chart image in `format` to `dir`, returning the file written.
pub fn write_chart(
    dir: &Path,
    chart_id: &str,
    format: ChartFormat,
    buckets: &[Bucket],
    title: &str,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(chart_file_name(chart_id, format));
    match format {
        ChartFormat::Png => write_chart_png(&path, buckets, title)?,
        ChartFormat::Eps => write_chart_eps(&path, buckets, title)?,
    }
    Ok(path)
}

/// Write chart to EPS (Encapsulated PostScript).
pub fn write_chart_eps(path: &Path, buckets: &[Bucket], title: &str) -> Result<()> {
    let max_count = ensure_data(buckets)? as f64;

    const W: f64 = 480.0;
    const MARGIN_LEFT: f64 = 140.0;
    const MARGIN_RIGHT: f64 = 30.0;
    const MARGIN_BOTTOM: f64 = 30.0;
    const MARGIN_TOP: f64 = 30.0;
    const ROW_H: f64 = 18.0;
    const PLOT_W: f64 = W - MARGIN_LEFT - MARGIN_RIGHT;

    let rows = buckets.len() as f64;
    let plot_h = rows * ROW_H;
    let h = MARGIN_BOTTOM + plot_h + MARGIN_TOP;

    let to_x = |count: f64| MARGIN_LEFT + count / max_count * PLOT_W;
    // row 0 sits at the top
    let row_y = |idx: usize| MARGIN_BOTTOM + plot_h - (idx as f64 + 1.0) * ROW_H;

    let mut f = File::create(path)?;

    writeln!(f, "%!PS-Adobe-3.0 EPSF-3.0")?;
    writeln!(f, "%%BoundingBox: 0 0 {} {}", W.ceil() as i32, h.ceil() as i32)?;
    writeln!(f, "%%Creator: contactlens")?;
    writeln!(f, "%%Title: ({})", ps_escape(title))?;
    writeln!(f, "%%EndComments")?;
    writeln!(f, "gsave")?;

    // Vertical grid at count ticks
    let ticks = nice_ticks(max_count, 6);
    writeln!(f, "0.9 setgray")?;
    writeln!(f, "0.5 setlinewidth")?;
    for &v in &ticks {
        writeln!(f, "{} {} moveto 0 {} rlineto stroke", to_x(v), MARGIN_BOTTOM, plot_h)?;
    }

    // Bars
    writeln!(f, "0.0 0.5 0.8 setrgbcolor")?;
    for (idx, bucket) in buckets.iter().enumerate() {
        let w = to_x(bucket.count as f64) - MARGIN_LEFT;
        writeln!(
            f,
            "{} {} {} {} rectfill",
            MARGIN_LEFT,
            row_y(idx) + ROW_H * 0.15,
            w,
            ROW_H * 0.7
        )?;
    }

    // Axis lines
    writeln!(f, "0 setgray")?;
    writeln!(f, "1 setlinewidth")?;
    writeln!(f, "{} {} moveto {} 0 rlineto stroke", MARGIN_LEFT, MARGIN_BOTTOM, PLOT_W)?;
    writeln!(f, "{} {} moveto 0 {} rlineto stroke", MARGIN_LEFT, MARGIN_BOTTOM, plot_h)?;

    writeln!(f, "/Helvetica findfont 9 scalefont setfont")?;
    let char_w: f64 = 5.0;
    for &v in &ticks {
        let s = format_tick(v);
        let tx = to_x(v) - s.len() as f64 * char_w / 2.0;
        writeln!(f, "{} {} moveto ({}) show", tx, MARGIN_BOTTOM - 12.0, ps_escape(&s))?;
    }
    for (idx, bucket) in buckets.iter().enumerate() {
        let label_w = bucket.label.len() as f64 * char_w;
        let tx = (MARGIN_LEFT - label_w - 6.0).max(2.0);
        let ty = row_y(idx) + ROW_H / 2.0 - 3.0;
        writeln!(f, "{} {} moveto ({}) show", tx, ty, ps_escape(&bucket.label))?;
        writeln!(
            f,
            "{} {} moveto ({}) show",
            to_x(bucket.count as f64) + 4.0,
            ty,
            bucket.count
        )?;
    }

    writeln!(f, "/Helvetica-Bold findfont 11 scalefont setfont")?;
    let title_w = title.len() as f64 * 6.0;
    writeln!(
        f,
        "{} {} moveto ({}) show",
        ((W - title_w) / 2.0).max(2.0),
        h - MARGIN_TOP + 10.0,
        ps_escape(title)
    )?;

    writeln!(f, "grestore")?;
    writeln!(f, "%%EOF")?;
    f.sync_all()?;
    Ok(())
}

/// Write chart to PNG using plotters bitmap backend.
pub fn write_chart_png(path: &Path, buckets: &[Bucket], title: &str) -> Result<()> {
    use plotters::prelude::*;

    let max_count = ensure_data(buckets)? as u64;
    let rows = buckets.len() as u32;
    let height = (120 + rows * 32).max(240);

    let root = BitMapBackend::new(path, (800, height)).into_drawing_area();
    root.fill(&WHITE)?;

    // 10% headroom for the count labels drawn past each bar
    let x_max = max_count + max_count / 10 + 1;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(30)
        .y_label_area_size(180)
        .build_cartesian_2d(0u64..x_max, (0u32..rows).into_segmented())?;

    // segment 0 is at the bottom, so bucket i is drawn in segment rows - 1 - i
    let label_for = |segment: &SegmentValue<u32>| match segment {
        SegmentValue::CenterOf(v) if *v < rows => buckets[(rows - 1 - *v) as usize].label.clone(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(buckets.len())
        .y_label_formatter(&label_for)
        .x_desc("Count")
        .draw()?;

    let color = RGBColor(0, 128, 204);
    chart.draw_series(buckets.iter().enumerate().map(|(idx, bucket)| {
        let segment = rows - 1 - idx as u32;
        let mut bar = Rectangle::new(
            [
                (0, SegmentValue::Exact(segment)),
                (bucket.count as u64, SegmentValue::Exact(segment + 1)),
            ],
            color.filled(),
        );
        bar.set_margin(4, 4, 0, 0);
        bar
    }))?;

    chart.draw_series(buckets.iter().enumerate().map(|(idx, bucket)| {
        let segment = rows - 1 - idx as u32;
        Text::new(
            bucket.count.to_string(),
            (bucket.count as u64, SegmentValue::CenterOf(segment)),
            ("sans-serif", 14),
        )
    }))?;

    root.present()?;
    Ok(())
}
