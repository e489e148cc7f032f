//! Retained chart model and its plotters rendering.
//!
//! `render` turns result tables into a `Figure`: a plain value holding the
//! stacked bars, the tick texts and the drawing style. Nothing is drawn until
//! the caller asks for it with `Figure::draw` (any plotters drawing area) or
//! `Figure::save_svg`. Passing an existing figure back into `render` overlays
//! the new bars onto it.

use crate::{
    aggregate::PhaseDurations,
    config::{AxisScale, ChartConfig, LegendLocation, Style},
    error::PlotError,
    layout::{Layout, TickKey},
    markup,
    phase::{Hatch, Phase},
    table::ResultTable,
};
use anyhow::Result;
use log::{debug, info, warn};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use std::{fs, ops::Range, path::Path};

/// One stacked layer of a bar, in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Index into the figure's phases
    pub phase: usize,
    pub bottom: f64,
    pub height: f64,
}

impl Segment {
    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    /// Raw label the bar was rendered for
    pub label: String,
    pub x: f64,
    pub width: f64,
    pub segments: Vec<Segment>,
    /// Half length of the error bar drawn on top of the last segment.
    pub error: f64,
}

impl Bar {
    fn new(label: &str, x: f64, width: f64, durations: &PhaseDurations) -> Self {
        let segments = durations
            .offsets()
            .into_iter()
            .zip(&durations.means)
            .enumerate()
            .map(|(phase, (bottom, height))| Segment {
                phase,
                bottom,
                height: *height,
            })
            .collect();

        Bar {
            label: label.to_string(),
            x,
            width,
            segments,
            error: durations.error,
        }
    }

    pub fn total(&self) -> f64 {
        self.segments.last().map(|s| s.top()).unwrap_or(0.0)
    }

    pub fn peak(&self) -> f64 {
        self.total() + self.error
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    pub x: f64,
    /// Display text, before markup is rendered.
    pub text: String,
}

/// Pixel rectangle of a plotting area, relative to the figure's root area.
#[derive(Clone, Copy, Debug)]
struct PixelRect {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

#[derive(Clone, Copy, PartialEq)]
enum Panel {
    Single,
    Upper,
    Lower,
}

struct Geometry {
    margin: i32,
    x_label_area: i32,
    y_label_area: i32,
}

#[derive(Clone, Debug)]
pub struct Figure {
    style: Style,
    scale: AxisScale,
    y_tick_step: Option<f64>,
    y_label: String,
    phases: Vec<Phase>,
    x_range: Option<Range<f64>>,
    bars: Vec<Bar>,
    ticks: Vec<Tick>,
}

/// Render `tables[i]` as a stacked bar for `labels[i]`.
///
/// With `target` set the bars are added to that figure and the config's style
/// replaces the figure's, otherwise a new figure is created. Labels with an
/// empty table or without a layout position are skipped.
pub fn render<S: AsRef<str>>(
    labels: &[S],
    tables: &[ResultTable],
    target: Option<Figure>,
    config: &ChartConfig,
) -> Result<Figure, PlotError> {
    if labels.len() != tables.len() {
        return Err(PlotError::LengthMismatch {
            labels: labels.len(),
            tables: tables.len(),
        });
    }
    if labels.is_empty() {
        return Err(PlotError::EmptyInput);
    }
    config.validate()?;

    let layout = Layout::new(
        config.layout_mode,
        &config.positions,
        labels,
        config.bar_width,
        config.spacer,
        config.flat_bar_width,
    )?;

    let mut figure = match target {
        Some(mut figure) => {
            figure.restyle(config);
            figure
        }
        None => Figure::new(config),
    };

    for (label, table) in labels.iter().zip(tables) {
        let label = label.as_ref();
        if table.is_empty() {
            debug!("skipping label without results (label={label})");
            continue;
        }

        let position = match layout.position(label) {
            Ok(position) => position,
            Err(e) if !e.is_fatal() => {
                warn!("{e}, skipping");
                continue;
            }
            Err(e) => return Err(e),
        };

        let Some(durations) = PhaseDurations::from_table(label, table, &config.phases)? else {
            continue;
        };
        info!(
            "{label}: {} (total={:.3}s, error={:.3}s)",
            config
                .phases
                .iter()
                .zip(&durations.means)
                .map(|(phase, mean)| format!("{}={mean:.3}s", phase.column))
                .collect::<Vec<String>>()
                .join(", "),
            durations.total(),
            durations.error
        );

        figure.bars.push(Bar::new(
            label,
            layout.bar_x(position),
            layout.bar_width(),
            &durations,
        ));
    }

    for (x, key) in layout.ticks() {
        let text = match key {
            TickKey::Label(label) => config.display_names.display(&label).to_string(),
            TickKey::Group(group) => match config.group_labels.get(group) {
                Some(text) => text.clone(),
                None => layout
                    .group_members(group)
                    .iter()
                    .map(|member| config.display_names.display(member))
                    .collect::<Vec<&str>>()
                    .join("/"),
            },
        };
        figure.add_tick(Tick { x, text });
    }

    let x_range = layout.x_range();
    figure.x_range = Some(match figure.x_range.take() {
        Some(current) => current.start.min(x_range.start)..current.end.max(x_range.end),
        None => x_range,
    });

    Ok(figure)
}

impl Figure {
    pub fn new(config: &ChartConfig) -> Self {
        Figure {
            style: config.style.clone(),
            scale: config.scale.clone(),
            y_tick_step: config.y_tick_step,
            y_label: config.y_label.clone(),
            phases: config.phases.clone(),
            x_range: None,
            bars: vec![],
            ticks: vec![],
        }
    }

    /// Assert the chart-level settings of `config` onto this figure. Bars and
    /// ticks already on the figure are kept.
    fn restyle(&mut self, config: &ChartConfig) {
        self.style = config.style.clone();
        self.scale = config.scale.clone();
        self.y_tick_step = config.y_tick_step;
        self.y_label = config.y_label.clone();
        self.phases = config.phases.clone();
    }

    fn add_tick(&mut self, tick: Tick) {
        match self.ticks.iter_mut().find(|t| (t.x - tick.x).abs() < 1e-9) {
            Some(existing) => existing.text = tick.text,
            None => self.ticks.push(tick),
        }
        self.ticks.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn scale(&self) -> &AxisScale {
        &self.scale
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar(&self, label: &str) -> Option<&Bar> {
        self.bars.iter().find(|b| b.label == label)
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// Legend entries, top of the stack first.
    pub fn legend(&self) -> Vec<&Phase> {
        self.phases.iter().rev().collect()
    }

    pub fn x_range(&self) -> Range<f64> {
        self.x_range.clone().unwrap_or(-0.5..0.5)
    }

    pub fn size_px(&self) -> (u32, u32) {
        self.style.size_px(self.ticks.len().max(1))
    }

    /// Smallest and largest decade of a log chart.
    fn decades(&self) -> (i32, i32) {
        let smallest = self
            .bars
            .iter()
            .flat_map(|b| &b.segments)
            .map(|s| s.height)
            .filter(|h| *h > 0.0)
            .fold(f64::INFINITY, f64::min);
        let peak = self.bars.iter().map(Bar::peak).fold(0.0, f64::max);
        if !smallest.is_finite() || peak <= 0.0 {
            return (0, 1);
        }

        let lo = smallest.log10().floor() as i32;
        let hi = peak.log10().ceil() as i32;
        (lo, hi.max(lo + 1))
    }

    /// Values below this are drawn at the bottom of a log chart.
    fn log_floor(&self) -> f64 {
        10f64.powi(self.decades().0)
    }

    /// Y range in axis coordinates (`log10` of seconds for log charts).
    pub fn y_range(&self) -> Range<f64> {
        match &self.scale {
            AxisScale::Log => {
                let (lo, hi) = self.decades();
                lo as f64..hi as f64
            }
            AxisScale::Broken { .. } => match self.scale.ranges() {
                Some((lower, upper)) => lower.start..upper.end,
                None => 0.0..1.0,
            },
            AxisScale::Linear => {
                let peak = self.bars.iter().map(Bar::peak).fold(0.0, f64::max);
                if peak <= 0.0 {
                    return 0.0..1.0;
                }
                match self.y_tick_step {
                    Some(step) if step > 0.0 => 0.0..(peak / step).ceil() * step + step,
                    _ => 0.0..peak * 1.1,
                }
            }
        }
    }

    fn y_label_count(&self, y_range: &Range<f64>) -> usize {
        match (&self.scale, self.y_tick_step) {
            (AxisScale::Log, _) => (y_range.end - y_range.start).round() as usize + 1,
            (AxisScale::Linear, Some(step)) if step > 0.0 => {
                ((y_range.end - y_range.start) / step).round() as usize + 1
            }
            (AxisScale::Broken { .. }, _) => 3,
            _ => 6,
        }
    }

    /// Visible part of the error bar on top of `bar`, in axis coordinates.
    fn error_span(&self, bar: &Bar, floor: f64, y_range: &Range<f64>) -> Option<Span> {
        if bar.error <= 0.0 {
            return None;
        }
        let total = bar.total();
        clip_span(
            self.scale.to_axis(total - bar.error, floor),
            self.scale.to_axis(total + bar.error, floor),
            y_range,
        )
    }

    fn geometry(&self) -> Geometry {
        let margin = (self.style.dpi / 20.0).round().max(2.0) as i32;
        let tick = self.style.font_px(self.style.tick_font_size);
        let annotation = self.style.font_px(self.style.annotation_font_size);
        let lines = self
            .ticks
            .iter()
            .map(|t| t.text.split('\n').count())
            .max()
            .unwrap_or(1);

        Geometry {
            margin,
            x_label_area: (tick * 1.2 + annotation * 1.2 * (lines - 1) as f64).ceil() as i32
                + margin,
            y_label_area: (self.style.font_px(self.style.y_tick_font_size) * 4.0
                + self.style.font_px(self.style.label_font_size) * 1.5)
                .ceil() as i32,
        }
    }

    /// Draw the figure onto `area`, filling it.
    pub fn draw<DB>(&self, area: &DrawingArea<DB, Shift>) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        area.fill(&WHITE)?;
        let geometry = self.geometry();

        match &self.scale {
            AxisScale::Broken {
                lower,
                upper,
                hspace,
            } => {
                let (_, height) = area.dim_in_pixel();
                let plot_total =
                    (height as i32 - 2 * geometry.margin - geometry.x_label_area).max(2) as f64;
                let (upper_plot, gap) = broken_split(plot_total, *lower, *upper, *hspace);

                let (upper_area, rest) =
                    area.split_vertically((geometry.margin as f64 + upper_plot).round() as i32);
                let (_, lower_area) = rest.split_vertically(gap.round() as i32);

                let upper_rect =
                    self.draw_panel(area, &upper_area, upper.0..upper.1, Panel::Upper, &geometry)?;
                let lower_rect =
                    self.draw_panel(area, &lower_area, lower.0..lower.1, Panel::Lower, &geometry)?;
                self.draw_break_marks(area, upper_rect, lower_rect)?;
                self.draw_legend(area, upper_rect)?;
            }
            _ => {
                let rect = self.draw_panel(area, area, self.y_range(), Panel::Single, &geometry)?;
                self.draw_legend(area, rect)?;
            }
        }

        self.draw_y_label(area, &geometry)
    }

    fn draw_panel<DB>(
        &self,
        root: &DrawingArea<DB, Shift>,
        area: &DrawingArea<DB, Shift>,
        y_range: Range<f64>,
        panel: Panel,
        geometry: &Geometry,
    ) -> Result<PixelRect>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let x_range = self.x_range();
        let family = self.style.font_family.as_str();

        let mut builder = ChartBuilder::on(area);
        builder
            .margin_left(geometry.margin)
            .margin_right(geometry.margin)
            .y_label_area_size(geometry.y_label_area);
        if panel != Panel::Lower {
            builder.margin_top(geometry.margin);
        }
        if panel != Panel::Upper {
            builder.x_label_area_size(geometry.x_label_area);
        }
        let mut chart = builder.build_cartesian_2d(x_range.clone(), y_range.clone())?;

        let scale = &self.scale;
        chart
            .configure_mesh()
            .light_line_style(WHITE)
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .y_labels(self.y_label_count(&y_range))
            .y_label_formatter(&|y| scale.format_tick(*y))
            .y_label_style(
                (family, self.style.font_px(self.style.y_tick_font_size)).into_font(),
            )
            .draw()?;

        let floor = self.log_floor();
        for bar in &self.bars {
            let (left, right) = (bar.x - bar.width / 2.0, bar.x + bar.width / 2.0);

            for segment in &bar.segments {
                let Some(phase) = self.phases.get(segment.phase) else {
                    continue;
                };
                let Some(span) = clip_span(
                    self.scale.to_axis(segment.bottom, floor),
                    self.scale.to_axis(segment.top(), floor),
                    &y_range,
                ) else {
                    continue;
                };

                let color: RGBColor = phase.color.into();
                chart.plotting_area().draw(&Rectangle::new(
                    [(left, span.bottom), (right, span.top)],
                    color.filled(),
                ))?;

                let top_left =
                    to_local(root, chart.plotting_area().map_coordinate(&(left, span.top)));
                let bottom_right =
                    to_local(root, chart.plotting_area().map_coordinate(&(right, span.bottom)));
                draw_hatch(root, phase.hatch, top_left, bottom_right)?;

                // Frame the segment, leaving clipped edges open
                let sides = [
                    vec![(left, span.bottom), (left, span.top)],
                    vec![(right, span.bottom), (right, span.top)],
                ];
                for side in sides {
                    chart
                        .plotting_area()
                        .draw(&PathElement::new(side, BLACK))?;
                }
                if !span.bottom_open {
                    chart.plotting_area().draw(&PathElement::new(
                        vec![(left, span.bottom), (right, span.bottom)],
                        BLACK,
                    ))?;
                }
                if !span.top_open {
                    chart.plotting_area().draw(&PathElement::new(
                        vec![(left, span.top), (right, span.top)],
                        BLACK,
                    ))?;
                }
            }

            // A broken axis may show only part of the error bar in each panel
            if let Some(span) = self.error_span(bar, floor, &y_range) {
                chart.plotting_area().draw(&PathElement::new(
                    vec![(bar.x, span.bottom), (bar.x, span.top)],
                    BLACK,
                ))?;

                let cap = (self.style.dpi / 25.0).round().max(2.0) as i32;
                let ends = [(span.bottom, span.bottom_open), (span.top, span.top_open)];
                for (y, open) in ends {
                    if open {
                        continue;
                    }
                    let (x, y) = to_local(root, chart.plotting_area().map_coordinate(&(bar.x, y)));
                    root.draw(&PathElement::new(
                        vec![(x - cap / 2, y), (x + cap / 2, y)],
                        BLACK,
                    ))?;
                }
            }
        }

        // Add solid frames
        if panel != Panel::Lower {
            chart.plotting_area().draw(&PathElement::new(
                vec![(x_range.start, y_range.end), (x_range.end, y_range.end)],
                BLACK,
            ))?;
        }
        chart.plotting_area().draw(&PathElement::new(
            vec![(x_range.end, y_range.start), (x_range.end, y_range.end)],
            BLACK,
        ))?;

        if panel != Panel::Upper {
            let tick_px = self.style.font_px(self.style.tick_font_size);
            let annotation_px = self.style.font_px(self.style.annotation_font_size);
            for tick in &self.ticks {
                let (x, mut y) = to_local(
                    root,
                    chart
                        .plotting_area()
                        .map_coordinate(&(tick.x, y_range.start)),
                );
                y += geometry.margin / 2;

                for (idx, line) in markup::lines(&tick.text, self.style.typeset)
                    .into_iter()
                    .enumerate()
                {
                    // Second and later lines are annotations
                    let size = if idx == 0 { tick_px } else { annotation_px };
                    root.draw(&Text::new(
                        line,
                        (x, y),
                        (family, size)
                            .into_font()
                            .color(&BLACK)
                            .pos(Pos::new(HPos::Center, VPos::Top)),
                    ))?;
                    y += (size * 1.2).round() as i32;
                }
            }
        }

        let (left, top) = to_local(
            root,
            chart
                .plotting_area()
                .map_coordinate(&(x_range.start, y_range.end)),
        );
        let (right, bottom) = to_local(
            root,
            chart
                .plotting_area()
                .map_coordinate(&(x_range.end, y_range.start)),
        );
        Ok(PixelRect {
            left,
            top,
            right,
            bottom,
        })
    }

    fn draw_break_marks<DB>(
        &self,
        root: &DrawingArea<DB, Shift>,
        upper: PixelRect,
        lower: PixelRect,
    ) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let d = (self.style.dpi / 25.0).round().max(2.0) as i32;
        let corners = [
            (upper.left, upper.bottom),
            (upper.right, upper.bottom),
            (lower.left, lower.top),
            (lower.right, lower.top),
        ];
        for (x, y) in corners {
            root.draw(&PathElement::new(
                vec![(x - d, y + d), (x + d, y - d)],
                BLACK,
            ))?;
        }

        Ok(())
    }

    fn draw_legend<DB>(&self, root: &DrawingArea<DB, Shift>, plot: PixelRect) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let entries = self.legend();
        if entries.is_empty() {
            return Ok(());
        }

        let font_px = self.style.font_px(self.style.legend_font_size);
        let text_style = (self.style.font_family.as_str(), font_px)
            .into_font()
            .color(&BLACK);
        let square = font_px.round() as i32;
        let row = (font_px * 1.4).round() as i32;
        let pad = (font_px / 2.0).round() as i32;

        let mut text_width = 0;
        for phase in &entries {
            let (w, _) = root.estimate_text_size(&phase.name, &text_style)?;
            text_width = text_width.max(w as i32);
        }
        let width = 3 * pad + square + text_width;
        let height = 2 * pad + row * entries.len() as i32;

        let x = match self.style.legend {
            LegendLocation::UpperLeft => plot.left + pad,
            LegendLocation::UpperRight => plot.right - pad - width,
        };
        let y = plot.top + pad;

        root.draw(&Rectangle::new(
            [(x, y), (x + width, y + height)],
            WHITE.filled(),
        ))?;
        root.draw(&Rectangle::new(
            [(x, y), (x + width, y + height)],
            BLACK.stroke_width(1),
        ))?;

        for (idx, phase) in entries.iter().enumerate() {
            let left = x + pad;
            let top = y + pad + idx as i32 * row + (row - square) / 2;

            // Draw the color box + frame
            let color: RGBColor = phase.color.into();
            root.draw(&Rectangle::new(
                [(left, top), (left + square, top + square)],
                color.filled(),
            ))?;
            draw_hatch(root, phase.hatch, (left, top), (left + square, top + square))?;
            root.draw(&PathElement::new(
                vec![
                    (left, top),
                    (left + square, top),
                    (left + square, top + square),
                    (left, top + square),
                    (left, top),
                ],
                BLACK,
            ))?;

            root.draw(&Text::new(
                phase.name.as_str(),
                (left + square + pad, top + square / 2),
                text_style.pos(Pos::new(HPos::Left, VPos::Center)),
            ))?;
        }

        Ok(())
    }

    fn draw_y_label<DB>(&self, root: &DrawingArea<DB, Shift>, geometry: &Geometry) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let (_, height) = root.dim_in_pixel();
        root.draw(&Text::new(
            self.y_label.as_str(),
            (geometry.margin, height as i32 / 2),
            (
                self.style.font_family.as_str(),
                self.style.font_px(self.style.label_font_size),
            )
                .into_font()
                .transform(FontTransform::Rotate270)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;

        Ok(())
    }

    /// Write the figure as an SVG file, creating parent directories.
    pub fn save_svg(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let root = SVGBackend::new(path, self.size_px()).into_drawing_area();
        self.draw(&root)?;
        root.present()?;
        info!("generated plot at: {}", path.display());

        Ok(())
    }

    pub fn to_svg_string(&self) -> Result<String> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size_px()).into_drawing_area();
            self.draw(&root)?;
            root.present()?;
        }

        Ok(svg)
    }
}

/// Part of a vertical extent that falls inside a panel's y range.
#[derive(Clone, Debug, PartialEq)]
struct Span {
    bottom: f64,
    top: f64,
    /// The extent continues below the panel
    bottom_open: bool,
    /// The extent continues above the panel
    top_open: bool,
}

/// Clip `bottom..top` to `range`. `None` when nothing of it is visible.
fn clip_span(bottom: f64, top: f64, range: &Range<f64>) -> Option<Span> {
    let span = Span {
        bottom: bottom.max(range.start),
        top: top.min(range.end),
        bottom_open: bottom < range.start,
        top_open: top > range.end,
    };
    (span.bottom < span.top).then_some(span)
}

/// Pixel heights of the upper panel and of the gap below it, for broken axis
/// panels sharing `plot_total` pixels. Panel heights follow their y spans.
fn broken_split(plot_total: f64, lower: (f64, f64), upper: (f64, f64), hspace: f64) -> (f64, f64) {
    // hspace is relative to the average panel height
    let gap = plot_total * hspace / (2.0 + hspace);
    let (lower_span, upper_span) = (lower.1 - lower.0, upper.1 - upper.0);
    let upper_plot = (plot_total - gap) * upper_span / (lower_span + upper_span);

    (upper_plot, gap)
}

fn to_local<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, (x, y): (i32, i32)) -> (i32, i32) {
    let (base_x, base_y) = root.get_base_pixel();
    (x - base_x, y - base_y)
}

/// Stroke `hatch` inside the pixel rectangle spanned by `top_left` and
/// `bottom_right`.
fn draw_hatch<DB>(
    root: &DrawingArea<DB, Shift>,
    hatch: Hatch,
    top_left: (i32, i32),
    bottom_right: (i32, i32),
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    const SPACING: i32 = 6;
    let (x0, y0) = top_left;
    let (x1, y1) = bottom_right;
    if x1 <= x0 || y1 <= y0 {
        return Ok(());
    }

    match hatch {
        Hatch::None => {}
        Hatch::Horizontal => {
            for y in (y0 + SPACING / 2..y1).step_by(SPACING as usize) {
                root.draw(&PathElement::new(vec![(x0, y), (x1, y)], BLACK))?;
            }
        }
        Hatch::Diagonal => {
            // Lines rising to the right: (c + t, y1 - t) for t in 0..=h
            let h = y1 - y0;
            for c in (x0 - h..x1).step_by(SPACING as usize) {
                let t_start = (x0 - c).max(0);
                let t_end = (x1 - c).min(h);
                if t_end <= t_start {
                    continue;
                }
                root.draw(&PathElement::new(
                    vec![(c + t_start, y1 - t_start), (c + t_end, y1 - t_end)],
                    BLACK,
                ))?;
            }
        }
        Hatch::Dots => {
            for y in (y0 + SPACING / 2..y1).step_by(SPACING as usize) {
                for x in (x0 + SPACING / 2..x1).step_by(SPACING as usize) {
                    root.draw(&Circle::new((x, y), 1, BLACK.filled()))?;
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Benchmark,
        layout::{LayoutMode, Positions},
    };
    use std::collections::BTreeMap;

    fn table(keygen: f64, encryption: f64, computation: f64, decryption: f64) -> ResultTable {
        ResultTable::from_columns([
            ("t_keygen", vec![keygen]),
            ("t_input_encryption", vec![encryption]),
            ("t_computation", vec![computation]),
            ("t_decryption", vec![decryption]),
        ])
        .unwrap()
    }

    #[test]
    fn test_length_mismatch_is_fatal() {
        let err = render(&["A", "B"], &[table(1.0, 1.0, 1.0, 1.0)], None, &ChartConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            PlotError::LengthMismatch {
                labels: 2,
                tables: 1
            }
        );
    }

    #[test]
    fn test_empty_input_is_fatal() {
        let labels: [&str; 0] = [];
        let err = render(&labels, &[], None, &ChartConfig::default()).unwrap_err();
        assert_eq!(err, PlotError::EmptyInput);
    }

    #[test]
    fn test_unresolved_label_is_skipped() {
        let config = ChartConfig {
            positions: Positions {
                flat: vec!["A".to_string()],
                grouped: BTreeMap::new(),
            },
            ..ChartConfig::default()
        };
        let figure = render(
            &["A", "Lattigo"],
            &[table(1.0, 1.0, 1.0, 1.0), table(1.0, 1.0, 1.0, 1.0)],
            None,
            &config,
        )
        .unwrap();
        assert_eq!(figure.bars().len(), 1);
        assert!(figure.bar("Lattigo").is_none());
    }

    #[test]
    fn test_legend_is_reversed() {
        let figure = Figure::new(&ChartConfig::default());
        let names: Vec<&str> = figure.legend().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Decryption", "Computation", "Encryption", "Key Generation"]
        );
    }

    #[test]
    fn test_linear_range_rounds_to_tick_step() {
        let config = Benchmark::Cardio.config();
        let figure = render(
            &["Lobster"],
            &[table(10_000.0, 10_000.0, 12_000.0, 5_000.0)],
            None,
            &config,
        )
        .unwrap();
        // Peak of 37s rounds up to 40s, plus one step
        assert_eq!(figure.y_range(), 0.0..50.0);
    }

    #[test]
    fn test_linear_range_without_step() {
        let figure = render(
            &["A"],
            &[table(1000.0, 1000.0, 1000.0, 1000.0)],
            None,
            &ChartConfig::default(),
        )
        .unwrap();
        let range = figure.y_range();
        assert_eq!(range.start, 0.0);
        assert!((range.end - 4.4).abs() < 1e-9);
    }

    #[test]
    fn test_log_range_spans_decades() {
        let config = Benchmark::Kernel.config();
        let figure = render(
            &["SEAL-BFV"],
            &[table(5.0, 20.0, 1_500_000.0, 30.0)],
            None,
            &config,
        )
        .unwrap();
        // Smallest segment is 5ms, the total is just above 1500s
        assert_eq!(figure.y_range(), -3.0..4.0);
        assert_eq!(figure.scale().format_tick(3.0), "1K");
        assert_eq!(figure.scale().format_value(1_500_000.0), "1.5M");
    }

    #[test]
    fn test_group_tick_falls_back_to_member_names() {
        let config = ChartConfig {
            layout_mode: LayoutMode::Grouped,
            positions: Positions {
                flat: vec![],
                grouped: BTreeMap::from([("A".to_string(), (0, 0)), ("B".to_string(), (0, 1))]),
            },
            ..ChartConfig::default()
        };
        let figure = render(&["A"], &[table(1.0, 1.0, 1.0, 1.0)], None, &config).unwrap();
        assert_eq!(figure.ticks().len(), 1);
        assert_eq!(figure.ticks()[0].text, "A/B");
    }

    fn nn_panels() -> (Range<f64>, Range<f64>) {
        Benchmark::Nn.config().scale.ranges().unwrap()
    }

    #[test]
    fn test_bar_spanning_both_panels_is_clipped_open() {
        let config = Benchmark::Nn.config();
        let figure = render(
            &["SEALion"],
            &[table(1_000.0, 2_000.0, 125_000.0, 2_000.0)],
            None,
            &config,
        )
        .unwrap();
        let bar = &figure.bars()[0];
        assert_eq!(bar.total(), 130.0);

        // The computation segment runs from 3s to 128s
        let computation = &bar.segments[2];
        let (lower, upper) = nn_panels();
        assert_eq!(
            clip_span(computation.bottom, computation.top(), &lower),
            Some(Span {
                bottom: 3.0,
                top: 10.0,
                bottom_open: false,
                top_open: true,
            })
        );
        assert_eq!(
            clip_span(computation.bottom, computation.top(), &upper),
            Some(Span {
                bottom: 120.0,
                top: 128.0,
                bottom_open: true,
                top_open: false,
            })
        );

        let svg = figure.to_svg_string().unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_segment_inside_gap_is_hidden() {
        let (lower, upper) = nn_panels();
        assert_eq!(clip_span(20.0, 100.0, &lower), None);
        assert_eq!(clip_span(20.0, 100.0, &upper), None);
        // Touching a panel edge shows nothing either
        assert_eq!(clip_span(10.0, 120.0, &lower), None);
        assert_eq!(clip_span(10.0, 120.0, &upper), None);
    }

    #[test]
    fn test_segment_above_upper_panel_is_hidden() {
        let (lower, upper) = nn_panels();
        assert_eq!(clip_span(150.0, 160.0, &lower), None);
        assert_eq!(clip_span(150.0, 160.0, &upper), None);
        assert_eq!(
            clip_span(130.0, 160.0, &upper),
            Some(Span {
                bottom: 130.0,
                top: 140.0,
                bottom_open: false,
                top_open: true,
            })
        );
    }

    #[test]
    fn test_error_bar_is_split_across_panels() {
        let mut figure = Figure::new(&Benchmark::Nn.config());
        figure.bars.push(Bar {
            label: "SEALion".to_string(),
            x: 0.0,
            width: 0.6,
            segments: vec![Segment {
                phase: 0,
                bottom: 0.0,
                height: 50.0,
            }],
            error: 70.71,
        });
        let bar = &figure.bars()[0];
        let floor = figure.log_floor();
        let (lower, upper) = nn_panels();

        // The total sits in the gap but the error bar reaches both panels
        assert_eq!(
            figure.error_span(bar, floor, &lower),
            Some(Span {
                bottom: 0.0,
                top: 10.0,
                bottom_open: true,
                top_open: true,
            })
        );
        let span = figure.error_span(bar, floor, &upper).unwrap();
        assert_eq!(span.bottom, 120.0);
        assert!((span.top - 120.71).abs() < 1e-9);
        assert!(span.bottom_open);
        assert!(!span.top_open);

        assert!(figure.to_svg_string().unwrap().contains("<svg"));
    }

    #[test]
    fn test_error_span_without_error() {
        let figure = render(
            &["A"],
            &[table(1.0, 1.0, 1.0, 1.0)],
            None,
            &ChartConfig::default(),
        )
        .unwrap();
        let y_range = figure.y_range();
        let bar = &figure.bars()[0];
        assert_eq!(figure.error_span(bar, figure.log_floor(), &y_range), None);
    }

    #[test]
    fn test_broken_panels_follow_range_spans() {
        let (upper_plot, gap) = broken_split(480.0, (0.0, 10.0), (120.0, 140.0), 0.4);
        let lower_plot = 480.0 - gap - upper_plot;
        assert!((upper_plot - 2.0 * lower_plot).abs() < 1e-9);
        // The gap is hspace times the average panel height
        assert!((gap - 0.4 * (upper_plot + lower_plot) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_hatched_segments_draw_to_svg() {
        let config = Benchmark::Kernel.config();
        let figure = render(
            &["SEAL-BFV", "E3-SEAL"],
            &[
                table(100.0, 200.0, 300.0, 400.0),
                table(1000.0, 2000.0, 3000.0, 4000.0),
            ],
            None,
            &config,
        )
        .unwrap();
        let svg = figure.to_svg_string().unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Key Generation"));
        assert!(svg.contains("circle"));
    }
}
