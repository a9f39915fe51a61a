//! Report generation tools
//!
//! Single-page A4 client sheet: profile grid, latest meal and training
//! plans, and a weight/body fat trend chart.

use std::fmt::Display;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};
use printpdf::path::PaintMode;
use printpdf::*;
use serde::Serialize;

use crate::db::Database;
use crate::models::{Client, MealPlanRecord, Measurement, TrainingPlan};

// ============================================================================
// Layout Constants
// ============================================================================

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const ROW_HEIGHT_MM: f32 = 8.0;

const COLOR_TITLE: (u8, u8, u8) = (31, 56, 100);
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (110, 110, 110);
const COLOR_BOX: (u8, u8, u8) = (225, 225, 225);
const COLOR_BOX_ALT: (u8, u8, u8) = (242, 242, 242);

const CHART_WIDTH_PX: u32 = 900;
const CHART_HEIGHT_PX: u32 = 360;
const CHART_DPI: f32 = 150.0;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ExportPdfResponse {
    pub success: bool,
    pub client_id: i64,
    pub file_path: String,
    /// Sections rendered with data, in page order
    pub sections: Vec<String>,
    pub measurements_charted: usize,
    pub message: String,
}

/// Everything the sheet shows, read in one go
struct SheetData {
    client: Client,
    measurements: Vec<Measurement>,
    meal_plan: Option<MealPlanRecord>,
    training_plan: Option<TrainingPlan>,
}

fn load_sheet_data(
    db: &Database,
    client_id: i64,
    include_meal: bool,
    include_training: bool,
) -> Result<SheetData, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let client = Client::get_by_id(&conn, client_id)
        .map_err(|e| format!("Failed to get client: {}", e))?
        .ok_or_else(|| format!("Client not found with id: {}", client_id))?;

    let measurements = Measurement::list_for_client(&conn, client_id)
        .map_err(|e| format!("Failed to list measurements: {}", e))?;

    let meal_plan = if include_meal {
        MealPlanRecord::latest_for_client(&conn, client_id)
            .map_err(|e| format!("Failed to get meal plan: {}", e))?
    } else {
        None
    };

    let training_plan = if include_training {
        TrainingPlan::latest_for_client(&conn, client_id)
            .map_err(|e| format!("Failed to get training plan: {}", e))?
    } else {
        None
    };

    Ok(SheetData {
        client,
        measurements,
        meal_plan,
        training_plan,
    })
}

// ============================================================================
// Formatting
// ============================================================================

fn or_dash<T: Display>(value: Option<T>, suffix: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, suffix),
        None => "-".to_string(),
    }
}

fn decimal_or_dash(value: Option<f64>, suffix: &str) -> String {
    or_dash(value.map(|v| format!("{:.1}", v)), suffix)
}

fn text_or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// Label/value pairs for the client grid, left column then right column per row
fn client_fields(client: &Client) -> Vec<(&'static str, String)> {
    vec![
        ("Sex", or_dash(client.sex.map(|s| s.display_name()), "")),
        ("Age", or_dash(client.age, " y")),
        ("Height", decimal_or_dash(client.height_cm, " cm")),
        ("Weight", decimal_or_dash(client.weight_kg, " kg")),
        ("Body fat", decimal_or_dash(client.body_fat_pct, " %")),
        ("Muscle", decimal_or_dash(client.muscle_pct, " %")),
        ("Visceral fat", or_dash(client.visceral_fat, "")),
        ("Meals/day", or_dash(client.meals_per_day, "")),
        ("Allergies", text_or_dash(client.allergies.as_deref())),
        ("Occupation", text_or_dash(client.occupation.as_deref())),
    ]
}

/// Rough Helvetica width: half an em per character
fn approx_text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * 0.5 * 0.3528
}

/// Cut `text` to fit `max_mm` at `size_pt`
fn truncate_to_width(text: &str, size_pt: f32, max_mm: f32) -> String {
    if approx_text_width_mm(text, size_pt) <= max_mm {
        return text.to_string();
    }
    let max_chars = (max_mm / (size_pt * 0.5 * 0.3528)) as usize;
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

// ============================================================================
// Chart Generation (plotters)
// ============================================================================

/// Weight and body fat over time as PNG bytes. Measurements are expected
/// in chronological order.
pub fn generate_trend_chart(measurements: &[Measurement], width: u32, height: u32) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;

    let weights: Vec<(i32, f64)> = measurements
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.weight_kg.map(|w| (i as i32, w)))
        .collect();
    let body_fat: Vec<(i32, f64)> = measurements
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.body_fat_pct.map(|f| (i as i32, f)))
        .collect();

    if weights.len() + body_fat.len() == 0 {
        return Err("No weight or body fat values to chart".to_string());
    }

    let padded_range = |points: &[(i32, f64)], pad: f64| {
        let min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        if min.is_finite() && max.is_finite() {
            (min - pad)..(max + pad)
        } else {
            0.0..1.0
        }
    };
    let weight_range = padded_range(&weights, 2.0);
    let fat_range = padded_range(&body_fat, 1.0);
    let x_max = measurements.len() as i32;

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .right_y_label_area_size(50)
            .build_cartesian_2d(-1..x_max, weight_range)
            .map_err(|e| e.to_string())?
            .set_secondary_coord(-1..x_max, fat_range);

        chart
            .configure_mesh()
            .x_labels(measurements.len().min(10))
            .x_label_formatter(&|x| {
                if *x >= 0 && (*x as usize) < measurements.len() {
                    let date = &measurements[*x as usize].date;
                    date.split('-').skip(1).collect::<Vec<_>>().join("/")
                } else {
                    String::new()
                }
            })
            .y_desc("Weight (kg)")
            .draw()
            .map_err(|e| e.to_string())?;

        chart
            .configure_secondary_axes()
            .y_desc("Body fat (%)")
            .draw()
            .map_err(|e| e.to_string())?;

        let weight_color = RGBColor(31, 56, 100);
        let fat_color = RGBColor(200, 90, 30);

        if !weights.is_empty() {
            chart
                .draw_series(LineSeries::new(weights.clone(), weight_color.stroke_width(2)))
                .map_err(|e| e.to_string())?
                .label("Weight")
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], weight_color.stroke_width(2)));

            chart
                .draw_series(weights.iter().map(|(x, y)| Circle::new((*x, *y), 3, weight_color.filled())))
                .map_err(|e| e.to_string())?;
        }

        if !body_fat.is_empty() {
            chart
                .draw_secondary_series(LineSeries::new(body_fat.clone(), fat_color.stroke_width(2)))
                .map_err(|e| e.to_string())?
                .label("Body fat")
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], fat_color.stroke_width(2)));

            chart
                .draw_secondary_series(body_fat.iter().map(|(x, y)| Circle::new((*x, *y), 3, fat_color.filled())))
                .map_err(|e| e.to_string())?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    let img = RgbImage::from_raw(width, height, buffer).ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

// ============================================================================
// PDF Helpers
// ============================================================================

fn rgb_to_printpdf(color: (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        color.0 as f32 / 255.0,
        color.1 as f32 / 255.0,
        color.2 as f32 / 255.0,
        None,
    ))
}

fn add_text(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, x: f32, y: f32, size: f32, color: (u8, u8, u8)) {
    layer.set_fill_color(rgb_to_printpdf(color));
    layer.use_text(text, size, Mm(x), Mm(y), font);
}

fn add_line(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: (u8, u8, u8)) {
    layer.set_outline_color(rgb_to_printpdf(color));
    layer.set_outline_thickness(0.5);

    layer.add_line(Line {
        points: vec![(Point::new(Mm(x1), Mm(y)), false), (Point::new(Mm(x2), Mm(y)), false)],
        is_closed: false,
    });
}

/// Filled box with its top edge at `top`
fn add_box(layer: &PdfLayerReference, x: f32, top: f32, width: f32, height: f32, color: (u8, u8, u8)) {
    layer.set_fill_color(rgb_to_printpdf(color));
    layer.add_rect(Rect::new(Mm(x), Mm(top - height), Mm(x + width), Mm(top)).with_mode(PaintMode::Fill));
}

fn section_heading(layer: &PdfLayerReference, font_bold: &IndirectFontRef, title: &str, y: &mut f32) {
    add_text(layer, font_bold, title, MARGIN_MM, *y, 12.0, COLOR_TITLE);
    *y -= 2.0;
    add_line(layer, MARGIN_MM, PAGE_WIDTH_MM - MARGIN_MM, *y, COLOR_GRAY);
    *y -= 6.0;
}

/// Rows of label/value pairs, two pairs per row, alternating shade
fn draw_grid(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    fields: &[(&str, String)],
    y: &mut f32,
) {
    let content_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let column_width = content_width / 2.0;

    for (row, pair) in fields.chunks(2).enumerate() {
        let shade = if row % 2 == 0 { COLOR_BOX } else { COLOR_BOX_ALT };
        add_box(layer, MARGIN_MM, *y + 5.5, content_width, ROW_HEIGHT_MM, shade);

        for (col, (label, value)) in pair.iter().enumerate() {
            let x = MARGIN_MM + 2.0 + col as f32 * column_width;
            add_text(layer, font_bold, label, x, *y, 9.0, COLOR_BLACK);
            let value = truncate_to_width(value, 9.0, column_width - 34.0);
            add_text(layer, font, &value, x + 30.0, *y, 9.0, COLOR_BLACK);
        }
        *y -= ROW_HEIGHT_MM;
    }
}

fn default_output_path(export_dir: &Path, client_id: i64) -> PathBuf {
    export_dir.join(format!("client_sheet_{}.pdf", client_id))
}

// ============================================================================
// Client Sheet
// ============================================================================

/// Generate the client sheet PDF.
///
/// `output_path` defaults to `<export_dir>/client_sheet_<id>.pdf`.
pub fn export_client_pdf(
    db: &Database,
    client_id: i64,
    include_meal: bool,
    include_training: bool,
    output_path: Option<&str>,
    export_dir: &Path,
) -> Result<ExportPdfResponse, String> {
    let data = load_sheet_data(db, client_id, include_meal, include_training)?;
    let client = &data.client;
    let mut sections = vec!["client_data".to_string()];

    let title = format!("Client Sheet - {}", client.name);
    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    let font = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| e.to_string())?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(|e| e.to_string())?;

    let layer = doc.get_page(page1).get_layer(layer1);
    let mut y = PAGE_HEIGHT_MM - 20.0;

    // Title, centered
    let title_x = ((PAGE_WIDTH_MM - approx_text_width_mm(&title, 18.0)) / 2.0).max(MARGIN_MM);
    add_text(&layer, &font_bold, &title, title_x, y, 18.0, COLOR_TITLE);
    y -= 9.0;

    let generated = chrono::Local::now().format("%Y-%m-%d").to_string();
    add_text(&layer, &font, &format!("Date: {}", generated), MARGIN_MM, y, 10.0, COLOR_GRAY);
    y -= 10.0;

    section_heading(&layer, &font_bold, "Client data", &mut y);
    draw_grid(&layer, &font, &font_bold, &client_fields(client), &mut y);
    y -= 6.0;

    if include_meal {
        section_heading(&layer, &font_bold, "Meal plan", &mut y);
        match &data.meal_plan {
            Some(plan) => {
                let meals = plan.meals().map_err(|e| format!("Corrupt meal list in plan {}: {}", plan.id, e))?;

                add_text(
                    &layer,
                    &font,
                    &format!("{} ({})", plan.objective.display_name(), plan.date),
                    MARGIN_MM,
                    y,
                    9.0,
                    COLOR_GRAY,
                );
                y -= 6.0;

                let macros = vec![
                    ("Calories", format!("{} kcal", plan.calories)),
                    ("Protein", format!("{} g", plan.protein_g)),
                    ("Fat", format!("{} g", plan.fat_g)),
                    ("Carbs", format!("{} g", plan.carb_g)),
                ];
                draw_grid(&layer, &font, &font_bold, &macros, &mut y);
                y -= 2.0;

                for (i, meal) in meals.iter().enumerate() {
                    let line = truncate_to_width(
                        &format!("{}. {}", i + 1, meal),
                        8.5,
                        PAGE_WIDTH_MM - 2.0 * MARGIN_MM,
                    );
                    add_text(&layer, &font, &line, MARGIN_MM, y, 8.5, COLOR_BLACK);
                    y -= 5.0;
                }
                sections.push("meal_plan".to_string());
            }
            None => {
                add_text(&layer, &font, "No meal plan on file.", MARGIN_MM, y, 9.0, COLOR_GRAY);
                y -= 6.0;
            }
        }
        y -= 6.0;
    }

    if include_training {
        section_heading(&layer, &font_bold, "Training plan", &mut y);
        match &data.training_plan {
            Some(plan) => {
                let fields = vec![
                    ("Goal", text_or_dash(plan.goal.as_deref())),
                    ("Split", text_or_dash(plan.split.as_deref())),
                    ("Days/week", or_dash(plan.days_per_week, "")),
                    ("Session", or_dash(plan.session_duration_min, " min")),
                ];
                draw_grid(&layer, &font, &font_bold, &fields, &mut y);
                sections.push("training_plan".to_string());
            }
            None => {
                add_text(&layer, &font, "No training plan on file.", MARGIN_MM, y, 9.0, COLOR_GRAY);
                y -= 6.0;
            }
        }
        y -= 6.0;
    }

    let mut measurements_charted = 0;
    if data.measurements.len() >= 2 {
        let mut chronological = data.measurements.clone();
        chronological.reverse();

        section_heading(&layer, &font_bold, "Progress", &mut y);
        match generate_trend_chart(&chronological, CHART_WIDTH_PX, CHART_HEIGHT_PX) {
            Ok(png_bytes) => {
                let dynamic_image = printpdf::image_crate::load_from_memory(&png_bytes).map_err(|e| e.to_string())?;
                let image_height_mm = CHART_HEIGHT_PX as f32 / CHART_DPI * 25.4;

                Image::from_dynamic_image(&dynamic_image).add_to_layer(
                    layer.clone(),
                    ImageTransform {
                        translate_x: Some(Mm(MARGIN_MM)),
                        translate_y: Some(Mm(y - image_height_mm)),
                        dpi: Some(CHART_DPI),
                        ..Default::default()
                    },
                );
                measurements_charted = chronological
                    .iter()
                    .filter(|m| m.weight_kg.is_some() || m.body_fat_pct.is_some())
                    .count();
                sections.push("trend_chart".to_string());
            }
            Err(e) => {
                tracing::warn!(client_id, error = %e, "Trend chart skipped");
                add_text(&layer, &font, &format!("Chart unavailable: {}", e), MARGIN_MM, y, 9.0, COLOR_GRAY);
            }
        }
    }

    let path = match output_path {
        Some(p) if !p.trim().is_empty() => PathBuf::from(p),
        _ => default_output_path(export_dir, client_id),
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }

    let file = File::create(&path).map_err(|e| format!("Failed to create {}: {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(|e| e.to_string())?;

    let file_path = std::fs::canonicalize(&path).unwrap_or(path).display().to_string();
    tracing::info!(client_id, file = %file_path, "Exported client sheet");

    Ok(ExportPdfResponse {
        success: true,
        client_id,
        message: format!("Client sheet for {} written with {}", client.name, sections.join(", ")),
        file_path,
        sections,
        measurements_charted,
    })
}
