//! Conversion between horizontal timeline pixels and calendar years.
//!
//! A timeline of `width` pixels covering `span` years gives each year
//! `width / span` pixels. A click at `x` lands in year
//! `floor(x / (width / span))`; the far right edge is the boundary year
//! `span` itself.

use crate::error::ScenarioError;

/// Map a horizontal pixel offset on a timeline to a year offset.
///
/// `x` is measured from the timeline's left edge and clamped into
/// `[0, width_pixels]` first, so the result always lies in `[0, span_years]`.
///
/// # Errors
///
/// Returns [`ScenarioError::InvalidArgument`] if `width_pixels` is not a
/// positive finite number, `span_years` is zero, or `x` is not finite.
pub fn year_from_pixel(x: f64, width_pixels: f64, span_years: u32) -> Result<u32, ScenarioError> {
    check_geometry(width_pixels, span_years)?;
    if !x.is_finite() {
        return Err(ScenarioError::InvalidArgument(format!(
            "pixel position must be finite, got {x}"
        )));
    }

    let x = x.clamp(0.0, width_pixels);
    // The right edge must hit the boundary year exactly; the division below
    // can land a hair short of it for widths that are not multiples of span.
    if x >= width_pixels {
        return Ok(span_years);
    }

    let pixels_per_year = width_pixels / f64::from(span_years);
    let year = (x / pixels_per_year).floor();

    // `year` is a non-negative whole number no larger than `span_years`
    // (up to rounding), so the cast is exact once clamped.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let year = year.clamp(0.0, f64::from(span_years)) as u32;
    Ok(year)
}

/// Map a year offset back to the pixel offset of its left edge.
///
/// Used by the rendering collaborator to place intervention markers.
/// Years past the span are clamped to the span.
///
/// # Errors
///
/// Returns [`ScenarioError::InvalidArgument`] if `width_pixels` is not a
/// positive finite number or `span_years` is zero.
pub fn pixel_from_year(year: u32, width_pixels: f64, span_years: u32) -> Result<f64, ScenarioError> {
    check_geometry(width_pixels, span_years)?;
    let year = clamp_year(year, span_years);
    Ok(f64::from(year) * (width_pixels / f64::from(span_years)))
}

/// Clamp a year offset into `[0, span]`.
pub fn clamp_year(year: u32, span: u32) -> u32 {
    year.min(span)
}

fn check_geometry(width_pixels: f64, span_years: u32) -> Result<(), ScenarioError> {
    if !width_pixels.is_finite() || width_pixels <= 0.0 {
        return Err(ScenarioError::InvalidArgument(format!(
            "timeline width must be positive, got {width_pixels}"
        )));
    }
    if span_years == 0 {
        return Err(ScenarioError::InvalidArgument(String::from(
            "timeline span must be at least one year",
        )));
    }
    Ok(())
}
