//! Unit Conversion
//!
//! Converts a clause value to CSS pixels against live measurements.

use crate::host::MetricsProvider;
use crate::query::Units;

/// Font size assumed when the host cannot give a usable one.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// Convert `value` in `units` to pixels. `element` is what `em` resolves
/// against; `None` means the root element.
///
/// Physical units, `ch` and `ex` are not converted: the raw value is returned
/// as if it were pixels.
pub fn to_pixels<E, M>(value: f64, units: Units, element: Option<&E>, metrics: &M) -> f64
where
    M: MetricsProvider<E> + ?Sized,
{
    match units {
        Units::Px => value,
        Units::Em => value * font_size_px(element, metrics),
        Units::Rem => value * font_size_px(None, metrics),
        // Viewport units!
        Units::Vw => value * metrics.viewport_width_px() / 100.0,
        Units::Vh => value * metrics.viewport_height_px() / 100.0,
        Units::Vmin | Units::Vmax => {
            let vw = metrics.viewport_width_px() / 100.0;
            let vh = metrics.viewport_height_px() / 100.0;
            let unit = if units == Units::Vmin {
                vw.min(vh)
            } else {
                vw.max(vh)
            };
            value * unit
        }
        Units::Ch | Units::Ex | Units::Cm | Units::Mm | Units::Q | Units::In | Units::Pt | Units::Pc => {
            value
        }
    }
}

fn font_size_px<E, M>(element: Option<&E>, metrics: &M) -> f64
where
    M: MetricsProvider<E> + ?Sized,
{
    let size = metrics.resolved_font_size_px(element);
    if size.is_finite() && size > 0.0 {
        size
    } else {
        DEFAULT_FONT_SIZE_PX
    }
}
