use web_sys::HtmlElement;
use yew::NodeRef;

/// Font sizes, in pixels, for the background title and the countdown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportFontSizes {
    pub title_px: f64,
    pub timer_px: f64,
}

pub fn compute_sizes(viewport_width: f64, viewport_height: f64) -> ViewportFontSizes {
    ViewportFontSizes {
        title_px: (viewport_width * 0.15).min(viewport_height * 0.20),
        timer_px: (viewport_width * 0.05).min(viewport_height * 0.08),
    }
}

pub fn viewport_size() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

/// Resizes both text layers to the current viewport. Skipped until both
/// layers are attached.
pub fn apply_sizes(title: &NodeRef, timer: &NodeRef) {
    let (Some(title), Some(timer)) = (title.cast::<HtmlElement>(), timer.cast::<HtmlElement>()) else {
        return;
    };
    let Some((width, height)) = viewport_size() else {
        return;
    };

    let sizes = compute_sizes(width, height);
    set_font_size(&title, sizes.title_px);
    set_font_size(&timer, sizes.timer_px);
}

fn set_font_size(element: &HtmlElement, px: f64) {
    if element
        .style()
        .set_property("font-size", &format!("{}px", px))
        .is_err()
    {
        log::warn!("could not set font-size on hero layer");
    }
}
