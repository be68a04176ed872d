//! Navigation scroll affordances: header hide-on-scroll, active section
//! highlighting and anchor scroll offsets.

pub const HEADER_SELECTOR: &str = "header";
/// In-page links that scroll smoothly.
pub const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
pub const SECTION_SELECTOR: &str = "section[id]";
pub const NAV_LINK_SELECTOR: &str = "nav a[href^=\"#\"]";
/// Scroll handlers run at most once per this interval.
pub const SCROLL_THROTTLE_MS: f64 = 100.0;
/// The header only hides once the page is scrolled past this offset.
pub const HEADER_HIDE_AFTER_PX: f64 = 100.0;
/// Height of the fixed navigation bar, subtracted from anchor targets.
pub const ANCHOR_OFFSET_PX: f64 = 80.0;
/// Sections count as current this far before their top edge.
pub const SECTION_LEAD_PX: f64 = 100.0;
/// Class marking the current navigation link.
pub const ACTIVE_LINK_CLASS: &str = "text-cyan-400";
/// Transform applied to a clicked anchor, reset after [`ANCHOR_PULSE_MS`].
pub const ANCHOR_PULSE_TRANSFORM: &str = "scale(0.95)";
pub const ANCHOR_PULSE_RESET: &str = "scale(1)";
pub const ANCHOR_PULSE_MS: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    Shown,
    Hidden,
}

impl HeaderState {
    /// Inline transform for the header element.
    pub fn transform(self) -> &'static str {
        match self {
            HeaderState::Shown => "translateY(0)",
            HeaderState::Hidden => "translateY(-100%)",
        }
    }
}

/// Hides the header while scrolling down, shows it when scrolling up or
/// near the top.
#[derive(Debug, Clone, Default)]
pub struct HeaderVisibility {
    last_scroll_top: f64,
}

impl HeaderVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header state for the new scroll offset. Remembers the offset for the
    /// next call.
    pub fn on_scroll(&mut self, scroll_top: f64) -> HeaderState {
        let state = if scroll_top > self.last_scroll_top && scroll_top > HEADER_HIDE_AFTER_PX {
            HeaderState::Hidden
        } else {
            HeaderState::Shown
        };
        self.last_scroll_top = scroll_top;
        state
    }
}

/// Vertical extent of a page section.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// Id of the section the reader is in. When ranges overlap the last
/// matching section wins.
pub fn active_section(sections: &[SectionBounds], scroll_y: f64) -> Option<&str> {
    sections
        .iter()
        .filter(|s| {
            let start = s.top - SECTION_LEAD_PX;
            scroll_y >= start && scroll_y < start + s.height
        })
        .last()
        .map(|s| s.id.as_str())
}

/// Whether a nav link `href` points at the active section.
pub fn is_active_link(href: &str, active: Option<&str>) -> bool {
    match (href.strip_prefix('#'), active) {
        (Some(target), Some(active)) => target == active,
        _ => false,
    }
}

/// Scroll position that puts an anchor target just under the fixed header.
pub fn anchor_scroll_top(target_offset_top: f64) -> f64 {
    target_offset_top - ANCHOR_OFFSET_PX
}
