//! Map widget and geolocation seams.
//!
//! The controller only needs a handful of widget calls: setting the view,
//! attaching a tile layer, adding markers with popups and clearing
//! everything for a reload. `RecordingMap` implements them by keeping the
//! resulting state, which is what the CLI prints and the tests inspect.

use crate::types::Coords;

pub const DEFAULT_ZOOM: u8 = 13;

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub animate: bool,
    /// Pan animation length in seconds.
    pub duration: f64,
}

impl ViewOptions {
    pub const INSTANT: Self = Self {
        animate: false,
        duration: 0.0,
    };

    pub const PAN: Self = Self {
        animate: true,
        duration: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub content: String,
    pub class_name: Option<String>,
    /// Close when another popup opens.
    pub auto_close: bool,
    pub close_on_click: bool,
    pub open: bool,
}

impl Popup {
    /// Popup that closes like a default widget popup.
    pub fn simple(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            class_name: None,
            auto_close: true,
            close_on_click: true,
            open: true,
        }
    }

    /// Popup that stays open alongside others.
    pub fn sticky(content: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            class_name: Some(class_name.into()),
            auto_close: false,
            close_on_click: false,
            open: true,
        }
    }
}

pub trait MapView {
    fn set_view(&mut self, center: Coords, zoom: u8, options: ViewOptions);
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);
    fn add_marker(&mut self, at: Coords, popup: Popup);
    /// Remove every layer and marker.
    fn clear(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub at: Coords,
    pub popup: Popup,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub center: Coords,
    pub zoom: u8,
    pub options: ViewOptions,
}

#[derive(Debug, Default, Clone)]
pub struct RecordingMap {
    pub view: Option<View>,
    pub tile_layer: Option<(String, String)>,
    pub markers: Vec<Marker>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Popups still open. A popup with `auto_close` closes when the next one opens.
    pub fn open_popups(&self) -> impl Iterator<Item = &Popup> {
        self.markers.iter().map(|m| &m.popup).filter(|p| p.open)
    }
}

impl MapView for RecordingMap {
    fn set_view(&mut self, center: Coords, zoom: u8, options: ViewOptions) {
        self.view = Some(View {
            center,
            zoom,
            options,
        });
    }

    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) {
        self.tile_layer = Some((url_template.to_string(), attribution.to_string()));
    }

    fn add_marker(&mut self, at: Coords, popup: Popup) {
        if popup.open {
            for m in &mut self.markers {
                if m.popup.auto_close {
                    m.popup.open = false;
                }
            }
        }
        self.markers.push(Marker { at, popup });
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Couldn't get your position")]
pub struct GeolocationError;

pub trait Geolocation {
    fn current_position(&self) -> Result<Coords, GeolocationError>;
}

/// Position supplied up front, e.g. from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPosition(pub Option<Coords>);

impl Geolocation for FixedPosition {
    fn current_position(&self) -> Result<Coords, GeolocationError> {
        self.0.ok_or(GeolocationError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn sticky_popups_stay_open_together() {
        let mut map = RecordingMap::new();
        map.add_marker(Coords::new(0.0, 0.0), Popup::simple("You are here"));
        map.add_marker(Coords::new(1.0, 1.0), Popup::sticky("a", "running-popup"));
        map.add_marker(Coords::new(2.0, 2.0), Popup::sticky("b", "cycling-popup"));

        let open: Vec<&str> = map.open_popups().map(|p| p.content.as_str()).collect();
        assert_eq!(open, vec!["a", "b"]);
    }

    #[rstest]
    fn clear_forgets_everything() {
        let mut map = RecordingMap::new();
        map.set_view(Coords::new(1.0, 2.0), DEFAULT_ZOOM, ViewOptions::INSTANT);
        map.add_tile_layer(TILE_URL, TILE_ATTRIBUTION);
        map.add_marker(Coords::new(1.0, 2.0), Popup::simple("x"));
        map.clear();
        assert!(map.view.is_none());
        assert!(map.tile_layer.is_none());
        assert!(map.markers.is_empty());
    }

    #[rstest]
    #[case(Some(Coords::new(10.0, 20.0)), Ok(Coords::new(10.0, 20.0)))]
    #[case(None, Err(GeolocationError))]
    fn fixed_position(
        #[case] pos: Option<Coords>,
        #[case] expected: Result<Coords, GeolocationError>,
    ) {
        assert_eq!(FixedPosition(pos).current_position(), expected);
    }
}
