use ratatui::style::Color;
use ratatui::widgets::canvas::MapResolution;

/// Base layer drawn under the marker. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseLayer {
    #[default]
    Street,
    Satellite,
}

impl BaseLayer {
    pub const fn toggle(self) -> Self {
        match self {
            BaseLayer::Street => BaseLayer::Satellite,
            BaseLayer::Satellite => BaseLayer::Street,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            BaseLayer::Street => "Peta",
            BaseLayer::Satellite => "Satelit",
        }
    }

    /// Tile source the layer stands for
    pub const fn tile_url(self) -> &'static str {
        match self {
            BaseLayer::Street => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            BaseLayer::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
        }
    }

    pub const fn attribution(self) -> &'static str {
        match self {
            BaseLayer::Street => "© OpenStreetMap contributors",
            BaseLayer::Satellite => "© Esri",
        }
    }

    pub const fn resolution(self) -> MapResolution {
        match self {
            BaseLayer::Street => MapResolution::Low,
            BaseLayer::Satellite => MapResolution::High,
        }
    }

    pub const fn land_color(self) -> Color {
        match self {
            BaseLayer::Street => Color::Gray,
            BaseLayer::Satellite => Color::Rgb(0x6B, 0x8E, 0x23),
        }
    }

    pub const fn background(self) -> Color {
        match self {
            BaseLayer::Street => Color::Rgb(0x1E, 0x1E, 0x2E),
            BaseLayer::Satellite => Color::Rgb(0x0B, 0x1D, 0x33),
        }
    }
}
