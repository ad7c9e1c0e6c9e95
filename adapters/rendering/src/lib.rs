#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Geocoin Carrier adapters.
//!
//! A map-surface backend receives a declarative [`MapScene`] — cache
//! rectangles, popup bindings, the player marker, a status line — draws it
//! however it likes, and routes popup button presses back to the world as
//! commands. Everything here is pure data derived from world queries.

use anyhow::Result as AnyResult;
use geocoin_core::{Command, GeoBounds, GeoPosition, GridCoord};
use geocoin_world::{query, World};
use glam::Vec2;

const CACHE_OUTLINE: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);
const PLAYER_MARKER_COLOR: Color = Color::from_rgb_u8(0x1f, 0x6f, 0xeb);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Maps continuous geographic positions onto a pixel surface.
///
/// The viewport is centered on a position with a fixed scale, mirroring a
/// map surface locked to a single zoom level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    center: GeoPosition,
    pixels_per_degree: f32,
    surface: Vec2,
}

impl Viewport {
    /// Creates a viewport centered on `center` over a surface of the
    /// provided pixel dimensions.
    #[must_use]
    pub fn new(center: GeoPosition, pixels_per_degree: f32, surface: Vec2) -> Self {
        Self {
            center,
            pixels_per_degree,
            surface,
        }
    }

    /// Position at the center of the surface.
    #[must_use]
    pub const fn center(&self) -> GeoPosition {
        self.center
    }

    /// Projects a geographic position to surface pixels.
    ///
    /// North is up: increasing latitude maps to decreasing `y`.
    #[must_use]
    pub fn project(&self, position: GeoPosition) -> Vec2 {
        let dx = (position.lng() - self.center.lng()) as f32 * self.pixels_per_degree;
        let dy = (position.lat() - self.center.lat()) as f32 * self.pixels_per_degree;
        Vec2::new(self.surface.x / 2.0 + dx, self.surface.y / 2.0 - dy)
    }

    /// Projects cell bounds to a surface rectangle.
    #[must_use]
    pub fn project_bounds(&self, bounds: GeoBounds) -> SurfaceRect {
        let top_left = self.project(GeoPosition::new(bounds.north(), bounds.west()));
        let bottom_right = self.project(GeoPosition::new(bounds.south(), bounds.east()));
        SurfaceRect {
            origin: top_left,
            size: bottom_right - top_left,
        }
    }
}

/// Axis-aligned rectangle in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRect {
    /// Top-left corner of the rectangle.
    pub origin: Vec2,
    /// Width and height of the rectangle.
    pub size: Vec2,
}

/// Declarative description of one cache rectangle to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheRectangle {
    /// Coordinate of the cache the rectangle represents.
    pub cell: GridCoord,
    /// Geographic bounds of the cache cell.
    pub bounds: GeoBounds,
    /// Rectangle to draw, in surface pixels.
    pub rect: SurfaceRect,
    /// Outline color for the rectangle.
    pub outline: Color,
    /// Popup to bind to the rectangle.
    pub popup: CachePopup,
}

impl CacheRectangle {
    /// Command a backend submits when the popup's collect button is pressed.
    #[must_use]
    pub fn collect_command(&self) -> Command {
        Command::Collect { cell: self.cell }
    }

    /// Command a backend submits when the popup's deposit button is pressed.
    #[must_use]
    pub fn deposit_command(&self, amount: u32) -> Command {
        Command::Deposit {
            cell: self.cell,
            amount,
        }
    }
}

/// Interactive popup bound to one cache rectangle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachePopup {
    /// Heading identifying the cache, e.g. `Cache at "3,-7"`.
    pub title: String,
    /// Rendered identifiers of the coins held by the cache.
    pub coin_labels: Vec<String>,
    /// Whether the collect button should be enabled.
    pub can_collect: bool,
    /// Whether the deposit button should be enabled.
    pub can_deposit: bool,
}

/// Marker drawn at the player's current position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerMarker {
    /// Continuous position the marker points at.
    pub position: GeoPosition,
    /// Marker position in surface pixels.
    pub surface: Vec2,
    /// Fill color for the marker.
    pub color: Color,
}

/// Single-line status summary shown alongside the map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    /// Formatted status text.
    pub text: String,
}

/// Complete declarative scene for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MapScene {
    /// Player marker to draw above every rectangle.
    pub player: PlayerMarker,
    /// Cache rectangles in ascending coordinate order.
    pub caches: Vec<CacheRectangle>,
    /// Status summary of the wallet ledger.
    pub status: StatusLine,
}

/// Backend capable of presenting a [`MapScene`].
pub trait MapSurface {
    /// Presents the scene, replacing whatever was previously drawn.
    fn present(&mut self, scene: &MapScene) -> AnyResult<()>;
}

/// Builds the declarative scene for the world's current state.
#[must_use]
pub fn build_scene(world: &World, viewport: &Viewport) -> MapScene {
    let projection = query::projection(world);
    let wallet = query::wallet(world);

    let caches = query::cache_view(world)
        .iter()
        .map(|snapshot| {
            let bounds = projection.bounds_of(snapshot.cell);
            CacheRectangle {
                cell: snapshot.cell,
                bounds,
                rect: viewport.project_bounds(bounds),
                outline: CACHE_OUTLINE,
                popup: CachePopup {
                    title: format!("Cache at \"{}\"", snapshot.cell),
                    coin_labels: snapshot.coins.iter().map(ToString::to_string).collect(),
                    can_collect: !snapshot.coins.is_empty(),
                    can_deposit: wallet.coins > 0,
                },
            }
        })
        .collect();

    let position = query::player_position(world);
    MapScene {
        player: PlayerMarker {
            position,
            surface: viewport.project(position),
            color: PLAYER_MARKER_COLOR,
        },
        caches,
        status: StatusLine {
            text: format!(
                "Points: {} | Coins: {} | Deposited: {}",
                wallet.points, wallet.coins, wallet.total_deposited
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{build_scene, Color, Viewport};
    use geocoin_core::{GeoPosition, GridCoord, GridProjection, TILE_DEGREES};
    use geocoin_world::{World, WorldConfig};
    use glam::Vec2;

    fn viewport_at(center: GeoPosition) -> Viewport {
        Viewport::new(center, 1_000_000.0, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn center_projects_to_surface_midpoint() {
        let center = GeoPosition::new(36.9895, -122.0628);
        let viewport = viewport_at(center);
        assert_eq!(viewport.project(center), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn north_is_up_on_the_surface() {
        let center = GeoPosition::new(0.0, 0.0);
        let viewport = viewport_at(center);
        let north = viewport.project(GeoPosition::new(TILE_DEGREES, 0.0));
        assert!(north.y < 300.0);
    }

    #[test]
    fn scene_contains_one_rectangle_per_active_cache() {
        let config = WorldConfig::new(
            GridProjection::new(GeoPosition::new(0.0, 0.0), TILE_DEGREES),
            1,
            1.0,
            10,
        );
        let world = World::new(config);
        let viewport = viewport_at(GeoPosition::new(0.0, 0.0));

        let scene = build_scene(&world, &viewport);

        assert_eq!(scene.caches.len(), 9);
        let cells: Vec<GridCoord> = scene.caches.iter().map(|cache| cache.cell).collect();
        let mut sorted = cells.clone();
        sorted.sort_unstable();
        assert_eq!(cells, sorted);
    }

    #[test]
    fn popups_reflect_inventory_and_wallet() {
        let config = WorldConfig::new(
            GridProjection::new(GeoPosition::new(0.0, 0.0), TILE_DEGREES),
            1,
            1.0,
            10,
        );
        let world = World::new(config);
        let viewport = viewport_at(GeoPosition::new(0.0, 0.0));

        let scene = build_scene(&world, &viewport);
        for cache in &scene.caches {
            assert!(cache.popup.can_collect);
            assert!(!cache.popup.can_deposit);
            for label in &cache.popup.coin_labels {
                assert!(label.contains('#'), "coin label missing serial: {label}");
            }
            assert!(cache.popup.title.contains(&cache.cell.to_string()));
        }
        assert_eq!(scene.status.text, "Points: 0 | Coins: 0 | Deposited: 0");
    }

    #[test]
    fn colors_convert_from_bytes() {
        let color = Color::from_rgb_u8(255, 0, 51);
        assert_eq!(color.red, 1.0);
        assert_eq!(color.green, 0.0);
        assert!((color.blue - 0.2).abs() < 1e-3);
    }
}
