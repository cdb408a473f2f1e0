//! The level grid: tiles, spawn codes and exact wall hit-testing.

use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};
use crate::math::{Ray, Vector};
use crate::texture::Texture;
use crate::traversal::{Halt, Traversal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tile {
    Floor,
    CrackFloor,
    Wall,
    CrackWall,
    SlimeWall,
}

impl Tile {
    #[inline]
    pub fn is_wall(self) -> bool {
        matches!(self, Tile::Wall | Tile::CrackWall | Tile::SlimeWall)
    }

    /// Wall tiles: vertical face, horizontal face. Floor tiles: floor, ceiling.
    pub fn textures(self) -> [Texture; 2] {
        match self {
            Tile::Floor => [Texture::Floor, Texture::Ceiling],
            Tile::CrackFloor => [Texture::CrackFloor, Texture::Ceiling],
            Tile::Wall => [Texture::Wall, Texture::Wall2],
            Tile::CrackWall => [Texture::CrackWall, Texture::CrackWall2],
            Tile::SlimeWall => [Texture::SlimeWall, Texture::SlimeWall2],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Thing {
    #[default]
    Nothing,
    Player,
    Monster,
    Door,
    Pushwall,
    Switch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tilemap {
    width: usize,
    #[serde(default)]
    index: usize,
    tiles: Vec<Tile>,
    things: Vec<Thing>,
}

impl Tilemap {
    pub fn new(width: usize, tiles: Vec<Tile>, things: Vec<Thing>, index: usize) -> MapResult<Self> {
        let map = Self {
            width,
            index,
            tiles,
            things,
        };
        map.check_dimensions()?;
        Ok(map)
    }

    fn check_dimensions(&self) -> MapResult<()> {
        if self.width == 0 || self.tiles.is_empty() {
            return Err(MapError::EmptyMap);
        }
        if self.tiles.len() % self.width != 0 {
            return Err(MapError::RaggedRows {
                width: self.width,
                len: self.tiles.len(),
            });
        }
        if self.tiles.len() != self.things.len() {
            return Err(MapError::SizeMismatch {
                tiles: self.tiles.len(),
                things: self.things.len(),
            });
        }
        Ok(())
    }

    /// Checks everything a world needs before it can spawn from this map.
    pub fn validate(&self) -> MapResult<()> {
        self.check_dimensions()?;
        let mut has_player = false;
        for y in 0..self.height() {
            for x in 0..self.width {
                match self.thing(x, y) {
                    Thing::Player => has_player = true,
                    Thing::Door => {
                        if x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height() {
                            return Err(MapError::DoorOnEdge { x, y });
                        }
                    }
                    Thing::Switch if !self.tiles[y * self.width + x].is_wall() => {
                        return Err(MapError::SwitchNotOnWall { x, y });
                    }
                    Thing::Pushwall if !self.tiles[y * self.width + x].is_wall() => {
                        return Err(MapError::PushwallNotOnWall { x, y });
                    }
                    _ => {}
                }
            }
        }
        if !has_player {
            return Err(MapError::MissingPlayer);
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.tiles.len() / self.width.max(1)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> Vector {
        Vector::new(self.width as f64, self.height() as f64)
    }

    /// Tile at `(x, y)`, or `None` outside the map.
    #[inline]
    pub fn tile(&self, x: isize, y: isize) -> Option<Tile> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height() {
            return None;
        }
        Some(self.tiles[y as usize * self.width + x as usize])
    }

    /// Anything outside the map counts as solid.
    #[inline]
    pub fn is_wall(&self, x: isize, y: isize) -> bool {
        self.tile(x, y).is_none_or(Tile::is_wall)
    }

    #[inline]
    pub fn thing(&self, x: usize, y: usize) -> Thing {
        self.things[y * self.width + x]
    }

    pub(crate) fn is_door(&self, x: isize, y: isize) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.width
            && (y as usize) < self.height()
            && self.thing(x as usize, y as usize) == Thing::Door
    }

    pub(crate) fn set_tile(&mut self, x: usize, y: usize, tile: Tile) {
        let width = self.width;
        self.tiles[y * width + x] = tile;
    }

    /// The tile a ray travelling along `direction` is in at `position`. A
    /// point on a grid line belongs to the tile on the far side of it.
    pub fn tile_coords(&self, position: Vector, direction: Vector) -> (isize, isize) {
        let mut x = position.x.floor() as isize;
        let mut y = position.y.floor() as isize;
        if position.x.floor() == position.x && direction.x <= 0.0 {
            x -= 1;
        }
        if position.y.floor() == position.y && direction.y <= 0.0 {
            y -= 1;
        }
        (x, y)
    }

    pub fn tile_at(&self, position: Vector, direction: Vector) -> Option<Tile> {
        let (x, y) = self.tile_coords(position, direction);
        self.tile(x, y)
    }

    /// First point where `ray` enters a wall tile.
    pub fn hit_test(&self, ray: Ray) -> Vector {
        Traversal::new(self, ray, Halt::Wall)
            .last()
            .unwrap_or(ray.origin)
    }

    /// Builds a map from rows of characters, for tests and demos.
    /// `#` wall, `%` crack wall, `~` slime wall, `.` floor, `,` crack floor,
    /// `P` player, `M` monster, `D` door, `W` pushwall, `S` switch (on a wall).
    pub fn from_rows(rows: &[&str], index: usize) -> MapResult<Self> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut things = Vec::with_capacity(width * rows.len());
        for row in rows {
            for c in row.chars() {
                let (tile, thing) = match c {
                    '#' => (Tile::Wall, Thing::Nothing),
                    '%' => (Tile::CrackWall, Thing::Nothing),
                    '~' => (Tile::SlimeWall, Thing::Nothing),
                    ',' => (Tile::CrackFloor, Thing::Nothing),
                    'P' => (Tile::Floor, Thing::Player),
                    'M' => (Tile::Floor, Thing::Monster),
                    'D' => (Tile::Floor, Thing::Door),
                    'W' => (Tile::Wall, Thing::Pushwall),
                    'S' => (Tile::Wall, Thing::Switch),
                    _ => (Tile::Floor, Thing::Nothing),
                };
                tiles.push(tile);
                things.push(thing);
            }
        }
        Self::new(width, tiles, things, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Tilemap {
        Tilemap::from_rows(
            &[
                "#####", //
                "#...#",
                "#.P.#",
                "#...#",
                "#####",
            ],
            0,
        )
        .unwrap()
    }

    #[test]
    fn hits_far_wall_straight_ahead() {
        let map = room();
        let ray = Ray::new(Vector::new(0.5, 2.5), Vector::new(1.0, 0.0));
        let hit = map.hit_test(ray);
        assert_eq!(hit, Vector::new(4.0, 2.5));
        assert!(((hit - ray.origin).length() - 3.5).abs() < 1e-12);
    }

    #[test]
    fn hits_wall_behind() {
        let map = room();
        let ray = Ray::new(Vector::new(2.5, 2.5), Vector::new(0.0, -1.0));
        assert_eq!(map.hit_test(ray), Vector::new(2.5, 1.0));
    }

    #[test]
    fn grid_line_points_belong_to_the_far_tile() {
        let map = room();
        assert_eq!(map.tile_coords(Vector::new(2.0, 2.5), Vector::new(1.0, 0.0)), (2, 2));
        assert_eq!(map.tile_coords(Vector::new(2.0, 2.5), Vector::new(-1.0, 0.0)), (1, 2));
        assert_eq!(map.tile_coords(Vector::new(2.5, 1.0), Vector::new(0.0, -1.0)), (2, 0));
    }

    #[test]
    fn validation_reports_structural_faults() {
        let no_player = Tilemap::from_rows(&["###", "#.#", "###"], 0).unwrap();
        assert_eq!(no_player.validate(), Err(MapError::MissingPlayer));

        let edge_door = Tilemap::from_rows(&["#D#", "#P#", "###"], 0).unwrap();
        assert_eq!(edge_door.validate(), Err(MapError::DoorOnEdge { x: 1, y: 0 }));

        let mut floating_switch = room();
        floating_switch.things[2 * 5 + 1] = Thing::Switch;
        assert_eq!(
            floating_switch.validate(),
            Err(MapError::SwitchNotOnWall { x: 1, y: 2 })
        );

        assert!(room().validate().is_ok());
    }

    #[test]
    fn mismatched_grids_are_rejected() {
        let err = Tilemap::new(2, vec![Tile::Floor; 4], vec![Thing::Nothing; 3], 0).unwrap_err();
        assert_eq!(err, MapError::SizeMismatch { tiles: 4, things: 3 });
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{"width":1,"tiles":["wall"],"things":["player"]}"#;
        let map: Tilemap = serde_json::from_str(json).unwrap();
        assert_eq!(map.tile(0, 0), Some(Tile::Wall));
        assert_eq!(map.thing(0, 0), Thing::Player);
        assert_eq!(map.index(), 0);
    }
}
