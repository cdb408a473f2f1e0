use crate::actor::Actor;
use crate::billboard::Billboard;
use crate::bitmap::{Bitmap, Color};
use crate::effect::{Effect, EffectKind, FizzleTable};
use crate::math::{EPSILON, Ray, Rect, Vector};
use crate::raycaster::RayCaster;
use crate::texture::{Texture, Textures};
use crate::tilemap::Tile;
use crate::vision::FOG_COLOR;
use crate::world::World;

/// Height of a wall in world units.
pub const WALL_HEIGHT: f64 = 1.0;
const FOCAL_LENGTH: f64 = 1.0;
/// Fizzle cells are square blocks of this many pixels.
const FIZZLE_GRANULARITY: usize = 4;
const FLASHLIGHT_RAYS: usize = 15;
const FLASHLIGHT_COLOR: Color = Color::YELLOW;

/// Paints a world into an owned bitmap.
pub struct Renderer<'a> {
    pub bitmap: Bitmap,
    textures: &'a Textures,
    fizzle: &'a FizzleTable,
}

struct SpriteHit {
    distance: f64,
    sprite: Billboard,
    hit: Vector,
}

impl<'a> Renderer<'a> {
    pub fn new(width: usize, height: usize, textures: &'a Textures) -> Self {
        Self {
            bitmap: Bitmap::new(width, height, Color::BLACK),
            textures,
            fizzle: FizzleTable::global(),
        }
    }

    pub fn with_fizzle(mut self, fizzle: &'a FizzleTable) -> Self {
        self.fizzle = fizzle;
        self
    }

    /// First-person view from the player.
    pub fn draw(&mut self, world: &World) {
        let (width, height) = (self.bitmap.width, self.bitmap.height);
        self.bitmap.clear(Color::BLACK);
        if width == 0 || height == 0 {
            return;
        }

        let caster = RayCaster::new(
            FOCAL_LENGTH,
            width as f64 / height as f64,
            world.player.direction,
            world.player.position,
            width,
        );
        let sprites = world.sprites();
        let mut hits = Vec::with_capacity(sprites.len());

        for (x, ray) in caster.rays().enumerate() {
            let distance_ratio = caster.distance_ratio(x);

            // Walls
            let end = world.map().hit_test(ray);
            let wall_distance = (end - ray.origin).length();
            let wall_height = self.projected_height(wall_distance / distance_ratio);
            let wall_top = (height as f64 - wall_height) / 2.0;
            let face = world.wall_face(end, ray.direction);
            self.draw_strip(face.texture, face.u, x, wall_top, wall_height);
            if let Some(switch) = world.switch_at(face.tile.0, face.tile.1) {
                self.draw_strip(switch.animation.texture(), face.u, x, wall_top, wall_height);
            }

            self.draw_floor_and_ceiling(world, x, ray, wall_top + wall_height, distance_ratio);

            // Sprites, back to front
            hits.clear();
            hits.extend(sprites.iter().filter_map(|sprite| {
                let hit = sprite.hit_test(ray)?;
                let distance = (hit - ray.origin).length();
                (distance < wall_distance).then_some(SpriteHit {
                    distance,
                    sprite: *sprite,
                    hit,
                })
            }));
            hits.sort_by(|a, b| b.distance.total_cmp(&a.distance));
            for SpriteHit {
                distance,
                sprite,
                hit,
            } in hits.drain(..)
            {
                let sprite_height = self.projected_height(distance / distance_ratio);
                let top = (height as f64 - sprite_height) / 2.0;
                self.draw_strip(sprite.texture, sprite.texture_offset(hit), x, top, sprite_height);
            }
        }

        // Weapon
        let weapon = &self.textures[world.player.animation.texture()];
        let size = height as f64;
        self.bitmap.draw_image(
            weapon,
            Vector::new((width as f64 - size) / 2.0, 0.0),
            Vector::new(size, size),
        );

        self.apply_effects(world.effects());
    }

    fn projected_height(&self, perpendicular: f64) -> f64 {
        WALL_HEIGHT * FOCAL_LENGTH / perpendicular.max(EPSILON) * self.bitmap.height as f64
    }

    fn draw_strip(&mut self, texture: Texture, u: f64, x: usize, top: f64, height: f64) {
        let source = &self.textures[texture];
        let source_x = ((u * source.width as f64) as usize).min(source.width.saturating_sub(1));
        self.bitmap
            .draw_column(source_x, source, Vector::new(x as f64, top), height);
    }

    fn draw_floor_and_ceiling(
        &mut self,
        world: &World,
        x: usize,
        ray: Ray,
        wall_bottom: f64,
        distance_ratio: f64,
    ) {
        let height = self.bitmap.height;
        let start = (wall_bottom.max(0.0).ceil() as usize).max(height / 2 + 1);
        let mut cache: Option<(Tile, &Bitmap, &Bitmap)> = None;

        for y in start..height {
            let normalized_y = (y as f64 / height as f64) * 2.0 - 1.0;
            let perpendicular = WALL_HEIGHT * FOCAL_LENGTH / normalized_y;
            let position = ray.at(perpendicular * distance_ratio);
            let tile_position = position.floor();
            let Some(tile) = world
                .map()
                .tile(tile_position.x as isize, tile_position.y as isize)
            else {
                continue;
            };
            if tile.is_wall() {
                continue;
            }
            let (floor, ceiling) = match cache.filter(|&(cached, ..)| cached == tile) {
                Some((_, floor, ceiling)) => (floor, ceiling),
                None => {
                    let [floor, ceiling] = tile.textures();
                    let textures = (&self.textures[floor], &self.textures[ceiling]);
                    cache = Some((tile, textures.0, textures.1));
                    textures
                }
            };
            let u = position.x - tile_position.x;
            let v = position.y - tile_position.y;
            let x = x as isize;
            self.bitmap.set(x, y as isize, floor.sample(u, v));
            self.bitmap
                .set(x, (height - 1 - y) as isize, ceiling.sample(u, v));
        }
    }

    /// Screen transitions, composited in queue order.
    pub fn apply_effects(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect.kind {
                EffectKind::FadeIn => self.bitmap.tint(effect.color, 1.0 - effect.progress()),
                EffectKind::FadeOut => self.bitmap.tint(effect.color, effect.progress()),
                EffectKind::FizzleOut => self.fizzle_out(effect),
            }
        }
    }

    fn fizzle_out(&mut self, effect: &Effect) {
        let threshold = (effect.progress() * self.fizzle.len() as f64) as usize;
        let width = self.bitmap.width;
        for (i, pixel) in self.bitmap.pixels.iter_mut().enumerate() {
            let (x, y) = (i % width, i / width);
            let cell = (y / FIZZLE_GRANULARITY) * width + x / FIZZLE_GRANULARITY;
            if self.fizzle.threshold_of(cell) < threshold {
                *pixel = effect.color;
            }
        }
    }

    /// Top-down map view.
    pub fn draw_2d(&mut self, world: &World) {
        self.bitmap.clear(Color::BLACK);
        let map = world.map();
        let size = world.size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let scale = (self.bitmap.height as f64 / size.y).min(self.bitmap.width as f64 / size.x);

        // Walls
        for y in 0..map.height() {
            for x in 0..map.width() {
                let Some(tile) = map.tile(x as isize, y as isize) else {
                    continue;
                };
                if !tile.is_wall() {
                    continue;
                }
                let rect = Rect::tile(x, y).scaled(scale);
                self.draw_square(tile.textures()[0], rect);
                if let Some(switch) = world.switch_at(x as isize, y as isize) {
                    self.draw_square(switch.animation.texture(), rect);
                }
            }
        }

        for door in &world.doors {
            let billboard = door.billboard();
            let center = billboard.start + billboard.direction * 0.5;
            self.draw_square(door.texture, Rect::centered(center, 0.5).scaled(scale));
        }
        for pushwall in &world.pushwalls {
            self.draw_square(pushwall.tile.textures()[0], pushwall.rect().scaled(scale));
        }

        // Player
        self.bitmap
            .fill(world.player.rect().scaled(scale), Color::BLUE);

        // Flashlight
        let player = &world.player;
        let caster = RayCaster::new(1.0, 1.0, player.direction, player.position, FLASHLIGHT_RAYS);
        for ray in caster.rays() {
            let end = Self::nearest_surface(world, ray);
            self.bitmap
                .draw_fade_line(ray.origin * scale, end * scale, FLASHLIGHT_COLOR);
        }

        for monster in &world.monsters {
            self.draw_square(monster.animation.texture(), monster.rect().scaled(scale));
        }

        // Fog
        if !world.is_revealed {
            let vision = world.vision();
            for y in 0..map.height() {
                for x in 0..map.width() {
                    if let Some(opacity) = vision.fog(x as isize, y as isize, world.time()) {
                        self.bitmap
                            .fill_blend(Rect::tile(x, y).scaled(scale), FOG_COLOR, opacity);
                    }
                }
            }
        }

        self.apply_effects(world.effects());
    }

    fn draw_square(&mut self, texture: Texture, rect: Rect) {
        self.bitmap
            .draw_image(&self.textures[texture], rect.min, rect.size());
    }

    /// Nearest of the world surfaces and any living monster along `ray`.
    fn nearest_surface(world: &World, ray: Ray) -> Vector {
        let end = world.hit_test(ray);
        let limit = (end - ray.origin).length();
        world
            .monsters
            .iter()
            .filter_map(|monster| monster.hit_test(ray))
            .map(|hit| ((hit - ray.origin).length(), hit))
            .filter(|&(distance, _)| distance < limit)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map_or(end, |(_, hit)| hit)
    }
}
