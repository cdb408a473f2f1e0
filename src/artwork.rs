//! Procedural stand-ins for the texture atlas, so the demo runs without
//! image assets.

use gridcaster::math::{Rect, Vector};
use gridcaster::{Bitmap, Color, Texture};

const SIZE: usize = 16;

const BRICK: Color = Color::rgb(150, 60, 40);
const MORTAR: Color = Color::rgb(90, 90, 90);
const SLIME: Color = Color::rgb(80, 190, 60);
const STONE: Color = Color::rgb(110, 110, 110);
const STONE_DARK: Color = Color::rgb(80, 80, 80);
const CEILING: Color = Color::rgb(50, 50, 70);
const WOOD: Color = Color::rgb(140, 95, 45);
const STEEL: Color = Color::rgb(150, 160, 170);
const HIDE: Color = Color::rgb(70, 140, 70);
const BLOOD: Color = Color::rgb(160, 20, 20);
const FLASH: Color = Color::rgb(255, 220, 90);

pub fn load(texture: Texture) -> Bitmap {
    match texture {
        Texture::Wall => bricks(1.0),
        Texture::Wall2 => bricks(0.75),
        Texture::CrackWall => cracked(bricks(1.0)),
        Texture::CrackWall2 => cracked(bricks(0.75)),
        Texture::SlimeWall => slimed(bricks(1.0)),
        Texture::SlimeWall2 => slimed(bricks(0.75)),
        Texture::Floor => checker(STONE, STONE_DARK),
        Texture::CrackFloor => cracked(checker(STONE, STONE_DARK)),
        Texture::Ceiling => Bitmap::new(SIZE, SIZE, CEILING),
        Texture::Door => planks(1.0),
        Texture::Door2 => planks(0.75),
        Texture::DoorJamb => jamb(1.0),
        Texture::DoorJamb2 => jamb(0.75),
        Texture::Switch1 => lever(0),
        Texture::Switch2 => lever(1),
        Texture::Switch3 => lever(2),
        Texture::Switch4 => lever(3),
        Texture::Monster => monster(0.0, HIDE),
        Texture::MonsterWalk1 => monster(-1.0, HIDE),
        Texture::MonsterWalk2 => monster(1.0, HIDE),
        Texture::MonsterScratch1 => scratch(0),
        Texture::MonsterScratch2 => scratch(1),
        Texture::MonsterScratch3 => scratch(2),
        Texture::MonsterScratch4 => scratch(3),
        Texture::MonsterScratch5 => scratch(4),
        Texture::MonsterScratch6 => scratch(5),
        Texture::MonsterScratch7 => scratch(6),
        Texture::MonsterScratch8 => scratch(7),
        Texture::MonsterHurt => monster(0.0, BLOOD),
        Texture::MonsterDeath1 => slump(10.0),
        Texture::MonsterDeath2 => slump(6.0),
        Texture::MonsterDead => slump(3.0),
        Texture::Pistol => pistol(None),
        Texture::PistolFire1 => pistol(Some(4.0)),
        Texture::PistolFire2 => pistol(Some(3.0)),
        Texture::PistolFire3 => pistol(Some(2.0)),
        Texture::PistolFire4 => pistol(Some(1.0)),
    }
}

fn shade(color: Color, amount: f64) -> Color {
    let scale = |c: u8| (f64::from(c) * amount) as u8;
    Color::rgb(scale(color.r), scale(color.g), scale(color.b))
}

fn block(bitmap: &mut Bitmap, x0: f64, y0: f64, x1: f64, y1: f64, color: Color) {
    bitmap.fill(Rect::new(Vector::new(x0, y0), Vector::new(x1, y1)), color);
}

fn ellipse(bitmap: &mut Bitmap, center: Vector, radius: Vector, color: Color) {
    for y in 0..SIZE {
        for x in 0..SIZE {
            let offset = Vector::new(x as f64 + 0.5, y as f64 + 0.5) - center;
            let (dx, dy) = (offset.x / radius.x, offset.y / radius.y);
            if dx * dx + dy * dy <= 1.0 {
                bitmap.set(x as isize, y as isize, color);
            }
        }
    }
}

fn bricks(light: f64) -> Bitmap {
    let mut bitmap = Bitmap::new(SIZE, SIZE, shade(BRICK, light));
    let mortar = shade(MORTAR, light);
    for row in 0..SIZE / 4 {
        let y = (row * 4) as f64;
        block(&mut bitmap, 0.0, y, SIZE as f64, y + 1.0, mortar);
        let joint = if row % 2 == 0 { 3.0 } else { 11.0 };
        block(&mut bitmap, joint, y, joint + 1.0, y + 4.0, mortar);
    }
    bitmap
}

fn cracked(mut bitmap: Bitmap) -> Bitmap {
    bitmap.draw_line(Vector::new(3.0, 2.0), Vector::new(9.0, 9.0), Color::BLACK);
    bitmap.draw_line(Vector::new(9.0, 9.0), Vector::new(7.0, 14.0), Color::BLACK);
    bitmap
}

fn slimed(mut bitmap: Bitmap) -> Bitmap {
    block(&mut bitmap, 0.0, 0.0, SIZE as f64, 2.0, SLIME);
    for (x, length) in [(2.0, 6.0), (7.0, 4.0), (12.0, 9.0)] {
        block(&mut bitmap, x, 2.0, x + 1.0, 2.0 + length, SLIME);
    }
    bitmap
}

fn checker(a: Color, b: Color) -> Bitmap {
    let pixels = (0..SIZE * SIZE)
        .map(|i| if ((i % SIZE) / 8 + (i / SIZE) / 8) % 2 == 0 { a } else { b })
        .collect();
    Bitmap::from_pixels(SIZE, pixels)
}

fn planks(light: f64) -> Bitmap {
    let mut bitmap = Bitmap::new(SIZE, SIZE, shade(WOOD, light));
    for x in [4.0, 8.0, 12.0] {
        block(&mut bitmap, x, 0.0, x + 1.0, SIZE as f64, shade(WOOD, light * 0.6));
    }
    block(&mut bitmap, 12.0, 7.0, 14.0, 9.0, STEEL);
    bitmap
}

fn jamb(light: f64) -> Bitmap {
    let mut bitmap = Bitmap::new(SIZE, SIZE, shade(STEEL, light));
    for x in [2.0, 7.0, 12.0] {
        block(&mut bitmap, x, 0.0, x + 2.0, SIZE as f64, shade(STEEL, light * 0.7));
    }
    bitmap
}

fn lever(frame: usize) -> Bitmap {
    let mut bitmap = Bitmap::new(SIZE, SIZE, Color::CLEAR);
    block(&mut bitmap, 4.0, 4.0, 12.0, 12.0, STONE_DARK);
    let pivot = Vector::new(8.0, 8.0);
    let angle = -0.75 + frame as f64 * 0.5;
    let tip = pivot + Vector::new(angle.sin(), -angle.cos()) * 6.0;
    bitmap.draw_line(pivot, tip, STEEL);
    bitmap.set(tip.x as isize, tip.y as isize, Color::RED);
    bitmap
}

fn monster(stride: f64, color: Color) -> Bitmap {
    let mut bitmap = Bitmap::new(SIZE, SIZE, Color::CLEAR);
    ellipse(&mut bitmap, Vector::new(8.0, 7.0), Vector::new(4.0, 5.0), color);
    ellipse(&mut bitmap, Vector::new(8.0, 3.0), Vector::new(2.5, 2.5), color);
    block(&mut bitmap, 6.0, 2.0, 7.0, 3.0, Color::YELLOW);
    block(&mut bitmap, 9.0, 2.0, 10.0, 3.0, Color::YELLOW);
    block(&mut bitmap, 5.0 + stride, 11.0, 7.0 + stride, 16.0, color);
    block(&mut bitmap, 9.0 - stride, 11.0, 11.0 - stride, 16.0, color);
    bitmap
}

fn scratch(frame: usize) -> Bitmap {
    let mut bitmap = monster(0.0, HIDE);
    let swing = (frame as f64 / 7.0 * std::f64::consts::PI).sin();
    let shoulder = Vector::new(11.0, 6.0);
    let claw = shoulder + Vector::new(3.0, -4.0 + 8.0 * swing);
    bitmap.draw_line(shoulder, claw, HIDE);
    bitmap.set(claw.x as isize, claw.y as isize, Color::WHITE);
    bitmap
}

fn slump(height: f64) -> Bitmap {
    let mut bitmap = Bitmap::new(SIZE, SIZE, Color::CLEAR);
    let top = SIZE as f64 - height;
    ellipse(
        &mut bitmap,
        Vector::new(8.0, top + height / 2.0),
        Vector::new(5.0 + (10.0 - height) / 2.0, height / 2.0),
        HIDE,
    );
    block(&mut bitmap, 3.0, 15.0, 13.0, 16.0, BLOOD);
    bitmap
}

fn pistol(flash: Option<f64>) -> Bitmap {
    let mut bitmap = Bitmap::new(SIZE, SIZE, Color::CLEAR);
    block(&mut bitmap, 7.0, 11.0, 9.0, 16.0, STEEL);
    block(&mut bitmap, 6.0, 14.0, 10.0, 16.0, shade(STEEL, 0.6));
    if let Some(radius) = flash {
        ellipse(&mut bitmap, Vector::new(8.0, 10.0), Vector::new(radius, radius), FLASH);
    }
    bitmap
}
