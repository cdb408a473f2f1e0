use gridcaster::actor::{Actor, Obstacles};
use gridcaster::{Bitmap, Color, Input, Renderer, Texture, Textures, Tilemap, Vector, World};
use proptest::prelude::*;

const STEP: f64 = 1.0 / 120.0;

fn world(rows: &[&str]) -> World {
    World::new(Tilemap::from_rows(rows, 0).expect("valid rows")).expect("valid map")
}

fn clear_of_walls(world: &World, center: Vector, radius: f64) -> bool {
    let obstacles = Obstacles {
        map: world.map(),
        doors: &world.doors,
        pushwalls: &world.pushwalls,
    };
    obstacles.penetration(center, radius).is_none()
}

proptest! {
    #[test]
    fn actors_end_every_update_outside_walls(
        px in 1.0f64..5.0,
        py in 1.0f64..5.0,
        mx in 1.0f64..5.0,
        my in 1.0f64..5.0,
    ) {
        let mut world = world(&[
            "######", //
            "#P..M#",
            "#....#",
            "#..#.#",
            "#....#",
            "######",
        ]);
        prop_assume!(!world.map().is_wall(px as isize, py as isize));
        prop_assume!(!world.map().is_wall(mx as isize, my as isize));
        world.player.position = Vector::new(px, py);
        world.monsters[0].position = Vector::new(mx, my);

        world.update(STEP, &Input::default());

        let player = &world.player;
        prop_assert!(
            clear_of_walls(&world, player.position, player.radius()),
            "player left inside a wall at {:?}", player.position
        );
        let monster = &world.monsters[0];
        prop_assert!(
            clear_of_walls(&world, monster.position, monster.radius()),
            "monster left inside a wall at {:?}", monster.position
        );
    }
}

#[test]
fn player_squeezed_into_a_corner_is_not_crushed() {
    let mut world = world(&[
        "######", //
        "#P..M#",
        "#....#",
        "#..#.#",
        "#....#",
        "######",
    ]);
    world.player.position = Vector::new(1.0, 4.8);
    world.monsters[0].position = Vector::new(1.3, 4.6);

    for step in 0..120 {
        world.update(STEP, &Input::default());
        let player = &world.player;
        assert!(
            clear_of_walls(&world, player.position, player.radius()),
            "step {step}: player inside a wall at {:?}",
            player.position
        );
        let monster = &world.monsters[0];
        assert!(
            clear_of_walls(&world, monster.position, monster.radius()),
            "step {step}: monster inside a wall at {:?}",
            monster.position
        );
    }
    assert!(!world.player.is_dead(), "health {}", world.player.health);
}

#[test]
fn corridor_is_remembered_then_fades() {
    let mut world = world(&[
        "#######", //
        "#P....#",
        "#######",
    ]);
    world.update(STEP, &Input::default());
    let now = world.time();
    let vision = world.vision();

    for x in 1..=5 {
        assert_eq!(vision.fog(x, 1, now), None, "tile ({x}, 1) not revealed");
    }
    assert_eq!(vision.fog(6, 1, now + 100.0), None, "walls stay revealed");
    assert_eq!(vision.fog(0, 0, now), Some(1.0));

    let fading = vision.fog(3, 1, now + 3.0).expect("fading after delay");
    assert!((fading - 0.2).abs() < 1e-9, "opacity {fading}");
    let capped = vision.fog(3, 1, now + 100.0).expect("capped fade");
    assert!((capped - 0.7).abs() < 1e-9, "opacity {capped}");
}

#[test]
fn closed_door_hides_the_room_behind_it() {
    let mut world = world(&[
        "######", //
        "#P.D.#",
        "######",
    ]);
    world.update(STEP, &Input::default());
    let now = world.time();
    assert_eq!(world.vision().fog(2, 1, now), None);
    assert_eq!(world.vision().fog(4, 1, now), Some(1.0));
}

#[test]
fn facing_wall_renders_without_fisheye() {
    let world = world(&[
        "#######", //
        "#.....#",
        "#.....#",
        "#..P..#",
        "#.....#",
        "#.....#",
        "#######",
    ]);
    let textures = Textures::new(|texture| {
        let color = match texture {
            Texture::Wall => Color::RED,
            Texture::Pistol => Color::CLEAR,
            _ => Color::GREEN,
        };
        Bitmap::new(1, 1, color)
    });
    let mut renderer = Renderer::new(64, 64, &textures);
    renderer.draw(&world);

    let bitmap = &renderer.bitmap;
    let heights: Vec<usize> = (0..bitmap.width)
        .map(|x| (0..bitmap.height).filter(|&y| bitmap.get(x, y) == Color::RED).count())
        .collect();
    let (lowest, highest) = (
        heights.iter().copied().min().unwrap_or(0),
        heights.iter().copied().max().unwrap_or(0),
    );
    assert!(lowest > 0, "wall missing from some column: {heights:?}");
    assert!(highest - lowest <= 1, "wall height varies across columns: {heights:?}");
}
