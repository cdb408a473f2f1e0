//! Symbolic texture ids and the read-only texture table the renderer samples.

use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Texture {
    Wall,
    Wall2,
    CrackWall,
    CrackWall2,
    SlimeWall,
    SlimeWall2,
    Floor,
    CrackFloor,
    Ceiling,
    Door,
    Door2,
    DoorJamb,
    DoorJamb2,
    Switch1,
    Switch2,
    Switch3,
    Switch4,
    Monster,
    MonsterWalk1,
    MonsterWalk2,
    MonsterScratch1,
    MonsterScratch2,
    MonsterScratch3,
    MonsterScratch4,
    MonsterScratch5,
    MonsterScratch6,
    MonsterScratch7,
    MonsterScratch8,
    MonsterHurt,
    MonsterDeath1,
    MonsterDeath2,
    MonsterDead,
    Pistol,
    PistolFire1,
    PistolFire2,
    PistolFire3,
    PistolFire4,
}

impl Texture {
    pub const ALL: [Texture; 37] = [
        Texture::Wall,
        Texture::Wall2,
        Texture::CrackWall,
        Texture::CrackWall2,
        Texture::SlimeWall,
        Texture::SlimeWall2,
        Texture::Floor,
        Texture::CrackFloor,
        Texture::Ceiling,
        Texture::Door,
        Texture::Door2,
        Texture::DoorJamb,
        Texture::DoorJamb2,
        Texture::Switch1,
        Texture::Switch2,
        Texture::Switch3,
        Texture::Switch4,
        Texture::Monster,
        Texture::MonsterWalk1,
        Texture::MonsterWalk2,
        Texture::MonsterScratch1,
        Texture::MonsterScratch2,
        Texture::MonsterScratch3,
        Texture::MonsterScratch4,
        Texture::MonsterScratch5,
        Texture::MonsterScratch6,
        Texture::MonsterScratch7,
        Texture::MonsterScratch8,
        Texture::MonsterHurt,
        Texture::MonsterDeath1,
        Texture::MonsterDeath2,
        Texture::MonsterDead,
        Texture::Pistol,
        Texture::PistolFire1,
        Texture::PistolFire2,
        Texture::PistolFire3,
        Texture::PistolFire4,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Every texture, decoded once up front. Pixels are expected premultiplied.
pub struct Textures {
    bitmaps: Vec<Bitmap>,
}

impl Textures {
    pub fn new(loader: impl Fn(Texture) -> Bitmap) -> Self {
        Self {
            bitmaps: Texture::ALL.iter().map(|&texture| loader(texture)).collect(),
        }
    }

    #[inline]
    pub fn get(&self, texture: Texture) -> &Bitmap {
        &self.bitmaps[texture.index()]
    }
}

impl std::ops::Index<Texture> for Textures {
    type Output = Bitmap;

    fn index(&self, texture: Texture) -> &Bitmap {
        self.get(texture)
    }
}
