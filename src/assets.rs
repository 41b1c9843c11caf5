//! Asset loading
//!
//! Decodes images with the `image` crate and turns them into macroquad
//! textures. Static images become one texture each. Animated GIFs are
//! decoded into a single RGBA buffer holding every frame back to back; the
//! texture starts with frame 0 and the animation system uploads later
//! frames into it.
//!
//! The loaded textures also back the draw and upload seams used by the
//! render and animation systems.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use image::codecs::gif::GifDecoder;
use image::AnimationDecoder;
use macroquad::prelude::*;

use crate::config::ProjectPaths;
use crate::game::animation::FrameUploader;
use crate::game::components::{AnimationData, AnimationState, TextureHandle, TextureId, TileType};
use crate::game::renderer::{Canvas, RenderTextures};
use crate::game::spawn::SpriteAssets;

pub const BACKGROUND: &str = "resources/background/Background.png";
pub const GRASS_TILE: &str = "resources/assets/tiles/grass.png";
pub const HEART: &str = "resources/assets/heart.png";
pub const MOB_WALK: &str = "resources/mob/Snail/walk-Sheet.png";
pub const HERO_GIF_DIR: &str = "resources/character/colour2/no_outline/120x80_gifs";

/// Mob walk sheet layout: 8 frames of 48x32, advancing every 8 ticks
const MOB_FRAMES: u32 = 8;
const MOB_FRAME_DELAY: u32 = 8;
const MOB_FRAME_SIZE: u32 = 48 * 32;

/// Hero animations: state, file under `HERO_GIF_DIR`, frame delay
const HERO_ANIMATIONS: [(AnimationState, &str, u32); 4] = [
    (AnimationState::Idle, "__Idle.gif", 8),
    (AnimationState::Running, "__Run.gif", 6),
    (AnimationState::Jumping, "__Jump.gif", 6),
    (AnimationState::Falling, "__Fall.gif", 6),
];

#[derive(Debug)]
pub enum AssetError {
    IoError(io::Error),
    DecodeError(image::ImageError),
    Empty(String),
    /// Wider or taller than a GPU texture can be
    TooLarge { width: u32, height: u32 },
}

impl From<io::Error> for AssetError {
    fn from(e: io::Error) -> Self {
        AssetError::IoError(e)
    }
}

impl From<image::ImageError> for AssetError {
    fn from(e: image::ImageError) -> Self {
        AssetError::DecodeError(e)
    }
}

impl std::fmt::Display for AssetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetError::IoError(e) => write!(f, "IO error: {}", e),
            AssetError::DecodeError(e) => write!(f, "Decode error: {}", e),
            AssetError::Empty(what) => write!(f, "No image data: {}", what),
            AssetError::TooLarge { width, height } => {
                write!(f, "Image too large for a texture: {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for AssetError {}

/// RGBA8 pixels of a still image.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Every frame of an animation, same size, stored back to back.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAnimation {
    pub width: u32,
    pub height: u32,
    pub frame_count: u32,
    pub rgba: Vec<u8>,
}

impl DecodedAnimation {
    pub fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    pub fn first_frame(&self) -> &[u8] {
        &self.rgba[..self.frame_bytes().min(self.rgba.len())]
    }
}

/// Decode a still image file (PNG) to RGBA8.
pub fn decode_image(path: &Path) -> Result<DecodedImage, AssetError> {
    let img = image::open(path)?.to_rgba8();
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::Empty(path.display().to_string()));
    }
    Ok(DecodedImage {
        width,
        height,
        rgba: img.into_raw(),
    })
}

/// Decode every frame of a GIF. Frames whose size differs from the first
/// are skipped.
pub fn decode_gif(path: &Path) -> Result<DecodedAnimation, AssetError> {
    let decoder = GifDecoder::new(BufReader::new(File::open(path)?))?;
    let frames = decoder.into_frames().collect_frames()?;

    let Some(first) = frames.first() else {
        return Err(AssetError::Empty(path.display().to_string()));
    };
    let (width, height) = first.buffer().dimensions();

    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4 * frames.len());
    let mut frame_count = 0;
    for (i, frame) in frames.into_iter().enumerate() {
        let buffer = frame.into_buffer();
        if buffer.dimensions() != (width, height) {
            log::warn!(
                "{}: frame {} is {:?}, expected {}x{}, skipped",
                path.display(),
                i,
                buffer.dimensions(),
                width,
                height
            );
            continue;
        }
        rgba.extend_from_slice(buffer.as_raw());
        frame_count += 1;
    }

    Ok(DecodedAnimation {
        width,
        height,
        frame_count,
        rgba,
    })
}

/// Texture dimensions as macroquad takes them.
pub fn texture_size(width: u32, height: u32) -> Result<(u16, u16), AssetError> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(AssetError::TooLarge { width, height }),
    }
}

/// Owns the GPU textures while assets are being loaded.
#[derive(Default)]
pub struct TextureBank {
    textures: Vec<Texture2D>,
}

impl TextureBank {
    pub fn new() -> Self {
        Self::default()
    }

    fn create(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<TextureHandle, AssetError> {
        let (w, h) = texture_size(width, height)?;
        let texture = Texture2D::from_rgba8(w, h, rgba);
        texture.set_filter(FilterMode::Nearest);
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(texture);
        Ok(TextureHandle {
            id,
            width: width as f32,
            height: height as f32,
        })
    }

    pub fn load_image(&mut self, path: &Path) -> Result<TextureHandle, AssetError> {
        let img = decode_image(path)?;
        self.create(img.width, img.height, &img.rgba)
    }

    pub fn load_sprite_sheet(
        &mut self,
        path: &Path,
        frame_count: u32,
        frame_delay: u32,
        frame_size: u32,
    ) -> Result<AnimationData, AssetError> {
        let texture = self.load_image(path)?;
        Ok(AnimationData::sprite_sheet(texture, frame_count, frame_delay, frame_size))
    }

    pub fn load_gif(&mut self, path: &Path, frame_delay: u32) -> Result<AnimationData, AssetError> {
        let anim = decode_gif(path)?;
        let texture = self.create(anim.width, anim.height, anim.first_frame())?;
        let pixels: Arc<[u8]> = anim.rgba.into();
        Ok(AnimationData::decoded(texture, pixels, anim.frame_count, frame_delay))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Freeze the bank into a cheaply cloneable handle for the systems.
    pub fn into_shared(self) -> SharedTextures {
        SharedTextures(self.textures.into())
    }
}

/// Read-only texture table shared by the canvas and the frame uploader.
#[derive(Clone)]
pub struct SharedTextures(Rc<[Texture2D]>);

impl SharedTextures {
    pub fn get(&self, id: TextureId) -> Option<&Texture2D> {
        self.0.get(id.0 as usize)
    }
}

impl Canvas for SharedTextures {
    fn clear(&mut self, color: Color) {
        clear_background(color);
    }

    fn draw_texture_region(&mut self, texture: TextureId, source: Rect, dest: Rect) {
        let Some(tex) = self.get(texture) else {
            return;
        };
        // Negative source width means "mirror"; macroquad wants a positive
        // rect and a flip flag.
        let flip_x = source.w < 0.0;
        let source = Rect::new(source.x, source.y, source.w.abs(), source.h);
        draw_texture_ex(
            tex,
            dest.x,
            dest.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(dest.w, dest.h)),
                source: Some(source),
                flip_x,
                ..Default::default()
            },
        );
    }

    fn draw_outline(&mut self, rect: Rect, color: Color) {
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, color);
    }
}

impl FrameUploader for SharedTextures {
    fn upload_frame(&mut self, texture: TextureId, rgba: &[u8]) {
        if let Some(tex) = self.get(texture) {
            tex.update_from_bytes(tex.width() as u32, tex.height() as u32, rgba);
        }
    }
}

/// Everything the game needs from disk.
pub struct GameAssets {
    pub sprites: SpriteAssets,
    pub textures: RenderTextures,
    pub bank: SharedTextures,
}

fn report<T>(what: &str, result: Result<T, AssetError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("failed to load {}: {}", what, e);
            None
        }
    }
}

/// Load all game assets. Anything that fails to load is logged and left out;
/// the game still runs, just with missing art.
pub fn load_game_assets(paths: &ProjectPaths) -> GameAssets {
    let mut bank = TextureBank::new();

    let background = report(BACKGROUND, bank.load_image(&paths.resolve(BACKGROUND)));
    let heart = report(HEART, bank.load_image(&paths.resolve(HEART)));
    let mut tiles = HashMap::new();
    if let Some(grass) = report(GRASS_TILE, bank.load_image(&paths.resolve(GRASS_TILE))) {
        tiles.insert(TileType::Grass, grass);
    }

    let mob_walk = report(
        MOB_WALK,
        bank.load_sprite_sheet(&paths.resolve(MOB_WALK), MOB_FRAMES, MOB_FRAME_DELAY, MOB_FRAME_SIZE),
    );

    let mut hero = HashMap::new();
    let gif_dir = paths.resolve(HERO_GIF_DIR);
    for (state, file, delay) in HERO_ANIMATIONS {
        if let Some(anim) = report(file, bank.load_gif(&gif_dir.join(file), delay)) {
            hero.insert(state, anim);
        }
    }

    log::info!("loaded {} textures from {}", bank.len(), paths.root().display());

    GameAssets {
        sprites: SpriteAssets { hero, mob_walk },
        textures: RenderTextures {
            background,
            tiles,
            heart,
        },
        bank: bank.into_shared(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifEncoder;
    use image::{Delay, Frame, Rgba, RgbaImage};

    fn write_gif(path: &Path, colors: &[[u8; 4]]) {
        let file = File::create(path).unwrap();
        let mut encoder = GifEncoder::new(file);
        let frames = colors.iter().map(|&c| {
            Frame::from_parts(
                RgbaImage::from_pixel(4, 2, Rgba(c)),
                0,
                0,
                Delay::from_numer_denom_ms(100, 1),
            )
        });
        encoder.encode_frames(frames).unwrap();
    }

    #[test]
    fn test_decode_gif_concatenates_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.gif");
        write_gif(&path, &[[255, 0, 0, 255], [0, 0, 255, 255], [0, 255, 0, 255]]);

        let anim = decode_gif(&path).unwrap();
        assert_eq!((anim.width, anim.height), (4, 2));
        assert_eq!(anim.frame_count, 3);
        assert_eq!(anim.frame_bytes(), 32);
        assert_eq!(anim.rgba.len(), 96);
        assert_eq!(&anim.first_frame()[..4], &[255, 0, 0, 255]);
        assert_eq!(&anim.rgba[32..36], &[0, 0, 255, 255]);
    }

    #[test]
    fn test_decode_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grass.png");
        RgbaImage::from_pixel(3, 5, Rgba([10, 200, 30, 255])).save(&path).unwrap();

        let img = decode_image(&path).unwrap();
        assert_eq!((img.width, img.height), (3, 5));
        assert_eq!(img.rgba.len(), 3 * 5 * 4);
        assert_eq!(&img.rgba[..4], &[10, 200, 30, 255]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = decode_gif(&dir.path().join("nope.gif"));
        assert!(matches!(result, Err(AssetError::IoError(_))));
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.gif");
        std::fs::write(&path, b"definitely not a gif").unwrap();
        assert!(matches!(decode_gif(&path), Err(AssetError::DecodeError(_))));
    }

    #[test]
    fn test_texture_size_limits() {
        assert_eq!(texture_size(120, 80).unwrap(), (120, 80));
        assert_eq!(texture_size(65535, 1).unwrap(), (65535, 1));
        assert!(matches!(
            texture_size(70_000, 16),
            Err(AssetError::TooLarge { width: 70_000, height: 16 })
        ));
        assert!(matches!(texture_size(16, 65536), Err(AssetError::TooLarge { .. })));
    }
}
