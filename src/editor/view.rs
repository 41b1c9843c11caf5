//! Designer input and drawing (macroquad)

use macroquad::prelude::*;

use crate::game::components::TileType;
use crate::game::renderer::{Canvas, RenderTextures, BACKGROUND_SCALE};

use super::Designer;

const SAVE_BUTTON: Rect = Rect {
    x: 20.0,
    y: 20.0,
    w: 140.0,
    h: 44.0,
};
const GRID_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.125);
const TEXT_COLOR: Color = Color::new(0.31, 0.31, 0.31, 1.0);
const BACKDROP: Color = Color::new(0.96, 0.96, 0.96, 1.0);

/// Apply this frame's mouse and keyboard input to the designer.
/// Left click places a tile (or saves, over the button), right click
/// removes one, S saves.
pub fn handle_input(designer: &mut Designer) {
    let now = get_time();
    let mouse = Vec2::from(mouse_position());

    if is_key_pressed(KeyCode::S) {
        designer.save(now);
    }

    if is_mouse_button_pressed(MouseButton::Left) {
        if SAVE_BUTTON.contains(mouse) {
            designer.save(now);
        } else {
            designer.add_tile_at(mouse, now);
        }
    }

    if is_mouse_button_pressed(MouseButton::Right) {
        designer.remove_tile_at(mouse, now);
    }
}

/// Background, grid, tiles, save button, instructions and status.
pub fn draw(designer: &Designer, canvas: &mut dyn Canvas, textures: &RenderTextures) {
    canvas.clear(BACKDROP);

    if let Some(bg) = textures.background {
        let dest = Rect::new(0.0, 0.0, bg.width * BACKGROUND_SCALE, bg.height * BACKGROUND_SCALE);
        canvas.draw_texture_region(bg.id, Rect::new(0.0, 0.0, bg.width, bg.height), dest);
    }

    draw_grid(designer.tile_size());

    let size = designer.tile_size();
    for tile in &designer.map.tiles {
        let dest = Rect::new(tile.x, tile.y, size.x, size.y);
        match textures.tile(tile.tile_type) {
            Some(tex) => canvas.draw_texture_region(tex.id, Rect::new(0.0, 0.0, tex.width, tex.height), dest),
            None => draw_rectangle(dest.x, dest.y, dest.w, dest.h, placeholder_color(tile.tile_type)),
        }
    }

    let hovered = SAVE_BUTTON.contains(Vec2::from(mouse_position()));
    let button_color = if hovered {
        Color::from_rgba(50, 205, 50, 220)
    } else {
        Color::from_rgba(34, 139, 34, 220)
    };
    draw_rectangle(SAVE_BUTTON.x, SAVE_BUTTON.y, SAVE_BUTTON.w, SAVE_BUTTON.h, button_color);
    draw_rectangle_lines(SAVE_BUTTON.x, SAVE_BUTTON.y, SAVE_BUTTON.w, SAVE_BUTTON.h, 2.0, WHITE);
    draw_text("Save Map", SAVE_BUTTON.x + 20.0, SAVE_BUTTON.y + 28.0, 20.0, WHITE);

    draw_text(
        "Left-click: add tile | Right-click: remove tile | S: save | F2: play",
        20.0,
        84.0,
        16.0,
        TEXT_COLOR,
    );
    draw_text(
        &format!("Saving to {}", designer.path().display()),
        20.0,
        104.0,
        16.0,
        TEXT_COLOR,
    );

    if let Some((msg, color)) = designer.status(get_time()) {
        draw_text(msg, 20.0, 128.0, 20.0, color);
    }
}

fn draw_grid(cell: Vec2) {
    if cell.x <= 0.0 || cell.y <= 0.0 {
        return;
    }
    let (w, h) = (screen_width(), screen_height());

    let mut x = 0.0;
    while x <= w {
        draw_line(x, 0.0, x, h, 1.0, GRID_COLOR);
        x += cell.x;
    }
    let mut y = 0.0;
    while y <= h {
        draw_line(0.0, y, w, y, 1.0, GRID_COLOR);
        y += cell.y;
    }
}

fn placeholder_color(tile_type: TileType) -> Color {
    match tile_type {
        TileType::Grass => DARKGREEN,
        TileType::Stone => GRAY,
        TileType::Water => BLUE,
        TileType::Tree => GREEN,
        TileType::Rock => DARKGRAY,
    }
}
