use anyhow::Context;
use macroquad::prelude::*;
use prairie_map::render::mesh::{draw_collision_debug, MapMeshes};
use prairie_map::{Map, MapConfig};
use std::time::Duration;

const PLAYER_SIZE: f32 = 24.0;
const PLAYER_SPEED: f32 = 160.0;

fn window_conf() -> Conf {
    Conf {
        window_title: "Prairie".into(),
        window_width: 640,
        window_height: 544,
        ..Default::default()
    }
}

// usage: prairie [map.tmx] [tileset.png] [config.json]
#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();
    if let Err(e) = run().await {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let map_path = args.next().unwrap_or_else(|| "assets/tiledMap/desert.tmx".into());
    let sheet_path = args.next().unwrap_or_else(|| "assets/tiledPNG/background.png".into());
    let config = match args.next() {
        Some(p) => MapConfig::from_file(&p).with_context(|| format!("Reading config {p}"))?,
        None => MapConfig::default(),
    };

    let mut map = Map::load(&map_path, &sheet_path, &config)
        .with_context(|| format!("Loading map {map_path}"))?;
    let texture = load_texture(&sheet_path)
        .await
        .with_context(|| format!("Loading texture {sheet_path}"))?;
    texture.set_filter(FilterMode::Nearest);
    let meshes = MapMeshes::new(&map, &texture);

    let mut player = Rect::new(
        screen_width() / 2.0,
        screen_height() / 2.0,
        PLAYER_SIZE,
        PLAYER_SIZE,
    );
    let mut show_debug = false;
    let mut on_exit = false;

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::F1) {
            show_debug = !show_debug;
        }

        let dt = get_frame_time();
        map.tick(Duration::from_secs_f32(dt));

        let mut dir = Vec2::ZERO;
        if is_key_down(KeyCode::A) || is_key_down(KeyCode::Left) {
            dir.x -= 1.0;
        }
        if is_key_down(KeyCode::D) || is_key_down(KeyCode::Right) {
            dir.x += 1.0;
        }
        if is_key_down(KeyCode::W) || is_key_down(KeyCode::Up) {
            dir.y -= 1.0;
        }
        if is_key_down(KeyCode::S) || is_key_down(KeyCode::Down) {
            dir.y += 1.0;
        }
        let step = dir.normalize_or_zero() * PLAYER_SPEED * dt;

        // resolve each axis separately so the player slides along walls
        let moved_x = player.offset(vec2(step.x, 0.0));
        if !map.collides(&moved_x) {
            player = moved_x;
        }
        let moved_y = player.offset(vec2(0.0, step.y));
        if !map.collides(&moved_y) {
            player = moved_y;
        }

        let exit = map.collision_index().next_area_hit(&player);
        if let (Some(exit), false) = (exit, on_exit) {
            log::info!("entered next area via {:?}", exit.name);
        }
        on_exit = exit.is_some();

        clear_background(BLACK);
        meshes.draw(&map);
        if show_debug {
            draw_collision_debug(&map);
        }
        draw_rectangle(player.x, player.y, player.w, player.h, ORANGE);
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 24.0, 24.0, RED);

        next_frame().await;
    }
    Ok(())
}
