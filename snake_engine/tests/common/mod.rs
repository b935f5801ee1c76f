#![allow(dead_code)]

use std::sync::Once;

use snake_engine::{BoardState, Point, Snake};

static INIT: Once = Once::new();

pub fn setup_logger() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

pub fn snake(id: &str, body: &[(i32, i32)], health: i32) -> Snake {
    Snake::new(
        id,
        body.iter().map(|(x, y)| Point::new(*x, *y)).collect(),
        health,
    )
}

pub fn board(width: i32, height: i32, snakes: Vec<Snake>) -> BoardState {
    let mut state = BoardState::new(width, height);
    state.snakes = snakes;
    state
}
