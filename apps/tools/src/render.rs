use shared::{
    domain::{Board, Position},
    protocol::ServerEvent,
};

const EMPTY: &str = ".";

/// Text grid with row and column numbers, one fixed-width column per cell.
pub fn board(board: &Board) -> String {
    let mut out = String::from("   ");
    for col in 0..board.cols() {
        out.push_str(&format!(" {col:^5}"));
    }
    for row in 0..board.rows() {
        out.push_str(&format!("\n{row:>2} "));
        for col in 0..board.cols() {
            let label = board
                .get(Position::new(row, col))
                .and_then(|cell| cell.piece())
                .map(|piece| piece.to_string())
                .unwrap_or_else(|| EMPTY.to_string());
            out.push_str(&format!(" {label:^5}"));
        }
    }
    out
}

pub fn event(event: &ServerEvent) -> String {
    match event {
        ServerEvent::Init {
            grid,
            current_player,
            move_history,
        } => format!(
            "{}\nto move: {current_player}{}",
            board(grid),
            last_move(move_history)
        ),
        ServerEvent::Update {
            grid,
            current_player,
            move_history,
            winner,
        } => {
            let status = match winner {
                Some(owner) => format!("winner: {owner}"),
                None => format!("to move: {current_player}"),
            };
            format!("{}\n{status}{}", board(grid), last_move(move_history))
        }
        ServerEvent::Error(error) => format!("error: {}", error.message),
    }
}

fn last_move(history: &[String]) -> String {
    history
        .last()
        .map(|entry| format!(" (last: {entry})"))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
