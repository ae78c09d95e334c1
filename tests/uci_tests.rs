//! Command handling through the UCI front-end, checked against board state.

use redfin::piece::Color;
use redfin::square::parse_square;
use redfin::uci::UCI;

#[test]
fn position_startpos_with_moves() {
    let mut uci = UCI::new();
    assert!(uci.handle_command("position startpos moves e2e4"));
    assert_eq!(uci.board().side_to_move(), Color::Black);
    assert_eq!(uci.board().en_passant_target(), parse_square("e3"));
    assert!(!uci
        .board()
        .square_attacked(parse_square("e4").unwrap(), Color::Black));
}

#[test]
fn position_fen_with_moves() {
    let mut uci = UCI::new();
    uci.handle_command("position fen 4k3/8/8/8/8/8/4P3/4K3 w - - 0 1 moves e2e4");
    assert_eq!(uci.board().en_passant_target(), parse_square("e3"));
    assert_eq!(uci.board().side_to_move(), Color::Black);
}

#[test]
fn move_application_stops_at_first_bad_move() {
    let mut uci = UCI::new();
    uci.handle_command("position startpos moves e2e4 e7e5 e4e5 g8f6");
    // e4e5 is illegal (blocked); e2e4 and e7e5 stay applied, g8f6 is skipped
    assert_eq!(uci.board().side_to_move(), Color::White);
    assert_eq!(
        uci.board().fullmove_number(),
        2,
        "exactly two plies were applied"
    );
}

#[test]
fn bad_fen_leaves_a_cleared_board() {
    let mut uci = UCI::new();
    uci.handle_command("position fen not/a/real/fen");
    assert!(uci.board().get_occupancy_bitboard().is_empty());
}

#[test]
fn ucinewgame_resets_to_startpos() {
    let mut uci = UCI::new();
    uci.handle_command("position startpos moves e2e4 e7e5");
    uci.handle_command("ucinewgame");
    assert_eq!(uci.board().get_fen(), redfin::board::STARTPOS_FEN);
}

#[test]
fn unknown_commands_and_options_are_ignored() {
    let mut uci = UCI::new();
    assert!(uci.handle_command("flounder about"));
    assert!(uci.handle_command("setoption name Sardines value 9"));
    assert!(uci.handle_command("setoption name Threads value 8"));
    assert!(uci.handle_command("setoption name Hash value 16"));
    assert!(uci.handle_command(""));
}

#[test]
fn quit_requests_termination() {
    let mut uci = UCI::new();
    assert!(!uci.handle_command("quit"));
    let mut uci = UCI::new();
    assert!(!uci.handle_command("exit"));
}

#[test]
fn go_depth_runs_and_stop_joins() {
    let mut uci = UCI::new();
    uci.handle_command("position startpos");
    uci.handle_command("go depth 3");
    // stop joins the worker even if it already finished
    assert!(uci.handle_command("stop"));
}
