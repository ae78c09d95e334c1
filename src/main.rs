fn main() {
    // stdout carries the UCI protocol; diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    println!(
        "redfin v{}, by {}",
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    );

    let perft_mode = std::env::args().nth(1).as_deref() == Some("perft");

    // Launches a perft test
    if perft_mode {
        let expected_format = "Expected : perft <depth> [<FEN>]";
        let depth = std::env::args()
            .nth(2)
            .expect(expected_format)
            .parse::<u32>()
            .expect(expected_format);
        let fen = std::env::args().nth(3);

        redfin::perft(depth, fen)
    } else {
        // Normal UCI
        redfin::uci::UCI::run()
    }
}
