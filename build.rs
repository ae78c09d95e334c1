use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

// Zobrist keys must be identical from build to build, so they are derived
// from a fixed seed with SplitMix64 rather than an OS entropy source.
const ZOBRIST_SEED: u64 = 0x0C0F_FEE1_2345_6789;

// piece[2][6][64] + castling[16] + ep_file[8] + side
const ZOBRIST_KEY_COUNT: usize = 2 * 6 * 64 + 16 + 8 + 1;

fn main() {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let lookup_file = Path::new(&out_dir).join("lookup.rs");
    let zobrist_file = Path::new(&out_dir).join("zobrist_keys.rs");

    let mut file = File::create(lookup_file).unwrap();
    writeln!(&mut file, "impl Bitboard {{").unwrap();
    inject_array(
        &mut file,
        "pub const KNIGHT_ATTACKS: [Bitboard; 64]",
        &knight_attacks(),
        Some("Bitboard"),
    );
    inject_array(
        &mut file,
        "pub const KING_ATTACKS: [Bitboard; 64]",
        &king_attacks(),
        Some("Bitboard"),
    );
    writeln!(&mut file, "}}").unwrap();

    file = File::create(zobrist_file).unwrap();
    writeln!(&mut file, "impl ZobristHasher {{").unwrap();
    inject_array(
        &mut file,
        &format!("pub const ZOBRIST_KEYS: [u64; {}]", ZOBRIST_KEY_COUNT),
        &zobrist_keys(),
        None,
    );
    writeln!(&mut file, "}}").unwrap();

    println!("cargo:rerun-if-changed=build.rs");
}

fn inject_array<T: ToString>(
    file: &mut File,
    declaration: &str,
    array: &[T],
    constructor: Option<&str>,
) {
    writeln!(file, "{} = [", declaration).unwrap();
    for value in array {
        write!(
            file,
            "{}, ",
            match constructor {
                Some(c) => c.to_owned() + "(" + &value.to_string() + ")",
                None => value.to_string(),
            }
        )
        .unwrap();
    }
    writeln!(file, "];").unwrap();
}

fn knight_attacks() -> Vec<u64> {
    let knight_shifts: [fn(u64) -> u64; 8] = [
        |bb| (bb << 10) & !0x303030303030303,
        |bb| (bb >> 10) & !0xc0c0c0c0c0c0c0c0,
        |bb| (bb << 17) & !0x101010101010101,
        |bb| (bb >> 17) & !0x8080808080808080,
        |bb| (bb << 15) & !0x8080808080808080,
        |bb| (bb >> 15) & !0x101010101010101,
        |bb| (bb << 6) & !0xc0c0c0c0c0c0c0c0,
        |bb| (bb >> 6) & !0x303030303030303,
    ];
    attack_table(&knight_shifts)
}

fn king_attacks() -> Vec<u64> {
    let king_shifts: [fn(u64) -> u64; 8] = [
        |bb| (bb >> 1) & !0x8080808080808080,
        |bb| (bb << 1) & !0x101010101010101,
        |bb| (bb << 7) & !0x8080808080808080,
        |bb| (bb >> 7) & !0x101010101010101,
        |bb| (bb << 9) & !0x101010101010101,
        |bb| (bb >> 9) & !0x8080808080808080,
        |bb| bb << 8,
        |bb| bb >> 8,
    ];
    attack_table(&king_shifts)
}

fn attack_table(shifts: &[fn(u64) -> u64; 8]) -> Vec<u64> {
    let mut results = vec![];
    for sq in 0..64 {
        let origin = 1u64 << sq;
        let mut attacks = 0u64;
        for shift in shifts {
            attacks |= shift(origin);
        }
        results.push(attacks);
    }
    results
}

fn zobrist_keys() -> Vec<u64> {
    let mut state = ZOBRIST_SEED;
    let mut next = move || {
        state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    };
    (0..ZOBRIST_KEY_COUNT).map(|_| next()).collect()
}
