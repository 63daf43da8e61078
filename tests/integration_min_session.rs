// Drives the compiled binary through a PTY: fixed word, win, quit.
//
// Requires a TTY, so it is Unix-only and ignored by default.
// Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn fixed_word_round_completes_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    let bin = assert_cmd::cargo::cargo_bin("glyphmare");
    let cmd = format!("{} --word crane --definition bird", bin.display());

    let mut p = spawn(cmd)?;

    // terminal setup plus the background fetch
    std::thread::sleep(Duration::from_millis(300));

    p.send("crane")?;
    p.send("\r")?;
    std::thread::sleep(Duration::from_millis(200));

    p.send("\x1b")?; // ESC
    p.expect(Eof)?;
    Ok(())
}
